#![cfg_attr(not(test), forbid(unsafe_code))]

//! Core: layout math, node grid, auto-link, and passwords for a gesture lock.
//!
//! # Role in patternlock
//! `patternlock-core` is pure data and arithmetic. It owns no threads and
//! reads no clocks, so every function here is deterministic and total
//! (apart from explicit validation errors).
//!
//! # Primary responsibilities
//! - **Geometry engine** ([`measure`]): node size and placement from the
//!   available space, in Spacing-Padding or Identical-Area mode.
//! - **Node grid** ([`node`]): row-major node records and hit testing.
//! - **Auto-link** ([`autolink`]): lattice points crossed between two nodes.
//! - **Password** ([`password`]): the immutable result of a gesture.
//! - **Configuration** ([`config`]): validated lock settings.
//!
//! # How it fits in the system
//! `patternlock-runtime` drives these types from pointer events and a timer
//! worker, and hands a draw snapshot to whatever renders the lock.

pub mod autolink;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod measure;
pub mod node;
pub mod password;

pub use config::LockConfig;
pub use error::{ConfigError, PasswordError};
pub use event::{PointerAction, PointerEvent};
pub use geometry::{Point, Rect};
pub use measure::{Constraint, LayoutMode, LayoutParams, Measurement};
pub use node::{AnimationHandle, GridPos, Node, NodeGrid, NodeId, NodeState};
pub use password::Password;
