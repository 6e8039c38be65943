#![forbid(unsafe_code)]

//! Runtime: the touch state machine and password playback.
//!
//! # Role in patternlock
//! `patternlock-runtime` wires the pure types from `patternlock-core` into an
//! interactive lock. The host owns a [`PatternLock`], forwards pointer events
//! with a timestamp, calls [`PatternLock::poll`] once per frame, and paints
//! the [`Frame`] it returns.
//!
//! # Threads
//! The lock itself is single-threaded. Playback runs on a worker thread that
//! only posts messages; they are applied inside `poll`, so callbacks and
//! listeners always run on the lock's thread.
//!
//! # Example
//! ```
//! use patternlock_core::{LockConfig, PointerEvent};
//! use patternlock_runtime::{FinishResult, PatternLock};
//! use web_time::Instant;
//!
//! let mut lock = PatternLock::new(LockConfig::new(20.0).with_spacing(10.0))?;
//! lock.resize(80, 80);
//! lock.set_on_finish(|password| {
//!     if password.as_str() == "[0-4-8]" {
//!         FinishResult::Correct
//!     } else {
//!         FinishResult::Error
//!     }
//! });
//!
//! let now = Instant::now();
//! lock.handle_pointer(PointerEvent::down(10.0, 10.0), now);
//! lock.handle_pointer(PointerEvent::moved(40.0, 40.0), now);
//! lock.handle_pointer(PointerEvent::moved(70.0, 70.0), now);
//! lock.handle_pointer(PointerEvent::up(70.0, 70.0), now);
//! assert_eq!(lock.path(), &[0, 4, 8]);
//! # Ok::<(), patternlock_runtime::Error>(())
//! ```

pub mod error;
pub mod frame;
pub mod haptics;
pub mod lock;
pub mod playback;

pub use error::{Error, Result};
pub use frame::{Frame, LineTone, NodeVisual, Segment};
pub use haptics::{HapticError, Haptics, NoHaptics};
pub use lock::{FinishResult, PatternLock, TouchState};
pub use playback::{PlaybackEnd, PlaybackOptions, RepeatCount};
