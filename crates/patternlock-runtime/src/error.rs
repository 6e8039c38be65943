//! Runtime error type.

use patternlock_core::{ConfigError, PasswordError};
use thiserror::Error;

/// Errors surfaced by [`PatternLock`](crate::PatternLock).
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid lock configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid password: {0}")]
    Password(#[from] PasswordError),
}

pub type Result<T> = std::result::Result<T, Error>;
