#![forbid(unsafe_code)]

//! Error types for configuration and password input.

use thiserror::Error;

/// Invalid lock configuration. Fatal at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("node size must be provided and larger than zero (got {node_size})")]
    NodeSizeNotPositive { node_size: f32 },

    #[error("grid size must be at least 1")]
    GridSizeZero,

    #[error("grid size {grid_size} is too large, its node count overflows")]
    GridSizeTooLarge { grid_size: usize },

    #[error("{field} must be a finite number (got {value})")]
    NonFiniteDimension { field: &'static str, value: f32 },

    #[cfg(feature = "config-file")]
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config-file")]
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config-file")]
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Caller-supplied password that cannot be shown on this grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("password has a null value at position {index}")]
    NullId { index: usize },

    #[error("password value {id} at position {index} is invalid, valid range is [0, {node_count})")]
    OutOfRange {
        index: usize,
        id: i64,
        node_count: usize,
    },
}
