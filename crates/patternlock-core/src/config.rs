#![forbid(unsafe_code)]

//! Lock configuration.
//!
//! [`LockConfig`] gathers every tunable of the lock. Only the node size is
//! required; everything else has a default matching the stock 3×3 lock.
//!
//! # Loading
//!
//! With the `config-file` feature the config can be read from TOML or JSON.
//! Loaded configs are validated before they are returned.
//!
//! ```toml
//! grid_size = 4
//! node_size = 48.0
//! spacing = 24.0
//! padding = 12.0
//! auto_link = true
//! ```

#[cfg(feature = "config-file")]
use std::path::Path;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

use std::time::Duration;

use crate::error::ConfigError;
use crate::measure::LayoutParams;
use crate::node::AnimationHandle;

pub const DEFAULT_GRID_SIZE: usize = 3;
pub const DEFAULT_FINISH_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_VIBRATE_MS: u64 = 20;
pub const DEFAULT_REPLAY_INTERVAL_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
pub struct LockConfig {
    /// N of the N×N grid (default: 3).
    #[cfg_attr(feature = "config-file", serde(default = "default_grid_size"))]
    pub grid_size: usize,
    /// Desired node size in pixels. Required, must be > 0.
    pub node_size: f32,
    /// Gap between nodes. `None` or negative selects Identical-Area layout.
    #[cfg_attr(feature = "config-file", serde(default))]
    pub spacing: Option<f32>,
    /// Outer padding in Spacing-Padding layout (default: 0).
    #[cfg_attr(feature = "config-file", serde(default))]
    pub padding: f32,
    /// Extra hit-test margin around every node (default: 0).
    #[cfg_attr(feature = "config-file", serde(default))]
    pub touch_expand: f32,
    /// Identical-Area layout keeps cells square (default: true).
    #[cfg_attr(feature = "config-file", serde(default = "default_true"))]
    pub square_cells: bool,
    /// Link nodes crossed between two touched nodes (default: false).
    #[cfg_attr(feature = "config-file", serde(default))]
    pub auto_link: bool,
    /// Delay before the lock resets after release (default: 1000ms).
    #[cfg_attr(
        feature = "config-file",
        serde(default = "default_finish_timeout_ms")
    )]
    pub finish_timeout_ms: u64,
    /// A new press may cut the finish delay short (default: true).
    #[cfg_attr(feature = "config-file", serde(default = "default_true"))]
    pub finish_interruptable: bool,
    /// Draw connecting lines (default: true).
    #[cfg_attr(feature = "config-file", serde(default = "default_true"))]
    pub pattern_visible: bool,
    /// Pulse the haptic motor on every touched node (default: false).
    #[cfg_attr(feature = "config-file", serde(default))]
    pub vibrate: bool,
    /// Haptic pulse length (default: 20ms).
    #[cfg_attr(feature = "config-file", serde(default = "default_vibrate_ms"))]
    pub vibrate_ms: u64,
    /// Animation attached to nodes lit by touch.
    #[cfg_attr(feature = "config-file", serde(default))]
    pub node_animation: Option<AnimationHandle>,
    /// Default per-node playback interval (default: 500ms).
    #[cfg_attr(
        feature = "config-file",
        serde(default = "default_replay_interval_ms")
    )]
    pub replay_interval_ms: u64,
}

impl LockConfig {
    /// Create a config with the given node size and defaults everywhere else.
    #[must_use]
    pub fn new(node_size: f32) -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            node_size,
            spacing: None,
            padding: 0.0,
            touch_expand: 0.0,
            square_cells: true,
            auto_link: false,
            finish_timeout_ms: DEFAULT_FINISH_TIMEOUT_MS,
            finish_interruptable: true,
            pattern_visible: true,
            vibrate: false,
            vibrate_ms: DEFAULT_VIBRATE_MS,
            node_animation: None,
            replay_interval_ms: DEFAULT_REPLAY_INTERVAL_MS,
        }
    }

    #[must_use]
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    #[must_use]
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = Some(spacing);
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_touch_expand(mut self, touch_expand: f32) -> Self {
        self.touch_expand = touch_expand;
        self
    }

    #[must_use]
    pub fn with_square_cells(mut self, square_cells: bool) -> Self {
        self.square_cells = square_cells;
        self
    }

    #[must_use]
    pub fn with_auto_link(mut self, auto_link: bool) -> Self {
        self.auto_link = auto_link;
        self
    }

    #[must_use]
    pub fn with_finish_timeout_ms(mut self, ms: u64) -> Self {
        self.finish_timeout_ms = ms;
        self
    }

    #[must_use]
    pub fn with_finish_interruptable(mut self, interruptable: bool) -> Self {
        self.finish_interruptable = interruptable;
        self
    }

    #[must_use]
    pub fn with_pattern_visible(mut self, visible: bool) -> Self {
        self.pattern_visible = visible;
        self
    }

    /// Enable haptics with the given pulse length.
    #[must_use]
    pub fn with_vibration(mut self, ms: u64) -> Self {
        self.vibrate = true;
        self.vibrate_ms = ms;
        self
    }

    #[must_use]
    pub fn with_node_animation(mut self, animation: AnimationHandle) -> Self {
        self.node_animation = Some(animation);
        self
    }

    #[must_use]
    pub fn with_replay_interval_ms(mut self, ms: u64) -> Self {
        self.replay_interval_ms = ms;
        self
    }

    #[inline]
    pub fn finish_timeout(&self) -> Duration {
        Duration::from_millis(self.finish_timeout_ms)
    }

    #[inline]
    pub fn vibrate_duration(&self) -> Duration {
        Duration::from_millis(self.vibrate_ms)
    }

    #[inline]
    pub fn replay_interval(&self) -> Duration {
        Duration::from_millis(self.replay_interval_ms)
    }

    /// Layout inputs for the geometry engine.
    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            grid_size: self.grid_size,
            node_size: self.node_size,
            spacing: self.spacing,
            padding: self.padding,
            square_cells: self.square_cells,
        }
    }

    /// Check that the config can drive a lock.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_grid_size(self.grid_size)?;
        if !self.node_size.is_finite() || self.node_size <= 0.0 {
            return Err(ConfigError::NodeSizeNotPositive {
                node_size: self.node_size,
            });
        }
        let dimensions = [
            ("spacing", self.spacing.unwrap_or(0.0)),
            ("padding", self.padding),
            ("touch_expand", self.touch_expand),
        ];
        for (field, value) in dimensions {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteDimension { field, value });
            }
        }
        Ok(())
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }
}

/// Reject grid sizes with no nodes or whose node count does not fit `usize`.
pub fn check_grid_size(grid_size: usize) -> Result<(), ConfigError> {
    if grid_size == 0 {
        return Err(ConfigError::GridSizeZero);
    }
    if grid_size.checked_mul(grid_size).is_none() {
        return Err(ConfigError::GridSizeTooLarge { grid_size });
    }
    Ok(())
}

#[cfg(feature = "config-file")]
fn default_grid_size() -> usize {
    DEFAULT_GRID_SIZE
}

#[cfg(feature = "config-file")]
fn default_true() -> bool {
    true
}

#[cfg(feature = "config-file")]
fn default_finish_timeout_ms() -> u64 {
    DEFAULT_FINISH_TIMEOUT_MS
}

#[cfg(feature = "config-file")]
fn default_vibrate_ms() -> u64 {
    DEFAULT_VIBRATE_MS
}

#[cfg(feature = "config-file")]
fn default_replay_interval_ms() -> u64 {
    DEFAULT_REPLAY_INTERVAL_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_lock() {
        let config = LockConfig::new(48.0);
        assert_eq!(config.grid_size, 3);
        assert_eq!(config.spacing, None);
        assert_eq!(config.finish_timeout(), Duration::from_millis(1000));
        assert!(config.finish_interruptable);
        assert!(config.pattern_visible);
        assert!(!config.auto_link);
        assert!(!config.vibrate);
        assert_eq!(config.vibrate_duration(), Duration::from_millis(20));
        assert_eq!(config.replay_interval(), Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn node_size_must_be_positive() {
        for bad in [0.0, -5.0, f32::NAN, f32::INFINITY] {
            let err = LockConfig::new(bad).validate().unwrap_err();
            assert!(matches!(err, ConfigError::NodeSizeNotPositive { .. }));
        }
    }

    #[test]
    fn grid_size_zero_is_rejected() {
        let err = LockConfig::new(10.0).with_grid_size(0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::GridSizeZero));
    }

    #[test]
    fn grid_size_with_overflowing_node_count_is_rejected() {
        let err = LockConfig::new(10.0)
            .with_grid_size(usize::MAX)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::GridSizeTooLarge {
                grid_size: usize::MAX
            }
        ));

        // Largest side whose square still fits, and the first one that does not.
        let half = usize::BITS / 2;
        assert!(check_grid_size((1usize << half) - 1).is_ok());
        assert!(matches!(
            check_grid_size(1usize << half),
            Err(ConfigError::GridSizeTooLarge { .. })
        ));
    }

    #[test]
    fn non_finite_dimensions_are_rejected() {
        let err = LockConfig::new(10.0)
            .with_padding(f32::NAN)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonFiniteDimension {
                field: "padding",
                ..
            }
        ));
    }

    #[test]
    fn layout_params_carry_geometry_fields() {
        let config = LockConfig::new(40.0)
            .with_grid_size(4)
            .with_spacing(8.0)
            .with_padding(4.0)
            .with_square_cells(false);
        let params = config.layout_params();
        assert_eq!(params.grid_size, 4);
        assert_eq!(params.node_size, 40.0);
        assert_eq!(params.effective_spacing(), Some(8.0));
        assert_eq!(params.padding, 4.0);
        assert!(!params.square_cells);
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn loads_from_toml_with_defaults() {
        let config = LockConfig::from_toml_str("node_size = 32.0\nauto_link = true\n").unwrap();
        assert_eq!(config.node_size, 32.0);
        assert!(config.auto_link);
        assert_eq!(config.grid_size, 3);
        assert!(config.square_cells);
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn loaded_config_is_validated() {
        let err = LockConfig::from_json_str(r#"{"node_size": 0.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::NodeSizeNotPositive { .. }));
    }
}
