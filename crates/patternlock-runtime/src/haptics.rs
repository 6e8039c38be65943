#![forbid(unsafe_code)]

//! Vibration collaborator.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HapticError {
    #[error("no vibration hardware available")]
    Unavailable,
    #[error("vibration failed: {0}")]
    Failed(String),
}

/// Fire-and-forget vibration. Errors are logged by the lock and dropped.
pub trait Haptics {
    fn vibrate(&mut self, duration: Duration) -> Result<(), HapticError>;
}

/// Haptics that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn vibrate(&mut self, _duration: Duration) -> Result<(), HapticError> {
        Ok(())
    }
}

impl<F> Haptics for F
where
    F: FnMut(Duration) -> Result<(), HapticError>,
{
    fn vibrate(&mut self, duration: Duration) -> Result<(), HapticError> {
        self(duration)
    }
}
