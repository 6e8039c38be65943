#![forbid(unsafe_code)]

//! Pointer input consumed by the touch state machine.
//!
//! Coordinates are in the same pixel space as the layout rects, with the
//! origin at the top-left of the lock area. Only a single pointer is tracked.

/// Phase of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerAction {
    /// Finger or button went down.
    Down,
    /// Pointer moved while down.
    Move,
    /// Finger or button was released.
    Up,
}

/// A single pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(action: PointerAction, x: f32, y: f32) -> Self {
        Self { action, x, y }
    }

    #[must_use]
    pub const fn down(x: f32, y: f32) -> Self {
        Self::new(PointerAction::Down, x, y)
    }

    #[must_use]
    pub const fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerAction::Move, x, y)
    }

    #[must_use]
    pub const fn up(x: f32, y: f32) -> Self {
        Self::new(PointerAction::Up, x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_action() {
        assert_eq!(PointerEvent::down(1.0, 2.0).action, PointerAction::Down);
        assert_eq!(PointerEvent::moved(1.0, 2.0).action, PointerAction::Move);
        let up = PointerEvent::up(3.5, 4.5);
        assert_eq!(up.action, PointerAction::Up);
        assert_eq!((up.x, up.y), (3.5, 4.5));
    }
}
