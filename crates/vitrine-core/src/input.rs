//! Toolkit-independent pointer events.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event delivered to the canvas.
///
/// Positions are absolute pixels in the same space as the container bounds
/// passed alongside the event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Move { position: Point },
    /// Button released, wherever it happens (global listener).
    Up { position: Point, button: MouseButton },
    /// Pointer left the canvas container.
    Leave,
}

impl PointerEvent {
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position, .. } => Some(*position),
            PointerEvent::Leave => None,
        }
    }
}
