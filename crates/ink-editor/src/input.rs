//! Input abstraction layer.
//!
//! Normalizes mouse, touch, and pen events into canvas-local pointer
//! events consumed by the drawing engine.

/// A normalized pointer event. Coordinates are canvas-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start, pen contact).
    PointerDown { x: f32, y: f32 },

    /// Pointer moved.
    PointerMove { x: f32, y: f32 },

    /// Pointer released.
    PointerUp { x: f32, y: f32 },

    /// Pointer left the canvas element.
    PointerLeave,
}

impl InputEvent {
    pub fn down(x: f32, y: f32) -> Self {
        Self::PointerDown { x, y }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::PointerUp { x, y }
    }

    /// Extract position if this event carries one.
    pub fn position(&self) -> Option<(f32, f32)> {
        match self {
            Self::PointerDown { x, y } | Self::PointerMove { x, y } | Self::PointerUp { x, y } => {
                Some((*x, *y))
            }
            Self::PointerLeave => None,
        }
    }
}
