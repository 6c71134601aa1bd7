//! Freehand pen: pointer events → stroke segments.
//!
//! ```text
//!   Idle ──down──▶ Drawing ──move──▶ Drawing (emit segment)
//!    ▲                │
//!    └───up / leave───┘
//! ```
//!
//! A pointer-down only opens the path; ink appears with the first move.
//! Segments are rasterized immediately, never batched.

use crate::input::InputEvent;
use ink_core::{Color, DrawingState, Point, RasterBuffer};
use ink_render::stroke::{Segment, rasterize_segment};

pub struct DrawingEngine {
    state: DrawingState,
    stroke_width: f32,
}

impl DrawingEngine {
    pub fn new(color: Color, stroke_width: f32) -> Self {
        Self {
            state: DrawingState::new(color),
            stroke_width,
        }
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state.active
    }

    /// Takes effect from the next segment; ink already laid down keeps its color.
    pub fn set_color(&mut self, color: Color) {
        self.state.stroke_color = color;
    }

    /// Advance the state machine. Returns the segment to rasterize, if any.
    pub fn handle(&mut self, event: &InputEvent) -> Option<Segment> {
        match *event {
            InputEvent::PointerDown { x, y } => {
                self.state.active = true;
                self.state.cursor = Point::new(x, y);
                None
            }
            InputEvent::PointerMove { x, y } => {
                if !self.state.active {
                    return None;
                }
                let to = Point::new(x, y);
                let seg = Segment {
                    from: self.state.cursor,
                    to,
                    color: self.state.stroke_color,
                    width: self.stroke_width,
                };
                self.state.cursor = to;
                Some(seg)
            }
            InputEvent::PointerUp { .. } | InputEvent::PointerLeave => {
                self.state.active = false;
                None
            }
        }
    }

    /// Handle `event` against `raster`: a move that exits the buffer ends
    /// the stroke like a leave event. Returns true if pixels changed.
    pub fn apply(&mut self, event: &InputEvent, raster: &mut RasterBuffer) -> bool {
        let inside = |x: f32, y: f32| {
            x >= 0.0 && y >= 0.0 && x < raster.width() as f32 && y < raster.height() as f32
        };
        let event = match *event {
            InputEvent::PointerDown { x, y } if !inside(x, y) => return false,
            InputEvent::PointerMove { x, y } if !inside(x, y) => InputEvent::PointerLeave,
            other => other,
        };

        match self.handle(&event) {
            Some(seg) => rasterize_segment(raster, &seg) > 0,
            None => false,
        }
    }

    /// Back to idle. The selected color stays in force.
    pub fn reset(&mut self) {
        self.state = DrawingState::new(self.state.stroke_color);
    }
}
