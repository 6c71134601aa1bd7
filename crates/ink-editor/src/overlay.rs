//! Shared anchor for rendered result overlays.
//!
//! There is a single position for all overlays: dragging any of them moves
//! them together, and each new batch re-seeds it from the ink anchor.

use ink_core::OverlayPosition;

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayManager {
    initial: OverlayPosition,
    position: OverlayPosition,
}

impl OverlayManager {
    pub fn new(initial: OverlayPosition) -> Self {
        Self {
            initial,
            position: initial,
        }
    }

    pub fn position(&self) -> OverlayPosition {
        self.position
    }

    /// Anchor computed from a batch's ink bounds.
    pub fn seed(&mut self, anchor: OverlayPosition) {
        log::debug!("overlay anchor seeded at ({}, {})", anchor.x, anchor.y);
        self.position = anchor;
    }

    /// Drag stop on any overlay.
    pub fn drag_to(&mut self, position: OverlayPosition) {
        self.position = position;
    }

    pub fn reset(&mut self) {
        self.position = self.initial;
    }
}
