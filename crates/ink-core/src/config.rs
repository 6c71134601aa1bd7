//! Per-session settings.
//!
//! Defaults reproduce the stock front end: a 3px round white pen, a one
//! second reveal delay applied to every item of a batch, and overlays
//! parked at `(10, 200)` until a batch supplies a better anchor.

use crate::error::{InkError, Result};
use crate::model::{Color, OverlayPosition};
use crate::raster::MAX_DIMENSION;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Raster width in pixels. Fixed for the session.
    pub width: u32,
    /// Raster height in pixels. Fixed for the session.
    pub height: u32,
    pub stroke_width: f32,
    pub default_color: Color,
    /// Initial overlay position, and the anchor used when the canvas is empty.
    pub default_anchor: OverlayPosition,
    /// Delay between batch arrival and reveal.
    pub reveal_delay_ms: u64,
    /// Extra delay per item index. `None` reveals the whole batch at once.
    pub reveal_stagger_ms: Option<u64>,
    /// Wipe the sketch whenever a result is revealed.
    pub clear_canvas_on_reveal: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            stroke_width: 3.0,
            default_color: Color::WHITE,
            default_anchor: OverlayPosition::new(10.0, 200.0),
            reveal_delay_ms: 1000,
            reveal_stagger_ms: None,
            clear_canvas_on_reveal: true,
        }
    }
}

impl SessionConfig {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Reject raster sizes that are zero or above [`MAX_DIMENSION`].
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [("width", self.width), ("height", self.height)] {
            if v == 0 || v > MAX_DIMENSION {
                return Err(InkError::InvalidConfig(format!(
                    "{name} {v} outside 1..={MAX_DIMENSION}"
                )));
            }
        }
        Ok(())
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn reveal_stagger(&self) -> Option<Duration> {
        self.reveal_stagger_ms.map(Duration::from_millis)
    }
}
