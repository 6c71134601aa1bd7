//! Ink bounding-box scan.
//!
//! A full pass over the alpha channel, O(width × height). It runs once per
//! recognition round-trip, never per frame.

use ink_core::{InkError, OverlayPosition, Point, RasterBuffer, Result};

/// Inclusive pixel rectangle enclosing every ink pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl InkBounds {
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) as f32 / 2.0,
            (self.min_y + self.max_y) as f32 / 2.0,
        )
    }
}

/// Bounding box of all pixels with non-zero alpha.
///
/// Fails with [`InkError::EmptyCanvas`] when no pixel carries ink.
pub fn ink_bounds(raster: &RasterBuffer) -> Result<InkBounds> {
    let (w, h) = (raster.width(), raster.height());
    // Start inverted so the first ink pixel tightens every edge.
    let mut b = InkBounds {
        min_x: w,
        min_y: h,
        max_x: 0,
        max_y: 0,
    };

    for (i, px) in raster.data().chunks_exact(4).enumerate() {
        if px[3] > 0 {
            let x = (i % w as usize) as u32;
            let y = (i / w as usize) as u32;
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
    }

    if b.min_x > b.max_x || b.min_y > b.max_y {
        return Err(InkError::EmptyCanvas);
    }
    Ok(b)
}

/// Center of the ink, or `fallback` when the canvas is empty.
pub fn anchor_or(raster: &RasterBuffer, fallback: OverlayPosition) -> OverlayPosition {
    match ink_bounds(raster) {
        Ok(b) => b.center().into(),
        Err(_) => {
            log::debug!("empty canvas, anchoring at fallback ({}, {})", fallback.x, fallback.y);
            fallback
        }
    }
}
