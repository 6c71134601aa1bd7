//! Owned RGBA pixel buffer backing the drawing canvas.

use crate::model::Color;

/// Largest accepted width or height. Larger requests are clamped, which
/// keeps the byte length within `usize` on 32-bit targets.
pub const MAX_DIMENSION: u32 = 8192;

/// A fixed-size grid of RGBA pixels, row-major, 4 bytes per pixel.
///
/// Dimensions never change after construction. A freshly created or cleared
/// buffer is fully transparent.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Dimensions above [`MAX_DIMENSION`] are clamped to it.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.min(MAX_DIMENSION);
        let height = height.min(MAX_DIMENSION);
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, suitable for `ImageData` or a PNG encoder.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y as usize * self.width as usize + x as usize) * 4)
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let i = self.offset(x, y)?;
        let p = &self.data[i..i + 4];
        Some(Color::rgba(p[0], p[1], p[2], p[3]))
    }

    /// Alpha channel at `(x, y)`; zero outside the buffer.
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.offset(x, y).map_or(0, |i| self.data[i + 3])
    }

    /// Overwrite one pixel. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(i) = self.offset(x, y) {
            self.data[i..i + 4].copy_from_slice(&color.to_array());
        }
    }

    /// Composite `color` over the existing pixel (source-over).
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Color) {
        let Some(i) = self.offset(x, y) else {
            return;
        };
        if color.a == 255 {
            self.data[i..i + 4].copy_from_slice(&color.to_array());
            return;
        }
        if color.a == 0 {
            return;
        }

        let sa = f32::from(color.a) / 255.0;
        let da = f32::from(self.data[i + 3]) / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let src = [color.r, color.g, color.b];
        for (c, s) in src.iter().enumerate() {
            let d = f32::from(self.data[i + c]);
            let v = (f32::from(*s) * sa + d * da * (1.0 - sa)) / out_a;
            self.data[i + c] = v.round().clamp(0.0, 255.0) as u8;
        }
        self.data[i + 3] = (out_a * 255.0).round() as u8;
    }

    /// Reset every pixel to fully transparent.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// True when no pixel has non-zero alpha.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|p| p[3] == 0)
    }

    /// Number of ink pixels (non-zero alpha).
    pub fn ink_count(&self) -> usize {
        self.data.chunks_exact(4).filter(|p| p[3] > 0).count()
    }
}

impl std::fmt::Debug for RasterBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("ink", &self.ink_count())
            .finish()
    }
}
