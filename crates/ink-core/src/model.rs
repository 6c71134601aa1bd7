//! Core value types shared by every crate in the workspace.
//!
//! Colors, canvas points, the drawing state, and the per-reveal records
//! that flow from a recognition batch into the overlay log.

use crate::error::{InkError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ─── Color ───────────────────────────────────────────────────────────────

/// An 8-bit RGBA color, the same layout as a raster pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        let pair = |i: usize| -> Option<u8> { Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?) };

        match bytes.len() {
            3 | 4 => {
                let mut ch = [255u8; 4];
                for (i, c) in bytes.iter().enumerate() {
                    ch[i] = hex_val(*c)? * 17;
                }
                Some(Self::rgba(ch[0], ch[1], ch[2], ch[3]))
            }
            6 => Some(Self::rgb(pair(0)?, pair(2)?, pair(4)?)),
            8 => Some(Self::rgba(pair(0)?, pair(2)?, pair(4)?, pair(6)?)),
            _ => None,
        }
    }

    /// Parse a CSS color as produced by a swatch picker: hex notation,
    /// `rgb(r, g, b)`, or `rgba(r, g, b, a)` with `a` in `0.0..=1.0`.
    pub fn parse_css(input: &str) -> Result<Self> {
        let s = input.trim();
        let invalid = || InkError::InvalidColor(input.to_string());

        if s.starts_with('#') {
            return Self::from_hex(s).ok_or_else(invalid);
        }

        let (args, has_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(invalid());
        };
        let args = args.strip_suffix(')').ok_or_else(invalid)?;
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();

        let expected = if has_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(invalid());
        }

        let channel = |p: &str| p.parse::<u8>().map_err(|_| invalid());
        let r = channel(parts[0])?;
        let g = channel(parts[1])?;
        let b = channel(parts[2])?;
        let a = if has_alpha {
            let alpha: f32 = parts[3].parse().map_err(|_| invalid())?;
            if !(0.0..=1.0).contains(&alpha) {
                return Err(invalid());
            }
            (alpha * 255.0).round() as u8
        } else {
            255
        };
        Ok(Self::rgba(r, g, b, a))
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            let alpha = f32::from(self.a) / 255.0;
            write!(f, "rgba({}, {}, {}, {alpha:.3})", self.r, self.g, self.b)
        }
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────

/// A canvas-local point in pixel units (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Position shared by every rendered result overlay.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OverlayPosition {
    pub x: f32,
    pub y: f32,
}

impl OverlayPosition {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Point> for OverlayPosition {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

// ─── Drawing state ───────────────────────────────────────────────────────

/// Pointer-tracking state of the pen. `active` is only true mid-stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingState {
    pub active: bool,
    pub stroke_color: Color,
    pub cursor: Point,
}

impl DrawingState {
    pub fn new(stroke_color: Color) -> Self {
        Self {
            active: false,
            stroke_color,
            cursor: Point::default(),
        }
    }
}

// ─── Staged results ──────────────────────────────────────────────────────

/// One response item waiting to be revealed.
///
/// `reveal_at` is measured on the session clock: time elapsed since the
/// session was created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StagedResult {
    pub expression: String,
    pub answer: String,
    pub reveal_at: Duration,
}

impl StagedResult {
    /// Plain markup handed to the typesetter: `expression = answer`.
    pub fn markup(&self) -> String {
        format!("{} = {}", self.expression, self.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_forms() {
        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("#FF000080"), Some(Color::rgba(255, 0, 0, 128)));
        assert_eq!(Color::from_hex("00ff00"), Some(Color::rgb(0, 255, 0)));
        assert_eq!(Color::from_hex("#ggg"), None);
        assert_eq!(Color::from_hex("#12345"), None);
    }

    #[test]
    fn parse_css_rgb_functions() {
        assert_eq!(Color::parse_css("rgb(255, 255, 255)").unwrap(), Color::WHITE);
        assert_eq!(
            Color::parse_css(" rgba(10,20,30, 0.5) ").unwrap(),
            Color::rgba(10, 20, 30, 128)
        );
        assert_eq!(Color::parse_css("#ee3333").unwrap(), Color::rgb(0xee, 0x33, 0x33));
    }

    #[test]
    fn parse_css_rejects_garbage() {
        for bad in ["", "red", "rgb(1,2)", "rgb(256,0,0)", "rgba(1,2,3,2.0)", "rgb(1,2,3"] {
            assert!(
                matches!(Color::parse_css(bad), Err(InkError::InvalidColor(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn display_roundtrips_through_css() {
        let c = Color::rgb(1, 2, 3);
        assert_eq!(c.to_string(), "rgb(1, 2, 3)");
        assert_eq!(Color::parse_css(&c.to_string()).unwrap(), c);
    }

    #[test]
    fn staged_markup() {
        let s = StagedResult {
            expression: "2+2".into(),
            answer: "4".into(),
            reveal_at: Duration::ZERO,
        };
        assert_eq!(s.markup(), "2+2 = 4");
    }
}
