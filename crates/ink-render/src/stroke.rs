//! Stroke segments → raster pixels.
//!
//! A segment covers every pixel whose center lies within half the stroke
//! width of the line, which also yields round caps at both ends. Pixels are
//! composited source-over as soon as the segment arrives.

use ink_core::{Color, Point, RasterBuffer};
use kurbo::{Line, Shape};

/// One straight piece of a pen stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub color: Color,
    pub width: f32,
}

fn to_kurbo(p: Point) -> kurbo::Point {
    kurbo::Point::new(f64::from(p.x), f64::from(p.y))
}

/// Does a round-capped segment of `width` cover the pixel at `(px, py)`?
pub fn covers(from: Point, to: Point, width: f32, px: u32, py: u32) -> bool {
    let p = kurbo::Point::new(f64::from(px) + 0.5, f64::from(py) + 0.5);
    let a = to_kurbo(from);
    let d = to_kurbo(to) - a;
    let len_sq = d.hypot2();

    let nearest = if len_sq == 0.0 {
        a
    } else {
        let t = ((p - a).dot(d) / len_sq).clamp(0.0, 1.0);
        a + d * t
    };
    let half = f64::from(width) / 2.0;
    (p - nearest).hypot2() <= half * half
}

/// Rasterize `seg` into `raster`. Returns the number of pixels touched.
pub fn rasterize_segment(raster: &mut RasterBuffer, seg: &Segment) -> usize {
    let half = f64::from(seg.width) / 2.0;
    let bbox = Line::new(to_kurbo(seg.from), to_kurbo(seg.to))
        .bounding_box()
        .inflate(half + 1.0, half + 1.0);

    let max_x = f64::from(raster.width());
    let max_y = f64::from(raster.height());
    let x0 = bbox.x0.floor().clamp(0.0, max_x) as u32;
    let x1 = bbox.x1.ceil().clamp(0.0, max_x) as u32;
    let y0 = bbox.y0.floor().clamp(0.0, max_y) as u32;
    let y1 = bbox.y1.ceil().clamp(0.0, max_y) as u32;

    let mut touched = 0;
    for y in y0..y1 {
        for x in x0..x1 {
            if covers(seg.from, seg.to, seg.width, x, y) {
                raster.blend_pixel(x, y, seg.color);
                touched += 1;
            }
        }
    }
    log::trace!(
        "segment ({}, {}) -> ({}, {}) touched {touched} px",
        seg.from.x,
        seg.from.y,
        seg.to.x,
        seg.to.y
    );
    touched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x0: f32, y0: f32, x1: f32, y1: f32, width: f32) -> Segment {
        Segment {
            from: Point::new(x0, y0),
            to: Point::new(x1, y1),
            color: Color::WHITE,
            width,
        }
    }

    #[test]
    fn horizontal_segment_fills_its_band() {
        let mut raster = RasterBuffer::new(20, 10);
        rasterize_segment(&mut raster, &seg(2.5, 4.5, 12.5, 4.5, 1.0));
        for x in 2..=12 {
            assert_eq!(raster.alpha(x, 4), 255, "gap at x={x}");
        }
        assert_eq!(raster.alpha(1, 4), 0);
        assert_eq!(raster.alpha(13, 4), 0);
        assert_eq!(raster.alpha(7, 3), 0);
        assert_eq!(raster.alpha(7, 5), 0);
    }

    #[test]
    fn zero_length_segment_paints_a_dot() {
        let mut raster = RasterBuffer::new(10, 10);
        let n = rasterize_segment(&mut raster, &seg(5.0, 5.0, 5.0, 5.0, 3.0));
        assert!(n > 0);
        assert_eq!(raster.alpha(4, 4), 255);
        assert_eq!(raster.alpha(0, 0), 0);
    }

    #[test]
    fn segment_is_clipped_to_buffer() {
        let mut raster = RasterBuffer::new(8, 8);
        rasterize_segment(&mut raster, &seg(-20.0, 4.0, 40.0, 4.0, 3.0));
        assert_eq!(raster.alpha(0, 3), 255);
        assert_eq!(raster.alpha(7, 3), 255);
    }

    #[test]
    fn touched_pixels_match_coverage_predicate() {
        let mut raster = RasterBuffer::new(32, 32);
        let s = seg(3.0, 28.0, 25.0, 6.0, 3.0);
        rasterize_segment(&mut raster, &s);
        for y in 0..32 {
            for x in 0..32 {
                assert_eq!(
                    raster.alpha(x, y) > 0,
                    covers(s.from, s.to, s.width, x, y),
                    "mismatch at ({x}, {y})"
                );
            }
        }
    }
}
