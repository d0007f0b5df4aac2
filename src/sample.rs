//! Bilinear sampling with the two edge policies the projections need.
//!
//! Coordinates are continuous pixel coordinates where integer values are
//! pixel centres.

use num_traits::Float;

use crate::buffer::{PixelBuffer, Rect};

/// Sample inside `rect`, clamping coordinates to `[0, size - 1]` so that
/// nothing outside the rect is ever read.
pub(crate) fn bilinear_clamped(buf: &PixelBuffer, rect: Rect, x: f64, y: f64) -> [f32; 3] {
    let (x0, x1, fx) = clamped_taps(x, rect.width);
    let (y0, y1, fy) = clamped_taps(y, rect.height);
    blend(
        buf,
        (rect.x + x0, rect.x + x1, fx),
        (rect.y + y0, rect.y + y1, fy),
    )
}

/// Sample the whole buffer, wrapping horizontally and clamping vertically.
pub(crate) fn bilinear_wrap_x(buf: &PixelBuffer, x: f64, y: f64) -> [f32; 3] {
    let w = buf.width();
    let wf = f64::from(w);
    let x = x - wf * Float::floor(x / wf);
    // x can round up to exactly w
    let x0 = (Float::floor(x) as u32).min(w - 1);
    let fx = Float::min(Float::max(x - f64::from(x0), 0.0), 1.0);
    let x1 = if x0 + 1 == w { 0 } else { x0 + 1 };
    blend(buf, (x0, x1, fx), clamped_taps(y, buf.height()))
}

/// Integer taps and blend weight along one axis of length `len`.
fn clamped_taps(c: f64, len: u32) -> (u32, u32, f64) {
    let max = f64::from(len - 1);
    let c = Float::min(Float::max(c, 0.0), max);
    let c0 = Float::floor(c) as u32;
    let c1 = (c0 + 1).min(len - 1);
    (c0, c1, c - f64::from(c0))
}

fn blend(buf: &PixelBuffer, (x0, x1, fx): (u32, u32, f64), (y0, y1, fy): (u32, u32, f64)) -> [f32; 3] {
    let p00 = buf.pixel(x0, y0);
    let p10 = buf.pixel(x1, y0);
    let p01 = buf.pixel(x0, y1);
    let p11 = buf.pixel(x1, y1);
    let w00 = (1.0 - fx) * (1.0 - fy);
    let w10 = fx * (1.0 - fy);
    let w01 = (1.0 - fx) * fy;
    let w11 = fx * fy;
    core::array::from_fn(|c| {
        (f64::from(p00[c]) * w00
            + f64::from(p10[c]) * w10
            + f64::from(p01[c]) * w01
            + f64::from(p11[c]) * w11) as f32
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> PixelBuffer {
        // 4x3, red = x, green = y
        PixelBuffer::from_fn(4, 3, |x, y| [x as f32, y as f32, 1.0]).unwrap()
    }

    #[test]
    fn exact_centres() {
        let b = ramp();
        let r = Rect::new(0, 0, 4, 3);
        assert_eq!(bilinear_clamped(&b, r, 2.0, 1.0), [2.0, 1.0, 1.0]);
        assert_eq!(bilinear_wrap_x(&b, 3.0, 2.0), [3.0, 2.0, 1.0]);
    }

    #[test]
    fn interpolates() {
        let b = ramp();
        let r = Rect::new(0, 0, 4, 3);
        assert_eq!(bilinear_clamped(&b, r, 1.5, 0.25), [1.5, 0.25, 1.0]);
    }

    #[test]
    fn clamps_to_rect() {
        let b = ramp();
        let r = Rect::new(1, 1, 2, 2);
        // local (-3, -3) clamps to the rect's top-left pixel (1, 1)
        assert_eq!(bilinear_clamped(&b, r, -3.0, -3.0), [1.0, 1.0, 1.0]);
        // local (5, 5) clamps to the bottom-right pixel (2, 2)
        assert_eq!(bilinear_clamped(&b, r, 5.0, 5.0), [2.0, 2.0, 1.0]);
    }

    #[test]
    fn wraps_horizontally() {
        let b = ramp();
        // halfway between the last column (3) and the first (0)
        assert_eq!(bilinear_wrap_x(&b, 3.5, 0.0)[0], 1.5);
        assert_eq!(bilinear_wrap_x(&b, -0.5, 0.0)[0], 1.5);
        assert_eq!(bilinear_wrap_x(&b, 5.0, 0.0)[0], 1.0);
        // vertical clamps
        assert_eq!(bilinear_wrap_x(&b, 0.0, 10.0)[1], 2.0);
        assert_eq!(bilinear_wrap_x(&b, 0.0, -1.0)[1], 0.0);
    }
}
