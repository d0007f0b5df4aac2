//! Shared-exponent RGBE quadruplets and their linear-float conversions.

use num_traits::Float;

/// Below this, a pixel encodes as black.
const MIN_ENCODABLE: f64 = 1e-32;

/// One Radiance pixel: three mantissas and a shared exponent biased by 128.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgbe {
    /// Red mantissa.
    pub r: u8,
    /// Green mantissa.
    pub g: u8,
    /// Blue mantissa.
    pub b: u8,
    /// Shared exponent; 0 means black regardless of the mantissas.
    pub e: u8,
}

/// Why a linear sample couldn't be quantized.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Unrepresentable {
    TooBright,
    NaN,
}

impl Rgbe {
    /// All zeros, the canonical black pixel.
    pub const BLACK: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, e: u8) -> Self {
        Self { r, g, b, e }
    }

    /// From the four bytes in file order.
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self::new(b[0], b[1], b[2], b[3])
    }

    /// The four bytes in file order.
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.e]
    }

    /// Old-style run marker `(1, 1, 1, count)`.
    pub(crate) fn run_marker(self) -> Option<usize> {
        (self.r == 1 && self.g == 1 && self.b == 1).then_some(self.e as usize)
    }

    /// Linear RGB, each channel multiplied by `mantissa * 2^(E-128) / 256`
    /// and divided by `exposure`. Results may be infinite when `exposure`
    /// is tiny; callers check.
    pub fn to_linear(self, exposure: f32) -> [f32; 3] {
        if self.e == 0 {
            return [0.0; 3];
        }
        let scale = Float::powi(2.0f64, i32::from(self.e) - (128 + 8)) / f64::from(exposure);
        [
            (f64::from(self.r) * scale) as f32,
            (f64::from(self.g) * scale) as f32,
            (f64::from(self.b) * scale) as f32,
        ]
    }

    /// Quantize linear RGB.
    ///
    /// The exponent is the smallest one that keeps the brightest channel's
    /// mantissa below 256, so that mantissa always lands in `128..=255` and
    /// never looks like a run marker or an RLE scanline header.
    pub(crate) fn from_linear(rgb: [f32; 3], clamp: bool) -> Result<Self, Unrepresentable> {
        if rgb.iter().any(|c| c.is_nan()) {
            if !clamp {
                return Err(Unrepresentable::NaN);
            }
            let cleaned = rgb.map(|c| if c.is_nan() { 0.0 } else { c });
            return Self::from_linear(cleaned, true);
        }
        let [r, g, b] = rgb.map(f64::from);
        let m = Float::max(r, Float::max(g, b));
        if m <= MIN_ENCODABLE {
            return Ok(Self::BLACK);
        }
        let exp = if m.is_finite() { frexp_exponent(m) } else { i32::MAX - 128 };
        if exp > 255 - 128 {
            if !clamp {
                return Err(Unrepresentable::TooBright);
            }
            return Ok(Self::new(
                saturate(r, 255.0),
                saturate(g, 255.0),
                saturate(b, 255.0),
                255,
            ));
        }
        let scale = Float::powi(2.0f64, 8 - exp);
        Ok(Self::new(
            quantize(r * scale),
            quantize(g * scale),
            quantize(b * scale),
            (exp + 128) as u8,
        ))
    }
}

/// `e` with `2^(e-1) <= m < 2^e`, for finite positive `m`.
fn frexp_exponent(m: f64) -> i32 {
    let mut exp = Float::floor(Float::log2(m)) as i32 + 1;
    // log2 can land one off for values a hair away from a power of two.
    if Float::powi(2.0f64, exp) <= m {
        exp += 1;
    } else if Float::powi(2.0f64, exp - 1) > m {
        exp -= 1;
    }
    exp
}

fn quantize(v: f64) -> u8 {
    Float::min(Float::max(Float::round(v), 0.0), 255.0) as u8
}

/// Channel value when the pixel is pinned at the largest exponent:
/// the brightest representable channels saturate, dimmer ones keep their
/// ratio to `2^127`.
fn saturate(v: f64, max_mantissa: f64) -> u8 {
    if v.is_infinite() && v > 0.0 {
        return max_mantissa as u8;
    }
    quantize(v * Float::powi(2.0f64, 8 - 127))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_exponent_is_black() {
        assert_eq!(Rgbe::new(200, 100, 50, 0).to_linear(1.0), [0.0; 3]);
    }

    #[test]
    fn decode_scale() {
        // 128 * 2^(129-136) = 1.0
        assert_eq!(Rgbe::new(128, 64, 0, 129).to_linear(1.0), [1.0, 0.5, 0.0]);
        assert_eq!(Rgbe::new(128, 64, 0, 129).to_linear(2.0), [0.5, 0.25, 0.0]);
    }

    #[test]
    fn encode_one() {
        assert_eq!(
            Rgbe::from_linear([1.0, 0.5, 0.0], false),
            Ok(Rgbe::new(128, 64, 0, 129))
        );
    }

    #[test]
    fn encode_near_power_of_two() {
        let px = Rgbe::from_linear([0.999_999, 0.0, 0.0], false).unwrap();
        assert_eq!(px.e, 128);
        assert_eq!(px.r, 255);
    }

    #[test]
    fn brightest_mantissa_is_normalized() {
        for v in [1e-20f32, 0.001, 0.37, 1.0, 3.5, 1000.0, 65504.0, 1e30] {
            let px = Rgbe::from_linear([v, v * 0.5, v * 0.25], false).unwrap();
            assert!(px.r >= 128, "{v}: {px:?}");
            assert!(px.run_marker().is_none());
        }
    }

    #[test]
    fn tiny_is_black() {
        assert_eq!(Rgbe::from_linear([1e-33, 0.0, 0.0], false), Ok(Rgbe::BLACK));
        assert_eq!(Rgbe::from_linear([-5.0, -1.0, 0.0], false), Ok(Rgbe::BLACK));
    }

    #[test]
    fn negative_channels_quantize_to_zero() {
        let px = Rgbe::from_linear([1.0, -1.0, 0.5], false).unwrap();
        assert_eq!(px.g, 0);
    }

    #[test]
    fn out_of_range() {
        assert_eq!(
            Rgbe::from_linear([f32::MAX, 0.0, 0.0], false),
            Err(Unrepresentable::TooBright)
        );
        assert_eq!(
            Rgbe::from_linear([f32::INFINITY, 0.0, 0.0], false),
            Err(Unrepresentable::TooBright)
        );
        assert_eq!(
            Rgbe::from_linear([f32::NAN, 0.0, 0.0], false),
            Err(Unrepresentable::NaN)
        );
    }

    #[test]
    fn clamp_saturates() {
        let px = Rgbe::from_linear([f32::INFINITY, 0.0, 0.0], true).unwrap();
        assert_eq!(px, Rgbe::new(255, 0, 0, 255));
        let px = Rgbe::from_linear([f32::NAN, 1.0, 0.0], true).unwrap();
        assert_eq!(px, Rgbe::new(0, 128, 0, 129));
    }

    #[test]
    fn round_trip_error_bound() {
        for v in [1e-6f32, 0.013, 0.5, 1.0, 2.0, 17.3, 4096.5, 65504.0] {
            let back = Rgbe::from_linear([v, v, v], false).unwrap().to_linear(1.0);
            for c in back {
                assert!((c - v).abs() <= v * 0.01, "{v} -> {c}");
            }
        }
    }
}
