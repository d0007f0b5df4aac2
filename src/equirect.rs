//! Equirectangular (latitude/longitude) layout.
//!
//! Column `x` of a `W`-wide image sits at longitude `2πx/W − π` and row `y`
//! of an `H`-tall image at latitude `π/2 − πy/H`, so the top row is the
//! north pole and longitude wraps between the last and first columns.

use core::f64::consts::{FRAC_PI_2, PI, TAU};
use core::fmt;

use num_traits::Float;

use crate::buffer::PixelBuffer;
use crate::face::Vec3;
use crate::sample::bilinear_wrap_x;

/// A panorama whose aspect ratio isn't 2:1.
///
/// The full sphere is still mapped, but pixels are no longer square in
/// angle: the image is effectively stretched along one axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AspectWarning {
    /// Wider than 2:1.
    TooWide { width: u32, height: u32 },
    /// Narrower than 2:1.
    TooTall { width: u32, height: u32 },
}

impl AspectWarning {
    /// `None` for an exact 2:1 image.
    pub fn check(width: u32, height: u32) -> Option<Self> {
        let (w, h2) = (u64::from(width), 2 * u64::from(height));
        if w == h2 {
            None
        } else if w > h2 {
            Some(Self::TooWide { width, height })
        } else {
            Some(Self::TooTall { width, height })
        }
    }
}

impl fmt::Display for AspectWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooWide { width, height } => {
                write!(f, "{width}x{height} panorama is wider than 2:1")
            }
            Self::TooTall { width, height } => {
                write!(f, "{width}x{height} panorama is narrower than 2:1")
            }
        }
    }
}

/// Unit direction for longitude `lambda` and latitude `phi` (radians).
pub fn direction_from_lat_long(lambda: f64, phi: f64) -> Vec3 {
    let (sl, cl) = (Float::sin(lambda), Float::cos(lambda));
    let (sp, cp) = (Float::sin(phi), Float::cos(phi));
    [cp * sl, sp, -cp * cl]
}

/// `(longitude, latitude)` of a direction; longitude in `[-π, π]`.
pub fn lat_long_from_direction(d: Vec3) -> (f64, f64) {
    let [x, y, z] = d;
    (Float::atan2(x, -z), Float::atan2(y, Float::hypot(x, z)))
}

/// `(longitude, latitude)` of pixel coordinate `(x, y)` in a `width x height` panorama.
pub fn pixel_to_lat_long(x: f64, y: f64, width: u32, height: u32) -> (f64, f64) {
    (
        x / f64::from(width) * TAU - PI,
        FRAC_PI_2 - y / f64::from(height) * PI,
    )
}

/// Continuous pixel coordinate of `(lambda, phi)`. Inverse of [`pixel_to_lat_long`].
pub fn lat_long_to_pixel(lambda: f64, phi: f64, width: u32, height: u32) -> (f64, f64) {
    (
        (lambda + PI) / TAU * f64::from(width),
        (FRAC_PI_2 - phi) / PI * f64::from(height),
    )
}

/// A [`PixelBuffer`] interpreted as an equirectangular panorama.
///
/// Any dimensions are accepted; [`aspect_warning`](Self::aspect_warning)
/// reports images that aren't 2:1.
#[derive(Clone, Debug, PartialEq)]
pub struct EquirectLayout {
    buffer: PixelBuffer,
}

impl EquirectLayout {
    /// Wrap a buffer. Every size is a valid panorama.
    pub fn new(buffer: PixelBuffer) -> Self {
        Self { buffer }
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }

    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }

    /// `Some` unless the buffer is exactly twice as wide as it is tall.
    pub fn aspect_warning(&self) -> Option<AspectWarning> {
        AspectWarning::check(self.buffer.width(), self.buffer.height())
    }

    /// Bilinear sample in direction `d`, wrapping across the ±π seam and
    /// clamping at the poles.
    pub fn sample(&self, d: Vec3) -> [f32; 3] {
        let (lambda, phi) = lat_long_from_direction(d);
        let (x, y) = lat_long_to_pixel(lambda, phi, self.buffer.width(), self.buffer.height());
        bilinear_wrap_x(&self.buffer, x, y)
    }
}
