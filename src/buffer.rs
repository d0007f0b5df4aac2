//! Dense linear-RGB `f32` pixel buffers and the pixel-space geometry around them.

use alloc::vec::Vec;

use crate::error::DimensionError;

/// Width and height in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Number of `f32` samples per pixel.
pub const CHANNELS: usize = 3;

/// Row-major RGB `f32` pixels, three samples per pixel, no padding.
///
/// Width and height are always positive and `samples.len()` is always
/// `width * height * 3`; every constructor enforces this.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    samples: Vec<f32>,
}

impl PixelBuffer {
    /// Black buffer of the given dimensions.
    ///
    /// The allocation is fallible: if the allocator refuses it, this
    /// returns [`DimensionError::TooLarge`] instead of aborting.
    pub fn new(width: u32, height: u32) -> Result<Self, DimensionError> {
        let len = sample_count(width, height)?;
        let mut samples = Vec::new();
        samples
            .try_reserve_exact(len)
            .map_err(|_| DimensionError::TooLarge { width, height })?;
        samples.resize(len, 0.0);
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Wrap an existing sample vector.
    pub fn from_vec(width: u32, height: u32, samples: Vec<f32>) -> Result<Self, DimensionError> {
        let expected = sample_count(width, height)?;
        if samples.len() != expected {
            return Err(DimensionError::LengthMismatch {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> [f32; 3],
    ) -> Result<Self, DimensionError> {
        let mut buf = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                buf.set_pixel(x, y, f(x, y));
            }
        }
        Ok(buf)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width and height together.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// All samples, row-major, `[r, g, b, r, g, b, ...]`.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Mutable view of all samples. The length can't change, so the
    /// dimension invariant holds.
    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Give up the buffer, keeping the samples.
    pub fn into_vec(self) -> Vec<f32> {
        self.samples
    }

    /// Samples of one row.
    ///
    /// # Panics
    ///
    /// If `y >= height`.
    pub fn row(&self, y: u32) -> &[f32] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.samples[start..start + stride]
    }

    /// # Panics
    ///
    /// If `(x, y)` is out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        let i = self.index(x, y);
        [self.samples[i], self.samples[i + 1], self.samples[i + 2]]
    }

    /// # Panics
    ///
    /// If `(x, y)` is out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [f32; 3]) {
        let i = self.index(x, y);
        self.samples[i..i + CHANNELS].copy_from_slice(&rgb);
    }

    /// Copy a sub-rectangle into a new buffer.
    ///
    /// Returns `None` if the rect is empty or extends past the buffer.
    pub fn crop(&self, rect: Rect) -> Option<Self> {
        if rect.width == 0
            || rect.height == 0
            || rect.x.checked_add(rect.width)? > self.width
            || rect.y.checked_add(rect.height)? > self.height
        {
            return None;
        }
        Some(self.copy_rect(rect))
    }

    /// [`crop`](Self::crop) for a rect already known to be non-empty and
    /// in bounds.
    ///
    /// # Panics
    ///
    /// If `rect` extends past the buffer.
    pub(crate) fn copy_rect(&self, rect: Rect) -> Self {
        let start = rect.x as usize * CHANNELS;
        let span = rect.width as usize * CHANNELS;
        let mut samples = Vec::with_capacity(span * rect.height as usize);
        for y in rect.y..rect.y + rect.height {
            samples.extend_from_slice(&self.row(y)[start..start + span]);
        }
        Self {
            width: rect.width,
            height: rect.height,
            samples,
        }
    }

    /// Samples per row.
    pub(crate) fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "({x},{y}) out of bounds {}x{}",
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }
}

fn sample_count(width: u32, height: u32) -> Result<usize, DimensionError> {
    if width == 0 || height == 0 {
        return Err(DimensionError::ZeroDimension { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(DimensionError::TooLarge { width, height })
}
