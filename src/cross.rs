//! Vertical-cross cubemap layout: six square faces in a 3x4 grid.

use crate::buffer::{PixelBuffer, Rect};
use crate::error::DimensionError;
use crate::face::{Face, Vec3};
use crate::sample::bilinear_clamped;

/// A [`PixelBuffer`] known to be a 3x4 grid of square cells.
///
/// See [`face`](crate::face) for which cell holds which face. The six
/// padding cells are ignored when sampling and are black in crosses this
/// crate produces.
#[derive(Clone, Debug, PartialEq)]
pub struct CrossLayout {
    buffer: PixelBuffer,
    face_size: u32,
}

impl CrossLayout {
    /// Validate that `buffer` is `3N x 4N` for some positive `N`.
    pub fn new(buffer: PixelBuffer) -> Result<Self, DimensionError> {
        let (w, h) = (buffer.width(), buffer.height());
        if w % 3 != 0 {
            return Err(DimensionError::CrossWidth(w));
        }
        if h % 4 != 0 {
            return Err(DimensionError::CrossHeight(h));
        }
        if w / 3 != h / 4 {
            return Err(DimensionError::CrossCells {
                cell_width: w / 3,
                cell_height: h / 4,
            });
        }
        Ok(Self {
            face_size: w / 3,
            buffer,
        })
    }

    /// All-black cross with `face_size x face_size` faces.
    pub fn blank(face_size: u32) -> Result<Self, DimensionError> {
        if face_size == 0 {
            return Err(DimensionError::ZeroFaceSize);
        }
        let too_large = DimensionError::TooLarge {
            width: face_size,
            height: face_size,
        };
        let w = face_size.checked_mul(3).ok_or(too_large)?;
        let h = face_size.checked_mul(4).ok_or(too_large)?;
        Ok(Self {
            buffer: PixelBuffer::new(w, h)?,
            face_size,
        })
    }

    /// Edge length of each face in pixels.
    pub fn face_size(&self) -> u32 {
        self.face_size
    }

    /// The whole 3x4 grid, padding cells included.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }

    /// Unwrap into the underlying buffer.
    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }

    /// Pixel rect of a face's cell.
    pub fn face_rect(&self, face: Face) -> Rect {
        let (col, row) = face.cell();
        let n = self.face_size;
        Rect::new(col * n, row * n, n, n)
    }

    /// Copy of one face, `face_size x face_size`.
    pub fn face(&self, face: Face) -> PixelBuffer {
        // every cell of a validated 3N x 4N buffer is non-empty and in bounds
        self.buffer.copy_rect(self.face_rect(face))
    }

    /// Bilinear sample of the face `d` points into. Coordinates are clamped
    /// at the face edge, never reaching into neighbouring cells.
    pub fn sample(&self, d: Vec3) -> [f32; 3] {
        let face = Face::from_direction(d);
        let (u, v) = face.project(d);
        let n = f64::from(self.face_size);
        bilinear_clamped(&self.buffer, self.face_rect(face), u * n - 0.5, v * n - 0.5)
    }
}
