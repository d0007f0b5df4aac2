//! Resampling between vertical-cross cubemaps and equirectangular panoramas.
//!
//! Every output pixel is computed independently from the immutable source,
//! so the work is split by rows. With the `rayon` feature rows are filled in
//! parallel; the result is identical either way.

use crate::buffer::{CHANNELS, PixelBuffer};
use crate::cross::CrossLayout;
use crate::equirect::{AspectWarning, EquirectLayout, direction_from_lat_long, pixel_to_lat_long};
use crate::error::DimensionError;
use crate::face::Face;

/// A projection result plus any non-fatal finding about its equirectangular side.
#[derive(Clone, Debug, PartialEq)]
pub struct Converted<T> {
    /// The resampled layout.
    pub image: T,
    /// Set when the panorama read or written is not 2:1.
    pub warning: Option<AspectWarning>,
}

/// Resample a vertical cross into an `out_width x out_height` panorama.
///
/// Output pixel `(u, v)` takes the direction at longitude `2πu/W − π`,
/// latitude `π/2 − πv/H`, and bilinearly samples the face that direction
/// exits through.
///
/// ```
/// use zencross::{CrossLayout, PixelBuffer, cross_to_equirect};
///
/// let cross = CrossLayout::new(PixelBuffer::new(48, 64).unwrap()).unwrap();
/// let pano = cross_to_equirect(&cross, 128, 64).unwrap();
/// assert!(pano.warning.is_none());
/// assert_eq!(pano.image.buffer().width(), 128);
/// ```
pub fn cross_to_equirect(
    cross: &CrossLayout,
    out_width: u32,
    out_height: u32,
) -> Result<Converted<EquirectLayout>, DimensionError> {
    let mut out = EquirectLayout::new(PixelBuffer::new(out_width, out_height)?);
    let warning = out.aspect_warning();
    if let Some(w) = warning {
        tracing::warn!(%w, "equirectangular output is not 2:1");
    }
    tracing::debug!(
        face_size = cross.face_size(),
        out_width,
        out_height,
        "cross to equirect"
    );

    for_each_row(out.buffer_mut(), |v, row| {
        for (u, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let (lambda, phi) = pixel_to_lat_long(u as f64, f64::from(v), out_width, out_height);
            px.copy_from_slice(&cross.sample(direction_from_lat_long(lambda, phi)));
        }
    });
    Ok(Converted {
        image: out,
        warning,
    })
}

/// Resample a panorama into a vertical cross with `face_size` pixel faces.
///
/// Face texel `(i, j)` takes the direction through its centre,
/// `((i + ½)/N, (j + ½)/N)` in face UV. Padding cells stay black.
pub fn equirect_to_cross(
    equirect: &EquirectLayout,
    face_size: u32,
) -> Result<Converted<CrossLayout>, DimensionError> {
    let mut out = CrossLayout::blank(face_size)?;
    let warning = equirect.aspect_warning();
    if let Some(w) = warning {
        tracing::warn!(%w, "equirectangular input is not 2:1");
    }
    tracing::debug!(
        width = equirect.buffer().width(),
        height = equirect.buffer().height(),
        face_size,
        "equirect to cross"
    );

    let n = f64::from(face_size);
    for_each_row(out.buffer_mut(), |y, row| {
        let cell_row = y / face_size;
        let v = (f64::from(y % face_size) + 0.5) / n;
        for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let x = x as u32;
            let Some(face) = Face::at_cell(x / face_size, cell_row) else {
                continue;
            };
            let u = (f64::from(x % face_size) + 0.5) / n;
            px.copy_from_slice(&equirect.sample(face.direction(u, v)));
        }
    });
    Ok(Converted {
        image: out,
        warning,
    })
}

/// Call `f(row_index, row_samples)` for every row.
fn for_each_row<F>(buf: &mut PixelBuffer, f: F)
where
    F: Fn(u32, &mut [f32]) + Sync + Send,
{
    let stride = buf.stride();
    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        buf.samples_mut()
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| f(y as u32, row));
    }
    #[cfg(not(feature = "rayon"))]
    {
        buf.samples_mut()
            .chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| f(y as u32, row));
    }
}
