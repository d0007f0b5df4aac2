//! RGBE quantization and scanline encoding.

use alloc::vec;
use alloc::vec::Vec;

use super::decoder::RLE_WIDTHS;
use super::header::write_header;
use super::rgbe::{Rgbe, Unrepresentable};
use crate::buffer::PixelBuffer;
use crate::error::EncodeError;
use crate::orientation::Orientation;

/// Shortest run worth emitting as a run instead of literals.
const MIN_RUN: usize = 4;
/// Longest run a count byte can hold (`128 + 127 = 255`).
const MAX_RUN: usize = 127;
/// Longest literal a count byte can hold.
const MAX_LITERAL: usize = 128;

/// Scanline storage.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Per-plane run-length encoding when the scanline length is in
    /// `8..=0x7fff`, flat pixels otherwise.
    #[default]
    Rle,
    /// Four bytes per pixel, no compression, for every scanline.
    Flat,
}

/// Options for [`encode_with`](super::encode_with).
///
/// ```
/// use zencross::radiance::{Compression, EncodeOptions};
///
/// let opts = EncodeOptions::new().clamp(true).compression(Compression::Flat);
/// assert!(opts.clamp);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct EncodeOptions {
    /// Saturate samples beyond the RGBE range (and zero NaNs) instead of failing.
    pub clamp: bool,
    /// Scanline storage; RLE by default.
    pub compression: Compression,
    /// Scan order written to the resolution line.
    pub orientation: Orientation,
}

impl EncodeOptions {
    /// Defaults: no clamping, RLE, `-Y H +X W`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether out-of-range samples saturate instead of failing.
    pub fn clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Set scanline compression.
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set the scan orientation.
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }
}

pub(crate) fn write_image(buf: &PixelBuffer, opts: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (buf.width(), buf.height());
    if width > i32::MAX as u32 || height > i32::MAX as u32 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    let o = opts.orientation;
    let (scan_len, scan_count) = if o.swaps_axes() {
        (height, width)
    } else {
        (width, height)
    };
    let rle = opts.compression == Compression::Rle && RLE_WIDTHS.contains(&(scan_len as usize));

    let mut out = Vec::with_capacity(64 + buf.samples().len() / 3 * 4);
    write_header(&mut out, width, height, o);

    let mut scanline = vec![Rgbe::BLACK; scan_len as usize];
    let mut saturated = 0u64;
    for row in 0..scan_count {
        for (x, px) in scanline.iter_mut().enumerate() {
            let (dx, dy) = o.map_point(x as u32, row, scan_len, scan_count);
            let rgb = buf.pixel(dx, dy);
            *px = match Rgbe::from_linear(rgb, false) {
                Ok(px) => px,
                Err(_) if opts.clamp => {
                    saturated += 1;
                    Rgbe::from_linear(rgb, true)
                        .map_err(|_| EncodeError::DynamicRangeExceeded { x: dx, y: dy })?
                }
                Err(Unrepresentable::TooBright) => {
                    return Err(EncodeError::DynamicRangeExceeded { x: dx, y: dy });
                }
                Err(Unrepresentable::NaN) => return Err(EncodeError::NonFinite { x: dx, y: dy }),
            };
        }
        if rle {
            write_rle_scanline(&mut out, &scanline);
        } else {
            for px in &scanline {
                out.extend_from_slice(&px.to_bytes());
            }
        }
    }
    if saturated > 0 {
        tracing::warn!(saturated, "clamped samples outside the RGBE range");
    }
    tracing::debug!(width, height, rle, bytes = out.len(), "encoded Radiance image");
    Ok(out)
}

fn write_rle_scanline(out: &mut Vec<u8>, scanline: &[Rgbe]) {
    let len = scanline.len();
    out.extend_from_slice(&[2, 2, (len >> 8) as u8, (len & 0xff) as u8]);
    let mut plane = Vec::with_capacity(len);
    for channel in 0..4 {
        plane.clear();
        plane.extend(scanline.iter().map(|px| px.to_bytes()[channel]));
        write_rle_plane(out, &plane);
    }
}

/// Runs of `MIN_RUN..=MAX_RUN` identical bytes become `(128 + n, byte)`;
/// everything in between goes out as literals of at most `MAX_LITERAL`.
pub(crate) fn write_rle_plane(out: &mut Vec<u8>, data: &[u8]) {
    let mut literal_start = 0;
    let mut i = 0;
    while i < data.len() {
        let run = data[i..]
            .iter()
            .take(MAX_RUN)
            .take_while(|&&b| b == data[i])
            .count();
        if run >= MIN_RUN {
            write_literals(out, &data[literal_start..i]);
            out.push((128 + run) as u8);
            out.push(data[i]);
            i += run;
            literal_start = i;
        } else {
            i += 1;
        }
    }
    write_literals(out, &data[literal_start..]);
}

fn write_literals(out: &mut Vec<u8>, data: &[u8]) {
    for chunk in data.chunks(MAX_LITERAL) {
        out.push(chunk.len() as u8);
        out.extend_from_slice(chunk);
    }
}
