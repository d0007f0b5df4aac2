//! Scanline decoding: new-style per-plane RLE and old-style flat RGBE.

use alloc::vec::Vec;

use super::cursor::ByteCursor;
use super::header::Header;
use super::rgbe::Rgbe;
use crate::buffer::PixelBuffer;
use crate::error::FormatError;

/// Scanline lengths eligible for per-plane run-length encoding.
pub(crate) const RLE_WIDTHS: core::ops::RangeInclusive<usize> = 8..=0x7fff;

/// Pixel cap applied by [`DecodeOptions::default`]: 2^28 pixels, about
/// 3 GiB of `f32` samples.
pub const DEFAULT_MAX_PIXELS: u64 = 1 << 28;

/// Limits for [`decode_with`](super::decode_with).
///
/// The resolution line alone decides how much memory the decoder asks
/// for, and old-style run markers let a few bytes cover an arbitrarily
/// long scanline, so untrusted input needs a pixel cap.
///
/// ```
/// use zencross::radiance::DecodeOptions;
///
/// let strict = DecodeOptions::new().with_max_pixels(4096 * 2048);
/// assert_eq!(strict.max_pixels, Some(4096 * 2048));
/// assert_eq!(DecodeOptions::none().max_pixels, None);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DecodeOptions {
    /// Maximum `width * height`; `None` means no cap beyond what the
    /// allocator grants.
    pub max_pixels: Option<u64>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_pixels: Some(DEFAULT_MAX_PIXELS),
        }
    }
}

impl DecodeOptions {
    /// Defaults: at most [`DEFAULT_MAX_PIXELS`].
    pub fn new() -> Self {
        Self::default()
    }

    /// No pixel cap.
    pub fn none() -> Self {
        Self { max_pixels: None }
    }

    /// Set the maximum total pixels.
    pub fn with_max_pixels(mut self, max: u64) -> Self {
        self.max_pixels = Some(max);
        self
    }

    /// Reject a header whose dimensions exceed the cap.
    pub(crate) fn check(&self, header: &Header) -> Result<(), FormatError> {
        let pixels = u64::from(header.width) * u64::from(header.height);
        match self.max_pixels {
            Some(max) if pixels > max => Err(FormatError::PixelLimit {
                width: header.width,
                height: header.height,
                max,
            }),
            _ => Ok(()),
        }
    }
}

/// How one scanline was stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ScanlineKind {
    /// Four separately run-length encoded planes (R, G, B, E).
    Rle,
    /// Four bytes per pixel with optional `(1, 1, 1, n)` run markers.
    Flat,
}

/// Decode every scanline into a display-oriented buffer.
pub(crate) fn read_pixels(
    cursor: &mut ByteCursor<'_>,
    header: &Header,
) -> Result<PixelBuffer, FormatError> {
    let too_large = FormatError::DimensionsTooLarge {
        width: header.width,
        height: header.height,
    };
    let scan_len = header.scanline_len();
    let scan_count = header.scanline_count();
    // Every scanline takes at least four bytes, so at most `remaining / 4`
    // of them can follow; the next one is the first that is missing.
    let present = cursor.remaining() / 4;
    if present < scan_count as usize {
        return Err(FormatError::TruncatedScanline {
            row: present as u32,
        });
    }
    let mut out = PixelBuffer::new(header.width, header.height).map_err(|_| too_large.clone())?;

    let mut scanline = Vec::new();
    scanline
        .try_reserve_exact(scan_len as usize)
        .map_err(|_| too_large)?;
    scanline.resize(scan_len as usize, [0u8; 4]);
    for row in 0..scan_count {
        let kind = read_scanline(cursor, row, &mut scanline)?;
        tracing::trace!(row, ?kind, "scanline");
        for (x, quad) in scanline.iter().enumerate() {
            let (dx, dy) = header
                .orientation
                .map_point(x as u32, row, scan_len, scan_count);
            let rgb = Rgbe::from_bytes(*quad).to_linear(header.exposure);
            if rgb.iter().any(|c| !c.is_finite()) {
                return Err(FormatError::Overflow { x: dx, y: dy });
            }
            out.set_pixel(dx, dy, rgb);
        }
    }
    Ok(out)
}

/// Read one scanline of `buf.len()` pixels.
pub(crate) fn read_scanline(
    cursor: &mut ByteCursor<'_>,
    row: u32,
    buf: &mut [[u8; 4]],
) -> Result<ScanlineKind, FormatError> {
    let width = buf.len();
    let first = cursor
        .read_quad()
        .ok_or(FormatError::TruncatedScanline { row })?;
    // (2, 2, hi, lo) with hi < 128 can't be a normalized pixel: it marks RLE.
    if RLE_WIDTHS.contains(&width) && first[0] == 2 && first[1] == 2 && first[2] & 0x80 == 0 {
        let declared = usize::from(first[2]) << 8 | usize::from(first[3]);
        if declared != width {
            return Err(FormatError::ScanlineLength {
                row,
                expected: width as u32,
                actual: declared as u64,
            });
        }
        for plane in 0..4 {
            read_plane(cursor, row, plane, buf)?;
        }
        Ok(ScanlineKind::Rle)
    } else {
        read_flat(cursor, row, first, buf)?;
        Ok(ScanlineKind::Flat)
    }
}

// A count byte above 128 is a run of (count - 128) copies of the next byte;
// otherwise `count` literal bytes follow.
fn read_plane(
    cursor: &mut ByteCursor<'_>,
    row: u32,
    plane: usize,
    buf: &mut [[u8; 4]],
) -> Result<(), FormatError> {
    let width = buf.len();
    let truncated = FormatError::TruncatedScanline { row };
    let mut pos = 0usize;
    while pos < width {
        let count = cursor.read_u8().ok_or(truncated.clone())?;
        let (len, run) = if count > 128 {
            (usize::from(count - 128), true)
        } else {
            (usize::from(count), false)
        };
        if pos + len > width {
            return Err(FormatError::ScanlineLength {
                row,
                expected: width as u32,
                actual: (pos + len) as u64,
            });
        }
        if run {
            let value = cursor.read_u8().ok_or(truncated.clone())?;
            for px in &mut buf[pos..pos + len] {
                px[plane] = value;
            }
        } else {
            let values = cursor.read_slice(len).ok_or(truncated.clone())?;
            for (px, &value) in buf[pos..pos + len].iter_mut().zip(values) {
                px[plane] = value;
            }
        }
        pos += len;
    }
    Ok(())
}

// Flat pixels; `(1, 1, 1, n)` repeats the previous pixel n times, and each
// further consecutive marker scales its count by another factor of 256.
fn read_flat(
    cursor: &mut ByteCursor<'_>,
    row: u32,
    first: [u8; 4],
    buf: &mut [[u8; 4]],
) -> Result<(), FormatError> {
    let width = buf.len();
    if Rgbe::from_bytes(first).run_marker().is_some() {
        return Err(FormatError::LeadingRunMarker { row });
    }
    buf[0] = first;
    let mut prev = first;
    let mut pos = 1usize;
    let mut multiplier = 1usize;
    while pos < width {
        let quad = cursor
            .read_quad()
            .ok_or(FormatError::TruncatedScanline { row })?;
        match Rgbe::from_bytes(quad).run_marker() {
            Some(count) => {
                let len = count.saturating_mul(multiplier);
                multiplier = multiplier.saturating_mul(256);
                let end = pos.saturating_add(len);
                if end > width {
                    return Err(FormatError::ScanlineLength {
                        row,
                        expected: width as u32,
                        actual: end as u64,
                    });
                }
                buf[pos..end].fill(prev);
                pos = end;
            }
            None => {
                multiplier = 1;
                prev = quad;
                buf[pos] = quad;
                pos += 1;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn scanline(bytes: &[u8], width: usize) -> Result<(ScanlineKind, Vec<[u8; 4]>), FormatError> {
        let mut buf = vec![[0u8; 4]; width];
        let kind = read_scanline(&mut ByteCursor::new(bytes), 0, &mut buf)?;
        Ok((kind, buf))
    }

    #[test]
    fn rle_planes() {
        // width 8: R run of 8, G literal 8, B run 4 + run 4, E run 8
        let mut data = vec![2, 2, 0, 8];
        data.extend([128 + 8, 200]);
        data.push(8);
        data.extend(0..8u8);
        data.extend([128 + 4, 1, 128 + 4, 2]);
        data.extend([128 + 8, 130]);
        let (kind, px) = scanline(&data, 8).unwrap();
        assert_eq!(kind, ScanlineKind::Rle);
        assert_eq!(px[0], [200, 0, 1, 130]);
        assert_eq!(px[5], [200, 5, 2, 130]);
        assert_eq!(px[7], [200, 7, 2, 130]);
    }

    #[test]
    fn rle_overrun() {
        let mut data = vec![2, 2, 0, 8];
        data.extend([128 + 9, 200]);
        assert_eq!(
            scanline(&data, 8),
            Err(FormatError::ScanlineLength {
                row: 0,
                expected: 8,
                actual: 9
            })
        );
    }

    #[test]
    fn rle_width_mismatch() {
        let data = [2, 2, 0, 9];
        assert!(matches!(
            scanline(&data, 8),
            Err(FormatError::ScanlineLength { actual: 9, .. })
        ));
    }

    #[test]
    fn rle_truncated() {
        let data = [2, 2, 0, 8, 128 + 8, 200, 8, 1, 2];
        assert_eq!(
            scanline(&data, 8),
            Err(FormatError::TruncatedScanline { row: 0 })
        );
    }

    #[test]
    fn short_scanlines_are_flat() {
        // width 4 is below the RLE range, so (2,2,0,4) is an ordinary pixel
        let data = [2, 2, 0, 4, 9, 9, 9, 9, 8, 8, 8, 8, 7, 7, 7, 7];
        let (kind, px) = scanline(&data, 4).unwrap();
        assert_eq!(kind, ScanlineKind::Flat);
        assert_eq!(px, [[2, 2, 0, 4], [9; 4], [8; 4], [7; 4]]);
    }

    #[test]
    fn old_style_runs() {
        // pixel, then "repeat 3 times", then pixel
        let data = [
            200, 100, 50, 130, //
            1, 1, 1, 3, //
            10, 20, 30, 129,
        ];
        let (_, px) = scanline(&data, 5).unwrap();
        assert_eq!(px[0], [200, 100, 50, 130]);
        assert_eq!(px[3], [200, 100, 50, 130]);
        assert_eq!(px[4], [10, 20, 30, 129]);
    }

    #[test]
    fn consecutive_markers_multiply() {
        // 1 + 2 + 1*256 = 259 pixels
        let data = [200, 0, 0, 130, 1, 1, 1, 2, 1, 1, 1, 1];
        let (_, px) = scanline(&data, 259).unwrap();
        assert!(px.iter().all(|p| *p == [200, 0, 0, 130]));
    }

    #[test]
    fn leading_marker_rejected() {
        assert_eq!(
            scanline(&[1, 1, 1, 4], 4),
            Err(FormatError::LeadingRunMarker { row: 0 })
        );
    }

    #[test]
    fn old_style_overrun() {
        let data = [200, 0, 0, 130, 1, 1, 1, 9];
        assert!(matches!(
            scanline(&data, 4),
            Err(FormatError::ScanlineLength { .. })
        ));
    }
}
