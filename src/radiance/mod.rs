//! Radiance `.hdr` (RGBE) codec.
//!
//! Decodes a complete byte stream into a linear-RGB [`PixelBuffer`] and
//! encodes one back. Both scanline flavours are read: new-style per-plane
//! run-length encoding, selected per scanline by a `(2, 2, hi, lo)` marker,
//! and old-style flat pixels with `(1, 1, 1, n)` repeat markers. All eight
//! resolution-line orientations are accepted and normalized to a top-left
//! origin.
//!
//! ```
//! use zencross::PixelBuffer;
//! use zencross::radiance;
//!
//! let img = PixelBuffer::from_fn(16, 8, |x, y| [x as f32, y as f32, 0.5]).unwrap();
//! let bytes = radiance::encode(&img).unwrap();
//! assert!(bytes.starts_with(b"#?RADIANCE\n"));
//!
//! let back = radiance::decode(&bytes).unwrap();
//! assert_eq!(back.pixel(3, 5), [3.0, 5.0, 0.5]);
//! ```
//!
//! The codec does no file-system access; see [`read_from`] and
//! [`write_to`] (with the `std` feature) for stream adapters.

mod cursor;
mod decoder;
mod encoder;
mod header;
#[cfg(feature = "std")]
mod io;
mod rgbe;

use alloc::vec::Vec;

use crate::buffer::PixelBuffer;
use crate::error::{EncodeError, FormatError};

pub use decoder::{DEFAULT_MAX_PIXELS, DecodeOptions};
pub use encoder::{Compression, EncodeOptions};
pub use header::{FORMAT_RGBE, Header, Signature};
#[cfg(feature = "std")]
pub use io::{ReadError, WriteError, read_from, write_to};
pub use rgbe::Rgbe;

/// Decode a complete Radiance byte stream with the default pixel cap.
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, FormatError> {
    decode_with_header(bytes).map(|(buf, _)| buf)
}

/// Decode a complete Radiance byte stream, also returning its header.
pub fn decode_with_header(bytes: &[u8]) -> Result<(PixelBuffer, Header), FormatError> {
    decode_with(bytes, &DecodeOptions::default())
}

/// Decode with explicit limits, returning the pixels and the header.
///
/// Dimensions are checked against `opts` as soon as the resolution line
/// is parsed, before any pixel memory is allocated.
pub fn decode_with(
    bytes: &[u8],
    opts: &DecodeOptions,
) -> Result<(PixelBuffer, Header), FormatError> {
    let mut cursor = cursor::ByteCursor::new(bytes);
    let header = header::read_header(&mut cursor)?;
    opts.check(&header)?;
    tracing::debug!(
        width = header.width,
        height = header.height,
        orientation = ?header.orientation,
        exposure = header.exposure,
        "decoding Radiance image"
    );
    let buf = decoder::read_pixels(&mut cursor, &header)?;
    Ok((buf, header))
}

/// Encode with default options: RLE, no clamping, standard orientation.
pub fn encode(buf: &PixelBuffer) -> Result<Vec<u8>, EncodeError> {
    encode_with(buf, &EncodeOptions::default())
}

/// Encode with explicit options.
pub fn encode_with(buf: &PixelBuffer, opts: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    encoder::write_image(buf, opts)
}
