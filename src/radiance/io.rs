//! `std::io` adapters for callers that hold files or sockets.

use std::io::{Read, Write};

use super::EncodeOptions;
use crate::buffer::PixelBuffer;
use crate::error::{EncodeError, FormatError};

/// Failure reading a Radiance stream.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The reader failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The bytes are not a valid Radiance file.
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Failure writing a Radiance stream.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// The writer failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The pixels can't be expressed as RGBE.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Read the whole stream and decode it.
pub fn read_from(mut reader: impl Read) -> Result<PixelBuffer, ReadError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(super::decode(&bytes)?)
}

/// Encode `buf` and write all bytes to `writer`.
pub fn write_to(
    mut writer: impl Write,
    buf: &PixelBuffer,
    opts: &EncodeOptions,
) -> Result<(), WriteError> {
    let bytes = super::encode_with(buf, opts)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
