//! Error types for the Radiance codec and the projection engine.

use alloc::string::String;

/// Malformed or unsupported Radiance input.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// First line is not `#?RADIANCE` or `#?RGBE`.
    #[error("missing Radiance signature (expected `#?RADIANCE` or `#?RGBE`)")]
    BadSignature,
    /// `FORMAT=` names something other than `32-bit_rle_rgbe`.
    #[error("unsupported pixel format `{0}`")]
    UnsupportedFormat(String),
    /// Header ended without a `FORMAT=` line.
    #[error("header has no FORMAT line")]
    MissingFormat,
    /// A known header key carries a value that can't be used.
    #[error("invalid {key} value `{value}`")]
    BadHeader {
        /// Header key, e.g. `EXPOSURE`.
        key: &'static str,
        /// Offending value text.
        value: String,
    },
    /// Resolution line doesn't match `[+-][XY] <n> [+-][XY] <n>`.
    #[error("invalid resolution line `{0}`")]
    BadResolution(String),
    /// Input ended inside the header.
    #[error("input ends inside the header")]
    TruncatedHeader,
    /// Input ended inside the pixel data.
    #[error("input ends inside scanline {row}")]
    TruncatedScanline {
        /// Zero-based scanline index in file order.
        row: u32,
    },
    /// A scanline decoded to a different number of pixels than declared.
    #[error("scanline {row} holds {actual} pixels, expected {expected}")]
    ScanlineLength {
        /// Zero-based scanline index in file order.
        row: u32,
        /// Pixels declared by the resolution line.
        expected: u32,
        /// Pixels the scanline data covers.
        actual: u64,
    },
    /// Old-style run marker with no preceding pixel to repeat.
    #[error("scanline {row} starts with a run marker")]
    LeadingRunMarker {
        /// Zero-based scanline index in file order.
        row: u32,
    },
    /// A decoded sample is not representable as a finite `f32`.
    #[error("sample at ({x}, {y}) overflows f32")]
    Overflow {
        /// Column in the decoded buffer.
        x: u32,
        /// Row in the decoded buffer.
        y: u32,
    },
    /// Declared dimensions exceed the caller's pixel cap.
    #[error("image dimensions {width}x{height} exceed the limit of {max} pixels")]
    PixelLimit {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// The cap in effect.
        max: u64,
    },
    /// Declared dimensions can't be allocated.
    #[error("image dimensions {width}x{height} are too large")]
    DimensionsTooLarge {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },
}

/// Coarse classification of a [`FormatError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FormatErrorKind {
    /// Signature line missing or wrong.
    BadSignature,
    /// Pixel format missing or not RGBE.
    UnsupportedFormat,
    /// Known header value unusable.
    BadHeader,
    /// Resolution line malformed.
    BadResolution,
    /// Data ended early, or a scanline's pixel count doesn't match.
    Truncated,
    /// A value exceeds what can be represented.
    Overflow,
}

impl FormatError {
    /// The taxonomy kind of this error.
    pub fn kind(&self) -> FormatErrorKind {
        match self {
            Self::BadSignature => FormatErrorKind::BadSignature,
            Self::UnsupportedFormat(_) | Self::MissingFormat => FormatErrorKind::UnsupportedFormat,
            Self::BadHeader { .. } => FormatErrorKind::BadHeader,
            Self::BadResolution(_) => FormatErrorKind::BadResolution,
            Self::TruncatedHeader
            | Self::TruncatedScanline { .. }
            | Self::ScanlineLength { .. }
            | Self::LeadingRunMarker { .. } => FormatErrorKind::Truncated,
            Self::Overflow { .. } | Self::PixelLimit { .. } | Self::DimensionsTooLarge { .. } => {
                FormatErrorKind::Overflow
            }
        }
    }
}

/// Failure to encode a pixel buffer as Radiance RGBE.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// A sample needs an exponent above 255 and clamping is off.
    #[error("sample at ({x}, {y}) exceeds the RGBE dynamic range")]
    DynamicRangeExceeded {
        /// Column in the source buffer.
        x: u32,
        /// Row in the source buffer.
        y: u32,
    },
    /// A sample is NaN and clamping is off.
    #[error("sample at ({x}, {y}) is NaN")]
    NonFinite {
        /// Column in the source buffer.
        x: u32,
        /// Row in the source buffer.
        y: u32,
    },
    /// Dimensions can't be written to a resolution line.
    #[error("dimensions {width}x{height} can't be encoded")]
    InvalidDimensions {
        /// Buffer width.
        width: u32,
        /// Buffer height.
        height: u32,
    },
}

/// Pixel buffer or layout dimensions violate an invariant.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DimensionError {
    /// Width or height is zero.
    #[error("width and height must be positive (got {width}x{height})")]
    ZeroDimension {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// Sample vector length doesn't equal `width * height * 3`.
    #[error("buffer holds {actual} samples, expected {expected}")]
    LengthMismatch {
        /// `width * height * 3`.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },
    /// `width * height * 3` overflows `usize`.
    #[error("dimensions {width}x{height} are too large")]
    TooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// Cross width is not a multiple of 3.
    #[error("cross width {0} is not divisible by 3")]
    CrossWidth(u32),
    /// Cross height is not a multiple of 4.
    #[error("cross height {0} is not divisible by 4")]
    CrossHeight(u32),
    /// `width / 3 != height / 4`, so cells aren't square.
    #[error("cross cells are not square ({cell_width}x{cell_height})")]
    CrossCells {
        /// `width / 3`.
        cell_width: u32,
        /// `height / 4`.
        cell_height: u32,
    },
    /// Requested face size is zero.
    #[error("face size must be positive")]
    ZeroFaceSize,
}
