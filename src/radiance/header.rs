//! Header block and resolution line.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use super::cursor::ByteCursor;
use crate::error::FormatError;
use crate::orientation::{AxisSpec, Orientation};

/// The only pixel format this codec reads and writes.
pub const FORMAT_RGBE: &str = "32-bit_rle_rgbe";

/// Which magic line opened the file.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Signature {
    /// `#?RADIANCE`
    #[default]
    Radiance,
    /// `#?RGBE`
    Rgbe,
}

impl Signature {
    /// The magic line, without its newline.
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Radiance => b"#?RADIANCE",
            Self::Rgbe => b"#?RGBE",
        }
    }

    fn from_line(line: &[u8]) -> Option<Self> {
        [Self::Radiance, Self::Rgbe]
            .into_iter()
            .find(|s| s.as_bytes() == line)
    }
}

/// Everything a Radiance file says about its pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    /// Magic line the file opened with.
    pub signature: Signature,
    /// Product of all `EXPOSURE=` values; 1.0 when absent.
    /// Decoded samples have already been divided by it.
    pub exposure: f32,
    /// How scanlines map onto the image.
    pub orientation: Orientation,
    /// Image width after orientation is applied.
    pub width: u32,
    /// Image height after orientation is applied.
    pub height: u32,
    /// Header lines other than `FORMAT` and `EXPOSURE`, in file order.
    /// `KEY=value` lines are split at the first `=` (key trimmed);
    /// other lines have an empty key.
    pub attributes: Vec<(String, String)>,
}

impl Header {
    /// Pixels per stored scanline.
    pub(crate) fn scanline_len(&self) -> u32 {
        if self.orientation.swaps_axes() {
            self.height
        } else {
            self.width
        }
    }

    /// Number of stored scanlines.
    pub(crate) fn scanline_count(&self) -> u32 {
        if self.orientation.swaps_axes() {
            self.width
        } else {
            self.height
        }
    }
}

/// Parse the signature, header lines and resolution line, leaving the
/// cursor at the first scanline byte.
pub(crate) fn read_header(cursor: &mut ByteCursor<'_>) -> Result<Header, FormatError> {
    let signature = cursor
        .read_line()
        .and_then(Signature::from_line)
        .ok_or(FormatError::BadSignature)?;

    let mut exposure = 1.0f32;
    let mut format_seen = false;
    let mut attributes = Vec::new();
    loop {
        let line = cursor.read_line().ok_or(FormatError::TruncatedHeader)?;
        if line.is_empty() {
            break;
        }
        if line[0] == b'#' {
            continue;
        }
        let line = String::from_utf8_lossy(line);
        match split_at_first(&line, '=') {
            Some(("FORMAT", value)) => {
                let value = value.trim();
                if value != FORMAT_RGBE {
                    return Err(FormatError::UnsupportedFormat(value.to_string()));
                }
                format_seen = true;
            }
            Some(("EXPOSURE", value)) => {
                let v = value
                    .trim()
                    .parse::<f32>()
                    .ok()
                    .filter(|v| v.is_finite() && *v > 0.0)
                    .ok_or_else(|| FormatError::BadHeader {
                        key: "EXPOSURE",
                        value: value.trim().to_string(),
                    })?;
                exposure *= v;
            }
            Some((key, value)) => attributes.push((key.to_string(), value.to_string())),
            None => attributes.push((String::new(), line.into_owned())),
        }
    }
    if !format_seen {
        return Err(FormatError::MissingFormat);
    }
    if !exposure.is_finite() || exposure <= 0.0 {
        return Err(FormatError::BadHeader {
            key: "EXPOSURE",
            value: format!("{exposure}"),
        });
    }

    let line = cursor.read_line().ok_or(FormatError::TruncatedHeader)?;
    let (orientation, width, height) = parse_resolution(line)?;
    Ok(Header {
        signature,
        exposure,
        orientation,
        width,
        height,
        attributes,
    })
}

/// Parse `-Y 512 +X 1024` into an orientation and display (width, height).
pub(crate) fn parse_resolution(line: &[u8]) -> Result<(Orientation, u32, u32), FormatError> {
    let text = String::from_utf8_lossy(line);
    let bad = || FormatError::BadResolution(text.chars().take(64).collect());

    let mut parts = text.split_ascii_whitespace();
    let mut field = || -> Option<(AxisSpec, u32)> {
        let axis = AxisSpec::parse(parts.next()?)?;
        let n = parts.next()?.parse::<u32>().ok().filter(|&n| n > 0)?;
        Some((axis, n))
    };
    let (slow, scanline_count) = field().ok_or_else(bad)?;
    let (fast, scanline_len) = field().ok_or_else(bad)?;
    if parts.next().is_some() {
        return Err(bad());
    }
    let orientation = Orientation::from_axes(slow, fast).ok_or_else(bad)?;
    let size = orientation.transform_dimensions(scanline_len, scanline_count);
    Ok((orientation, size.width, size.height))
}

/// Header text for an image of the given display size.
pub(crate) fn write_header(out: &mut Vec<u8>, width: u32, height: u32, orientation: Orientation) {
    let (slow, fast) = orientation.axes();
    let count = |a: AxisSpec| if a.x { width } else { height };
    out.extend_from_slice(Signature::Radiance.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(format!("FORMAT={FORMAT_RGBE}\n\n").as_bytes());
    out.extend_from_slice(
        format!(
            "{} {} {} {}\n",
            slow.as_str(),
            count(slow),
            fast.as_str(),
            count(fast)
        )
        .as_bytes(),
    );
}

// Split at the first separator, trimming the key. `None` if there is no
// separator or the key is empty.
fn split_at_first(s: &str, sep: char) -> Option<(&str, &str)> {
    let (key, value) = s.split_once(sep)?;
    let key = key.trim();
    (!key.is_empty()).then_some((key, value))
}
