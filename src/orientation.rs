//! Radiance scan orientation as an element of the D4 dihedral group.

use crate::buffer::Size;

/// Sign and axis of one resolution-line field, e.g. `-Y`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AxisSpec {
    /// `true` for `+`.
    pub positive: bool,
    /// `true` for `X`, `false` for `Y`.
    pub x: bool,
}

impl AxisSpec {
    const fn new(positive: bool, x: bool) -> Self {
        Self { positive, x }
    }

    /// Parse a two-byte token such as `-Y` or `+X`.
    pub fn parse(token: &str) -> Option<Self> {
        match token.as_bytes() {
            [sign @ (b'+' | b'-'), axis @ (b'X' | b'Y')] => {
                Some(Self::new(*sign == b'+', *axis == b'X'))
            }
            _ => None,
        }
    }

    /// Token text, e.g. `"-Y"`.
    pub fn as_str(self) -> &'static str {
        match (self.positive, self.x) {
            (true, true) => "+X",
            (false, true) => "-X",
            (true, false) => "+Y",
            (false, false) => "-Y",
        }
    }
}

/// How the scanlines of a Radiance file are laid out relative to the image.
///
/// A rotation (0, 90, 180, 270 degrees clockwise) optionally followed by a
/// horizontal flip. It maps the *stored* raster (scanline = row, in file
/// order) onto the *display* raster (top-left origin, row-major). Each of
/// the eight resolution-line forms is exactly one element:
///
/// ```text
///     -Y H +X W  identity      -Y H -X W  flip-h
///     +Y H +X W  flip-v        +Y H -X W  rotate-180
///     +X W -Y H  transpose     -X W -Y H  rotate-90
///     -X W +Y H  transverse    +X W +Y H  rotate-270
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Orientation {
    /// Rotation in 90-degree increments (0-3).
    pub rotation: u8,
    /// Horizontal flip applied after rotation.
    pub flip: bool,
}

impl Orientation {
    /// `-Y H +X W`: top-to-bottom scanlines, left-to-right pixels.
    pub const STANDARD: Self = Self {
        rotation: 0,
        flip: false,
    };
    /// `-Y H -X W`.
    pub const FLIP_H: Self = Self {
        rotation: 0,
        flip: true,
    };
    /// `+Y H -X W`.
    pub const ROTATE_180: Self = Self {
        rotation: 2,
        flip: false,
    };
    /// `+Y H +X W`.
    pub const FLIP_V: Self = Self {
        rotation: 2,
        flip: true,
    };
    /// `+X W -Y H`.
    pub const TRANSPOSE: Self = Self {
        rotation: 1,
        flip: true,
    };
    /// `-X W -Y H`.
    pub const ROTATE_90: Self = Self {
        rotation: 1,
        flip: false,
    };
    /// `-X W +Y H`.
    pub const TRANSVERSE: Self = Self {
        rotation: 3,
        flip: true,
    };
    /// `+X W +Y H`.
    pub const ROTATE_270: Self = Self {
        rotation: 3,
        flip: false,
    };

    /// All eight orientations.
    pub const ALL: [Self; 8] = [
        Self::STANDARD,
        Self::FLIP_H,
        Self::ROTATE_180,
        Self::FLIP_V,
        Self::TRANSPOSE,
        Self::ROTATE_90,
        Self::TRANSVERSE,
        Self::ROTATE_270,
    ];

    /// Orientation for a resolution line's (slow, fast) axis pair.
    /// Returns `None` when both fields name the same axis.
    pub fn from_axes(slow: AxisSpec, fast: AxisSpec) -> Option<Self> {
        if slow.x == fast.x {
            return None;
        }
        Some(match (slow.x, slow.positive, fast.positive) {
            (false, false, true) => Self::STANDARD,
            (false, false, false) => Self::FLIP_H,
            (false, true, true) => Self::FLIP_V,
            (false, true, false) => Self::ROTATE_180,
            (true, true, false) => Self::TRANSPOSE,
            (true, false, false) => Self::ROTATE_90,
            (true, false, true) => Self::TRANSVERSE,
            (true, true, true) => Self::ROTATE_270,
        })
    }

    /// The (slow, fast) axis pair written on the resolution line.
    pub fn axes(self) -> (AxisSpec, AxisSpec) {
        let (slow_x, slow_pos, fast_pos) = match (self.rotation & 3, self.flip) {
            (0, false) => (false, false, true),
            (0, true) => (false, false, false),
            (2, true) => (false, true, true),
            (2, false) => (false, true, false),
            (1, true) => (true, true, false),
            (1, false) => (true, false, false),
            (3, true) => (true, false, true),
            _ => (true, true, true),
        };
        (
            AxisSpec::new(slow_pos, slow_x),
            AxisSpec::new(fast_pos, !slow_x),
        )
    }

    /// Whether stored scanlines run along display columns.
    pub fn swaps_axes(self) -> bool {
        self.rotation % 2 == 1
    }

    /// Transform stored-raster dimensions (scanline length, scanline count)
    /// to display dimensions.
    pub fn transform_dimensions(self, w: u32, h: u32) -> Size {
        if self.swaps_axes() {
            Size::new(h, w)
        } else {
            Size::new(w, h)
        }
    }

    /// Map a stored-raster pixel to display coordinates.
    ///
    /// `(x, y)` is (offset within scanline, scanline index) and `(w, h)` the
    /// stored raster's (scanline length, scanline count).
    pub fn map_point(self, x: u32, y: u32, w: u32, h: u32) -> (u32, u32) {
        match (self.rotation & 3, self.flip) {
            (0, false) => (x, y),
            (0, true) => (w - 1 - x, y),
            (1, false) => (h - 1 - y, x),
            (1, true) => (y, x),
            (2, false) => (w - 1 - x, h - 1 - y),
            (2, true) => (x, h - 1 - y),
            (3, false) => (y, w - 1 - x),
            _ => (h - 1 - y, w - 1 - x),
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::STANDARD
    }
}
