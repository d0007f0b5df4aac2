//! Cube faces, gnomonic projection and the vertical-cross cell assignment.
//!
//! Directions are right-handed and Y-up; `-Z` is straight ahead (the centre
//! of an equirectangular panorama). Each face has a fixed (right, up) basis
//! as seen from inside the cube, chosen so that the faces unfold into the
//! vertical cross below with every shared edge continuous:
//!
//! ```text
//!          ┌────┐
//!          │ +Y │
//!     ┌────┼────┼────┐
//!     │ -X │ -Z │ +X │
//!     └────┼────┼────┘
//!          │ -Y │
//!          ├────┤
//!          │ +Z │   (upside down: up is -Y)
//!          └────┘
//! ```

use num_traits::Float;

/// A direction in 3D. Not necessarily unit length.
pub type Vec3 = [f64; 3];

/// One of the six cube faces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    /// Right of forward.
    PositiveX,
    /// Left of forward.
    NegativeX,
    /// Up.
    PositiveY,
    /// Down.
    NegativeY,
    /// Behind.
    PositiveZ,
    /// Forward, the panorama centre.
    NegativeZ,
}

impl Face {
    /// Every face, in `+X, -X, +Y, -Y, +Z, -Z` order.
    pub const ALL: [Self; 6] = [
        Self::PositiveX,
        Self::NegativeX,
        Self::PositiveY,
        Self::NegativeY,
        Self::PositiveZ,
        Self::NegativeZ,
    ];

    /// Outward axis through the face centre.
    pub fn normal(self) -> Vec3 {
        match self {
            Self::PositiveX => [1.0, 0.0, 0.0],
            Self::NegativeX => [-1.0, 0.0, 0.0],
            Self::PositiveY => [0.0, 1.0, 0.0],
            Self::NegativeY => [0.0, -1.0, 0.0],
            Self::PositiveZ => [0.0, 0.0, 1.0],
            Self::NegativeZ => [0.0, 0.0, -1.0],
        }
    }

    /// Directions of increasing image x and decreasing image y on the face.
    fn basis(self) -> (Vec3, Vec3) {
        match self {
            Self::PositiveX => ([0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            Self::NegativeX => ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            Self::PositiveY => ([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            Self::NegativeY => ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            Self::PositiveZ => ([1.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
            Self::NegativeZ => ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        }
    }

    /// (column, row) of this face's cell in the 3x4 vertical cross.
    pub fn cell(self) -> (u32, u32) {
        match self {
            Self::PositiveY => (1, 0),
            Self::NegativeX => (0, 1),
            Self::NegativeZ => (1, 1),
            Self::PositiveX => (2, 1),
            Self::NegativeY => (1, 2),
            Self::PositiveZ => (1, 3),
        }
    }

    /// The face occupying a cross cell, `None` for padding cells.
    pub fn at_cell(col: u32, row: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.cell() == (col, row))
    }

    /// The face a direction exits through: the axis with the largest
    /// magnitude wins, ties going to X, then Y, then Z.
    pub fn from_direction(d: Vec3) -> Self {
        let [x, y, z] = d;
        let (ax, ay, az) = (Float::abs(x), Float::abs(y), Float::abs(z));
        if ax >= ay && ax >= az {
            if x >= 0.0 {
                Self::PositiveX
            } else {
                Self::NegativeX
            }
        } else if ay >= az {
            if y >= 0.0 {
                Self::PositiveY
            } else {
                Self::NegativeY
            }
        } else if z >= 0.0 {
            Self::PositiveZ
        } else {
            Self::NegativeZ
        }
    }

    /// Gnomonic projection of `d` onto this face, as UV in `[0, 1]`
    /// with (0, 0) at the cell's top-left corner.
    ///
    /// Only meaningful when `d` points into this face, i.e.
    /// `Face::from_direction(d) == self`.
    pub fn project(self, d: Vec3) -> (f64, f64) {
        let (right, up) = self.basis();
        let ma = dot(d, self.normal());
        let sc = dot(d, right) / ma;
        let tc = dot(d, up) / ma;
        ((sc + 1.0) * 0.5, (1.0 - tc) * 0.5)
    }

    /// Unit direction through face UV `(u, v)`. Inverse of [`project`](Self::project).
    pub fn direction(self, u: f64, v: f64) -> Vec3 {
        let (right, up) = self.basis();
        let n = self.normal();
        let sc = 2.0 * u - 1.0;
        let tc = 1.0 - 2.0 * v;
        normalize([
            n[0] + sc * right[0] + tc * up[0],
            n[1] + sc * right[1] + tc * up[1],
            n[2] + sc * right[2] + tc * up[2],
        ])
    }
}

pub(crate) fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub(crate) fn normalize(d: Vec3) -> Vec3 {
    let len = Float::sqrt(dot(d, d));
    [d[0] / len, d[1] / len, d[2] / len]
}
