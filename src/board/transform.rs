//! Orientation model and the rotations it induces on grid offsets.
//!
//! Parts are described in their own local frame, which faces **east**.
//! Placing a part on the board with another orientation rotates every local
//! offset by that orientation's matrix before adding it to the part's
//! reference cell.
//!
//! ## Rotation Convention
//!
//! Vectors are `(row, col)` with rows growing downwards, as in image space.
//! The four matrices are exact integers:
//!
//! ```text
//! East  = [ 1  0]   North = [ 0 -1]   West = [-1  0]   South = [ 0  1]
//!         [ 0  1]           [ 1  0]          [ 0 -1]           [-1  0]
//! ```
//!
//! so `(2, 3)` rotates to `(-3, 2)` for north and `(3, -2)` for south.
//! Composing north with itself gives west, and the four orientations form
//! the cycle east → north → west → south → east under
//! [`Orientation::quarter_turn`].

use std::fmt;
use std::str::FromStr;

use super::error::TagError;
use super::types::GridVector;

/// One of the four cardinal orientations a part can face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    North,
    South,
    East,
    West,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::North,
        Orientation::South,
        Orientation::East,
        Orientation::West,
    ];

    /// The rotation this orientation applies to east-frame offsets
    pub const fn matrix(self) -> RotationMatrix {
        match self {
            Orientation::East => RotationMatrix::IDENTITY,
            Orientation::North => RotationMatrix([[0, -1], [1, 0]]),
            Orientation::West => RotationMatrix([[-1, 0], [0, -1]]),
            Orientation::South => RotationMatrix([[0, 1], [-1, 0]]),
        }
    }

    /// The orientation rotated by 180°
    pub const fn opposite(self) -> Orientation {
        match self {
            Orientation::North => Orientation::South,
            Orientation::South => Orientation::North,
            Orientation::East => Orientation::West,
            Orientation::West => Orientation::East,
        }
    }

    /// The next orientation in the cycle east → north → west → south
    ///
    /// Its matrix equals `North.matrix().compose(self.matrix())`.
    pub const fn quarter_turn(self) -> Orientation {
        match self {
            Orientation::East => Orientation::North,
            Orientation::North => Orientation::West,
            Orientation::West => Orientation::South,
            Orientation::South => Orientation::East,
        }
    }

    /// Lowercase name as used in board descriptions
    pub const fn name(self) -> &'static str {
        match self {
            Orientation::North => "north",
            Orientation::South => "south",
            Orientation::East => "east",
            Orientation::West => "west",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Orientation {
    type Err = TagError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Orientation::ALL
            .into_iter()
            .find(|o| o.name().eq_ignore_ascii_case(token))
            .ok_or_else(|| TagError::invalid_orientation(token))
    }
}

/// A 2×2 integer rotation matrix acting on `(row, col)` vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationMatrix(pub [[i32; 2]; 2]);

impl RotationMatrix {
    pub const IDENTITY: RotationMatrix = RotationMatrix([[1, 0], [0, 1]]);

    pub fn determinant(&self) -> i32 {
        let [[a, b], [c, d]] = self.0;
        a * d - b * c
    }

    pub fn transpose(&self) -> RotationMatrix {
        let [[a, b], [c, d]] = self.0;
        RotationMatrix([[a, c], [b, d]])
    }

    /// Matrix product `self · other` (apply `other` first)
    pub fn compose(&self, other: &RotationMatrix) -> RotationMatrix {
        let [[a, b], [c, d]] = self.0;
        let [[e, f], [g, h]] = other.0;
        RotationMatrix([[a * e + b * g, a * f + b * h], [c * e + d * g, c * f + d * h]])
    }

    pub fn apply(&self, v: GridVector) -> GridVector {
        let [[a, b], [c, d]] = self.0;
        GridVector::new(
            a as f64 * v.row + b as f64 * v.col,
            c as f64 * v.row + d as f64 * v.col,
        )
    }

    /// The orientation whose matrix this is, if any
    pub fn orientation(&self) -> Option<Orientation> {
        Orientation::ALL.into_iter().find(|o| o.matrix() == *self)
    }
}

/// Rotate an east-frame vector into the board frame of `orientation`
pub fn rotate(v: GridVector, orientation: Orientation) -> GridVector {
    orientation.matrix().apply(v)
}

/// The orientation rotated by 180°
pub fn opposite(orientation: Orientation) -> Orientation {
    orientation.opposite()
}
