//! Core types for board geometry

use std::fmt;
use std::ops::{Add, Range, Sub};

use super::transform::Orientation;

/// Tolerance used when snapping projected coordinates onto the half-grid
const HALF_GRID_TOLERANCE: f64 = 1e-9;

/// A position in board-grid units, `(row, col)`
///
/// Integer positions name cells; half-integer positions name the slots
/// between cells where tags are printed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPosition {
    pub row: f64,
    pub col: f64,
}

impl GridPosition {
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }

    /// True when both coordinates are whole numbers
    pub fn is_cell(&self) -> bool {
        self.row.fract() == 0.0 && self.col.fract() == 0.0
    }
}

impl From<(f64, f64)> for GridPosition {
    fn from((row, col): (f64, f64)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A displacement in board-grid units, `(row, col)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridVector {
    pub row: f64,
    pub col: f64,
}

impl GridVector {
    pub const fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }
}

impl Add<GridVector> for GridPosition {
    type Output = GridPosition;

    fn add(self, v: GridVector) -> GridPosition {
        GridPosition::new(self.row + v.row, self.col + v.col)
    }
}

impl Sub<GridVector> for GridPosition {
    type Output = GridPosition;

    fn sub(self, v: GridVector) -> GridPosition {
        GridPosition::new(self.row - v.row, self.col - v.col)
    }
}

/// A point in image pixel space, `(row, col)`, before rounding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub row: f64,
    pub col: f64,
}

impl PixelPoint {
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }
}

/// A rectangular pixel region, half-open on both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

impl BoundingBox {
    pub fn new(row_start: usize, row_end: usize, col_start: usize, col_end: usize) -> Self {
        Self {
            row_start,
            row_end,
            col_start,
            col_end,
        }
    }

    pub fn height(&self) -> usize {
        self.row_end - self.row_start
    }

    pub fn width(&self) -> usize {
        self.col_end - self.col_start
    }

    pub fn rows(&self) -> Range<usize> {
        self.row_start..self.row_end
    }

    pub fn cols(&self) -> Range<usize> {
        self.col_start..self.col_end
    }

    /// Intersect with an image of the given size
    ///
    /// The result may be empty when the box lies entirely outside the image.
    pub fn clamp_to(&self, height: usize, width: usize) -> BoundingBox {
        let row_end = self.row_end.min(height);
        let col_end = self.col_end.min(width);
        BoundingBox {
            row_start: self.row_start.min(row_end),
            row_end,
            col_start: self.col_start.min(col_end),
            col_end,
        }
    }

    /// Tuple form `(row_start, row_end, col_start, col_end)`
    pub fn as_tuple(&self) -> (usize, usize, usize, usize) {
        (self.row_start, self.row_end, self.col_start, self.col_end)
    }
}

/// Which family of grid lines a tag slot lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotGroup {
    /// Integer row, half-integer column: the tag sits on a vertical grid
    /// line, beside an east/west-facing edge
    Horizontal,
    /// Half-integer row, integer column: the tag sits on a horizontal grid
    /// line, beside a north/south-facing edge
    Vertical,
}

impl fmt::Display for SlotGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotGroup::Horizontal => write!(f, "horizontal"),
            SlotGroup::Vertical => write!(f, "vertical"),
        }
    }
}

/// Exact key for a tag slot, stored in half-grid units
///
/// Projected positions are floating point; snapping them onto the half-grid
/// gives a key that hashes and orders exactly. Ordering is row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagLocation {
    row_halves: i64,
    col_halves: i64,
}

impl TagLocation {
    /// Snap a grid position onto the half-grid
    ///
    /// Returns `None` if either coordinate is not a multiple of one half.
    pub fn from_position(position: GridPosition) -> Option<Self> {
        Some(Self {
            row_halves: to_halves(position.row)?,
            col_halves: to_halves(position.col)?,
        })
    }

    /// The slot at integer row `row`, between columns `col` and `col + 1`
    pub fn horizontal_slot(row: usize, col: usize) -> Self {
        Self {
            row_halves: 2 * row as i64,
            col_halves: 2 * col as i64 + 1,
        }
    }

    /// The slot at integer column `col`, between rows `row` and `row + 1`
    pub fn vertical_slot(row: usize, col: usize) -> Self {
        Self {
            row_halves: 2 * row as i64 + 1,
            col_halves: 2 * col as i64,
        }
    }

    pub fn position(&self) -> GridPosition {
        GridPosition::new(self.row_halves as f64 / 2.0, self.col_halves as f64 / 2.0)
    }

    /// Classify the slot by which coordinate is fractional
    ///
    /// Returns `None` when both or neither coordinate is fractional.
    pub fn group(&self) -> Option<SlotGroup> {
        match (self.row_halves % 2 != 0, self.col_halves % 2 != 0) {
            (false, true) => Some(SlotGroup::Horizontal),
            (true, false) => Some(SlotGroup::Vertical),
            _ => None,
        }
    }
}

impl fmt::Display for TagLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.position().fmt(f)
    }
}

fn to_halves(value: f64) -> Option<i64> {
    let doubled = value * 2.0;
    let rounded = doubled.round();
    if !rounded.is_finite() || (doubled - rounded).abs() > HALF_GRID_TOLERANCE {
        return None;
    }
    Some(rounded as i64)
}

/// A placed component, as read from the board description
#[derive(Debug, Clone, PartialEq)]
pub struct PartDescriptor {
    pub id: u64,
    pub label: String,
    pub position: GridPosition,
    pub orientation: Orientation,
}

impl PartDescriptor {
    pub fn new(
        id: u64,
        label: impl Into<String>,
        position: GridPosition,
        orientation: Orientation,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            position,
            orientation,
        }
    }
}

/// What a tag slot is expected to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedTag {
    /// Part the tag belongs to
    pub part_id: u64,
    pub label: String,
    pub orientation: Orientation,
}
