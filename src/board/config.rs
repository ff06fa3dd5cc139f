//! Configuration for tag extraction
//!
//! None of these values have built-in defaults: margins, cell sizes and tag
//! box sizes come from calibrating a specific board and camera, and must be
//! supplied by the caller, usually as a TOML file.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use super::projector::{LabelFamily, TagOffsetTable};
use super::types::{BoundingBox, GridPosition, GridVector, PixelPoint, SlotGroup};

/// Largest pixel coordinate a valid geometry may map a slot to
const MAX_PIXEL: f64 = u32::MAX as f64;

/// Errors that can occur when loading or validating a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {reason}")]
    Invalid { reason: String },
}

impl ConfigError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

/// Affine map from board-grid units to image pixels
///
/// `pixel = margin + position × cell`, independently per axis.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GridGeometry {
    /// Pixel row of grid row 0
    pub row_margin: f64,
    /// Pixel column of grid column 0
    pub col_margin: f64,
    /// Height of one grid cell in pixels
    pub row_cell: f64,
    /// Width of one grid cell in pixels
    pub col_cell: f64,
}

impl GridGeometry {
    pub fn new(row_margin: f64, col_margin: f64, row_cell: f64, col_cell: f64) -> Self {
        Self {
            row_margin,
            col_margin,
            row_cell,
            col_cell,
        }
    }

    /// Derive cell sizes from a frame whose grid spans the whole image
    /// between symmetric margins
    pub fn fit(
        image_height: usize,
        image_width: usize,
        row_margin: f64,
        col_margin: f64,
        extent: GridExtent,
    ) -> Self {
        Self {
            row_margin,
            col_margin,
            row_cell: (image_height as f64 - 2.0 * row_margin) / extent.rows as f64,
            col_cell: (image_width as f64 - 2.0 * col_margin) / extent.cols as f64,
        }
    }

    /// `(height, width)` of the frame `fit` would have derived this geometry
    /// from, rounded to whole pixels
    pub fn frame_size(&self, extent: GridExtent) -> (usize, usize) {
        let height = 2.0 * self.row_margin + extent.rows as f64 * self.row_cell;
        let width = 2.0 * self.col_margin + extent.cols as f64 * self.col_cell;
        (height.round().max(0.0) as usize, width.round().max(0.0) as usize)
    }

    /// Map a grid position (cell or slot) to its pixel point
    pub fn to_pixel(&self, position: GridPosition) -> PixelPoint {
        PixelPoint::new(
            self.row_margin + position.row * self.row_cell,
            self.col_margin + position.col * self.col_cell,
        )
    }

    /// Map a pixel point back into grid units
    pub fn from_pixel(&self, point: PixelPoint) -> GridPosition {
        GridPosition::new(
            (point.row - self.row_margin) / self.row_cell,
            (point.col - self.col_margin) / self.col_cell,
        )
    }

    fn validate(&self, extent: GridExtent) -> Result<(), ConfigError> {
        for (name, value) in [("row_cell", self.row_cell), ("col_cell", self.col_cell)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(format!(
                    "geometry.{name} must be positive, got {value}"
                )));
            }
        }
        for (name, value) in [("row_margin", self.row_margin), ("col_margin", self.col_margin)] {
            if !value.is_finite() {
                return Err(ConfigError::invalid(format!(
                    "geometry.{name} must be finite, got {value}"
                )));
            }
        }
        // Slots reach half a cell past the last row and column
        for (axis, margin, cell, count) in [
            ("row", self.row_margin, self.row_cell, extent.rows),
            ("col", self.col_margin, self.col_cell, extent.cols),
        ] {
            let reach = margin.abs() + (count as f64 + 1.0) * cell;
            if reach > MAX_PIXEL {
                return Err(ConfigError::invalid(format!(
                    "geometry maps {axis} {count} to pixel {reach}, beyond {MAX_PIXEL}"
                )));
            }
        }
        Ok(())
    }
}

/// Number of grid rows and columns enumerated for tag slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GridExtent {
    pub rows: usize,
    pub cols: usize,
}

impl GridExtent {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Number of slots enumerated per group
    pub fn slot_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Whether a position falls inside the enumerated rows and columns
    pub fn contains(&self, position: GridPosition) -> bool {
        position.row >= 0.0
            && position.col >= 0.0
            && (position.row.floor() as usize) < self.rows
            && (position.col.floor() as usize) < self.cols
    }
}

/// How a tag box is placed relative to its mapped pixel point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxAnchor {
    /// The point is the center of the box
    #[default]
    Center,
    /// The point is the top-left corner of the box
    TopLeft,
}

/// Pixel size and anchoring of the region read for one tag slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TagBox {
    pub height: usize,
    pub width: usize,
    #[serde(default)]
    pub anchor: BoxAnchor,
}

impl TagBox {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            anchor: BoxAnchor::Center,
        }
    }

    pub fn with_anchor(mut self, anchor: BoxAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// The pixel box for a slot whose mapped point is `point`
    ///
    /// Fractional starts are floored and negative starts clamp to zero, so
    /// the box keeps its configured size.
    pub fn bounds_at(&self, point: PixelPoint) -> BoundingBox {
        let (row, col) = match self.anchor {
            BoxAnchor::Center => (
                point.row - self.height as f64 / 2.0,
                point.col - self.width as f64 / 2.0,
            ),
            BoxAnchor::TopLeft => (point.row, point.col),
        };
        let row_start = floor_to_pixel(row);
        let col_start = floor_to_pixel(col);
        BoundingBox::new(
            row_start,
            row_start.saturating_add(self.height),
            col_start,
            col_start.saturating_add(self.width),
        )
    }
}

fn floor_to_pixel(value: f64) -> usize {
    value.floor().max(0.0) as usize
}

/// Tag box settings for each slot group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TagBoxes {
    pub horizontal: TagBox,
    pub vertical: TagBox,
}

impl TagBoxes {
    /// Same box for both groups
    pub fn uniform(tag_box: TagBox) -> Self {
        Self {
            horizontal: tag_box,
            vertical: tag_box,
        }
    }

    pub fn for_group(&self, group: SlotGroup) -> &TagBox {
        match group {
            SlotGroup::Horizontal => &self.horizontal,
            SlotGroup::Vertical => &self.vertical,
        }
    }
}

/// Complete configuration for projecting a board onto an image
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoardConfig {
    pub geometry: GridGeometry,
    pub grid: GridExtent,
    pub tags: TagBoxes,
    /// Extra or replacement offsets, keyed by label, `[row, col]` in the
    /// east frame
    #[serde(default)]
    pub offsets: BTreeMap<String, [f64; 2]>,
}

impl BoardConfig {
    pub fn new(geometry: GridGeometry, grid: GridExtent, tags: TagBoxes) -> Self {
        Self {
            geometry,
            grid,
            tags,
            offsets: BTreeMap::new(),
        }
    }

    /// Load and validate a configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    /// Set the grid geometry
    pub fn with_geometry(mut self, geometry: GridGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Set the enumerated grid extent
    pub fn with_grid(mut self, grid: GridExtent) -> Self {
        self.grid = grid;
        self
    }

    /// Set the tag boxes
    pub fn with_tag_boxes(mut self, tags: TagBoxes) -> Self {
        self.tags = tags;
        self
    }

    /// Add or replace the offset for a label family
    pub fn with_offset(mut self, label: impl Into<String>, offset: GridVector) -> Self {
        self.offsets.insert(label.into(), [offset.row, offset.col]);
        self
    }

    /// Check value ranges that the TOML schema cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.rows == 0 || self.grid.cols == 0 {
            return Err(ConfigError::invalid(format!(
                "grid must have at least one row and column, got {}x{}",
                self.grid.rows, self.grid.cols
            )));
        }
        self.geometry.validate(self.grid)?;
        for (group, tag_box) in [
            (SlotGroup::Horizontal, &self.tags.horizontal),
            (SlotGroup::Vertical, &self.tags.vertical),
        ] {
            if tag_box.height == 0 || tag_box.width == 0 {
                return Err(ConfigError::invalid(format!(
                    "tags.{group} box must be non-empty, got {}x{}",
                    tag_box.height, tag_box.width
                )));
            }
        }
        for label in self.offsets.keys() {
            if LabelFamily::parse(label).is_none() {
                return Err(ConfigError::invalid(format!(
                    "offset label '{label}' is not a known label family"
                )));
            }
        }
        Ok(())
    }

    /// The standard offset table with this configuration's overrides applied
    pub fn offset_table(&self) -> Result<TagOffsetTable, ConfigError> {
        let mut table = TagOffsetTable::standard().clone();
        for (label, [row, col]) in &self.offsets {
            let family = LabelFamily::parse(label).ok_or_else(|| {
                ConfigError::invalid(format!(
                    "offset label '{label}' is not a known label family"
                ))
            })?;
            table.insert(family, GridVector::new(*row, *col));
        }
        Ok(table)
    }
}

/// Load and validate a configuration from a TOML string
impl FromStr for BoardConfig {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let config: BoardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}
