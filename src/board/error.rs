//! Error types for tag projection and extraction

use thiserror::Error;

use super::types::TagLocation;

/// Errors that can occur while building the label map for a board
///
/// All of these are data or configuration defects. They are raised while the
/// label map is built, before any pixel work happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TagError {
    /// The label does not belong to any family in the offset table
    #[error("unknown label family '{label}'")]
    UnknownLabelFamily { label: String },

    /// An orientation token is not one of north/south/east/west
    #[error("invalid orientation '{token}' (expected north, south, east or west)")]
    InvalidOrientation { token: String },

    /// Two parts project their tags onto the same slot
    #[error("parts {first} and {second} both place a tag at {location}")]
    DuplicateTagLocation {
        location: TagLocation,
        first: u64,
        second: u64,
    },

    /// A projected tag is not on exactly one half-integer axis
    #[error("tag for part {part_id} (label '{label}') lands at ({row}, {col}), which is not a tag slot")]
    InvalidTagGeometry {
        part_id: u64,
        label: String,
        row: f64,
        col: f64,
    },
}

impl TagError {
    /// Create an unknown label family error
    pub fn unknown_label(label: impl Into<String>) -> Self {
        Self::UnknownLabelFamily {
            label: label.into(),
        }
    }

    /// Create an invalid orientation error
    pub fn invalid_orientation(token: impl Into<String>) -> Self {
        Self::InvalidOrientation {
            token: token.into(),
        }
    }

    /// Create a duplicate tag location error
    pub fn duplicate(location: TagLocation, first: u64, second: u64) -> Self {
        Self::DuplicateTagLocation {
            location,
            first,
            second,
        }
    }

    /// Create an invalid geometry error
    pub fn invalid_geometry(part_id: u64, label: impl Into<String>, row: f64, col: f64) -> Self {
        Self::InvalidTagGeometry {
            part_id,
            label: label.into(),
            row,
            col,
        }
    }

    /// The part that triggered the error, if known
    pub fn part_id(&self) -> Option<u64> {
        match self {
            Self::DuplicateTagLocation { second, .. } => Some(*second),
            Self::InvalidTagGeometry { part_id, .. } => Some(*part_id),
            _ => None,
        }
    }
}
