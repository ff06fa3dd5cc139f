//! External board description format
//!
//! A board is a list of parts, each with an id, a label and a location
//! triple `[row, col, orientation]`:
//!
//! ```toml
//! [[parts]]
//! id = 0
//! label = "4"
//! location = [1, 4, "west"]
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use super::error::TagError;
use super::types::{GridPosition, PartDescriptor};

/// Errors that can occur when reading a board description
#[derive(Error, Debug)]
pub enum DescriptionError {
    #[error("Failed to read board file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse board TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A board as stored on disk
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoardDescription {
    #[serde(default)]
    pub parts: Vec<PartRecord>,
}

/// One part entry, before its orientation is parsed
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PartRecord {
    pub id: u64,
    pub label: String,
    /// `(row, col, orientation)`
    pub location: (i64, i64, String),
}

impl PartRecord {
    /// Parse the orientation token and build a descriptor
    pub fn to_descriptor(&self) -> Result<PartDescriptor, TagError> {
        let (row, col, orientation) = &self.location;
        Ok(PartDescriptor::new(
            self.id,
            self.label.clone(),
            GridPosition::new(*row as f64, *col as f64),
            orientation.parse()?,
        ))
    }
}

impl BoardDescription {
    /// Load a board description from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, DescriptionError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    /// Convert every record, failing on the first invalid orientation
    pub fn descriptors(&self) -> Result<Vec<PartDescriptor>, TagError> {
        self.parts.iter().map(PartRecord::to_descriptor).collect()
    }
}

/// Load a board description from a TOML string
impl FromStr for BoardDescription {
    type Err = DescriptionError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(content)?)
    }
}
