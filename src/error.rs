//! Error type for the full extraction pipeline

use thiserror::Error;

use crate::board::{ConfigError, DescriptionError, TagError};

/// Errors that can occur between reading inputs and producing labeled cells
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration could not be read or is out of range
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The board description could not be read
    #[error("board error: {0}")]
    Description(#[from] DescriptionError),

    /// The board's parts cannot be projected onto tag slots
    #[error("tag error: {0}")]
    Tag(#[from] TagError),
}

impl Error {
    /// The part responsible for the failure, when one is known
    pub fn part_id(&self) -> Option<u64> {
        match self {
            Error::Tag(e) => e.part_id(),
            _ => None,
        }
    }
}
