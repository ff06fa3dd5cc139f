//! Board geometry: orientations, grid mapping, tag projection and slot
//! extraction
//!
//! This module takes a board description and a calibrated grid geometry
//! and produces, for every candidate tag slot, the pixel region to inspect
//! and the tag expected there.

pub mod config;
pub mod description;
pub mod error;
pub mod extractor;
pub mod projector;
pub mod transform;
pub mod types;

pub use config::{BoardConfig, BoxAnchor, ConfigError, GridExtent, GridGeometry, TagBox, TagBoxes};
pub use description::{BoardDescription, DescriptionError, PartRecord};
pub use error::TagError;
pub use extractor::{build_label_map, LabelMap, LabeledCell, LabeledCellExtractor, LabeledCells};
pub use projector::{
    part_reference_from_tag_location, tag_location_from_part, LabelFamily, TagOffsetTable,
    TagProjector,
};
pub use transform::{opposite, rotate, Orientation, RotationMatrix};
pub use types::*;
