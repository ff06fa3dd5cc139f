//! Board Tags - where to look for part tags on a board image, and what to expect there
//!
//! Given a symbolic board layout (parts on an integer grid, each facing one
//! of four directions) and a calibrated grid geometry, this library computes
//! for every candidate tag slot the pixel region to inspect and the label
//! and orientation expected in it.
//!
//! # Example
//!
//! ```rust
//! use board_tags::{extract, BoardConfig, BoardDescription, FrameExtent, SlotGroup};
//!
//! let config: BoardConfig = r#"
//!     [geometry]
//!     row_margin = 40.5
//!     col_margin = 20.5
//!     row_cell = 86.5
//!     col_cell = 40.0
//!
//!     [grid]
//!     rows = 6
//!     cols = 9
//!
//!     [tags.horizontal]
//!     height = 42
//!     width = 18
//!
//!     [tags.vertical]
//!     height = 42
//!     width = 18
//! "#.parse().unwrap();
//!
//! let board: BoardDescription = r#"
//!     [[parts]]
//!     id = 0
//!     label = "4"
//!     location = [1, 4, "west"]
//! "#.parse().unwrap();
//!
//! let image = FrameExtent::new(600, 400);
//! let cells = extract(&image, &board, &config).unwrap();
//! assert_eq!(cells.horizontal.len(), 54);
//! assert_eq!(cells.tagged(SlotGroup::Horizontal).count(), 1);
//! ```

pub mod board;
pub mod error;
pub mod image;
pub mod report;

pub use board::{
    BoardConfig, BoardDescription, BoundingBox, ExpectedTag, GridExtent, GridGeometry,
    GridPosition, LabeledCell, LabeledCellExtractor, LabeledCells, Orientation, PartDescriptor,
    SlotGroup, TagBox, TagBoxes, TagError, TagLocation, TagOffsetTable, TagProjector,
};
pub use error::Error;
pub use image::{FrameExtent, Raster, RasterView, RegionSource};
pub use report::{render_report, ReportConfig};

/// Run the full pipeline on an in-memory board description
///
/// The configuration is validated first, since it may have been built in
/// code rather than loaded. Its offset overrides are merged onto the
/// standard offset table before projection.
pub fn extract<'img, I: RegionSource>(
    image: &'img I,
    board: &BoardDescription,
    config: &BoardConfig,
) -> Result<LabeledCells<I::Region<'img>>, Error> {
    config.validate()?;
    let table = config.offset_table()?;
    let extractor =
        LabeledCellExtractor::from_description(image, board, config, TagProjector::new(&table))?;
    Ok(extractor.labeled_cells())
}

/// Load the board and configuration from TOML files, then extract
pub fn extract_from_files<'img, I: RegionSource>(
    image: &'img I,
    board_path: &std::path::Path,
    config_path: &std::path::Path,
) -> Result<LabeledCells<I::Region<'img>>, Error> {
    let config = BoardConfig::from_file(config_path)?;
    let board = BoardDescription::from_file(board_path)?;
    extract(image, &board, &config)
}
