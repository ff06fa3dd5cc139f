//! Enumeration of tag slots joined with the labels expected in them.
//!
//! Construction projects every part of the board onto its tag slot and
//! builds the label map. All data defects (unknown labels, malformed
//! geometry, two tags in one slot) are reported here, before any image
//! region is touched.
//!
//! [`LabeledCellExtractor::labeled_cells`] then walks every candidate slot
//! of the configured grid in row-major order, once per [`SlotGroup`]. The
//! position of an entry in its list is what ties it to a physical place on
//! the board, so the order never depends on which slots are occupied.

use std::collections::BTreeMap;

use super::config::{BoardConfig, GridExtent, GridGeometry, TagBoxes};
use super::description::BoardDescription;
use super::error::TagError;
use super::projector::TagProjector;
use super::transform::Orientation;
use super::types::{BoundingBox, ExpectedTag, PartDescriptor, SlotGroup, TagLocation};
use crate::image::RegionSource;

/// Expected tag per slot, ordered row-major
pub type LabelMap = BTreeMap<TagLocation, ExpectedTag>;

/// Project every part and collect the expected tags by slot
///
/// Fails on the first part whose label is unknown, whose tag is not on a
/// slot, or whose slot is already taken.
pub fn build_label_map(
    parts: &[PartDescriptor],
    projector: TagProjector<'_>,
) -> Result<LabelMap, TagError> {
    let mut labels = LabelMap::new();
    for part in parts {
        let position = projector.project(part)?;
        let location = TagLocation::from_position(position)
            .filter(|loc| loc.group().is_some())
            .ok_or_else(|| {
                TagError::invalid_geometry(part.id, &part.label, position.row, position.col)
            })?;

        tracing::debug!(
            part = part.id,
            label = %part.label,
            orientation = %part.orientation,
            tag = %location,
            "projected part tag"
        );

        if let Some(existing) = labels.get(&location) {
            return Err(TagError::duplicate(location, existing.part_id, part.id));
        }
        labels.insert(
            location,
            ExpectedTag {
                part_id: part.id,
                label: part.label.clone(),
                orientation: part.orientation,
            },
        );
    }
    Ok(labels)
}

/// One candidate tag slot with its image region
#[derive(Debug, Clone)]
pub struct LabeledCell<R> {
    pub slot: TagLocation,
    pub group: SlotGroup,
    /// The tag the board says belongs here, if any
    pub expected: Option<ExpectedTag>,
    pub bounds: BoundingBox,
    pub region: R,
}

impl<R> LabeledCell<R> {
    pub fn label(&self) -> Option<&str> {
        self.expected.as_ref().map(|tag| tag.label.as_str())
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.expected.as_ref().map(|tag| tag.orientation)
    }

    pub fn is_tagged(&self) -> bool {
        self.expected.is_some()
    }
}

/// Every slot of the board, split by group
#[derive(Debug, Clone)]
pub struct LabeledCells<R> {
    pub vertical: Vec<LabeledCell<R>>,
    pub horizontal: Vec<LabeledCell<R>>,
}

impl<R> LabeledCells<R> {
    pub fn group(&self, group: SlotGroup) -> &[LabeledCell<R>] {
        match group {
            SlotGroup::Horizontal => &self.horizontal,
            SlotGroup::Vertical => &self.vertical,
        }
    }

    /// Slots of `group` that expect a tag, in enumeration order
    pub fn tagged(&self, group: SlotGroup) -> impl Iterator<Item = &LabeledCell<R>> {
        self.group(group).iter().filter(|cell| cell.is_tagged())
    }

    /// All slots, vertical group first
    pub fn iter(&self) -> impl Iterator<Item = &LabeledCell<R>> {
        self.vertical.iter().chain(self.horizontal.iter())
    }

    pub fn len(&self) -> usize {
        self.vertical.len() + self.horizontal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Maps a board onto an image and lists what each tag slot should show
#[derive(Debug)]
pub struct LabeledCellExtractor<'img, I: RegionSource> {
    image: &'img I,
    geometry: GridGeometry,
    grid: GridExtent,
    tags: TagBoxes,
    labels: LabelMap,
}

impl<'img, I: RegionSource> LabeledCellExtractor<'img, I> {
    /// Build the label map for `parts`
    ///
    /// `config` is used as given; run [`BoardConfig::validate`] first on
    /// configurations not loaded through `from_file` or `parse`. An
    /// unvalidated config can yield empty or degenerate boxes.
    pub fn new(
        image: &'img I,
        parts: &[PartDescriptor],
        config: &BoardConfig,
        projector: TagProjector<'_>,
    ) -> Result<Self, TagError> {
        let labels = build_label_map(parts, projector)?;

        for (location, tag) in &labels {
            if !config.grid.contains(location.position()) {
                tracing::warn!(
                    part = tag.part_id,
                    tag = %location,
                    rows = config.grid.rows,
                    cols = config.grid.cols,
                    "tag slot lies outside the board grid and will not be enumerated"
                );
            }
        }
        tracing::info!(
            parts = parts.len(),
            horizontal = count_group(&labels, SlotGroup::Horizontal),
            vertical = count_group(&labels, SlotGroup::Vertical),
            "built label map"
        );

        Ok(Self {
            image,
            geometry: config.geometry,
            grid: config.grid,
            tags: config.tags,
            labels,
        })
    }

    /// Parse the board's orientation tokens, then build as [`Self::new`]
    pub fn from_description(
        image: &'img I,
        board: &BoardDescription,
        config: &BoardConfig,
        projector: TagProjector<'_>,
    ) -> Result<Self, TagError> {
        let parts = board.descriptors()?;
        Self::new(image, &parts, config, projector)
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    /// Expected tag at a slot, if any
    pub fn expected_at(&self, location: &TagLocation) -> Option<&ExpectedTag> {
        self.labels.get(location)
    }

    /// Pixel box of a slot
    pub fn slot_bounds(&self, slot: TagLocation, group: SlotGroup) -> BoundingBox {
        let point = self.geometry.to_pixel(slot.position());
        self.tags.for_group(group).bounds_at(point)
    }

    /// Every candidate slot with its expected tag and image region
    pub fn labeled_cells(&self) -> LabeledCells<I::Region<'img>> {
        LabeledCells {
            vertical: self.enumerate(SlotGroup::Vertical),
            horizontal: self.enumerate(SlotGroup::Horizontal),
        }
    }

    fn enumerate(&self, group: SlotGroup) -> Vec<LabeledCell<I::Region<'img>>> {
        let mut cells = Vec::with_capacity(self.grid.slot_count());
        for row in 0..self.grid.rows {
            for col in 0..self.grid.cols {
                let slot = match group {
                    SlotGroup::Horizontal => TagLocation::horizontal_slot(row, col),
                    SlotGroup::Vertical => TagLocation::vertical_slot(row, col),
                };
                let bounds = self.slot_bounds(slot, group);
                cells.push(LabeledCell {
                    slot,
                    group,
                    expected: self.labels.get(&slot).cloned(),
                    bounds,
                    region: self.image.region(bounds.rows(), bounds.cols()),
                });
            }
        }
        cells
    }
}

fn count_group(labels: &LabelMap, group: SlotGroup) -> usize {
    labels.keys().filter(|loc| loc.group() == Some(group)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::config::TagBox;
    use crate::board::projector::{LabelFamily, TagOffsetTable};
    use crate::board::types::{GridPosition, GridVector};
    use crate::image::FrameExtent;
    use std::str::FromStr;
    use pretty_assertions::assert_eq;

    fn config() -> BoardConfig {
        BoardConfig::new(
            GridGeometry::new(10.0, 10.0, 20.0, 20.0),
            GridExtent::new(3, 4),
            TagBoxes::uniform(TagBox::new(6, 4)),
        )
    }

    fn part(id: u64, label: &str, row: f64, col: f64, o: Orientation) -> PartDescriptor {
        PartDescriptor::new(id, label, GridPosition::new(row, col), o)
    }

    #[test]
    fn test_label_map_keys() {
        let parts = vec![
            part(0, "2", 0.0, 0.0, Orientation::East),
            part(1, "2", 2.0, 1.0, Orientation::North),
        ];
        let labels = build_label_map(&parts, TagProjector::default()).unwrap();
        let keys: Vec<GridPosition> = labels.keys().map(|k| k.position()).collect();
        assert_eq!(
            keys,
            vec![GridPosition::new(0.0, 0.5), GridPosition::new(1.5, 1.0)]
        );
    }

    #[test]
    fn test_duplicate_location() {
        // "2" east at (0,0) and "2" west at (0,1) share the slot (0, 0.5)
        let parts = vec![
            part(3, "2", 0.0, 0.0, Orientation::East),
            part(8, "2", 0.0, 1.0, Orientation::West),
        ];
        let err = build_label_map(&parts, TagProjector::default()).unwrap_err();
        assert!(matches!(
            err,
            TagError::DuplicateTagLocation { first: 3, second: 8, .. }
        ));
    }

    #[test]
    fn test_unknown_label_aborts() {
        let parts = vec![
            part(0, "2", 0.0, 0.0, Orientation::East),
            part(1, "led", 1.0, 1.0, Orientation::East),
        ];
        let image = FrameExtent::new(100, 100);
        let err = LabeledCellExtractor::new(&image, &parts, &config(), TagProjector::default())
            .unwrap_err();
        assert_eq!(err, TagError::unknown_label("led"));
    }

    #[test]
    fn test_invalid_geometry_cell_offset() {
        let mut table = TagOffsetTable::new();
        table.insert(LabelFamily::Straight(3), GridVector::new(0.0, 1.0));
        let parts = vec![part(5, "3", 1.0, 1.0, Orientation::South)];
        let err = build_label_map(&parts, TagProjector::new(&table)).unwrap_err();
        // (1, 1) + rotate((0, 1), south) = (2, 1), a cell rather than a slot
        assert_eq!(err, TagError::invalid_geometry(5, "3", 2.0, 1.0));
    }

    #[test]
    fn test_invalid_geometry_corner_offset() {
        let mut table = TagOffsetTable::new();
        table.insert(LabelFamily::UShape(3), GridVector::new(0.5, 1.5));
        let parts = vec![part(2, "u3", 0.0, 0.0, Orientation::East)];
        let err = build_label_map(&parts, TagProjector::new(&table)).unwrap_err();
        assert!(matches!(err, TagError::InvalidTagGeometry { part_id: 2, .. }));
    }

    #[test]
    fn test_enumeration_counts_and_order() {
        let parts = vec![
            part(0, "2", 2.0, 2.0, Orientation::East),
            part(1, "2", 0.0, 3.0, Orientation::South),
            part(2, "2", 1.0, 0.0, Orientation::East),
        ];
        let image = FrameExtent::new(100, 100);
        let extractor =
            LabeledCellExtractor::new(&image, &parts, &config(), TagProjector::default()).unwrap();
        let cells = extractor.labeled_cells();

        assert_eq!(cells.horizontal.len(), 12);
        assert_eq!(cells.vertical.len(), 12);
        assert_eq!(cells.len(), 24);

        let horizontal: Vec<(TagLocation, u64)> = cells
            .tagged(SlotGroup::Horizontal)
            .map(|c| (c.slot, c.expected.as_ref().unwrap().part_id))
            .collect();
        assert_eq!(
            horizontal,
            vec![
                (TagLocation::horizontal_slot(1, 0), 2),
                (TagLocation::horizontal_slot(2, 2), 0),
            ]
        );
        let vertical: Vec<u64> = cells
            .tagged(SlotGroup::Vertical)
            .map(|c| c.expected.as_ref().unwrap().part_id)
            .collect();
        assert_eq!(vertical, vec![1]);

        let below_part_1 = TagLocation::vertical_slot(0, 3);
        assert_eq!(extractor.expected_at(&below_part_1).map(|t| t.part_id), Some(1));
        assert_eq!(extractor.expected_at(&TagLocation::vertical_slot(0, 2)), None);

        // Slot order is row-major regardless of occupancy
        let slots: Vec<TagLocation> = cells.vertical.iter().map(|c| c.slot).collect();
        let mut sorted = slots.clone();
        sorted.sort();
        assert_eq!(slots, sorted);
        assert_eq!(cells.vertical[5].slot, TagLocation::vertical_slot(1, 1));
    }

    #[test]
    fn test_cell_bounds_and_region() {
        let image = FrameExtent::new(40, 200);
        let extractor =
            LabeledCellExtractor::new(&image, &[], &config(), TagProjector::default()).unwrap();
        let cells = extractor.labeled_cells();

        // Horizontal slot (0, 0.5) maps to pixel (10, 20); a 6x4 box centered on it
        let first = &cells.horizontal[0];
        assert_eq!(first.bounds.as_tuple(), (7, 13, 18, 22));
        assert_eq!(first.region, first.bounds);
        assert_eq!(first.label(), None);
        assert_eq!(first.orientation(), None);

        // Vertical slot (2.5, 0) maps to pixel (60, 10), below the 40px frame
        let last_row = &cells.vertical[8];
        assert_eq!(last_row.slot, TagLocation::vertical_slot(2, 0));
        assert_eq!(last_row.bounds.as_tuple(), (57, 63, 8, 12));
        assert_eq!(last_row.region.height(), 0);
    }

    #[test]
    fn test_tag_outside_grid_is_kept_but_not_enumerated() {
        let parts = vec![part(4, "2", 7.0, 7.0, Orientation::East)];
        let image = FrameExtent::new(100, 100);
        let extractor =
            LabeledCellExtractor::new(&image, &parts, &config(), TagProjector::default()).unwrap();
        assert_eq!(extractor.labels().len(), 1);
        let cells = extractor.labeled_cells();
        assert_eq!(cells.iter().filter(|c| c.is_tagged()).count(), 0);
    }

    #[test]
    fn test_from_description_propagates_orientation_error() {
        let board = BoardDescription::from_str(
            "[[parts]]\nid = 1\nlabel = \"2\"\nlocation = [0, 0, \"sideways\"]\n",
        )
        .unwrap();
        let image = FrameExtent::new(100, 100);
        let err = LabeledCellExtractor::from_description(
            &image,
            &board,
            &config(),
            TagProjector::default(),
        )
        .unwrap_err();
        assert_eq!(err, TagError::invalid_orientation("sideways"));
    }
}
