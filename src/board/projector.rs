//! Projection between a part's reference cell and its tag slot.
//!
//! Every label family has a fixed offset from the part's reference cell to
//! its tag, expressed in the part's east-facing local frame. Placing the
//! part rotates that offset:
//!
//! ```text
//! tag  = part + rotate(offset(label), orientation)
//! part = tag  - rotate(offset(label), orientation)
//! ```
//!
//! Rotation matrices are exact integer matrices, so the second line is the
//! exact inverse of the first rather than a search.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use super::error::TagError;
use super::transform::{rotate, Orientation};
use super::types::{GridPosition, GridVector, PartDescriptor};

/// Largest span covered by the standard offset table
const STANDARD_MAX_SPAN: u32 = 9;

/// The shape family a part label belongs to
///
/// Labels are either a bare span length (`"4"`), for straight parts
/// covering that many cells along their facing, or `u` followed by a width
/// (`"u2"`) for U-shaped parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LabelFamily {
    Straight(u32),
    UShape(u32),
}

impl LabelFamily {
    pub fn parse(label: &str) -> Option<LabelFamily> {
        match label.strip_prefix('u') {
            Some(width) => parse_count(width).map(LabelFamily::UShape),
            None => parse_count(label).map(LabelFamily::Straight),
        }
    }

    /// Offset of this family's tag in the standard table
    ///
    /// Straight parts put the tag on the vertical grid line nearest their
    /// middle; U-shaped parts put it half a row down from the reference
    /// cell, in the middle of the span.
    fn standard_offset(self) -> GridVector {
        match self {
            LabelFamily::Straight(n) => GridVector::new(0.0, (n / 2) as f64 - 0.5),
            LabelFamily::UShape(n) => GridVector::new(0.5, (n / 2) as f64),
        }
    }
}

impl fmt::Display for LabelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelFamily::Straight(n) => write!(f, "{n}"),
            LabelFamily::UShape(n) => write!(f, "u{n}"),
        }
    }
}

fn parse_count(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Tag offsets per label family, in the east frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagOffsetTable {
    entries: BTreeMap<LabelFamily, GridVector>,
}

impl TagOffsetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide table of standard part families
    pub fn standard() -> &'static TagOffsetTable {
        static STANDARD: OnceLock<TagOffsetTable> = OnceLock::new();
        STANDARD.get_or_init(|| {
            let entries = (2..=STANDARD_MAX_SPAN)
                .flat_map(|n| [LabelFamily::Straight(n), LabelFamily::UShape(n)])
                .map(|family| (family, family.standard_offset()))
                .collect();
            TagOffsetTable { entries }
        })
    }

    /// Add or replace the offset for a family
    pub fn insert(&mut self, family: LabelFamily, offset: GridVector) {
        self.entries.insert(family, offset);
    }

    /// Look up the offset for a label
    pub fn offset(&self, label: &str) -> Result<GridVector, TagError> {
        LabelFamily::parse(label)
            .and_then(|family| self.entries.get(&family).copied())
            .ok_or_else(|| TagError::unknown_label(label))
    }

    pub fn families(&self) -> impl Iterator<Item = LabelFamily> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where the tag of a part with `label` at `position` facing `orientation` is
pub fn tag_location_from_part(
    table: &TagOffsetTable,
    label: &str,
    position: GridPosition,
    orientation: Orientation,
) -> Result<GridPosition, TagError> {
    let offset = table.offset(label)?;
    Ok(position + rotate(offset, orientation))
}

/// The reference cell of a part whose tag is at `tag`
///
/// Exact inverse of [`tag_location_from_part`] for the same label and
/// orientation.
pub fn part_reference_from_tag_location(
    table: &TagOffsetTable,
    label: &str,
    tag: GridPosition,
    orientation: Orientation,
) -> Result<GridPosition, TagError> {
    let offset = table.offset(label)?;
    Ok(tag - rotate(offset, orientation))
}

/// Projects parts onto their tag slots using a shared offset table
#[derive(Debug, Clone, Copy)]
pub struct TagProjector<'a> {
    table: &'a TagOffsetTable,
}

impl<'a> TagProjector<'a> {
    pub fn new(table: &'a TagOffsetTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a TagOffsetTable {
        self.table
    }

    /// Tag location for a placed part
    pub fn project(&self, part: &PartDescriptor) -> Result<GridPosition, TagError> {
        tag_location_from_part(self.table, &part.label, part.position, part.orientation)
    }

    /// Reference cell for a tag read at `tag` with the given label and orientation
    pub fn unproject(
        &self,
        label: &str,
        tag: GridPosition,
        orientation: Orientation,
    ) -> Result<GridPosition, TagError> {
        part_reference_from_tag_location(self.table, label, tag, orientation)
    }
}

impl Default for TagProjector<'static> {
    fn default() -> Self {
        Self::new(TagOffsetTable::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn forward(label: &str, row: f64, col: f64, o: Orientation) -> GridPosition {
        tag_location_from_part(TagOffsetTable::standard(), label, GridPosition::new(row, col), o)
            .unwrap()
    }

    #[test]
    fn test_parse_label_family() {
        assert_eq!(LabelFamily::parse("4"), Some(LabelFamily::Straight(4)));
        assert_eq!(LabelFamily::parse("u2"), Some(LabelFamily::UShape(2)));
        assert_eq!(LabelFamily::parse("u"), None);
        assert_eq!(LabelFamily::parse(""), None);
        assert_eq!(LabelFamily::parse("x7"), None);
        assert_eq!(LabelFamily::parse("+4"), None);
        assert_eq!(LabelFamily::parse("U2"), None);
    }

    #[test]
    fn test_standard_offsets() {
        let table = TagOffsetTable::standard();
        assert_eq!(table.offset("2").unwrap(), GridVector::new(0.0, 0.5));
        assert_eq!(table.offset("3").unwrap(), GridVector::new(0.0, 0.5));
        assert_eq!(table.offset("4").unwrap(), GridVector::new(0.0, 1.5));
        assert_eq!(table.offset("5").unwrap(), GridVector::new(0.0, 1.5));
        assert_eq!(table.offset("u2").unwrap(), GridVector::new(0.5, 1.0));
        assert_eq!(table.len(), 16);
    }

    #[test]
    fn test_standard_offsets_land_on_one_half_axis() {
        let table = TagOffsetTable::standard();
        for family in table.families() {
            let offset = table.offset(&family.to_string()).unwrap();
            let row_half = offset.row.fract() != 0.0;
            let col_half = offset.col.fract() != 0.0;
            assert!(row_half != col_half, "{family}: {offset:?}");
        }
    }

    #[test]
    fn test_unknown_label() {
        let err = TagOffsetTable::standard().offset("x7").unwrap_err();
        assert_eq!(err, TagError::unknown_label("x7"));
        // Parses as a family but has no entry
        assert!(TagOffsetTable::standard().offset("42").is_err());
        assert!(TagOffsetTable::new().offset("2").is_err());
    }

    #[test]
    fn test_tag_location_from_part() {
        assert_eq!(
            forward("5", 4.0, 3.0, Orientation::East),
            GridPosition::new(4.0, 4.5)
        );
        assert_eq!(
            forward("5", 4.0, 3.0, Orientation::South),
            GridPosition::new(5.5, 3.0)
        );
        assert_eq!(
            forward("u2", 4.0, 3.0, Orientation::West),
            GridPosition::new(3.5, 2.0)
        );
        assert_eq!(
            forward("u2", 4.0, 3.0, Orientation::North),
            GridPosition::new(3.0, 3.5)
        );
    }

    #[test]
    fn test_projector_uses_part_fields() {
        let projector = TagProjector::default();
        let part = PartDescriptor::new(1, "2", GridPosition::new(3.0, 1.0), Orientation::North);
        let tag = projector.project(&part).unwrap();
        assert_eq!(tag, GridPosition::new(2.5, 1.0));
        assert_eq!(
            projector.unproject("2", tag, Orientation::North).unwrap(),
            part.position
        );
    }

    #[test]
    fn test_custom_table() {
        let mut table = TagOffsetTable::new();
        table.insert(LabelFamily::UShape(12), GridVector::new(0.5, 6.0));
        let projector = TagProjector::new(&table);
        assert_eq!(projector.table().len(), 1);
        assert!(projector.table().offset("u2").is_err());
        let part = PartDescriptor::new(0, "u12", GridPosition::new(0.0, 0.0), Orientation::East);
        assert_eq!(projector.project(&part).unwrap(), GridPosition::new(0.5, 6.0));
    }

    #[test]
    fn test_round_trip_every_family() {
        let table = TagOffsetTable::standard();
        let loc = GridPosition::new(7.0, 2.0);
        for family in table.families() {
            let label = family.to_string();
            for o in Orientation::ALL {
                let tag = tag_location_from_part(table, &label, loc, o).unwrap();
                let back = part_reference_from_tag_location(table, &label, tag, o).unwrap();
                assert_eq!(back, loc, "{label} {o}");
            }
        }
    }

    proptest! {
        #[test]
        fn round_trip_law(
            row in -10_000i64..10_000,
            col in -10_000i64..10_000,
            span in 2u32..=STANDARD_MAX_SPAN,
            u_shape in any::<bool>(),
            idx in 0usize..4,
        ) {
            let table = TagOffsetTable::standard();
            let family = if u_shape { LabelFamily::UShape(span) } else { LabelFamily::Straight(span) };
            let label = family.to_string();
            let o = Orientation::ALL[idx];
            let loc = GridPosition::new(row as f64, col as f64);
            let tag = tag_location_from_part(table, &label, loc, o).unwrap();
            prop_assert_eq!(part_reference_from_tag_location(table, &label, tag, o).unwrap(), loc);
        }

        #[test]
        fn inverse_then_forward_returns_tag(
            row2 in -1000i64..1000,
            col2 in -1000i64..1000,
            idx in 0usize..4,
        ) {
            let table = TagOffsetTable::standard();
            let o = Orientation::ALL[idx];
            let tag = GridPosition::new(row2 as f64 / 2.0, col2 as f64 / 2.0);
            let part = part_reference_from_tag_location(table, "u3", tag, o).unwrap();
            prop_assert_eq!(tag_location_from_part(table, "u3", part, o).unwrap(), tag);
        }
    }
}
