//! Plain-text rendering of labeled cells
//!
//! One line per slot, whitespace separated, vertical group first:
//!
//! ```text
//! # group row col label orientation row_start row_end col_start col_end
//! vertical 2.5 1 2 north 235 277 51 69
//! ```
//!
//! Missing labels and orientations print as `-`.

use crate::board::{LabeledCell, LabeledCells};

const HEADER: &str = "# group row col label orientation row_start row_end col_start col_end";

/// Options for report output
#[derive(Debug, Clone, Default)]
pub struct ReportConfig {
    /// Only list slots that expect a tag
    pub tagged_only: bool,
    /// Omit the header line
    pub no_header: bool,
}

impl ReportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only list slots that expect a tag
    pub fn with_tagged_only(mut self, tagged_only: bool) -> Self {
        self.tagged_only = tagged_only;
        self
    }

    /// Omit the header line
    pub fn with_no_header(mut self, no_header: bool) -> Self {
        self.no_header = no_header;
        self
    }
}

/// Render labeled cells as a text table
pub fn render_report<R>(cells: &LabeledCells<R>, config: &ReportConfig) -> String {
    let mut out = String::new();
    if !config.no_header {
        out.push_str(HEADER);
        out.push('\n');
    }
    for cell in cells.iter() {
        if config.tagged_only && !cell.is_tagged() {
            continue;
        }
        write_cell(&mut out, cell);
    }
    out
}

fn write_cell<R>(out: &mut String, cell: &LabeledCell<R>) {
    let position = cell.slot.position();
    let (row_start, row_end, col_start, col_end) = cell.bounds.as_tuple();
    let orientation = cell.orientation().map(|o| o.name()).unwrap_or("-");
    out.push_str(&format!(
        "{} {} {} {} {} {} {} {} {}\n",
        cell.group,
        position.row,
        position.col,
        cell.label().unwrap_or("-"),
        orientation,
        row_start,
        row_end,
        col_start,
        col_end
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoundingBox, ExpectedTag, Orientation, SlotGroup, TagLocation};

    fn cell(
        slot: TagLocation,
        group: SlotGroup,
        expected: Option<ExpectedTag>,
    ) -> LabeledCell<()> {
        LabeledCell {
            slot,
            group,
            expected,
            bounds: BoundingBox::new(1, 3, 5, 9),
            region: (),
        }
    }

    fn sample() -> LabeledCells<()> {
        LabeledCells {
            vertical: vec![cell(TagLocation::vertical_slot(0, 0), SlotGroup::Vertical, None)],
            horizontal: vec![cell(
                TagLocation::horizontal_slot(0, 1),
                SlotGroup::Horizontal,
                Some(ExpectedTag {
                    part_id: 3,
                    label: "u2".to_string(),
                    orientation: Orientation::South,
                }),
            )],
        }
    }

    #[test]
    fn test_full_report() {
        let report = render_report(&sample(), &ReportConfig::new());
        assert_eq!(
            report,
            format!("{HEADER}\nvertical 0.5 0 - - 1 3 5 9\nhorizontal 0 1.5 u2 south 1 3 5 9\n")
        );
    }

    #[test]
    fn test_tagged_only_without_header() {
        let config = ReportConfig::new().with_tagged_only(true).with_no_header(true);
        let report = render_report(&sample(), &config);
        assert_eq!(report, "horizontal 0 1.5 u2 south 1 3 5 9\n");
    }
}
