/// Composition of a dense grid into a row-major fragment tree

use crate::rendering::grid::{CellRecord, DenseGrid};

/// Placeholder shown in both schedule slots until live times are filled in
pub const TIME_PLACEHOLDER: &str = "--:--";

/// Schedule block under a destination name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    /// Departure and arrival slots shown beneath the text
    Slots { departure: String, arrival: String },
    /// Slots folded into the emphasized badge and not laid out
    Merged,
}

/// Structured content of a `destination` cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub text: String,
    pub emphasized: bool,
    /// Current time label; emphasized destinations always carry one, empty
    /// when no label was supplied
    pub time_marker: Option<String>,
    pub schedule: Schedule,
}

impl Destination {
    fn from_record(record: &CellRecord, current_time: Option<&str>) -> Self {
        if record.emphasized {
            Self {
                text: record.text.clone(),
                emphasized: true,
                time_marker: Some(current_time.unwrap_or_default().to_string()),
                schedule: Schedule::Merged,
            }
        } else {
            Self {
                text: record.text.clone(),
                emphasized: false,
                time_marker: None,
                schedule: Schedule::Slots {
                    departure: TIME_PLACEHOLDER.to_string(),
                    arrival: TIME_PLACEHOLDER.to_string(),
                },
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    /// No record at this coordinate
    Empty,
    /// Raw text of any non-destination kind
    PlainText(String),
    Destination(Destination),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellFragment {
    /// Style tags in input order; empty for blank cells
    pub classes: Vec<String>,
    pub content: CellContent,
}

impl CellFragment {
    pub fn empty() -> Self {
        Self {
            classes: Vec::new(),
            content: CellContent::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.content, CellContent::Empty)
    }

    /// Class attribute value, tags space-joined in order
    pub fn class_list(&self) -> String {
        self.classes.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFragment {
    pub cells: Vec<CellFragment>,
}

/// Row-major fragment tree covering every coordinate of the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFragment {
    pub rows: Vec<RowFragment>,
}

impl DocumentFragment {
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellFragment> {
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }
}

/// Compose the grid into a fragment tree.
///
/// Every `(row, col)` in `0..=max_y` x `0..=max_x` yields exactly one cell
/// fragment. `current_time` labels emphasized destinations; when `None` the
/// marker is left out.
pub fn compose(grid: &DenseGrid, current_time: Option<&str>) -> DocumentFragment {
    let rows = (0..=grid.max_y())
        .map(|y| RowFragment {
            cells: (0..=grid.max_x())
                .map(|x| match grid.cell(y, x) {
                    Some(record) => compose_cell(record, current_time),
                    None => CellFragment::empty(),
                })
                .collect(),
        })
        .collect();

    DocumentFragment { rows }
}

fn compose_cell(record: &CellRecord, current_time: Option<&str>) -> CellFragment {
    let content = if record.is_destination() {
        CellContent::Destination(Destination::from_record(record, current_time))
    } else {
        CellContent::PlainText(record.text.clone())
    };

    CellFragment {
        classes: record.classes.clone(),
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::grid::{resolve, DESTINATION_KIND};

    fn destination(x: u32, y: u32, text: &str, emphasized: bool) -> CellRecord {
        CellRecord {
            emphasized,
            ..CellRecord::new(x, y, DESTINATION_KIND, text)
        }
    }

    #[test]
    fn empty_grid_composes_to_single_blank_cell() {
        let frag = compose(&resolve(Vec::new()), None);
        assert_eq!(frag.row_count(), 1);
        assert_eq!(frag.column_count(), 1);
        let cell = frag.cell(0, 0).unwrap();
        assert!(cell.is_empty());
        assert!(cell.classes.is_empty());
    }

    #[test]
    fn every_coordinate_gets_a_fragment() {
        let grid = resolve(vec![CellRecord::new(3, 2, "", "corner")]);
        let frag = compose(&grid, None);
        assert_eq!(frag.row_count(), 3);
        assert!(frag.rows.iter().all(|r| r.cells.len() == 4));
        assert_eq!(
            frag.cell(2, 3).unwrap().content,
            CellContent::PlainText("corner".into())
        );
        assert!(frag.cell(0, 0).unwrap().is_empty());
    }

    #[test]
    fn classes_are_kept_in_order() {
        let mut record = CellRecord::new(0, 0, "", "x");
        record.classes = vec!["border-bottom".into(), "background-dark".into(), "align-right".into()];
        let frag = compose(&resolve(vec![record]), None);
        assert_eq!(
            frag.cell(0, 0).unwrap().class_list(),
            "border-bottom background-dark align-right"
        );
    }

    #[test]
    fn emphasized_destination_merges_schedule_and_shows_time() {
        let frag = compose(&resolve(vec![destination(0, 0, "Central", true)]), Some("08:15:00"));
        match &frag.cell(0, 0).unwrap().content {
            CellContent::Destination(d) => {
                assert_eq!(d.text, "Central");
                assert_eq!(d.time_marker.as_deref(), Some("08:15:00"));
                assert_eq!(d.schedule, Schedule::Merged);
            }
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[test]
    fn emphasized_destination_keeps_an_empty_marker_without_time() {
        let frag = compose(&resolve(vec![destination(0, 0, "Central", true)]), None);
        match &frag.cell(0, 0).unwrap().content {
            CellContent::Destination(d) => assert_eq!(d.time_marker.as_deref(), Some("")),
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[test]
    fn plain_destination_has_placeholder_slots_and_no_marker() {
        let frag = compose(&resolve(vec![destination(0, 0, "Central", false)]), Some("08:15:00"));
        match &frag.cell(0, 0).unwrap().content {
            CellContent::Destination(d) => {
                assert!(d.time_marker.is_none());
                assert_eq!(
                    d.schedule,
                    Schedule::Slots {
                        departure: TIME_PLACEHOLDER.into(),
                        arrival: TIME_PLACEHOLDER.into()
                    }
                );
            }
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[test]
    fn other_kinds_render_raw_text() {
        let frag = compose(&resolve(vec![CellRecord::new(0, 0, "line", "S1")]), None);
        assert_eq!(frag.cell(0, 0).unwrap().content, CellContent::PlainText("S1".into()));
    }

    #[test]
    fn composition_is_deterministic() {
        let grid = resolve(vec![destination(1, 1, "Harbour", true), CellRecord::new(0, 0, "", "A")]);
        assert_eq!(compose(&grid, Some("12:00:00")), compose(&grid, Some("12:00:00")));
    }
}
