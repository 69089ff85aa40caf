//! Sparse cell records and the dense grid resolved from them

use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Cell kind that renders as a destination block
pub const DESTINATION_KIND: &str = "destination";

/// One positioned, typed, styled cell as supplied by the cells file.
///
/// Coordinates are unsigned, so negative positions are rejected when the
/// file is parsed rather than reaching the resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    /// Column index
    #[serde(default)]
    pub x: u32,
    /// Row index
    #[serde(default)]
    pub y: u32,
    /// Free-form kind tag; `"destination"` is the only one with structure
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    /// Highlighted destinations render as a single badge with the time marker
    #[serde(rename = "highlighted", default)]
    pub emphasized: bool,
    /// Style tags, rendered space-joined in order
    #[serde(default)]
    pub classes: Vec<String>,
    /// Station number attached by `stations::StationDirectory::annotate`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eva: Option<String>,
    /// Keys the renderer does not interpret, written back unchanged
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CellRecord {
    pub fn new(x: u32, y: u32, kind: &str, text: &str) -> Self {
        Self {
            x,
            y,
            kind: kind.to_string(),
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn is_destination(&self) -> bool {
        self.kind == DESTINATION_KIND
    }
}

/// Parse a JSON array of cell records
pub fn load_records<R: Read>(reader: R) -> Result<Vec<CellRecord>> {
    Ok(serde_json::from_reader(reader)?)
}

/// Parse a JSON cells file from disk
pub fn load_records_from_path(path: &Path) -> Result<Vec<CellRecord>> {
    let file = std::fs::File::open(path)?;
    load_records(std::io::BufReader::new(file))
}

/// Fully addressable grid derived from sparse records.
///
/// Rows span `0..=max_y` and columns `0..=max_x`; any coordinate without a
/// record is an empty cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DenseGrid {
    rows: BTreeMap<u32, BTreeMap<u32, CellRecord>>,
    max_x: u32,
    max_y: u32,
}

impl DenseGrid {
    pub fn max_x(&self) -> u32 {
        self.max_x
    }

    pub fn max_y(&self) -> u32 {
        self.max_y
    }

    /// Record at `(row, col)`, or `None` for an empty cell
    pub fn cell(&self, row: u32, col: u32) -> Option<&CellRecord> {
        self.rows.get(&row).and_then(|cols| cols.get(&col))
    }

    /// Number of coordinates that hold a record
    pub fn populated(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the dense grid from records in input order.
///
/// A later record at the same `(x, y)` replaces the earlier one. The extents
/// are running maxima over every record seen, including replaced ones.
pub fn resolve<I>(records: I) -> DenseGrid
where
    I: IntoIterator<Item = CellRecord>,
{
    let mut grid = DenseGrid::default();
    for record in records {
        grid.max_x = grid.max_x.max(record.x);
        grid.max_y = grid.max_y.max(record.y);
        grid.rows.entry(record.y).or_default().insert(record.x, record);
    }
    grid
}
