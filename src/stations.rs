//! Station number lookup for destination cells.
//!
//! The directory is a headerless `;`-separated list of
//! `eva_number;station_name` rows.

use crate::rendering::CellRecord;
use crate::Result;
use log::warn;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Station number recorded for destinations missing from the directory
pub const UNKNOWN_STATION: &str = "fixme";

#[derive(Debug, Clone, Default)]
pub struct StationDirectory {
    by_name: HashMap<String, String>,
}

impl StationDirectory {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut table = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut by_name = HashMap::new();
        for row in table.records() {
            let row = row?;
            match (row.get(0), row.get(1)) {
                (Some(eva), Some(name)) => {
                    // Later rows win for repeated names.
                    by_name.insert(name.to_string(), eva.to_string());
                }
                _ => warn!("skipping station row without a name: {:?}", row),
            }
        }
        Ok(Self { by_name })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_reader(std::fs::File::open(path)?)
    }

    pub fn lookup(&self, station_name: &str) -> Option<&str> {
        self.by_name.get(station_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Set `eva` on every destination record; returns how many were unknown
    pub fn annotate(&self, records: &mut [CellRecord]) -> usize {
        let mut unknown = 0;
        for record in records.iter_mut().filter(|r| r.is_destination()) {
            let eva = match self.lookup(&record.text) {
                Some(eva) => eva.to_string(),
                None => {
                    unknown += 1;
                    UNKNOWN_STATION.to_string()
                }
            };
            record.eva = Some(eva);
        }
        unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::DESTINATION_KIND;

    const STATIONS: &str = "8000105;Frankfurt(Main)Hbf\n8000096;Stuttgart Hbf\n8098096;Stuttgart Hbf\n";

    #[test]
    fn parses_semicolon_rows_and_keeps_last_duplicate() {
        let dir = StationDirectory::from_reader(STATIONS.as_bytes()).unwrap();
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.lookup("Frankfurt(Main)Hbf"), Some("8000105"));
        assert_eq!(dir.lookup("Stuttgart Hbf"), Some("8098096"));
        assert_eq!(dir.lookup("Nowhere"), None);
    }

    #[test]
    fn annotates_only_destinations() {
        let dir = StationDirectory::from_reader(STATIONS.as_bytes()).unwrap();
        let mut records = vec![
            CellRecord::new(0, 0, DESTINATION_KIND, "Stuttgart Hbf"),
            CellRecord::new(1, 0, DESTINATION_KIND, "Atlantis"),
            CellRecord::new(2, 0, "", "Stuttgart Hbf"),
        ];
        let unknown = dir.annotate(&mut records);
        assert_eq!(unknown, 1);
        assert_eq!(records[0].eva.as_deref(), Some("8098096"));
        assert_eq!(records[1].eva.as_deref(), Some(UNKNOWN_STATION));
        assert_eq!(records[2].eva, None);
    }

    #[test]
    fn unrelated_keys_survive_annotation() {
        let dir = StationDirectory::from_reader(STATIONS.as_bytes()).unwrap();
        let input = r#"[{"x":3,"y":1,"type":"destination","text":"Stuttgart Hbf","line":"S1","platform":4}]"#;
        let mut records = crate::rendering::grid::load_records(input.as_bytes()).unwrap();
        dir.annotate(&mut records);

        let written: serde_json::Value = serde_json::to_value(&records).unwrap();
        assert_eq!(written[0]["line"], "S1");
        assert_eq!(written[0]["platform"], 4);
        assert_eq!(written[0]["eva"], "8098096");
        assert_eq!(written[0]["x"], 3);
    }

    #[test]
    fn eva_is_omitted_from_json_when_absent() {
        let plain = serde_json::to_string(&CellRecord::new(0, 0, "", "x")).unwrap();
        assert!(!plain.contains("eva"));
        let mut tagged = CellRecord::new(0, 0, DESTINATION_KIND, "x");
        tagged.eva = Some("8000105".into());
        let json = serde_json::to_string(&tagged).unwrap();
        assert!(json.contains(r#""eva":"8000105""#));
        assert!(json.contains(r#""type":"destination""#));
    }
}
