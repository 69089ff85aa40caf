//! Resolver, composer and markup properties

use scraper::{Html, Selector};
use trainmap::pipeline::render_document;
use trainmap::rendering::{compose, resolve, CellContent, CellRecord, Schedule, DESTINATION_KIND};

fn sample_records() -> Vec<CellRecord> {
    let mut header = CellRecord::new(0, 0, "", "S4");
    header.classes = vec!["background-dark".into(), "border-bottom".into()];

    let mut home = CellRecord::new(2, 1, DESTINATION_KIND, "Central");
    home.emphasized = true;
    home.classes = vec!["background-white".into()];

    let mut next = CellRecord::new(3, 1, DESTINATION_KIND, "Harbour");
    next.classes = vec!["align-right".into()];

    vec![header, home, next, CellRecord::new(1, 4, "", "S6")]
}

fn select<'a>(doc: &'a Html, css: &str) -> Vec<scraper::ElementRef<'a>> {
    let sel = Selector::parse(css).unwrap();
    doc.select(&sel).collect()
}

#[test]
fn extents_match_maximum_coordinates() {
    let records = sample_records();
    let grid = resolve(records.clone());
    assert_eq!(grid.max_x(), records.iter().map(|r| r.x).max().unwrap());
    assert_eq!(grid.max_y(), records.iter().map(|r| r.y).max().unwrap());
}

#[test]
fn duplicate_coordinates_keep_the_later_record() {
    let mut records = sample_records();
    let mut replacement = CellRecord::new(2, 1, "", "Replaced");
    replacement.classes = vec!["background-light".into()];
    records.push(replacement);

    let frag = compose(&resolve(records.clone()), None);
    let cell = frag.cell(1, 2).unwrap();
    assert_eq!(cell.content, CellContent::PlainText("Replaced".into()));
    assert_eq!(cell.classes, vec!["background-light"]);

    // Reordering changes the outcome when coordinates collide
    records.swap(1, 4);
    let reordered = compose(&resolve(records), None);
    assert!(matches!(reordered.cell(1, 2).unwrap().content, CellContent::Destination(_)));
}

#[test]
fn empty_input_renders_single_empty_cell() {
    let frag = compose(&resolve(Vec::new()), Some("00:00:00"));
    assert_eq!(frag.row_count(), 1);
    assert_eq!(frag.column_count(), 1);
    assert!(frag.cell(0, 0).unwrap().is_empty());

    let doc = Html::parse_document(&render_document(&[], None));
    let cells = select(&doc, "table td");
    assert_eq!(cells.len(), 1);
    assert!(cells[0].value().attr("class").is_none());
    assert_eq!(cells[0].inner_html(), "");
}

#[test]
fn emphasized_and_plain_destinations_differ_structurally() {
    let mut emphasized = CellRecord::new(0, 0, DESTINATION_KIND, "Central");
    emphasized.emphasized = true;
    let plain = CellRecord::new(0, 0, DESTINATION_KIND, "Central");

    let frag = compose(&resolve(vec![emphasized]), Some("07:45:10"));
    match &frag.cell(0, 0).unwrap().content {
        CellContent::Destination(d) => {
            assert_eq!(d.text, "Central");
            assert!(d.time_marker.is_some());
            assert_eq!(d.schedule, Schedule::Merged);
        }
        other => panic!("unexpected content: {:?}", other),
    }

    let frag = compose(&resolve(vec![plain]), Some("07:45:10"));
    match &frag.cell(0, 0).unwrap().content {
        CellContent::Destination(d) => {
            assert!(d.time_marker.is_none());
            assert!(matches!(d.schedule, Schedule::Slots { .. }));
        }
        other => panic!("unexpected content: {:?}", other),
    }
}

#[test]
fn document_has_dense_table_inside_canvas() {
    let doc = Html::parse_document(&render_document(&sample_records(), Some("12:34:56")));

    assert_eq!(select(&doc, "#root > table").len(), 1);
    let rows = select(&doc, "table tr");
    assert_eq!(rows.len(), 5);
    let td = Selector::parse("td").unwrap();
    assert!(rows.iter().all(|r| r.select(&td).count() == 4));

    let header = select(&doc, "td.background-dark.border-bottom");
    assert_eq!(header.len(), 1);
    assert_eq!(header[0].value().attr("class"), Some("background-dark border-bottom"));
    assert_eq!(header[0].text().collect::<String>().trim(), "S4");
}

#[test]
fn document_encodes_destination_branches() {
    let doc = Html::parse_document(&render_document(&sample_records(), Some("12:34:56")));

    let highlighted = select(&doc, ".destination.is-highlighted");
    assert_eq!(highlighted.len(), 1);
    let marker = select(&doc, ".is-highlighted .current-time");
    assert_eq!(marker[0].text().collect::<String>(), "12:34:56");
    assert!(select(&doc, ".is-highlighted .destination-time").is_empty());

    let plain = select(&doc, ".align-right .destination");
    assert_eq!(plain.len(), 1);
    assert!(select(&doc, ".align-right .current-time").is_empty());
    let slots = select(&doc, ".align-right .destination-departure, .align-right .destination-arrival");
    assert_eq!(slots.len(), 2);
    assert!(slots.iter().all(|s| s.text().collect::<String>() == "--:--"));
}
