//! HTML serialization of a composed fragment.
//!
//! Emits one standalone document: a fixed 1200x820 `#root` canvas wrapping
//! the grid `table`, with the departure-board stylesheet inlined.

use crate::rendering::layout::{CellContent, CellFragment, Destination, DocumentFragment, Schedule};
use std::fmt::Write;

/// Canvas size of the `#root` element
pub const CANVAS_WIDTH: u32 = 1200;
pub const CANVAS_HEIGHT: u32 = 820;

const STYLESHEET: &str = r#"
        body {
            font-family: Monospace;
            background-color: #ddd;
            overflow: hidden;
            filter: grayscale(100%);
        }

        #root {
            width: 1200px;
            height: 820px;
            position: relative;
        }

        table {
            border-collapse: collapse;
            width: 100%;
            height: 429px;
            position: relative;
            z-index: 9999;
        }

        td {
            height: 35px;
            text-align: left;
            vertical-align: bottom;
        }

        .background-white { background-color: white; }
        .background-light { background-color: #eee; }
        .background-dark { background-color: #ddd; }

        .border-left { border-left: 2px solid black; }
        .border-bottom { border-bottom: 2px solid black; }

        .destination {
            display: flex;
            flex-direction: column;
            justify-content: center;
            padding-left: .25rem;
        }

        .destination.is-highlighted {
            padding: 0;
            margin: 0;
            display: block;
        }

        .destination-text { font-size: 1rem; }

        .destination.is-highlighted .destination-text {
            font-weight: bold;
            background: black;
            color: white;
            display: inline-block;
            padding: .2rem .5rem;
            font-size: 1.3rem;
        }

        .destination-time {
            margin-top: 5px;
            display: flex;
            align-items: center;
        }

        .current-time {
            font-size: .8rem;
            color: #666;
        }

        .destination-departure,
        .destination-arrival {
            font-size: .8rem;
            color: #555;
        }

        .align-right .destination {
            align-items: flex-end;
            padding-right: .2rem;
        }

        .destination-arrival {
            margin-left: .2rem;
            border: 1px dotted black;
            color: black;
            padding: .2rem;
            border-radius: 5px;
        }
"#;

/// Serialize the fragment into a complete HTML document
pub fn render_html(fragment: &DocumentFragment) -> String {
    let mut table = String::new();
    for row in &fragment.rows {
        table.push_str("        <tr>\n");
        for cell in &row.cells {
            table.push_str("            ");
            write_cell(&mut table, cell);
            table.push('\n');
        }
        table.push_str("        </tr>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Train Map</title>
    <style>{STYLESHEET}    </style>
</head>
<body>
<div id="root">
    <table>
{table}    </table>
</div>
</body>
</html>
"#
    )
}

fn write_cell(out: &mut String, cell: &CellFragment) {
    if cell.is_empty() {
        out.push_str("<td></td>");
        return;
    }

    if cell.classes.is_empty() {
        out.push_str("<td>");
    } else {
        let _ = write!(out, r#"<td class="{}">"#, escape_html(&cell.class_list()));
    }

    match &cell.content {
        CellContent::Empty => {}
        CellContent::PlainText(text) => out.push_str(&escape_html(text)),
        CellContent::Destination(dest) => write_destination(out, dest),
    }

    out.push_str("</td>");
}

fn write_destination(out: &mut String, dest: &Destination) {
    if dest.emphasized {
        out.push_str(r#"<div class="destination is-highlighted">"#);
    } else {
        out.push_str(r#"<div class="destination">"#);
    }

    if let Some(marker) = &dest.time_marker {
        let _ = write!(out, r#"<div class="current-time">{}</div>"#, escape_html(marker));
    }

    let _ = write!(out, r#"<div class="destination-text">{}</div>"#, escape_html(&dest.text));

    if let Schedule::Slots { departure, arrival } = &dest.schedule {
        let _ = write!(
            out,
            r#"<div class="destination-time"><div class="destination-departure">{}</div><div class="destination-arrival">{}</div></div>"#,
            escape_html(departure),
            escape_html(arrival)
        );
    }

    out.push_str("</div>");
}

/// Escape HTML special characters
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
