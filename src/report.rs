use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ExtractError;

pub const REPORT_FILE: &str = "Strava_Report.html";

/// One table cell; `None` renders empty. Cells are emitted verbatim, so rows
/// may embed links, buttons and images.
pub type Row = Vec<Option<String>>;

#[derive(Debug, Clone)]
pub struct MapFrame {
    pub id: String,
    pub src: String,
}

#[derive(Debug)]
pub struct Section {
    pub title: &'static str,
    pub tsv_stem: &'static str,
    pub headers: &'static [&'static str],
    pub rows: Vec<Row>,
    pub map_frames: Vec<MapFrame>,
}

pub fn write_report(
    dir: &Path,
    title: &str,
    sections: &[Section],
) -> Result<PathBuf, ExtractError> {
    let report_path = dir.join(REPORT_FILE);
    fs::write(&report_path, render_report(title, sections))?;
    for section in sections {
        let tsv_path = dir.join(format!("{}.tsv", section.tsv_stem));
        write_tsv(&tsv_path, section.headers, &section.rows)?;
    }
    Ok(report_path)
}

// First occurrence wins. The key skips the trailing three columns, which
// never disambiguate copies of one recording.
pub fn dedup_rows(rows: Vec<Row>) -> Vec<Row> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(rows.len());
    for row in rows {
        let key_len = row.len().saturating_sub(3);
        if seen.insert(row[..key_len].to_vec()) {
            unique.push(row);
        }
    }
    unique
}

fn render_report(title: &str, sections: &[Section]) -> String {
    let mut body = String::new();
    for section in sections {
        render_section(&mut body, section);
    }
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8"/>
<title>{title}</title>
<style>
body {{ font-family: "Segoe UI", Roboto, sans-serif; margin: 2em; color: #212529; }}
table {{ border-collapse: collapse; margin-bottom: 1em; }}
th, td {{ border: 1px solid #dee2e6; padding: 4px 10px; text-align: left; vertical-align: top; }}
th {{ background: #f8f9fa; }}
h2 {{ margin-top: 2em; }}
iframe.map {{ border: none; margin-top: 1em; }}
a.badge {{ background: #f8f9fa; border: 1px solid #dee2e6; border-radius: 4px; padding: 2px 6px; color: inherit; text-decoration: none; }}
button.btn {{ background: #f8f9fa; border: 1px solid #dee2e6; border-radius: 4px; padding: 2px 8px; cursor: pointer; }}
</style>
<script>
function openMap(id) {{
    var frame = document.getElementById(id);
    frame.hidden = !frame.hidden;
}}
</script>
</head>
<body>
<h1>{title}</h1>
{body}</body>
</html>
"#,
        title = title,
        body = body,
    )
}

fn render_section(out: &mut String, section: &Section) {
    out.push_str(&format!("<h2>{}</h2>\n", section.title));
    out.push_str("<table>\n<tr>");
    for header in section.headers {
        out.push_str(&format!("<th>{}</th>", header));
    }
    out.push_str("</tr>\n");
    for row in &section.rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str(&format!("<td>{}</td>", cell.as_deref().unwrap_or("")));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");

    if !section.map_frames.is_empty() {
        out.push_str("<h3>Strava maps</h3>\n");
        for frame in &section.map_frames {
            out.push_str(&format!(
                r#"<iframe id="{}" src="{}" width="100%" height="500" class="map" hidden></iframe>"#,
                frame.id, frame.src,
            ));
            out.push('\n');
        }
    }
}

fn write_tsv(path: &Path, headers: &[&str], rows: &[Row]) -> Result<(), ExtractError> {
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_path(path)?;
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }
    writer.flush()?;
    Ok(())
}
