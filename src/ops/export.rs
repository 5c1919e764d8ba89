use chrono::{DateTime, Utc};

use crate::model::record::{Record, field};
use crate::ops::stats::Summary;
use crate::parse::serialize_csv;

/// Fixed column order for CSV exports
pub const EXPORT_COLUMNS: [&str; 13] = [
    field::CLASH_ID,
    field::MODEL_A,
    field::MODEL_B,
    field::CATEGORY,
    field::PRIORITY,
    field::LOCATION,
    field::X,
    field::Y,
    field::Z,
    field::STATUS,
    field::ASSIGNED_TO,
    field::NOTES,
    field::CREATED_AT,
];

/// Pretty-printed JSON (2-space indent), full field set in record-native
/// key order.
pub fn to_json(records: &[Record]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

/// CSV with the fixed export column order, every cell quoted.
pub fn to_csv(records: &[Record]) -> String {
    serialize_csv(records, &EXPORT_COLUMNS)
}

/// Printable plain-text report: an aggregate header block followed by a
/// fixed-subset table of all records.
pub fn report(records: &[Record], summary: &Summary, generated: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str("Clash Detection Report\n");
    out.push_str(&format!(
        "Generated: {}\n\n",
        generated.format("%Y-%m-%d %H:%M UTC")
    ));

    out.push_str(&format!(
        "Total: {}   Open: {}   Assigned: {}   Resolved: {}\n",
        summary.total, summary.open, summary.assigned, summary.resolved
    ));
    let avg = match summary.avg_resolution_days {
        Some(days) => format!("{}d", days),
        None => "N/A".to_string(),
    };
    out.push_str(&format!(
        "Resolution rate: {}%   Unassigned: {}   Avg resolution: {}\n\n",
        summary.resolution_rate, summary.unassigned, avg
    ));

    let header = ["ClashID", "Models", "Priority", "Location", "Status", "Assigned To"];
    let rows: Vec<[String; 6]> = records
        .iter()
        .map(|r| {
            let assignee = r.text(field::ASSIGNED_TO);
            [
                r.id().into_owned(),
                format!("{} <-> {}", r.text(field::MODEL_A), r.text(field::MODEL_B)),
                r.priority().label().to_string(),
                r.text(field::LOCATION).into_owned(),
                r.status().label().to_string(),
                if assignee.trim().is_empty() {
                    "-".to_string()
                } else {
                    assignee.into_owned()
                },
            ]
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let format_row = |cells: &[&str]| -> String {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            line.push_str(&format!("{:<width$}", cell, width = widths[i]));
        }
        line.trim_end().to_string()
    };

    out.push_str(&format_row(&header));
    out.push('\n');
    let rules: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule_cells: Vec<&str> = rules.iter().map(String::as_str).collect();
    out.push_str(&format_row(&rule_cells));
    out.push('\n');
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&format_row(&cells));
        out.push('\n');
    }
    out
}
