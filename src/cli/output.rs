use crate::model::record::{Record, field};
use crate::ops::stats::Summary;

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn status_char(record: &Record) -> char {
    match record.status() {
        crate::model::record::Status::Open => ' ',
        crate::model::record::Status::Assigned => '>',
        crate::model::record::Status::Resolved => 'x',
    }
}

/// Format a single record as a one-line summary
pub fn format_record_line(record: &Record) -> String {
    let assignee = record.text(field::ASSIGNED_TO);
    let assignee_str = if assignee.trim().is_empty() {
        String::new()
    } else {
        format!("  @{}", assignee)
    };
    format!(
        "[{}] {}  {}  {} <-> {}  {}{}",
        status_char(record),
        record.id(),
        record.priority().label(),
        record.text(field::MODEL_A),
        record.text(field::MODEL_B),
        record.text(field::LOCATION),
        assignee_str
    )
}

/// Format the full field set of one record, in record order
pub fn format_record_detail(record: &Record) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("[{}] {}", status_char(record), record.id()));
    for (key, _) in &record.fields {
        if key == field::CLASH_ID {
            continue;
        }
        let value = record.text(key);
        if value.trim().is_empty() {
            continue;
        }
        lines.push(format!("{}: {}", key, value));
    }
    lines
}

/// Format the aggregate summary block
pub fn format_summary(summary: &Summary) -> Vec<String> {
    let avg = match summary.avg_resolution_days {
        Some(days) => format!("{}d", days),
        None => "N/A".to_string(),
    };
    vec![
        format!("Total clashes: {}", summary.total),
        format!(
            "By status: {} open, {} assigned, {} resolved",
            summary.open, summary.assigned, summary.resolved
        ),
        format!(
            "By priority: {} high, {} medium, {} low",
            summary.high, summary.medium, summary.low
        ),
        format!("Resolution rate: {}%", summary.resolution_rate),
        format!("Unassigned: {}", summary.unassigned),
        format!("Avg resolution time: {}", avg),
    ]
}

/// Format the model involvement ranking
pub fn format_involvement(pairs: &[(String, usize)]) -> Vec<String> {
    pairs
        .iter()
        .map(|(model, count)| format!("{}: {}", model, count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_csv;

    fn sample() -> Record {
        parse_csv(
            "ClashID,ModelA,ModelB,Priority,Location,Status,AssignedTo,Notes\n\
             C-0001,Structure.rvt,MEP.rvt,High,Level 2,Assigned,Maria,Duct hits beam\n",
        )
        .remove(0)
    }

    #[test]
    fn record_line_includes_models_and_assignee() {
        let line = format_record_line(&sample());
        assert_eq!(
            line,
            "[>] C-0001  High  Structure.rvt <-> MEP.rvt  Level 2  @Maria"
        );
    }

    #[test]
    fn record_detail_skips_blank_fields() {
        let mut record = sample();
        record.set_text(field::NOTES, "");
        let lines = format_record_detail(&record);
        assert_eq!(lines[0], "[>] C-0001");
        assert!(lines.iter().any(|l| l == "Location: Level 2"));
        assert!(!lines.iter().any(|l| l.starts_with("Notes:")));
    }

    #[test]
    fn summary_block_reads_cleanly() {
        let summary = Summary {
            total: 5,
            open: 2,
            assigned: 2,
            resolved: 1,
            high: 2,
            medium: 2,
            low: 1,
            resolution_rate: 20,
            unassigned: 2,
            avg_resolution_days: None,
        };
        let lines = format_summary(&summary);
        assert_eq!(lines[0], "Total clashes: 5");
        assert_eq!(lines[1], "By status: 2 open, 2 assigned, 1 resolved");
        assert_eq!(lines[5], "Avg resolution time: N/A");
    }
}
