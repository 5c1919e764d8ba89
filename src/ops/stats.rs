use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::model::record::{Priority, Record, Status, field};
use crate::model::store::RecordStore;

/// Summary counts and KPIs derived from the full record store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub open: usize,
    pub assigned: usize,
    pub resolved: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    /// resolved/total as a rounded percent; 0 for an empty store
    pub resolution_rate: u32,
    pub unassigned: usize,
    /// Mean age in days of resolved records with a parseable CreatedAt;
    /// None when there are no such records or the mean rounds to 0
    pub avg_resolution_days: Option<i64>,
}

/// Compute the summary against the current wall clock.
pub fn summarize(store: &RecordStore) -> Summary {
    summarize_at(store, Utc::now())
}

/// Compute the summary with an explicit "now" (deterministic for tests).
pub fn summarize_at(store: &RecordStore, now: DateTime<Utc>) -> Summary {
    let records = store.records();
    let total = records.len();

    let mut open = 0;
    let mut assigned = 0;
    let mut resolved = 0;
    let mut high = 0;
    let mut medium = 0;
    let mut low = 0;
    let mut unassigned = 0;

    for record in records {
        match record.status() {
            Status::Open => open += 1,
            Status::Assigned => assigned += 1,
            Status::Resolved => resolved += 1,
        }
        match record.priority() {
            Priority::High => high += 1,
            Priority::Medium => medium += 1,
            Priority::Low => low += 1,
        }
        if record.is_unassigned() {
            unassigned += 1;
        }
    }

    let resolution_rate = if total > 0 {
        ((resolved as f64 / total as f64) * 100.0).round() as u32
    } else {
        0
    };

    Summary {
        total,
        open,
        assigned,
        resolved,
        high,
        medium,
        low,
        resolution_rate,
        unassigned,
        avg_resolution_days: avg_resolution_days(records, now),
    }
}

/// Mean of per-record rounded ages, itself rounded.
fn avg_resolution_days(records: &[Record], now: DateTime<Utc>) -> Option<i64> {
    let mut total_days = 0i64;
    let mut count = 0i64;
    for record in records {
        if record.status() != Status::Resolved {
            continue;
        }
        let Some(created) = parse_timestamp(&record.text(field::CREATED_AT)) else {
            continue;
        };
        let days = ((now - created).num_seconds() as f64 / 86_400.0).round() as i64;
        total_days += days;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    let avg = (total_days as f64 / count as f64).round() as i64;
    (avg > 0).then_some(avg)
}

/// Accept RFC 3339 timestamps or bare dates; anything else is unparseable.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

/// Per-model clash involvement over ModelA and ModelB (blank models count as
/// "Unknown"): top 6 by count, name-ascending on ties. The chart-ready series
/// for the model breakdown.
pub fn model_involvement(store: &RecordStore) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut bump = |name: String| {
        match counts.iter_mut().find(|(n, _)| *n == name) {
            Some((_, c)) => *c += 1,
            None => counts.push((name, 1)),
        }
    };
    for record in store.records() {
        for key in [field::MODEL_A, field::MODEL_B] {
            let model = record.text(key);
            let name = if model.trim().is_empty() {
                "Unknown".to_string()
            } else {
                model.into_owned()
            };
            bump(name);
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts.truncate(6);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_csv;
    use pretty_assertions::assert_eq;

    fn store_from(csv: &str) -> RecordStore {
        let mut store = RecordStore::new();
        store.replace_all(parse_csv(csv)).unwrap();
        store
    }

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-02-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    // --- Status and priority buckets ---

    #[test]
    fn buckets_apply_defaults() {
        let store = store_from(
            "\
ClashID,Status,Priority
C-0001,Open,High
C-0002,,
C-0003,weird,strange
C-0004,Resolved,Medium
",
        );
        let s = summarize_at(&store, fixed_now());
        assert_eq!(s.total, 4);
        // Unset/unknown status counts as Open
        assert_eq!(s.open, 3);
        assert_eq!(s.assigned, 0);
        assert_eq!(s.resolved, 1);
        // Unset/unknown priority counts as Low
        assert_eq!((s.high, s.medium, s.low), (1, 1, 2));
    }

    // --- Resolution rate ---

    #[test]
    fn empty_store_rate_is_zero() {
        let store = RecordStore::new();
        let s = summarize_at(&store, fixed_now());
        assert_eq!(s.total, 0);
        assert_eq!(s.resolution_rate, 0);
    }

    #[test]
    fn three_of_four_resolved_is_75_percent() {
        let store = store_from(
            "\
ClashID,Status
C-0001,Resolved
C-0002,Resolved
C-0003,Resolved
C-0004,Open
",
        );
        let s = summarize_at(&store, fixed_now());
        assert_eq!(s.resolution_rate, 75);
    }

    // --- Unassigned ---

    #[test]
    fn unassigned_counts_blank_and_whitespace() {
        let store = store_from(
            "\
ClashID,AssignedTo
C-0001,
C-0002,Ahmed
C-0003,
",
        );
        let s = summarize_at(&store, fixed_now());
        assert_eq!(s.unassigned, 2);
    }

    // --- Average resolution age ---

    #[test]
    fn avg_age_over_parseable_resolved_records() {
        // 16 days and 10 days before the fixed now → mean 13
        let store = store_from(
            "\
ClashID,Status,CreatedAt
C-0001,Resolved,2025-01-16T00:00:00Z
C-0002,Resolved,2025-01-22T00:00:00Z
C-0003,Open,2024-01-01T00:00:00Z
",
        );
        let s = summarize_at(&store, fixed_now());
        assert_eq!(s.avg_resolution_days, Some(13));
    }

    #[test]
    fn avg_age_skips_unparseable_created_at() {
        let store = store_from(
            "\
ClashID,Status,CreatedAt
C-0001,Resolved,not-a-date
C-0002,Resolved,2025-01-22T00:00:00Z
",
        );
        let s = summarize_at(&store, fixed_now());
        assert_eq!(s.avg_resolution_days, Some(10));
    }

    #[test]
    fn avg_age_none_without_resolved_records() {
        let store = store_from("ClashID,Status,CreatedAt\nC-0001,Open,2025-01-01T00:00:00Z\n");
        let s = summarize_at(&store, fixed_now());
        assert_eq!(s.avg_resolution_days, None);
    }

    #[test]
    fn avg_age_none_when_mean_rounds_to_zero() {
        let store = store_from(
            "ClashID,Status,CreatedAt\nC-0001,Resolved,2025-02-01T00:00:00Z\n",
        );
        let s = summarize_at(&store, fixed_now());
        assert_eq!(s.avg_resolution_days, None);
    }

    #[test]
    fn bare_dates_are_parseable() {
        let store = store_from("ClashID,Status,CreatedAt\nC-0001,Resolved,2025-01-22\n");
        let s = summarize_at(&store, fixed_now());
        assert_eq!(s.avg_resolution_days, Some(10));
    }

    // --- Model involvement ---

    #[test]
    fn model_involvement_counts_both_sides() {
        let store = store_from(
            "\
ClashID,ModelA,ModelB
C-0001,Structure.rvt,MEP.rvt
C-0002,MEP.rvt,MEP.rvt
C-0003,Structure.rvt,
",
        );
        let series = model_involvement(&store);
        assert_eq!(
            series,
            vec![
                ("MEP.rvt".to_string(), 3),
                ("Structure.rvt".to_string(), 2),
                ("Unknown".to_string(), 1),
            ]
        );
    }

    #[test]
    fn model_involvement_is_capped_at_six() {
        let mut csv = String::from("ClashID,ModelA,ModelB\n");
        for i in 0..8 {
            csv.push_str(&format!("C-{i:04},M{i}.rvt,M{i}.rvt\n"));
        }
        let store = store_from(&csv);
        assert_eq!(model_involvement(&store).len(), 6);
    }
}
