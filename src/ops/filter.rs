use crate::model::record::{Record, field};
use crate::model::store::RecordStore;

/// The active filter criteria. Each criterion is independent and optional;
/// empty or whitespace-only values count as unset. A record matches when
/// every set criterion holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Free-text query, substring-matched across ClashID, ModelA, ModelB, Notes
    pub text: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub model: Option<String>,
    pub category: Option<String>,
    pub assignee: Option<String>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        [
            &self.text,
            &self.status,
            &self.priority,
            &self.model,
            &self.category,
            &self.assignee,
        ]
        .iter()
        .all(|c| criterion(c).is_none())
    }

    /// Evaluate the composite predicate against one record.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(want) = criterion(&self.status) {
            if !eq_fold(&record.text(field::STATUS), want) {
                return false;
            }
        }
        if let Some(want) = criterion(&self.priority) {
            if !eq_fold(&record.text(field::PRIORITY), want) {
                return false;
            }
        }
        if let Some(want) = criterion(&self.model) {
            let hits_a = eq_fold(&record.text(field::MODEL_A), want);
            let hits_b = eq_fold(&record.text(field::MODEL_B), want);
            if !hits_a && !hits_b {
                return false;
            }
        }
        if let Some(want) = criterion(&self.category) {
            if !eq_fold(&record.text(field::CATEGORY), want) {
                return false;
            }
        }
        if let Some(want) = criterion(&self.assignee) {
            if !eq_fold(&record.text(field::ASSIGNED_TO), want) {
                return false;
            }
        }
        if let Some(query) = criterion(&self.text) {
            let needle = query.to_lowercase();
            let hit = [field::CLASH_ID, field::MODEL_A, field::MODEL_B, field::NOTES]
                .iter()
                .any(|f| record.text(f).to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }

    /// The filtered view: matching records in store order.
    pub fn apply<'a>(&self, store: &'a RecordStore) -> Vec<&'a Record> {
        store.query(|r| self.matches(r))
    }
}

fn criterion(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn eq_fold(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
