use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field names shared by the CSV codec, filters, and exports.
pub mod field {
    pub const CLASH_ID: &str = "ClashID";
    pub const MODEL_A: &str = "ModelA";
    pub const MODEL_B: &str = "ModelB";
    pub const CATEGORY: &str = "Category";
    pub const PRIORITY: &str = "Priority";
    pub const LOCATION: &str = "Location";
    pub const X: &str = "X";
    pub const Y: &str = "Y";
    pub const Z: &str = "Z";
    pub const STATUS: &str = "Status";
    pub const ASSIGNED_TO: &str = "AssignedTo";
    pub const NOTES: &str = "Notes";
    pub const CREATED_AT: &str = "CreatedAt";
}

/// Review status of a clash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Open,
    Assigned,
    Resolved,
}

impl Status {
    /// Parse a status value case-insensitively
    pub fn parse(s: &str) -> Option<Status> {
        match s.trim().to_lowercase().as_str() {
            "open" => Some(Status::Open),
            "assigned" => Some(Status::Assigned),
            "resolved" => Some(Status::Resolved),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::Assigned => "Assigned",
            Status::Resolved => "Resolved",
        }
    }
}

/// Priority of a clash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Parse a priority value case-insensitively
    pub fn parse(s: &str) -> Option<Priority> {
        match s.trim().to_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// A single clash record: an insertion-ordered map from field name to value.
///
/// CSV import produces string values only; JSON import may carry numbers
/// (coordinates). Key order is preserved so exports keep the record-native
/// field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Record {
    pub fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Record {
        Record {
            fields: IndexMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The value of a field rendered as text. Missing fields and nulls read
    /// as the empty string; numbers render in their JSON form.
    pub fn text(&self, key: &str) -> Cow<'_, str> {
        match self.fields.get(key) {
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(Value::Null) | None => Cow::Borrowed(""),
            Some(Value::Number(n)) => Cow::Owned(n.to_string()),
            Some(Value::Bool(b)) => Cow::Owned(b.to_string()),
            Some(other) => Cow::Owned(other.to_string()),
        }
    }

    pub fn set_text(&mut self, key: &str, value: impl Into<String>) {
        self.fields
            .insert(key.to_string(), Value::String(value.into()));
    }

    /// The unique key field (`ClashID`)
    pub fn id(&self) -> Cow<'_, str> {
        self.text(field::CLASH_ID)
    }

    /// Status for counting purposes: unset or unknown values read as Open
    pub fn status(&self) -> Status {
        Status::parse(&self.text(field::STATUS)).unwrap_or(Status::Open)
    }

    /// Priority for counting purposes: unset or unknown values read as Low
    pub fn priority(&self) -> Priority {
        Priority::parse(&self.text(field::PRIORITY)).unwrap_or(Priority::Low)
    }

    /// True when the record has no assignee (empty or whitespace-only)
    pub fn is_unassigned(&self) -> bool {
        self.text(field::ASSIGNED_TO).trim().is_empty()
    }
}
