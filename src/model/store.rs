use std::collections::HashSet;

use crate::model::record::{Record, field};

/// Error type for store-level validation
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record {index}: missing required field {}", field::CLASH_ID)]
    MissingKey { index: usize },
}

/// The ordered set of clash records currently loaded.
///
/// Insertion order is import order and is preserved by every operation.
/// Duplicate `ClashID` values are kept as separate rows; bulk operations
/// apply to every record bearing a selected id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new() -> RecordStore {
        RecordStore {
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replace the whole store. Every incoming record must carry a non-empty
    /// `ClashID`; on failure the store is left unchanged.
    pub fn replace_all(&mut self, records: Vec<Record>) -> Result<(), StoreError> {
        for (index, record) in records.iter().enumerate() {
            if record.id().trim().is_empty() {
                return Err(StoreError::MissingKey { index });
            }
        }
        self.records = records;
        Ok(())
    }

    /// Unvalidated wholesale swap — the undo/redo path, where the snapshot
    /// was already valid when it was taken.
    pub fn restore(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    /// Deep copy of the current record set (a history snapshot)
    pub fn snapshot(&self) -> Vec<Record> {
        self.records.clone()
    }

    /// Stateless read: matching records in store order
    pub fn query<P>(&self, predicate: P) -> Vec<&Record>
    where
        P: Fn(&Record) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).collect()
    }

    /// First record with the given id (first match among duplicates)
    pub fn find(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Apply `f` to every record whose id is in `ids`. Unknown ids are
    /// silently skipped. Returns the number of records mutated.
    pub fn mutate_many<F>(&mut self, ids: &[String], mut f: F) -> usize
    where
        F: FnMut(&mut Record),
    {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let mut count = 0;
        for record in &mut self.records {
            if wanted.contains(record.id().as_ref()) {
                f(record);
                count += 1;
            }
        }
        count
    }

    /// Remove every record whose id is in `ids`, preserving the order of the
    /// remaining records. Returns the number removed.
    pub fn delete_many(&mut self, ids: &[String]) -> usize {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let before = self.records.len();
        self.records.retain(|r| !wanted.contains(r.id().as_ref()));
        before - self.records.len()
    }
}
