use crate::io::slot::DataSlot;
use crate::model::record::{Record, Status, field};
use crate::model::store::{RecordStore, StoreError};
use crate::ops::history::{BoundaryError, HistoryLog};
use crate::ops::import::{ImportError, ImportFormat, parse_import};

/// Error type for a full import transaction
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Invalid(#[from] StoreError),
}

/// One editing session over the record store.
///
/// Owns the store, the history log, and the durable slot, and enforces the
/// transaction boundary: every committed mutation is mutate → history push →
/// slot save, so a bulk edit produces exactly one history entry. Nothing here
/// is a singleton; independent sessions are independent stores.
pub struct Session {
    store: RecordStore,
    history: HistoryLog,
    slot: DataSlot,
}

impl Session {
    /// Open a session against a slot. Persisted records seed the store and
    /// the initial history entry; absent, corrupt, or invalid payloads are
    /// ignored and the session starts empty.
    pub fn open(slot: DataSlot, history_limit: usize) -> Session {
        let mut store = RecordStore::new();
        let mut history = HistoryLog::with_capacity(history_limit);
        if let Some(records) = slot.load() {
            if store.replace_all(records).is_ok() && !store.is_empty() {
                history.push(store.snapshot());
            }
        }
        Session {
            store,
            history,
            slot,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[cfg(test)]
    pub(crate) fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Replace the store from an import payload. Returns the record count.
    pub fn import(&mut self, text: &str, format: ImportFormat) -> Result<usize, SessionError> {
        let records = parse_import(text, format)?;
        self.store.replace_all(records)?;
        self.commit();
        Ok(self.store.len())
    }

    /// Load records directly (the sample data path).
    pub fn load_records(&mut self, records: Vec<Record>) -> Result<usize, StoreError> {
        self.store.replace_all(records)?;
        self.commit();
        Ok(self.store.len())
    }

    /// Set the status on every record in `ids`. One history entry.
    pub fn set_status(&mut self, ids: &[String], status: Status) -> usize {
        let count = self
            .store
            .mutate_many(ids, |r| r.set_text(field::STATUS, status.label()));
        if count > 0 {
            self.commit();
        }
        count
    }

    /// Assign every record in `ids`. One history entry.
    pub fn assign(&mut self, ids: &[String], assignee: &str) -> usize {
        let count = self
            .store
            .mutate_many(ids, |r| r.set_text(field::ASSIGNED_TO, assignee));
        if count > 0 {
            self.commit();
        }
        count
    }

    /// Set one field on every record in `ids`. One history entry.
    pub fn edit_field(&mut self, ids: &[String], field_name: &str, value: &str) -> usize {
        let count = self
            .store
            .mutate_many(ids, |r| r.set_text(field_name, value));
        if count > 0 {
            self.commit();
        }
        count
    }

    /// Delete every record in `ids`. One history entry.
    pub fn delete(&mut self, ids: &[String]) -> usize {
        let count = self.store.delete_many(ids);
        if count > 0 {
            self.commit();
        }
        count
    }

    /// Step the store back one history entry.
    pub fn undo(&mut self) -> Result<(), BoundaryError> {
        let snapshot = self.history.undo()?;
        self.store.restore(snapshot);
        self.slot.save(self.store.records());
        Ok(())
    }

    /// Step the store forward one history entry.
    pub fn redo(&mut self) -> Result<(), BoundaryError> {
        let snapshot = self.history.redo()?;
        self.store.restore(snapshot);
        self.slot.save(self.store.records());
        Ok(())
    }

    /// The commit tail of every mutation: snapshot into history, then the
    /// best-effort save.
    fn commit(&mut self) {
        self.history.push(self.store.snapshot());
        self.slot.save(self.store.records());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::import::SAMPLE_CSV;
    use tempfile::TempDir;

    fn open_session(dir: &TempDir) -> Session {
        let slot = DataSlot::new(dir.path().join("data.json"));
        Session::open(slot, 50)
    }

    fn loaded_session(dir: &TempDir) -> Session {
        let mut session = open_session(dir);
        session.import(SAMPLE_CSV, ImportFormat::Csv).unwrap();
        session
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    // --- Import transaction ---

    #[test]
    fn import_seeds_store_history_and_slot() {
        let dir = TempDir::new().unwrap();
        let mut session = open_session(&dir);
        let count = session.import(SAMPLE_CSV, ImportFormat::Csv).unwrap();
        assert_eq!(count, 5);
        assert_eq!(session.history_len(), 1);
        assert!(dir.path().join("data.json").exists());
    }

    #[test]
    fn failed_import_leaves_store_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut session = loaded_session(&dir);
        let err = session.import("ClashID,Status\n,Open\n", ImportFormat::Csv);
        assert!(matches!(err, Err(SessionError::Invalid(_))));
        assert_eq!(session.store().len(), 5);
        assert_eq!(session.history_len(), 1);
    }

    // --- Bulk edits are single transactions ---

    #[test]
    fn bulk_status_update_is_one_history_entry() {
        let dir = TempDir::new().unwrap();
        let mut session = loaded_session(&dir);
        assert_eq!(session.history_len(), 1);

        let count = session.set_status(&ids(&["C-0001", "C-0004"]), Status::Resolved);
        assert_eq!(count, 2);
        assert_eq!(session.history_len(), 2);

        // Only the two selected records changed
        let store = session.store();
        assert_eq!(store.find("C-0001").unwrap().status(), Status::Resolved);
        assert_eq!(store.find("C-0004").unwrap().status(), Status::Resolved);
        assert_eq!(store.find("C-0002").unwrap().status(), Status::Assigned);
    }

    #[test]
    fn zero_effect_bulk_op_does_not_commit() {
        let dir = TempDir::new().unwrap();
        let mut session = loaded_session(&dir);
        let count = session.set_status(&ids(&["C-9999"]), Status::Resolved);
        assert_eq!(count, 0);
        assert_eq!(session.history_len(), 1);
    }

    #[test]
    fn delete_commits_once() {
        let dir = TempDir::new().unwrap();
        let mut session = loaded_session(&dir);
        let count = session.delete(&ids(&["C-0002", "C-0003"]));
        assert_eq!(count, 2);
        assert_eq!(session.store().len(), 3);
        assert_eq!(session.history_len(), 2);
    }

    // --- Undo / redo ---

    #[test]
    fn undo_restores_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut session = loaded_session(&dir);
        session.set_status(&ids(&["C-0001"]), Status::Resolved);

        session.undo().unwrap();
        assert_eq!(session.store().find("C-0001").unwrap().status(), Status::Open);

        session.redo().unwrap();
        assert_eq!(
            session.store().find("C-0001").unwrap().status(),
            Status::Resolved
        );
    }

    #[test]
    fn undo_at_boundary_is_tolerated() {
        let dir = TempDir::new().unwrap();
        let mut session = loaded_session(&dir);
        assert_eq!(session.undo(), Err(BoundaryError::NothingToUndo));
        assert_eq!(session.store().len(), 5);
    }

    #[test]
    fn new_edit_after_undo_discards_redo() {
        let dir = TempDir::new().unwrap();
        let mut session = loaded_session(&dir);
        session.set_status(&ids(&["C-0001"]), Status::Resolved);
        session.undo().unwrap();
        session.assign(&ids(&["C-0002"]), "Maria");
        assert_eq!(session.redo(), Err(BoundaryError::NothingToRedo));
    }

    #[test]
    fn later_store_edits_do_not_corrupt_history() {
        let dir = TempDir::new().unwrap();
        let mut session = loaded_session(&dir);
        session.assign(&ids(&["C-0001"]), "Maria");
        session.assign(&ids(&["C-0001"]), "Igor");
        session.undo().unwrap();
        assert_eq!(
            session.store().find("C-0001").unwrap().text(field::ASSIGNED_TO),
            "Maria"
        );
        session.undo().unwrap();
        assert_eq!(
            session.store().find("C-0001").unwrap().text(field::ASSIGNED_TO),
            ""
        );
    }

    // --- Persistence across sessions ---

    #[test]
    fn reopened_session_restores_persisted_records() {
        let dir = TempDir::new().unwrap();
        {
            let mut session = loaded_session(&dir);
            session.set_status(&ids(&["C-0001"]), Status::Resolved);
        }
        let session = open_session(&dir);
        assert_eq!(session.store().len(), 5);
        assert_eq!(
            session.store().find("C-0001").unwrap().status(),
            Status::Resolved
        );
        // Restored data is the initial history entry; nothing to undo yet
        assert!(!session.can_undo());
    }

    #[test]
    fn session_with_empty_slot_starts_empty() {
        let dir = TempDir::new().unwrap();
        let session = open_session(&dir);
        assert!(session.store().is_empty());
        assert_eq!(session.history_len(), 0);
    }

    // --- Field edits ---

    #[test]
    fn edit_field_sets_arbitrary_field() {
        let dir = TempDir::new().unwrap();
        let mut session = loaded_session(&dir);
        let count = session.edit_field(&ids(&["C-0005"]), field::NOTES, "verified on site");
        assert_eq!(count, 1);
        assert_eq!(
            session.store().find("C-0005").unwrap().text(field::NOTES),
            "verified on site"
        );
    }
}
