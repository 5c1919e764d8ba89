use crate::model::record::Record;

/// Default bound on retained snapshots
pub const MAX_HISTORY: usize = 50;

/// A full, independent copy of the record store at one point in time
pub type Snapshot = Vec<Record>;

/// Error type for undo/redo at the ends of the log. These are tolerated
/// no-ops for callers, never failures.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoundaryError {
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
}

/// Bounded linear undo/redo log of record-store snapshots.
///
/// The cursor always points at the entry matching the live store. Pushing
/// while the cursor is behind the tail discards the abandoned future; pushing
/// past the bound evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: Vec<Snapshot>,
    cursor: usize,
    capacity: usize,
}

impl Default for HistoryLog {
    fn default() -> HistoryLog {
        HistoryLog::new()
    }
}

impl HistoryLog {
    pub fn new() -> HistoryLog {
        HistoryLog::with_capacity(MAX_HISTORY)
    }

    /// A log bounded to `capacity` entries (minimum 1)
    pub fn with_capacity(capacity: usize) -> HistoryLog {
        HistoryLog {
            entries: Vec::new(),
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.cursor + 1 < self.entries.len()
    }

    /// The entry the cursor points at, if any
    pub fn current(&self) -> Option<&[Record]> {
        self.entries.get(self.cursor).map(Vec::as_slice)
    }

    /// Record a new snapshot as the current entry.
    pub fn push(&mut self, snapshot: Snapshot) {
        if !self.entries.is_empty() && self.cursor + 1 < self.entries.len() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(snapshot);
        if self.entries.len() > self.capacity {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one entry and return a deep copy of it.
    pub fn undo(&mut self) -> Result<Snapshot, BoundaryError> {
        if self.cursor == 0 || self.entries.is_empty() {
            return Err(BoundaryError::NothingToUndo);
        }
        self.cursor -= 1;
        Ok(self.entries[self.cursor].clone())
    }

    /// Step forward one entry and return a deep copy of it.
    pub fn redo(&mut self) -> Result<Snapshot, BoundaryError> {
        if self.entries.is_empty() || self.cursor + 1 >= self.entries.len() {
            return Err(BoundaryError::NothingToRedo);
        }
        self.cursor += 1;
        Ok(self.entries[self.cursor].clone())
    }
}
