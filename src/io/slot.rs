use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::record::Record;

#[derive(Debug, thiserror::Error)]
enum SlotError {
    #[error("could not serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not persist temp file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// The single durable slot holding the persisted record store.
///
/// One JSON blob at a fixed path, written after every committed mutation and
/// read once at session start. No version field, no migration logic.
#[derive(Debug, Clone)]
pub struct DataSlot {
    path: PathBuf,
}

impl DataSlot {
    pub fn new(path: impl Into<PathBuf>) -> DataSlot {
        DataSlot { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Best-effort save: any failure is logged as a warning and swallowed.
    /// Never raises to the caller.
    pub fn save(&self, records: &[Record]) {
        if let Err(e) = self.try_save(records) {
            eprintln!("warning: could not save {}: {}", self.path.display(), e);
        }
    }

    fn try_save(&self, records: &[Record]) -> Result<(), SlotError> {
        let json = serde_json::to_string(records)?;
        let dir = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(&self.path)?;
        Ok(())
    }

    /// Read the slot. An absent or corrupt payload reads as `None`.
    pub fn load(&self) -> Option<Vec<Record>> {
        let text = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&text).ok()
    }
}
