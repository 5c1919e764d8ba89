use std::path::Path;

use serde_json::Value;

use crate::model::record::Record;
use crate::parse::parse_csv;

/// Largest accepted import payload
pub const MAX_IMPORT_BYTES: usize = 10 * 1024 * 1024;

/// Input format for an import payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Json,
}

impl ImportFormat {
    /// Pick the format from a file extension; anything but `.json` is CSV.
    pub fn from_path(path: &Path) -> ImportFormat {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ImportFormat::Json,
            _ => ImportFormat::Csv,
        }
    }
}

/// Error type for import validation. All of these are user-facing; the store
/// is never touched when one is raised.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("file too large: the maximum accepted size is 10 MiB")]
    TooLarge,
    #[error("no records found in input")]
    Empty,
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON array of flat record objects")]
    NotAnArray,
}

/// Parse an import payload into records. Enforces the size cap, the
/// empty-after-parse rejection, and the JSON array-of-objects shape.
/// Required-key validation happens in `RecordStore::replace_all`.
pub fn parse_import(text: &str, format: ImportFormat) -> Result<Vec<Record>, ImportError> {
    if text.len() > MAX_IMPORT_BYTES {
        return Err(ImportError::TooLarge);
    }

    let records = match format {
        ImportFormat::Csv => parse_csv(text),
        ImportFormat::Json => parse_json(text)?,
    };

    if records.is_empty() {
        return Err(ImportError::Empty);
    }
    Ok(records)
}

fn parse_json(text: &str) -> Result<Vec<Record>, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };
    let mut records = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(map) = item else {
            return Err(ImportError::NotAnArray);
        };
        let mut record = Record::new();
        record.fields.extend(map);
        records.push(record);
    }
    Ok(records)
}

/// The demo data set loadable without a file in hand.
pub const SAMPLE_CSV: &str = "\
ClashID,ModelA,ModelB,Category,Priority,Location,X,Y,Z,Status,AssignedTo,Notes,CreatedAt
C-0001,Structure.rvt,MEP.rvt,Structure-MEP,High,Level 02,12.3,45.6,3.5,Open,,Beam interference with duct,2025-01-15T08:00:00Z
C-0002,Architectural.rvt,MEP.rvt,Arch-MEP,Medium,Level 01,5.1,22.0,0.8,Assigned,Ahmed,Door swing conflicts with pipe,2025-01-16T12:30:00Z
C-0003,Structure.rvt,Architectural.rvt,Structure-Arch,Low,Level 03,18.7,33.2,7.2,Resolved,Sarah,Column position adjusted,2025-01-17T09:15:00Z
C-0004,MEP.rvt,MEP.rvt,MEP-MEP,High,Level 02,14.5,48.9,3.8,Open,,Pipe clash with electrical conduit,2025-01-18T14:20:00Z
C-0005,Structure.rvt,MEP.rvt,Structure-MEP,Medium,Level 04,22.1,55.3,10.5,Assigned,John,Beam depth needs verification,2025-01-19T10:45:00Z
";

/// Parse the bundled sample data
pub fn sample_records() -> Vec<Record> {
    parse_csv(SAMPLE_CSV)
}
