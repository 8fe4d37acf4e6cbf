// ============================================================
// CSV EXPORT
// ============================================================
// Serialize the canonical table as a delimited file with a header row

use std::fs;
use std::path::Path;

use csv::WriterBuilder;

use crate::domain::dataset::{CanonicalField, CanonicalRecord};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::storage::ensure_parent_dir;

/// Canonical header row followed by one line per record, missing as empty
pub fn records_to_csv_bytes(records: &[CanonicalRecord]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer
        .write_record(CanonicalField::headers())
        .map_err(|e| AppError::Internal(format!("Failed to write CSV header: {}", e)))?;

    for record in records {
        writer
            .serialize(record)
            .map_err(|e| AppError::Internal(format!("Failed to write CSV row: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to flush CSV: {}", e)))
}

/// Overwrite `path` with the given bytes, creating parent directories
pub fn write_csv_file(path: &Path, bytes: &[u8]) -> Result<()> {
    ensure_parent_dir(path).map_err(|e| {
        AppError::IoError(format!("Failed to create directory for {}: {}", path.display(), e))
    })?;
    fs::write(path, bytes)
        .map_err(|e| AppError::IoError(format!("Failed to write {}: {}", path.display(), e)))
}
