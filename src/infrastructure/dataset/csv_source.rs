// ============================================================
// CSV SOURCE
// ============================================================
// Read a flat delimited table with encoding fallback

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::domain::dataset::RawTable;
use crate::domain::error::{AppError, Result};

/// Reader for the flat-table cache
#[derive(Debug, Default)]
pub struct CsvTableReader;

impl CsvTableReader {
    pub fn new() -> Self {
        Self
    }

    /// Read a CSV file into a raw table
    pub fn read_file(&self, path: &Path) -> Result<RawTable> {
        let content = read_with_encoding_detection(path)?;
        self.parse_content(&content)
    }

    /// Parse CSV content; the first record is the header row
    pub fn parse_content(&self, content: &str) -> Result<RawTable> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(RawTable::new(headers, rows))
    }
}

/// UTF-8 first, Windows-1252 otherwise
fn read_with_encoding_detection(path: &Path) -> Result<String> {
    let mut file = File::open(path)
        .map_err(|e| AppError::IoError(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)
        .map_err(|e| AppError::IoError(format!("Failed to read {}: {}", path.display(), e)))?;

    let bytes = buffer.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&buffer);
    match std::str::from_utf8(bytes) {
        Ok(content) => Ok(content.to_string()),
        Err(_) => {
            debug!(path = %path.display(), "CSV is not UTF-8, decoding as Windows-1252");
            let (content, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            Ok(content.into_owned())
        }
    }
}
