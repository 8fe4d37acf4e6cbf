// ============================================================
// SPREADSHEET SOURCE
// ============================================================
// Read the first worksheet of a workbook into a raw table

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::debug;

use crate::domain::dataset::RawTable;
use crate::domain::error::{AppError, Result};

/// Reader for the primary spreadsheet source
#[derive(Debug, Default)]
pub struct SpreadsheetReader;

impl SpreadsheetReader {
    pub fn new() -> Self {
        Self
    }

    /// Load the first sheet; its first row supplies the headers
    pub fn read_first_sheet(&self, path: &Path) -> Result<RawTable> {
        let mut workbook = open_workbook_auto(path).map_err(|e| {
            AppError::ParseError(format!(
                "Failed to open spreadsheet {}: {}",
                path.display(),
                e
            ))
        })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| {
                AppError::ParseError(format!("No worksheet found in {}", path.display()))
            })?
            .map_err(|e| {
                AppError::ParseError(format!(
                    "Failed to read worksheet in {}: {}",
                    path.display(),
                    e
                ))
            })?;

        let table = range_to_table(&range);
        debug!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "Spreadsheet sheet read"
        );
        Ok(table)
    }
}

/// Columns before the first used cell stay in place as blanks
fn range_to_table(range: &Range<Data>) -> RawTable {
    let leading = range.start().map_or(0, |(_, column)| column as usize);
    let mut rows = range.rows().map(|row| {
        std::iter::repeat(String::new())
            .take(leading)
            .chain(row.iter().map(cell_text))
            .collect::<Vec<String>>()
    });

    let headers = rows.next().unwrap_or_default();
    RawTable::new(headers, rows.collect())
}

/// Plain text for one cell; integral numbers drop the ".0"
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(value) => value.clone(),
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", *value as i64)
        }
        other => other.to_string(),
    }
}
