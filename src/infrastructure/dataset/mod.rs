// ============================================================
// DATASET INFRASTRUCTURE LAYER
// ============================================================
// Backing store readers (spreadsheet, flat CSV) and the CSV writer

mod csv_export;
mod csv_source;
mod xlsx_source;

pub use csv_export::{records_to_csv_bytes, write_csv_file};
pub use csv_source::CsvTableReader;
pub use xlsx_source::SpreadsheetReader;
