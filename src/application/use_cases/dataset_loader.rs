// ============================================================
// DATASET LOADER USE CASE
// ============================================================
// Pick a backing store, normalize it, refresh the cache

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::column_normalizer::{ColumnMapping, ColumnNormalizer};
use crate::domain::dataset::{CanonicalField, CanonicalRecord, DashboardTable, RawTable};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::dataset::{
    records_to_csv_bytes, write_csv_file, CsvTableReader, SpreadsheetReader,
};

/// Which backing store produced the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Spreadsheet(PathBuf),
    Cache(PathBuf),
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Spreadsheet(path) => write!(f, "spreadsheet {}", path.display()),
            DatasetSource::Cache(path) => write!(f, "cache {}", path.display()),
        }
    }
}

/// A normalized table ready to serve
#[derive(Debug)]
pub struct LoadedDataset {
    pub source: DatasetSource,
    pub mapping: ColumnMapping,
    pub table: DashboardTable,
}

pub struct DatasetLoader {
    spreadsheet_path: PathBuf,
    cache_path: PathBuf,
    normalizer: ColumnNormalizer,
}

impl DatasetLoader {
    pub fn new(spreadsheet_path: impl Into<PathBuf>, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            spreadsheet_path: spreadsheet_path.into(),
            cache_path: cache_path.into(),
            normalizer: ColumnNormalizer::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.spreadsheet_path(), config.cache_path())
    }

    /// Raw table from the spreadsheet if present, else the cache
    pub fn load_raw(&self) -> Result<(DatasetSource, RawTable)> {
        if self.spreadsheet_path.exists() {
            let raw = SpreadsheetReader::new().read_first_sheet(&self.spreadsheet_path)?;
            return Ok((DatasetSource::Spreadsheet(self.spreadsheet_path.clone()), raw));
        }

        if self.cache_path.exists() {
            let raw = CsvTableReader::new().read_file(&self.cache_path)?;
            return Ok((DatasetSource::Cache(self.cache_path.clone()), raw));
        }

        Err(AppError::DatasetMissing(format!(
            "{} (or {})",
            self.spreadsheet_path.display(),
            self.cache_path.display()
        )))
    }

    /// Load, normalize and, when the spreadsheet was used, rewrite the cache
    pub fn load(&self) -> Result<LoadedDataset> {
        let (source, raw) = self.load_raw()?;
        info!(
            %source,
            rows = raw.row_count(),
            columns = raw.column_count(),
            "Dataset loaded"
        );

        let normalized = self.normalizer.normalize(&raw);
        for field in CanonicalField::ALL {
            match normalized.mapping.source_header(field) {
                Some(header) => info!(field = field.header(), header, "Column resolved"),
                None => warn!(field = field.header(), "No source column, field left empty"),
            }
        }
        if normalized.mapping.phones.len() > 1 {
            info!(
                candidates = normalized.mapping.phones.len(),
                "Merging phone columns"
            );
        }

        if matches!(source, DatasetSource::Spreadsheet(_)) {
            if let Err(err) = self.refresh_cache(&normalized.records) {
                warn!(
                    error = %err,
                    cache = %self.cache_path.display(),
                    "Failed to refresh dataset cache"
                );
            }
        }

        Ok(LoadedDataset {
            source,
            mapping: normalized.mapping,
            table: DashboardTable::new(normalized.records),
        })
    }

    fn refresh_cache(&self, records: &[CanonicalRecord]) -> Result<()> {
        let bytes = records_to_csv_bytes(records)?;
        write_csv_file(&self.cache_path, &bytes)?;
        info!(cache = %self.cache_path.display(), rows = records.len(), "Dataset cache refreshed");
        Ok(())
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::Cell;
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::CompressionMethod;

    const RAW_CACHE: &str = "\
Advocate Name,Owner,City,State,Mobile,Phone 2
Sharma & Co,Raj Sharma,Pune,MH,,9123456789
Iyer Legal,Anu Iyer,Chennai,TN,9444444444,
";

    #[test]
    fn test_missing_dataset_names_both_paths() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DatasetLoader::new(dir.path().join("book.xlsx"), dir.path().join("cache.csv"));

        match loader.load() {
            Err(AppError::DatasetMissing(message)) => {
                assert!(message.contains("book.xlsx"));
                assert!(message.contains("cache.csv"));
            }
            other => panic!("expected DatasetMissing, got {:?}", other.map(|d| d.source)),
        }
    }

    #[test]
    fn test_cache_only_is_loaded_and_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache.csv");
        std::fs::write(&cache, RAW_CACHE).unwrap();

        let loader = DatasetLoader::new(dir.path().join("book.xlsx"), &cache);
        let dataset = loader.load().unwrap();

        assert_eq!(dataset.source, DatasetSource::Cache(cache.clone()));
        assert_eq!(dataset.table.len(), 2);
        let first = &dataset.table.records()[0];
        assert_eq!(first.mobile_number, Cell::clean("9123456789"));
        assert_eq!(first.owner_name, Cell::clean("Raj Sharma"));
        assert_eq!(std::fs::read_to_string(&cache).unwrap(), RAW_CACHE);
    }

    fn xml_escape(value: &str) -> String {
        value
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }

    fn sheet_xml(rows: &[&[&str]]) -> String {
        let mut data = String::new();
        for (r, row) in rows.iter().enumerate() {
            data.push_str(&format!("<row r=\"{}\">", r + 1));
            for (c, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                let reference = format!("{}{}", (b'A' + c as u8) as char, r + 1);
                if value.parse::<f64>().is_ok() {
                    data.push_str(&format!("<c r=\"{}\"><v>{}</v></c>", reference, value));
                } else {
                    data.push_str(&format!(
                        "<c r=\"{}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                        reference,
                        xml_escape(value)
                    ));
                }
            }
            data.push_str("</row>");
        }
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\
             <sheetData>{}</sheetData></worksheet>",
            data
        )
    }

    // Smallest xlsx package calamine accepts: workbook, relationships and sheets
    fn write_workbook(path: &Path, sheets: &[(&str, &[&[&str]])]) {
        let mut types = String::new();
        let mut entries = String::new();
        let mut rels = String::new();
        for (i, (name, _)) in sheets.iter().enumerate() {
            let n = i + 1;
            types.push_str(&format!(
                "<Override PartName=\"/xl/worksheets/sheet{}.xml\" \
                 ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>",
                n
            ));
            entries.push_str(&format!(
                "<sheet name=\"{}\" sheetId=\"{}\" r:id=\"rId{}\"/>",
                name, n, n
            ));
            rels.push_str(&format!(
                "<Relationship Id=\"rId{}\" \
                 Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" \
                 Target=\"worksheets/sheet{}.xml\"/>",
                n, n
            ));
        }

        let mut parts = vec![
            (
                "[Content_Types].xml".to_string(),
                format!(
                    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
                     <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
                     <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
                     <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
                     <Override PartName=\"/xl/workbook.xml\" \
                     ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>\
                     {}</Types>",
                    types
                ),
            ),
            (
                "_rels/.rels".to_string(),
                "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
                 <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
                 <Relationship Id=\"rId1\" \
                 Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" \
                 Target=\"xl/workbook.xml\"/></Relationships>"
                    .to_string(),
            ),
            (
                "xl/workbook.xml".to_string(),
                format!(
                    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
                     <workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" \
                     xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">\
                     <sheets>{}</sheets></workbook>",
                    entries
                ),
            ),
            (
                "xl/_rels/workbook.xml.rels".to_string(),
                format!(
                    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
                     <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
                     {}</Relationships>",
                    rels
                ),
            ),
        ];
        for (i, (_, rows)) in sheets.iter().enumerate() {
            parts.push((format!("xl/worksheets/sheet{}.xml", i + 1), sheet_xml(rows)));
        }

        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options: FileOptions<'_, ()> =
                FileOptions::default().compression_method(CompressionMethod::Stored);
            for (name, content) in &parts {
                zip.start_file(name.as_str(), options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        std::fs::write(path, buf).unwrap();
    }

    #[test]
    fn test_first_sheet_is_loaded_and_cache_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let book = dir.path().join("book.xlsx");
        let cache = dir.path().join("cache.csv");
        std::fs::write(
            &cache,
            "Business Name,Owner Name,City,State,Mobile Number\nStale Firm,,,,\n",
        )
        .unwrap();

        let directory: &[&[&str]] = &[
            &["Advocate Name", "Owner", "City", "State", "Mobile", "Phone 2"],
            &["Sharma & Co", "Raj Sharma", "Pune", "MH", "", "9123456789"],
            &["Iyer Legal", "Anu Iyer", "Chennai", "TN", "9444444444"],
        ];
        let archive: &[&[&str]] = &[&["Advocate Name", "City"], &["Old Firm", "Delhi"]];
        write_workbook(&book, &[("Directory", directory), ("Archive", archive)]);

        let dataset = DatasetLoader::new(&book, &cache).load().unwrap();

        assert_eq!(dataset.source, DatasetSource::Spreadsheet(book.clone()));
        assert_eq!(dataset.table.len(), 2);
        let records = dataset.table.records();
        assert_eq!(records[0].business_name, Cell::clean("Sharma & Co"));
        assert_eq!(records[0].mobile_number, Cell::clean("9123456789"));
        assert_eq!(records[1].mobile_number, Cell::clean("9444444444"));
        assert_eq!(dataset.mapping.phones.len(), 2);

        assert_eq!(
            std::fs::read_to_string(&cache).unwrap(),
            "Business Name,Owner Name,City,State,Mobile Number\n\
             Sharma & Co,Raj Sharma,Pune,MH,9123456789\n\
             Iyer Legal,Anu Iyer,Chennai,TN,9444444444\n"
        );
    }

    #[test]
    fn test_unreadable_spreadsheet_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let book = dir.path().join("book.xlsx");
        let cache = dir.path().join("cache.csv");
        std::fs::write(&cache, RAW_CACHE).unwrap();
        // Present but unreadable: the loader must not silently fall back
        std::fs::write(&book, b"not a workbook").unwrap();

        let result = DatasetLoader::new(&book, &cache).load();
        assert!(matches!(result, Err(AppError::ParseError(_))));
    }

    #[test]
    fn test_refreshed_cache_normalizes_to_the_same_table() {
        let dir = tempfile::tempdir().unwrap();
        let first_cache = dir.path().join("raw.csv");
        std::fs::write(&first_cache, RAW_CACHE).unwrap();
        let loader = DatasetLoader::new(dir.path().join("book.xlsx"), &first_cache);
        let original = loader.load().unwrap();

        let second_cache = dir.path().join("canonical").join("cache.csv");
        let second = DatasetLoader::new(dir.path().join("book.xlsx"), &second_cache);
        second.refresh_cache(original.table.records()).unwrap();
        let reloaded = second.load().unwrap();

        assert_eq!(reloaded.table.records(), original.table.records());
        assert_eq!(second.cache_path(), second_cache.as_path());
    }
}
