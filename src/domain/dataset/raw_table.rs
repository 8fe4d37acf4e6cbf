// ============================================================
// RAW TABLE
// ============================================================
// Rows x named columns as read from a backing store, schema unknown

use std::collections::HashSet;

/// Source table before normalization.
///
/// Every row has exactly one value per header; absent cells are empty
/// strings. Header names are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table, making headers unique and squaring up ragged rows
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers = unique_headers(headers);
        let width = headers.len();

        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Cell text, empty when out of range
    pub fn value(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|values| values.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Blank headers become `Unnamed: <index>`, repeats get `.1`, `.2`, ...
fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();

    headers
        .into_iter()
        .enumerate()
        .map(|(index, header)| {
            let base = if header.trim().is_empty() {
                format!("Unnamed: {}", index)
            } else {
                header
            };

            let mut candidate = base.clone();
            let mut suffix = 1;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{}.{}", base, suffix);
                suffix += 1;
            }
            candidate
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_ragged_rows_are_padded_and_truncated() {
        let table = RawTable::new(
            strings(&["a", "b", "c"]),
            vec![strings(&["1"]), strings(&["1", "2", "3", "4"])],
        );

        assert_eq!(table.rows()[0], strings(&["1", "", ""]));
        assert_eq!(table.rows()[1], strings(&["1", "2", "3"]));
    }

    #[test]
    fn test_duplicate_and_blank_headers() {
        let table = RawTable::new(strings(&["Phone", "", "Phone", "Phone"]), Vec::new());
        assert_eq!(
            table.headers(),
            strings(&["Phone", "Unnamed: 1", "Phone.1", "Phone.2"]).as_slice()
        );
    }

    #[test]
    fn test_value_out_of_range_is_empty() {
        let table = RawTable::new(strings(&["a"]), vec![strings(&["x"])]);
        assert_eq!(table.value(0, 0), "x");
        assert_eq!(table.value(0, 3), "");
        assert_eq!(table.value(5, 0), "");
    }
}
