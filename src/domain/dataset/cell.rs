// ============================================================
// CELL VALUE
// ============================================================
// Present/missing tri-state for canonical cells

use serde::{Serialize, Serializer};

/// Values treated as "no data" after trimming
const MISSING_TOKENS: [&str; 4] = ["", "nan", "None", "NaN"];

/// Text a missing cell matches against in free-text search
pub const MISSING_SEARCH_TEXT: &str = "<NA>";

/// Label used for the missing group in aggregation output
pub const UNKNOWN_LABEL: &str = "Unknown";

/// A single canonical cell: either a trimmed non-empty string or missing.
///
/// Missing is kept distinct from the empty string everywhere inside the
/// crate. Serialization is the only place it collapses to `""`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    Present(String),
    Missing,
}

impl Cell {
    /// Trim a raw value and map the missing tokens to `Cell::Missing`
    pub fn clean(raw: &str) -> Self {
        let trimmed = raw.trim();
        if MISSING_TOKENS.contains(&trimmed) {
            Cell::Missing
        } else {
            Cell::Present(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Present(value) => Some(value),
            Cell::Missing => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Cell::Present(_))
    }

    /// Rendering used by JSON rows and CSV export
    pub fn as_output(&self) -> &str {
        self.as_str().unwrap_or("")
    }

    /// Rendering used by aggregation group labels
    pub fn label(&self) -> String {
        self.as_str().unwrap_or(UNKNOWN_LABEL).to_string()
    }

    /// Text matched by the table search
    pub fn search_text(&self) -> &str {
        self.as_str().unwrap_or(MISSING_SEARCH_TEXT)
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_output())
    }
}
