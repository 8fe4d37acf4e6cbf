// ============================================================
// CANONICAL SCHEMA
// ============================================================
// The fixed five-field record every source row is mapped into

use serde::Serialize;

use super::{Cell, FIELD_ALIASES};

/// One of the five canonical columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    BusinessName,
    OwnerName,
    City,
    State,
    MobileNumber,
}

impl CanonicalField {
    /// All fields in output column order
    pub const ALL: [CanonicalField; 5] = [
        CanonicalField::BusinessName,
        CanonicalField::OwnerName,
        CanonicalField::City,
        CanonicalField::State,
        CanonicalField::MobileNumber,
    ];

    /// Column header used in JSON rows and CSV files
    pub fn header(self) -> &'static str {
        match self {
            CanonicalField::BusinessName => "Business Name",
            CanonicalField::OwnerName => "Owner Name",
            CanonicalField::City => "City",
            CanonicalField::State => "State",
            CanonicalField::MobileNumber => "Mobile Number",
        }
    }

    pub fn aliases(self) -> &'static [&'static str] {
        FIELD_ALIASES
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, aliases)| *aliases)
            .unwrap_or(&[])
    }

    pub fn headers() -> [&'static str; 5] {
        Self::ALL.map(CanonicalField::header)
    }
}

/// A normalized row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalRecord {
    #[serde(rename = "Business Name")]
    pub business_name: Cell,

    #[serde(rename = "Owner Name")]
    pub owner_name: Cell,

    #[serde(rename = "City")]
    pub city: Cell,

    #[serde(rename = "State")]
    pub state: Cell,

    #[serde(rename = "Mobile Number")]
    pub mobile_number: Cell,
}

impl CanonicalRecord {
    pub fn get(&self, field: CanonicalField) -> &Cell {
        match field {
            CanonicalField::BusinessName => &self.business_name,
            CanonicalField::OwnerName => &self.owner_name,
            CanonicalField::City => &self.city,
            CanonicalField::State => &self.state,
            CanonicalField::MobileNumber => &self.mobile_number,
        }
    }

    /// Cells in canonical column order
    pub fn cells(&self) -> [&Cell; 5] {
        CanonicalField::ALL.map(|field| self.get(field))
    }

    pub fn has_phone(&self) -> bool {
        self.mobile_number.is_present()
    }
}
