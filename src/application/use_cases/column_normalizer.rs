// ============================================================
// COLUMN NORMALIZER USE CASE
// ============================================================
// Map arbitrary source headers onto the canonical schema and clean cells

use crate::domain::dataset::{CanonicalField, CanonicalRecord, Cell, RawTable};

/// A raw column chosen for a canonical field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub index: usize,
    pub header: String,
}

/// Which raw columns feed each canonical field.
///
/// `business_name` is the effective source after falling back to the owner
/// column and then the first raw column. `owner_name` is `None` when owner
/// values are copied from Business Name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    pub business_name: Option<ResolvedColumn>,
    pub owner_name: Option<ResolvedColumn>,
    pub city: Option<ResolvedColumn>,
    pub state: Option<ResolvedColumn>,
    /// Phone-like columns in merge order; the first is primary
    pub phones: Vec<ResolvedColumn>,
}

impl ColumnMapping {
    /// Header feeding `field`, for logging
    pub fn source_header(&self, field: CanonicalField) -> Option<&str> {
        let column = match field {
            CanonicalField::BusinessName => self.business_name.as_ref(),
            CanonicalField::OwnerName => self
                .owner_name
                .as_ref()
                .or(self.business_name.as_ref()),
            CanonicalField::City => self.city.as_ref(),
            CanonicalField::State => self.state.as_ref(),
            CanonicalField::MobileNumber => self.phones.first(),
        };
        column.map(|c| c.header.as_str())
    }
}

/// Output of a normalization pass
#[derive(Debug, Clone, Default)]
pub struct NormalizedTable {
    pub mapping: ColumnMapping,
    pub records: Vec<CanonicalRecord>,
}

/// Alias-driven header resolution and row cleaning
#[derive(Debug, Default)]
pub struct ColumnNormalizer;

impl ColumnNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Resolve columns for every canonical field
    pub fn resolve(&self, headers: &[String]) -> ColumnMapping {
        let lowered = lowered_headers(headers);

        let business = pick(&lowered, CanonicalField::BusinessName.aliases());
        let owner = pick(&lowered, CanonicalField::OwnerName.aliases());

        let business_name = business
            .or_else(|| owner.clone())
            .or_else(|| lowered.first().map(|(_, column)| column.clone()));

        ColumnMapping {
            business_name,
            owner_name: owner,
            city: pick(&lowered, CanonicalField::City.aliases()),
            state: pick(&lowered, CanonicalField::State.aliases()),
            phones: pick_all(&lowered, CanonicalField::MobileNumber.aliases()),
        }
    }

    /// Map a raw table onto the five canonical fields
    pub fn normalize(&self, raw: &RawTable) -> NormalizedTable {
        let mapping = self.resolve(raw.headers());

        let records = (0..raw.row_count())
            .map(|row| {
                let column_cell = |column: &Option<ResolvedColumn>| match column {
                    Some(column) => Cell::clean(raw.value(row, column.index)),
                    None => Cell::Missing,
                };

                let business_name = column_cell(&mapping.business_name);
                let owner_name = match mapping.owner_name {
                    Some(_) => column_cell(&mapping.owner_name),
                    None => business_name.clone(),
                };

                CanonicalRecord {
                    business_name,
                    owner_name,
                    city: column_cell(&mapping.city),
                    state: column_cell(&mapping.state),
                    mobile_number: merge_phone(raw, row, &mapping.phones),
                }
            })
            .collect();

        NormalizedTable { mapping, records }
    }
}

/// (lowercased trimmed header, column) in raw column order
fn lowered_headers(headers: &[String]) -> Vec<(String, ResolvedColumn)> {
    headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            (
                header.trim().to_lowercase(),
                ResolvedColumn {
                    index,
                    header: header.clone(),
                },
            )
        })
        .collect()
}

/// First alias with any containing header wins; leftmost header within it
fn pick(lowered: &[(String, ResolvedColumn)], aliases: &[&str]) -> Option<ResolvedColumn> {
    aliases.iter().find_map(|alias| {
        lowered
            .iter()
            .find(|(low, _)| low.contains(alias))
            .map(|(_, column)| column.clone())
    })
}

/// Every header matching any alias, in alias priority order, deduplicated
fn pick_all(lowered: &[(String, ResolvedColumn)], aliases: &[&str]) -> Vec<ResolvedColumn> {
    let mut found: Vec<ResolvedColumn> = Vec::new();
    for alias in aliases {
        for (low, column) in lowered {
            if low.contains(alias) && !found.iter().any(|c| c.index == column.index) {
                found.push(column.clone());
            }
        }
    }
    found
}

fn is_blank_phone(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "" | "nan" | "none")
}

/// Primary phone value, with blanks filled from later candidates in order
fn merge_phone(raw: &RawTable, row: usize, candidates: &[ResolvedColumn]) -> Cell {
    let mut values = candidates.iter().map(|column| raw.value(row, column.index));

    let Some(mut merged) = values.next() else {
        return Cell::Missing;
    };
    for value in values {
        if !is_blank_phone(merged) {
            break;
        }
        merged = value;
    }
    Cell::clean(merged)
}
