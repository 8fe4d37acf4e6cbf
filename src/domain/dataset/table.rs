// ============================================================
// DASHBOARD TABLE
// ============================================================
// The normalized dataset, built once and read by every request

use std::collections::HashMap;

use super::{CanonicalRecord, Cell};

/// Immutable canonical table plus the derived duplicate flags.
///
/// A row is a duplicate when another row has the same Business Name, City
/// and State (missing equals missing).
#[derive(Debug, Clone, Default)]
pub struct DashboardTable {
    records: Vec<CanonicalRecord>,
    duplicates: Vec<bool>,
}

impl DashboardTable {
    pub fn new(records: Vec<CanonicalRecord>) -> Self {
        let duplicates = flag_duplicates(&records);
        Self {
            records,
            duplicates,
        }
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_duplicate(&self, index: usize) -> bool {
        self.duplicates.get(index).copied().unwrap_or(false)
    }

    pub fn duplicate_count(&self) -> usize {
        self.duplicates.iter().filter(|flag| **flag).count()
    }
}

fn flag_duplicates(records: &[CanonicalRecord]) -> Vec<bool> {
    let mut counts: HashMap<(&Cell, &Cell, &Cell), usize> = HashMap::new();
    for record in records {
        *counts
            .entry((&record.business_name, &record.city, &record.state))
            .or_insert(0) += 1;
    }

    records
        .iter()
        .map(|record| counts[&(&record.business_name, &record.city, &record.state)] > 1)
        .collect()
}
