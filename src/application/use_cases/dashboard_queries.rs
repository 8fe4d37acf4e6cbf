// ============================================================
// DASHBOARD QUERIES USE CASE
// ============================================================
// Read-only aggregations over the in-memory table

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::Serialize;

use crate::domain::dataset::{CanonicalField, CanonicalRecord, Cell, DashboardTable};

pub const DEFAULT_TOP_STATES: usize = 12;
pub const DEFAULT_TOP_CITIES: usize = 20;
pub const DEFAULT_PHONE_STATES: usize = 12;
pub const DEFAULT_HEATMAP_STATES: usize = 10;
pub const DEFAULT_HEATMAP_CITIES: usize = 15;
pub const DEFAULT_PAGE_LENGTH: usize = 25;

/// Headline numbers for the dashboard cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_records: usize,
    pub unique_states: usize,
    pub unique_cities: usize,
    pub unique_owners: usize,
    pub phones_present: usize,
    pub phones_missing: usize,
    pub potential_duplicates: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateCount {
    #[serde(rename = "State")]
    pub state: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityCount {
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "City")]
    pub city: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhoneCoverage {
    #[serde(rename = "State")]
    pub state: String,
    pub with_phone: usize,
    pub total: usize,
    pub rate: f64,
}

/// Dense City x State count matrix; `z[city][state]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub states: Vec<String>,
    pub cities: Vec<String>,
    pub z: Vec<Vec<usize>>,
}

/// One page of the searchable table
#[derive(Debug, Clone, Serialize)]
pub struct TablePage<'a> {
    #[serde(rename = "recordsTotal")]
    pub records_total: usize,
    #[serde(rename = "recordsFiltered")]
    pub records_filtered: usize,
    pub data: Vec<&'a CanonicalRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw: Option<u64>,
}

/// Stateless query functions over a borrowed table
pub struct DashboardQueries<'a> {
    table: &'a DashboardTable,
}

impl<'a> DashboardQueries<'a> {
    pub fn new(table: &'a DashboardTable) -> Self {
        Self { table }
    }

    fn records(&self) -> &'a [CanonicalRecord] {
        self.table.records()
    }

    pub fn summary(&self) -> Summary {
        let total_records = self.table.len();
        let phones_present = self.records().iter().filter(|r| r.has_phone()).count();

        Summary {
            total_records,
            unique_states: self.distinct(CanonicalField::State),
            unique_cities: self.distinct(CanonicalField::City),
            unique_owners: self.distinct(CanonicalField::OwnerName),
            phones_present,
            phones_missing: total_records - phones_present,
            potential_duplicates: self.table.duplicate_count(),
        }
    }

    /// Row counts per State, largest first, at most `limit`
    pub fn top_states(&self, limit: usize) -> Vec<StateCount> {
        let mut groups = self.state_groups();
        groups.truncate(limit);
        groups
    }

    /// Row counts per (State, City) pair, largest first, at most `limit`
    pub fn top_cities(&self, limit: usize) -> Vec<CityCount> {
        count_groups(self.records().iter().map(|r| (&r.state, &r.city)))
            .into_iter()
            .take(limit)
            .map(|((state, city), count)| CityCount {
                state: state.label(),
                city: city.label(),
                count,
            })
            .collect()
    }

    /// Phone coverage per State, ordered by total rows, at most `limit`
    pub fn phones_by_state(&self, limit: usize) -> Vec<PhoneCoverage> {
        let mut index: HashMap<&Cell, usize> = HashMap::new();
        let mut groups: Vec<(&Cell, usize, usize)> = Vec::new();

        for record in self.records() {
            let slot = *index.entry(&record.state).or_insert_with(|| {
                groups.push((&record.state, 0, 0));
                groups.len() - 1
            });
            groups[slot].2 += 1;
            if record.has_phone() {
                groups[slot].1 += 1;
            }
        }

        groups.sort_by(|a, b| b.2.cmp(&a.2));
        groups
            .into_iter()
            .take(limit)
            .map(|(state, with_phone, total)| PhoneCoverage {
                state: state.label(),
                with_phone,
                total,
                rate: if total == 0 {
                    0.0
                } else {
                    with_phone as f64 / total as f64
                },
            })
            .collect()
    }

    /// Every State group, untruncated
    pub fn state_distribution(&self) -> Vec<StateCount> {
        self.state_groups()
    }

    /// Counts for the top `state_limit` states and, within them, the top
    /// `city_limit` cities. Rows outside either selection are ignored.
    pub fn state_city_heatmap(&self, state_limit: usize, city_limit: usize) -> Heatmap {
        let mut states: Vec<&Cell> = count_groups(self.records().iter().map(|r| &r.state))
            .into_iter()
            .map(|(state, _)| state)
            .collect();
        states.truncate(state_limit);
        let state_slots: HashMap<&Cell, usize> =
            states.iter().enumerate().map(|(j, s)| (*s, j)).collect();

        let mut cities: Vec<&Cell> = count_groups(
            self.records()
                .iter()
                .filter(|r| state_slots.contains_key(&r.state))
                .map(|r| &r.city),
        )
        .into_iter()
        .map(|(city, _)| city)
        .collect();
        cities.truncate(city_limit);
        let city_slots: HashMap<&Cell, usize> =
            cities.iter().enumerate().map(|(i, c)| (*c, i)).collect();

        let mut z = vec![vec![0usize; states.len()]; cities.len()];
        for record in self.records() {
            if let (Some(&i), Some(&j)) =
                (city_slots.get(&record.city), state_slots.get(&record.state))
            {
                z[i][j] += 1;
            }
        }

        Heatmap {
            states: states.iter().map(|s| s.label()).collect(),
            cities: cities.iter().map(|c| c.label()).collect(),
            z,
        }
    }

    /// Case-insensitive search over all five fields, then an offset/length
    /// window in original row order
    pub fn table_page(&self, search: &str, start: usize, length: usize) -> TablePage<'a> {
        let needle = search.trim().to_lowercase();

        let filtered: Vec<&'a CanonicalRecord> = if needle.is_empty() {
            self.records().iter().collect()
        } else {
            self.records()
                .iter()
                .filter(|record| {
                    record
                        .cells()
                        .iter()
                        .any(|cell| cell.search_text().to_lowercase().contains(&needle))
                })
                .collect()
        };

        TablePage {
            records_total: self.table.len(),
            records_filtered: filtered.len(),
            data: filtered.into_iter().skip(start).take(length).collect(),
            draw: None,
        }
    }

    /// Number of distinct present values in a column
    fn distinct(&self, field: CanonicalField) -> usize {
        self.records()
            .iter()
            .filter_map(|record| record.get(field).as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    fn state_groups(&self) -> Vec<StateCount> {
        count_groups(self.records().iter().map(|r| &r.state))
            .into_iter()
            .map(|(state, count)| StateCount {
                state: state.label(),
                count,
            })
            .collect()
    }
}

/// Count keys in first-encounter order, then stable-sort by count descending
fn count_groups<K: Eq + Hash + Copy>(keys: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, usize)> = Vec::new();

    for key in keys {
        match index.get(&key) {
            Some(&slot) => groups[slot].1 += 1,
            None => {
                index.insert(key, groups.len());
                groups.push((key, 1));
            }
        }
    }

    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups
}
