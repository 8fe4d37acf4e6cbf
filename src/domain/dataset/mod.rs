// ============================================================
// DATASET DOMAIN LAYER
// ============================================================
// Core types for the advocate directory table
// No I/O, no async

mod aliases;
mod canonical;
mod cell;
mod raw_table;
mod table;

pub use aliases::FIELD_ALIASES;
pub use canonical::{CanonicalField, CanonicalRecord};
pub use cell::{Cell, MISSING_SEARCH_TEXT, UNKNOWN_LABEL};
pub use raw_table::RawTable;
pub use table::DashboardTable;
