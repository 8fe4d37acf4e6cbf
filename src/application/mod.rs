pub mod use_cases;

pub use use_cases::column_normalizer::{ColumnMapping, ColumnNormalizer, NormalizedTable};
pub use use_cases::dashboard_queries::DashboardQueries;
pub use use_cases::dataset_loader::{DatasetLoader, DatasetSource, LoadedDataset};
