pub mod column_normalizer;
pub mod dashboard_queries;
pub mod dataset_loader;
