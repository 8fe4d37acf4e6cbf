pub mod error;

// Advocate directory dataset model
pub mod dataset;
