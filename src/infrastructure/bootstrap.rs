use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::DatasetLoader;
use crate::domain::error::Result;
use crate::infrastructure::config::AppConfig;
use crate::interfaces::http::HttpState;

/// Install the global fmt subscriber; `RUST_LOG` overrides the default level
pub fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Build the immutable request state. Fails when no dataset can be loaded.
pub fn setup(config: &AppConfig) -> Result<HttpState> {
    let loader = DatasetLoader::from_config(config);

    let dataset = loader.load().map_err(|err| {
        error!(error = %err, "Failed to load dataset, refusing to serve");
        err
    })?;

    info!(
        source = %dataset.source,
        rows = dataset.table.len(),
        duplicates = dataset.table.duplicate_count(),
        "Dashboard table ready"
    );

    Ok(HttpState {
        table: Arc::new(dataset.table),
        export_path: config.export_path(),
    })
}
