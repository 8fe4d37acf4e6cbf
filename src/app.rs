use std::error::Error;

use tracing::info;

use crate::infrastructure::bootstrap;
use crate::infrastructure::config::AppConfig;
use crate::interfaces::http::start_server;

/// Load configuration and data, then serve until shutdown
pub async fn run() -> Result<(), Box<dyn Error>> {
    let _ = dotenvy::dotenv();

    let config = AppConfig::load()?;
    bootstrap::init_tracing(config.debug);

    let state = bootstrap::setup(&config)?;

    let server = start_server(state, &config.host, config.port)?;
    info!(host = %config.host, port = config.port, "HTTP server started");

    server.await?;
    Ok(())
}
