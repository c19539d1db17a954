use cs_config::Config;
use cs_fleet::FleetManager;
use cs_fleet::FleetSettings;
use cs_fleet::toolchain::Toolchains;
use cs_server::{LockFile, ServerError, ServerErrorResult, logger};

use std::panic::Location;

use error_location::ErrorLocation;
use log::{error, info};

#[tokio::main]
async fn main() -> ServerErrorResult<()> {
    // Load and validate configuration
    let config = Config::load()?;
    config.validate()?;

    logger::initialize(
        config.logging.level,
        config.log_file_path()?,
        config.logging.colored,
    )?;

    info!("Starting crankshaft v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let settings = FleetSettings::from_config(&config)?;
    std::fs::create_dir_all(&settings.base_path)
        .map_err(|e| cs_core::CoreError::io(&settings.base_path, e))?;

    let mut lock = LockFile::acquire(&settings.base_path)?;
    info!("Lock acquired at {}", lock.path().display());

    let client = reqwest::Client::builder()
        .user_agent(concat!("crankshaft/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|source| ServerError::HttpClient {
            source,
            location: ErrorLocation::from(Location::caller()),
        })?;

    let manager = FleetManager::new(settings, Toolchains::http(client));
    manager.init().await?;

    let servers = manager.get_all().await;
    info!("Fleet ready with {} server(s)", servers.len());

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
    }

    info!("Shutdown signal received, stopping fleet");
    manager.shutdown().await;
    lock.release();

    info!("Server shutdown complete");
    Ok(())
}
