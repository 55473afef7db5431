//! # meteobridged: Meteobridge SQL bridge daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise logging from the configured filter
//! - Check the sensor catalog against the reading fields
//! - Open the `SQLite` config entry store and run migrations
//! - Build the entry manager on top of the `MySQL` data source
//! - Set up persisted entries and import configured stations
//! - Build the axum router and serve it
//! - Unload every entry on graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use meteobridge_adapter_http_axum::state::AppState;
use meteobridge_adapter_mysql_sqlx::MySqlDataSourceFactory;
use meteobridge_adapter_storage_sqlite_sqlx::{
    Config as StoreConfig, SqliteConfigEntryRepository,
};
use meteobridge_app::entry_manager::EntryManager;
use meteobridge_app::error::FlowError;
use meteobridge_app::ports::{ConfigEntryRepository, DataSourceFactory};
use meteobridge_domain::connection::ConnectionConfig;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    meteobridge_domain::sensor::validate_catalog()?;

    // Store
    let db = StoreConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let repo = SqliteConfigEntryRepository::new(db.pool().clone());

    // Entries
    let manager = EntryManager::new(
        repo,
        MySqlDataSourceFactory::default(),
        config.integration.variant,
    );
    let loaded = manager.load_all().await?;
    tracing::info!(entries = loaded, "persisted entries set up");
    import_stations(&manager, std::mem::take(&mut config.stations)).await;

    // HTTP
    let app = meteobridge_adapter_http_axum::router::build(AppState::new(manager.clone()));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "meteobridged listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    manager.shutdown().await;
    db.close().await;
    tracing::info!("meteobridged stopped");
    Ok(())
}

/// Run the config flow for every configured station that has no entry yet.
async fn import_stations<R, F>(manager: &EntryManager<R, F>, stations: Vec<ConnectionConfig>)
where
    R: ConfigEntryRepository,
    F: DataSourceFactory,
{
    for station in stations {
        let station_mac = station.station_mac.clone();
        match manager.create_entry(station).await {
            Ok((entry, state)) => {
                tracing::info!(%station_mac, entry = %entry.id, ?state, "station imported");
            }
            Err(FlowError::AlreadyConfigured { .. }) => {
                tracing::debug!(%station_mac, "station already configured");
            }
            Err(err) => {
                tracing::warn!(%station_mac, code = err.code(), error = %err, "station import failed");
            }
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
