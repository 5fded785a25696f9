mod config;
mod store;
mod store_manager;
mod lifecycle;
mod scanner;
mod api;

use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use anyhow::{Context, Result};
use crate::config::Config;
use crate::store::{db::AssetDb, seed};
use crate::store_manager::StoreHandle;

const DEFAULT_CONFIG_PATH: &str = "/etc/asset-track/assetd.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("asset_trackd=info"))
        )
        .init();

    tracing::info!("Starting asset-trackd");

    let config = load_config(std::env::args().nth(1))?;

    if config.uses_default_secret() {
        tracing::warn!("Session secret is the built-in default; set ASSETD_SECRET_KEY");
    }

    // Open SQLite database
    let db = AssetDb::open(&config.store.db_path)?;
    tracing::info!("Opened database at {:?}", config.store.db_path);

    if let Some(seed_path) = &config.store.seed_path {
        let records = seed::load(seed_path)?;
        let added = seed::import(&db, &records)?;
        tracing::info!("Imported {} of {} seed records from {:?}", added, records.len(), seed_path);
    }
    tracing::info!("Store holds {} assets", db.count()?);

    // Start store thread
    let store = StoreHandle::spawn(db);

    // Create cancellation token for graceful shutdown
    let cancel = CancellationToken::new();

    let app_state = api::routes::AppState {
        store: store.clone(),
        key: api::flash::signing_key(&config.session.secret),
        config: Arc::new(config.clone()),
        shutdown: cancel.clone(),
        camera: Arc::new(scanner::open_camera),
    };
    let app = api::routes::router(app_state);

    // Bind HTTP server
    let listener = tokio::net::TcpListener::bind(&config.api.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", config.api.listen))?;

    tracing::info!("Listening on {}", config.api.listen);

    // Run server with graceful shutdown
    let server_cancel = cancel.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_cancel.cancelled().await })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("Shutdown signal received");

    // Stops the server and any live camera scans
    cancel.cancel();

    let _ = server_handle.await;

    if let Err(e) = store.shutdown().await {
        tracing::error!("Failed to shutdown store: {}", e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Explicit path must exist; the default path is optional
fn load_config(arg: Option<String>) -> Result<Config> {
    let mut config = match arg {
        Some(path) => {
            let config = Config::load(&path)
                .with_context(|| format!("Failed to load config from {}", path))?;
            tracing::info!("Loaded config from {}", path);
            config
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            let config = Config::load(DEFAULT_CONFIG_PATH)?;
            tracing::info!("Loaded config from {}", DEFAULT_CONFIG_PATH);
            config
        }
        None => {
            tracing::info!("No config file at {}, using defaults", DEFAULT_CONFIG_PATH);
            Config::default()
        }
    };

    config.apply_env_overrides();
    Ok(config)
}
