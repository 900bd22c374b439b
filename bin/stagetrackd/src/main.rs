//! `stagetrackd` — the stagetrack server binary.
//!
//! Usage:
//!   stagetrackd -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/stagetrack/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use stagetrack_core::Module;
use tracing::info;

use config::ServerConfig;

/// Stagetrack server.
#[derive(Parser, Debug)]
#[command(name = "stagetrackd", about = "Production-stage inventory tracker")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides the config file).
    #[arg(long = "listen")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    // Verify configuration is valid.
    bootstrap::verify_config(&server_config)?;

    let listen = cli
        .listen
        .or(server_config.listen.clone())
        .unwrap_or_else(|| "0.0.0.0:8080".to_string());

    // Initialize storage.
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = stagetrack_core::ServiceConfig {
        data_dir: Some(data_dir.clone()),
        db_path: server_config.storage.db_path.clone().map(Into::into),
        listen: listen.clone(),
    };

    // Embedded store: redb DB layer under a read-only file layer
    // populated from the data dir's YAML configuration.
    let db = stagetrack_kv::RedbStore::open(&core_config.resolve_db_path())
        .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?;
    let overlay = stagetrack_kv::OverlayKV::new(db);
    let loaded = stagetrack_kv::FileLoader::load(&data_dir, &overlay)
        .map_err(|e| anyhow::anyhow!("failed to load config files: {}", e))?;
    bootstrap::report_config_entries(loaded);

    let kv: Arc<dyn stagetrack_kv::KVStore> = Arc::new(overlay);

    // Initialize modules.
    let inventory_module =
        inventory::InventoryModule::new(inventory::service::InventoryService::new(kv));
    info!("Inventory module initialized");

    let module_routes = vec![(inventory_module.name(), inventory_module.routes())];

    // Build router.
    let app = routes::build_router(module_routes);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&listen).await?;
    info!("stagetrackd listening on {}", listen);
    axum::serve(listener, app).await?;

    Ok(())
}
