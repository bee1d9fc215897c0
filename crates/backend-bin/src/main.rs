// ============================
// crates/backend-bin/src/main.rs
// ============================
//! Tokio / Axum entry-point for the Chirpy API server.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chirpy_backend_lib::{
    config::{Settings, StorageBackend},
    router,
    storage::{FlatFileStorage, MemoryStorage, Storage},
    AppState,
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "chirpy", about = "Chirpy API server")]
struct Args {
    /// TOML config file
    #[arg(long, default_value = "config/default.toml")]
    config: PathBuf,

    /// Overrides `server.port`
    #[arg(long)]
    port: Option<u16>,

    /// Log as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn serve<S: Storage>(storage: S, settings: Settings) -> Result<()> {
    let addr = settings.bind_addr()?;
    let state = Arc::new(AppState::new(storage, settings)?);
    let app = router::create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load_from(&args.config)?;
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    init_tracing(&settings.log_level, args.json_logs);
    tracing::info!(platform = ?settings.platform, backend = ?settings.storage.backend, "starting");

    match settings.storage.backend {
        StorageBackend::Memory => serve(MemoryStorage::new(), settings).await,
        StorageBackend::File => {
            let storage = FlatFileStorage::new(&settings.storage.data_dir)?;
            tracing::info!(path = %storage.path().display(), "using flat-file storage");
            serve(storage, settings).await
        },
    }
}
