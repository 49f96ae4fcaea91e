//! lucky-wheel - weighted random draw service
//!
//! Serves group management, draws and the admin override editor over HTTP.
//! The animated front end (wheel, slot machine, bowl shake) is a separate set
//! of static files, optionally served from `--static-dir`.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

use lucky_common::api::{AdminAuth, SingleSlotSessionStore};
use lucky_common::config::{self, StorageBackend, TomlConfig};
use lucky_common::time::SystemClock;
use lucky_common::{store, GroupRepository};
use lucky_wheel::{build_router, AppState};

/// Command-line arguments for lucky-wheel
#[derive(Parser, Debug)]
#[command(name = "lucky-wheel")]
#[command(about = "Weighted random draw service for party groups")]
#[command(version)]
struct Args {
    /// TOML config file (default: platform config dir)
    #[arg(short, long, env = "LUCKY_WHEEL_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "LUCKY_WHEEL_PORT")]
    port: Option<u16>,

    /// Interface to bind (overrides config file)
    #[arg(long, env = "LUCKY_WHEEL_HOST")]
    host: Option<String>,

    /// Folder for store files and admin.json
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Front-end assets to serve for non-API paths
    #[arg(long, env = "LUCKY_WHEEL_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Storage backend: sqlite, json or memory (overrides config file)
    #[arg(long)]
    storage: Option<StorageBackend>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing exists so its log level can apply;
    // a missing file is reported once the subscriber is up.
    let config_path = config::resolve_config_path(args.config.as_deref());
    let config = match &config_path {
        Some(path) if path.exists() => TomlConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        _ => TomlConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!(
        "Starting Lucky Wheel (lucky-wheel) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &config_path {
        Some(path) if path.exists() => info!("Config file: {}", path.display()),
        Some(path) => warn!("Config file not found at {}, using defaults", path.display()),
        None => warn!("No config directory on this platform, using defaults"),
    }

    let data_dir = config::resolve_data_dir(args.data_dir.as_deref(), &config);
    info!("Data folder: {}", data_dir.display());

    let backend = args.storage.unwrap_or(config.storage.backend);
    let store = store::open(backend, &data_dir)
        .await
        .with_context(|| format!("Failed to open {:?} store in {}", backend, data_dir.display()))?;
    info!("✓ Opened {:?} store", backend);

    let credentials = config::load_admin_credentials(&config, &data_dir)
        .context("Failed to load admin credentials")?;
    if credentials.is_none() {
        warn!(
            "No admin credentials configured ([admin] in config or {}); admin login disabled",
            config::ADMIN_FILE
        );
    }

    let clock = Arc::new(SystemClock);
    let repo = Arc::new(GroupRepository::new(store, clock.clone()));
    let admin = Arc::new(AdminAuth::new(
        credentials,
        Arc::new(SingleSlotSessionStore::new()),
        clock,
        config.session.ttl(),
    ));

    let static_dir = args.static_dir.or(config.static_dir.clone());
    if let Some(dir) = &static_dir {
        info!("Serving front end from {}", dir.display());
    }

    let state = AppState::new(repo, admin);
    let app = build_router(state, static_dir.as_deref());

    let host = args.host.unwrap_or(config.host.clone());
    let port = args.port.unwrap_or(config.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("lucky-wheel listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
