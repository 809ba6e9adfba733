//! gigbook-web - booking directory HTTP service
//!
//! Opens the entity store once at startup, hands it to every handler through
//! `AppState`, and closes it after the server shuts down.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use gigbook_common::config::{CliOverrides, ServerConfig, TomlConfig};
use gigbook_common::db::init_database;
use gigbook_web::{build_router, AppState};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for gigbook-web
#[derive(Parser, Debug)]
#[command(name = "gigbook-web")]
#[command(about = "Venue, artist and show booking directory")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "GIGBOOK_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(short, long, env = "GIGBOOK_BIND")]
    bind: Option<String>,

    /// Root folder holding gigbook.db (GIGBOOK_ROOT_FOLDER is also honored)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Database file, overriding <root folder>/gigbook.db
    #[arg(short, long, env = "GIGBOOK_DATABASE")]
    database: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, env = "GIGBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            root_folder: self.root_folder.clone(),
            database: self.database.clone(),
            bind_address: self.bind.clone(),
            port: self.port,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load config file")?;
    let config = ServerConfig::resolve(&args.overrides(), &toml)?;

    init_tracing(&config.log_level, config.log_file.as_deref())?;

    // Build identification first, before any database work
    info!(
        "Starting gigbook-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Root folder: {}", config.root_folder.display());
    info!("Database path: {}", config.database_path.display());

    let pool = init_database(&config.database_path)
        .await
        .context("Failed to open database")?;

    let app = build_router(AppState::new(pool.clone()));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("gigbook-web listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Console logging, plus an append-only log file when configured
fn init_tracing(level: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "gigbook_web={level},gigbook_common={level},tower_http={level}",
            level = level
        ))
    });

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
