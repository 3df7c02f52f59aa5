//! moodly-fr (Feedback Review) - read-only reviewer feedback service
//!
//! Serves normalized reviewer feedback, board statistics and per-item
//! feedback from moodly.db to the board owner's dashboard.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use moodly_common::config::{RootFolderInitializer, RootFolderResolver, ServiceSettings, TomlConfig};
use moodly_fr::{build_router, AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "moodly-fr", version, about = "Moodly feedback review service")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "MOODLY_FR_PORT")]
    port: Option<u16>,

    /// Root folder containing moodly.db
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Config file (defaults to ~/.config/moodly/config.toml, then /etc/moodly/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serve demo reviewers for boards without feedback
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing starts because it carries the log level
    let config_load = TomlConfig::load_from(args.config.as_deref());
    let config = config_load.as_ref().ok().cloned().flatten();
    let mut settings = ServiceSettings::resolve(config.as_ref(), args.port);
    settings.demo_mode |= args.demo;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .init();

    info!(
        "Starting Moodly Feedback Review (moodly-fr) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if let Err(e) = &config_load {
        warn!("Ignoring config file: {}", e);
    }

    let root_folder = RootFolderResolver::new("feedback-review")
        .with_cli_arg(args.root_folder)
        .with_config(config)
        .resolve();

    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = match moodly_fr::db::connect_readonly(&db_path).await {
        Ok(pool) => {
            info!("Connected to database (read-only)");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e);
        }
    };

    if settings.demo_mode {
        info!("Demo mode: boards without feedback serve generated reviewers");
    }

    let state = AppState::new(pool, settings.profile_cache_ttl, settings.demo_mode);
    let app = build_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], settings.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("moodly-fr listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("moodly-fr stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
