//! Helix Server Binary
//!
//! Serves paginated clinical collections over HTTP.
//!
//! @version 0.1.0
//! @author Helix Development Team

use clap::Parser;
use helix_server::{create_router, AppState, ServerConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::signal;

#[derive(Parser)]
#[command(name = "helix-server")]
#[command(about = "Helix Cohort Browser API Server")]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of `<collection>.json` files to load at startup
    #[arg(short, long)]
    data_dir: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    let addr: SocketAddr = config.socket_addr();

    if config.paging.uses_development_secret() {
        tracing::warn!(
            "Using the built-in development cursor secret; set HELIX_CURSOR_SECRET in production"
        );
    }

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize server state: {}", e);
            std::process::exit(2);
        }
    };

    if let Some(ref data_dir) = state.config.data_dir {
        match state.load_data_dir(Path::new(data_dir)) {
            Ok(count) => tracing::info!("Loaded {} documents from {}", count, data_dir),
            Err(e) => {
                tracing::error!("Failed to load data directory {}: {}", data_dir, e);
                std::process::exit(1);
            }
        }
    } else {
        tracing::warn!("No data directory specified, serving empty collections");
    }

    tracing::info!("Starting Helix Server on {}", addr);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Helix Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Defaults, then the config file, then environment, then flags.
fn load_config(args: &Args) -> Result<ServerConfig, helix_common::HelixError> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    }
    .with_env_overrides()?;

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.data_dir.is_some() {
        config = config.with_data_dir(args.data_dir.clone());
    }

    config.validate()?;
    Ok(config)
}

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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining in-flight requests");
}
