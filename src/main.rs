//! gaea-whoami: a diagnostic HTTP service.
//!
//! This is the application entry point. It initializes tracing, loads
//! configuration, captures the build identity, sets up the Axum router and
//! serves it until SIGINT/SIGTERM has been handled.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gaea_whoami::collect::BuildInfo;
use gaea_whoami::config::{AppConfig, DEFAULT_LOG_FILTER};
use gaea_whoami::http::start_server;
use gaea_whoami::{create_router, AppState};

/// gaea-whoami: reports pod, build and configuration identity over HTTP
#[derive(Parser, Debug)]
#[command(name = "gaea-whoami", version, about)]
struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (e.g., "gaea_whoami=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Configuration is loaded before tracing so the log format is known;
    // errors here go to stderr through main's return.
    let config = AppConfig::resolve(args.config.as_deref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    let filter = tracing_subscriber::EnvFilter::new(&log_filter);

    if config.logging.is_json() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let build = BuildInfo::from_env();
    let version = build.version_info();
    tracing::info!(
        version = %version.version,
        git_commit = %version.git_commit,
        build_time = %version.build_time,
        "Starting gaea-whoami"
    );
    tracing::info!(
        configmap_dir = %config.configmap.dir.display(),
        shutdown_timeout_secs = config.http.shutdown_timeout_seconds,
        "Loaded configuration"
    );

    let http_config = config.http.clone();
    let app = create_router(AppState::new(config, build));

    if let Err(e) = start_server(app, &http_config).await {
        tracing::error!(error = %e, "Server failed");
        return Err(e.into());
    }

    Ok(())
}
