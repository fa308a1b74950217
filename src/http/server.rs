//! HTTP server startup and lifecycle.
//!
//! Binds the listener up front so a taken port fails fast, serves the router
//! with peer addresses attached, and on SIGINT/SIGTERM drains in-flight
//! requests within the configured window.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum_server::Handle;

use crate::config::{ConfigError, HttpServerConfig};

use super::shutdown::{self, ShutdownSignal};

/// Server startup and shutdown errors. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to bind server to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install signal handlers: {0}")]
    Signal(std::io::Error),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Graceful shutdown did not complete within {0:?}")]
    ShutdownTimeout(Duration),
}

/// Bind the configured address and serve `app` until a shutdown signal has
/// been handled.
///
/// Returns `Ok(())` after a clean drain.
pub async fn start_server(app: Router, config: &HttpServerConfig) -> Result<(), ServerError> {
    let addr = config.socket_addr()?;
    let listener = bind(addr)?;
    let drain_timeout = Duration::from_secs(config.shutdown_timeout_seconds);

    serve(app, listener, shutdown::wait_for_signal(), drain_timeout).await
}

fn bind(addr: SocketAddr) -> Result<std::net::TcpListener, ServerError> {
    let listener =
        std::net::TcpListener::bind(addr).map_err(|source| ServerError::Bind { addr, source })?;
    listener
        .set_nonblocking(true)
        .map_err(|source| ServerError::Bind { addr, source })?;
    Ok(listener)
}

/// Serve on an already-bound listener until `signal` resolves, then drain.
pub async fn serve<S>(
    app: Router,
    listener: std::net::TcpListener,
    signal: S,
    drain_timeout: Duration,
) -> Result<(), ServerError>
where
    S: Future<Output = std::io::Result<ShutdownSignal>>,
{
    let local_addr = listener.local_addr()?;
    let handle = Handle::new();

    tracing::info!(addr = %local_addr, "Starting HTTP server");

    let server = axum_server::from_tcp(listener)
        .handle(handle.clone())
        .serve(app.into_make_service_with_connect_info::<SocketAddr>());
    tokio::pin!(server);
    tokio::pin!(signal);

    let received = tokio::select! {
        result = &mut server => {
            // The server only returns on its own when accepting fails
            result?;
            return Ok(());
        }
        received = &mut signal => received.map_err(ServerError::Signal)?,
    };

    shutdown::begin_graceful_shutdown(&handle, received, drain_timeout);

    match tokio::time::timeout(drain_timeout, server).await {
        Ok(result) => {
            result?;
            tracing::info!("Server stopped");
            Ok(())
        }
        Err(_) => {
            tracing::error!(
                connections = handle.connection_count(),
                timeout_secs = drain_timeout.as_secs(),
                "Server forced to shutdown"
            );
            Err(ServerError::ShutdownTimeout(drain_timeout))
        }
    }
}
