//! Graceful shutdown and signal handling.
//!
//! SIGINT (Ctrl+C) and SIGTERM both start a graceful shutdown: stop
//! accepting, let in-flight requests finish, and give up once the drain
//! window has elapsed.

use std::fmt;
use std::io;
use std::time::Duration;

use axum_server::Handle;

/// Which signal asked the process to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownSignal::Interrupt => f.write_str("SIGINT"),
            ShutdownSignal::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// Install the SIGINT and SIGTERM handlers and wait for either.
///
/// Installation failures are returned instead of panicking so startup can
/// report them as fatal.
#[cfg(unix)]
pub async fn wait_for_signal() -> io::Result<ShutdownSignal> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = interrupt.recv() => Ok(ShutdownSignal::Interrupt),
        _ = terminate.recv() => Ok(ShutdownSignal::Terminate),
    }
}

#[cfg(not(unix))]
pub async fn wait_for_signal() -> io::Result<ShutdownSignal> {
    tokio::signal::ctrl_c().await?;
    Ok(ShutdownSignal::Interrupt)
}

/// Stop accepting connections and start draining.
///
/// The drain itself is unbounded here; the caller enforces `drain_timeout`
/// so that overrunning it can be reported as a failure.
pub fn begin_graceful_shutdown(handle: &Handle, signal: ShutdownSignal, drain_timeout: Duration) {
    tracing::info!(%signal, "Received shutdown signal, initiating graceful shutdown");

    handle.graceful_shutdown(None);
    tracing::info!(
        connections = handle.connection_count(),
        timeout_secs = drain_timeout.as_secs(),
        "Graceful shutdown initiated, waiting for connections to close"
    );
}
