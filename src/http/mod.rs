//! HTTP server module.
//!
//! The server includes:
//! - Fail-fast binding of the listen address
//! - Peer address propagation for `/whoami`
//! - Graceful shutdown on SIGTERM/SIGINT with a bounded drain window

mod server;
mod shutdown;

pub use server::{serve, start_server, ServerError};
pub use shutdown::{wait_for_signal, ShutdownSignal};
