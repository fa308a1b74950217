//! gaea-whoami - a diagnostic HTTP service for container clusters.
//!
//! Reports the build version, pod and network identity, `GAEA`-prefixed
//! environment variables, mounted ConfigMap files and resource limits of the
//! running process as JSON, to verify service discovery, load balancing and
//! configuration propagation.

pub mod collect;
pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
