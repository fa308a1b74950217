//! Shared application state for request handlers.

use std::sync::Arc;

use crate::collect::{BuildInfo, LocalAddressProvider, SystemAddressProvider};
use crate::config::AppConfig;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Everything here is read-only after startup: the configuration, the build
/// identity, and the interface address source used by `/whoami`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub build: Arc<BuildInfo>,
    pub addresses: Arc<dyn LocalAddressProvider>,
}

impl AppState {
    /// Creates application state that enumerates the host's real interfaces.
    pub fn new(config: AppConfig, build: BuildInfo) -> Self {
        Self::with_address_provider(config, build, Arc::new(SystemAddressProvider))
    }

    pub fn with_address_provider(
        config: AppConfig,
        build: BuildInfo,
        addresses: Arc<dyn LocalAddressProvider>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            build: Arc::new(build),
            addresses,
        }
    }
}
