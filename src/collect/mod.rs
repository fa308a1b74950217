//! Introspection collectors.
//!
//! Each collector takes a snapshot of one slice of process state (build
//! identity, pod metadata, environment, mounted ConfigMap files, resource
//! limits, per-request HTTP metadata) and returns a serializable value.
//!
//! Collectors never fail: a missing environment variable becomes an empty
//! string, a missing directory becomes an empty map. Inputs are injected
//! (environment lookups, directory roots, address providers) so every
//! collector can be exercised without touching real process state.

pub mod configmap;
pub mod environment;
pub mod net;
pub mod pod;
pub mod request;
pub mod resources;
pub mod version;

pub use configmap::{collect_configmaps, ConfigMapInfo, ConfigMapScan};
pub use environment::{collect_environment, EnvironmentInfo};
pub use net::{LocalAddressProvider, SystemAddressProvider};
pub use pod::{collect_pod_info, PodInfo};
pub use request::{collect_request_detail, WhoAmIDetailResponse};
pub use resources::{collect_resource_info, ResourceInfo};
pub use version::{BuildInfo, VersionInfo};

use chrono::{SecondsFormat, Utc};

/// Look up an environment variable, treating absent and non-UTF-8 values as empty.
pub(crate) fn env_or_empty(key: &str) -> String {
    std::env::var(key).unwrap_or_default()
}

/// Current UTC time as RFC 3339 with second precision, e.g. `2026-10-18T09:30:00Z`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// OS hostname, or an empty string when the lookup fails.
pub fn hostname_or_empty() -> String {
    match hostname::get() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(e) => {
            tracing::debug!(error = %e, "Hostname lookup failed");
            String::new()
        }
    }
}
