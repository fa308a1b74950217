//! Pod identity from hostname and downward-API environment variables.

use serde::Serialize;

use super::{env_or_empty, hostname_or_empty};
use crate::config::{ENV_HOST_IP, ENV_POD_IP, ENV_POD_NAMESPACE};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PodInfo {
    pub hostname: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pod_ip: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host_ip: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

impl PodInfo {
    pub fn from_lookup<F>(hostname: String, lookup: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        Self {
            hostname,
            pod_ip: lookup(ENV_POD_IP),
            host_ip: lookup(ENV_HOST_IP),
            namespace: lookup(ENV_POD_NAMESPACE),
        }
    }
}

/// Snapshot of the pod identity of this process.
pub fn collect_pod_info() -> PodInfo {
    PodInfo::from_lookup(hostname_or_empty(), env_or_empty)
}
