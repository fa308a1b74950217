//! Resource requests and limits injected by the orchestrator.
//!
//! Values are opaque strings such as `"500m"` or `"256Mi"`; no unit parsing.

use serde::Serialize;

use super::env_or_empty;
use crate::config::{ENV_CPU_LIMIT, ENV_CPU_REQUEST, ENV_MEM_LIMIT, ENV_MEM_REQUEST};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceInfo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cpu_request: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cpu_limit: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mem_request: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mem_limit: String,
}

impl ResourceInfo {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        Self {
            cpu_request: lookup(ENV_CPU_REQUEST),
            cpu_limit: lookup(ENV_CPU_LIMIT),
            mem_request: lookup(ENV_MEM_REQUEST),
            mem_limit: lookup(ENV_MEM_LIMIT),
        }
    }
}

pub fn collect_resource_info() -> ResourceInfo {
    ResourceInfo::from_lookup(env_or_empty)
}
