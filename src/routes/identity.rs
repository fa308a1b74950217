//! Handlers for the process identity views: the aggregate root document,
//! build version, reported environment, and ConfigMap files.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::instrument;

use crate::collect::{
    collect_configmaps, collect_environment, collect_pod_info, collect_resource_info,
    timestamp_now, ConfigMapInfo, EnvironmentInfo, PodInfo, ResourceInfo, VersionInfo,
};
use crate::state::AppState;

/// Response body for `/`.
#[derive(Debug, Clone, Serialize)]
pub struct WhoAmIResponse {
    pub version: VersionInfo,
    pub pod: PodInfo,
    pub environment: EnvironmentInfo,
    pub configmaps: ConfigMapInfo,
    pub resources: ResourceInfo,
    pub timestamp: String,
}

/// Everything this process knows about itself, in one document.
#[instrument(name = "identity::index", skip_all)]
pub async fn index(State(state): State<AppState>) -> Json<WhoAmIResponse> {
    let configmaps = collect_configmaps(&state.config.configmap.dir).await;

    Json(WhoAmIResponse {
        version: state.build.version_info().clone(),
        pod: collect_pod_info(),
        environment: collect_environment(),
        configmaps,
        resources: collect_resource_info(),
        timestamp: timestamp_now(),
    })
}

pub async fn version(State(state): State<AppState>) -> Json<VersionInfo> {
    Json(state.build.version_info().clone())
}

pub async fn envs() -> Json<EnvironmentInfo> {
    Json(collect_environment())
}

#[instrument(name = "identity::configmaps", skip_all)]
pub async fn configmaps(State(state): State<AppState>) -> Json<ConfigMapInfo> {
    let info = collect_configmaps(&state.config.configmap.dir).await;
    tracing::debug!(count = info.count, "Collected ConfigMap files");
    Json(info)
}
