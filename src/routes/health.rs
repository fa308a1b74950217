//! Liveness and readiness endpoints for container orchestration.
//!
//! Both are unconditional: the process is alive and ready as soon as it can
//! answer HTTP at all. No dependency checks.

use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::middleware::ProbeResponse;

/// Liveness probe: `{"status":"ok"}`.
pub async fn healthz() -> (Extension<ProbeResponse>, Json<Value>) {
    (Extension(ProbeResponse), Json(json!({ "status": "ok" })))
}

/// Readiness probe: `{"status":"ready"}`.
pub async fn readyz() -> (Extension<ProbeResponse>, Json<Value>) {
    (Extension(ProbeResponse), Json(json!({ "status": "ready" })))
}
