//! Per-request detail view: what this request looked like from the pod.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    Json,
};
use tracing::instrument;

use crate::collect::request::RequestParts;
use crate::collect::{collect_request_detail, WhoAmIDetailResponse};
use crate::state::AppState;

/// Headers, client address resolution and local addresses for this request.
///
/// Requires the router to be served with `SocketAddr` connect info.
#[instrument(name = "whoami::detail", skip_all)]
pub async fn detail(
    State(state): State<AppState>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    request: Request,
) -> Json<WhoAmIDetailResponse> {
    let parts = RequestParts {
        method: request.method(),
        uri: request.uri(),
        version: request.version(),
        headers: request.headers(),
        remote_addr,
    };

    let detail = collect_request_detail(parts, state.addresses.as_ref());
    tracing::debug!(
        remote = %remote_addr,
        client_ip = %detail.client_ip,
        pod_ip = %detail.pod_ip,
        "Resolved request addresses"
    );
    Json(detail)
}
