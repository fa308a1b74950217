//! HTTP route handlers.
//!
//! Every route is an exact path answering `GET` with a JSON body and status
//! 200; collectors degrade to empty values instead of failing the request.
//! Paths outside the table get a JSON 404. Responses are marked `no-store`
//! since each one is a live snapshot.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod health;
pub mod identity;
pub mod whoami;

use axum::{http::Uri, middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_NO_STORE;
use crate::error::AppError;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with all routes.
///
/// `/whoami` reads the peer address, so the router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn create_router(state: AppState) -> Router {
    let identity_routes = Router::new()
        .route("/", get(identity::index))
        .route("/version", get(identity::version))
        .route("/envs", get(identity::envs))
        .route("/cm", get(identity::configmaps));

    let detail_routes = Router::new().route("/whoami", get(whoami::detail));

    // Probes
    let health_routes = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz));

    Router::new()
        .merge(identity_routes)
        .merge(detail_routes)
        .merge(health_routes)
        .fallback(not_found)
        .with_state(state)
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::net::SocketAddr;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt; // for `oneshot`

    use crate::collect::net::tests::StaticAddressProvider;
    use crate::collect::BuildInfo;
    use crate::config::AppConfig;

    const PEER: ([u8; 4], u16) = ([10, 0, 0, 7], 43210);

    fn test_app(configmap_dir: &std::path::Path) -> Router {
        let mut config = AppConfig::default();
        config.configmap.dir = configmap_dir.to_path_buf();
        let build = BuildInfo::new("1.4.0", "deadbeef", "2026-10-01T12:00:00Z", "go1.22.4 linux/amd64");
        let addresses = StaticAddressProvider(vec![
            "127.0.0.1".parse().unwrap(),
            "10.244.3.21".parse().unwrap(),
        ]);
        let state = AppState::with_address_provider(config, build, Arc::new(addresses));
        create_router(state).layer(MockConnectInfo(SocketAddr::from(PEER)))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, http::HeaderMap, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), 1_000_000)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, headers, json)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, http::HeaderMap, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        send(app, request).await
    }

    #[tokio::test]
    async fn test_healthz() {
        let dir = TempDir::new().unwrap();
        let (status, headers, json) = get_json(test_app(dir.path()), "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "status": "ok" }));
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(headers["cache-control"], "no-store");
    }

    #[tokio::test]
    async fn test_readyz() {
        let dir = TempDir::new().unwrap();
        let (status, _, json) = get_json(test_app(dir.path()), "/readyz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "status": "ready" }));
    }

    #[tokio::test]
    async fn test_version_is_stable() {
        let dir = TempDir::new().unwrap();
        let app = test_app(dir.path());
        let (status, _, first) = get_json(app.clone(), "/version").await;
        let (_, _, second) = get_json(app, "/version").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            first,
            json!({
                "version": "1.4.0",
                "git_commit": "deadbeef",
                "build_time": "2026-10-01T12:00:00Z",
                "go_version": "1.22.4",
            })
        );
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_envs_reports_prefixed_variables() {
        std::env::set_var("GAEA_ROUTER_TEST_DSN", "user=app;opts=a=b");
        let dir = TempDir::new().unwrap();
        let (status, _, json) = get_json(test_app(dir.path()), "/envs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["GAEA_ROUTER_TEST_DSN"], "user=app;opts=a=b");
        for key in json.as_object().unwrap().keys() {
            assert!(key.starts_with("GAEA"), "{key}");
        }
    }

    #[tokio::test]
    async fn test_cm_missing_directory() {
        let dir = TempDir::new().unwrap();
        let (status, _, json) = get_json(test_app(&dir.path().join("missing")), "/cm").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "files": {}, "count": 0 }));
    }

    #[tokio::test]
    async fn test_cm_nested_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/b.txt"), "world").unwrap();

        let (_, _, json) = get_json(test_app(dir.path()), "/cm").await;
        assert_eq!(
            json,
            json!({ "files": { "a.txt": "hello", "sub/b.txt": "world" }, "count": 2 })
        );
    }

    #[tokio::test]
    async fn test_index_aggregates_collectors() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("feature.flags"), "beta=on").unwrap();

        let (status, _, json) = get_json(test_app(dir.path()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["version"]["version"], "1.4.0");
        assert!(json["pod"]["hostname"].is_string());
        assert!(json["environment"].is_object());
        assert_eq!(json["configmaps"]["count"], 1);
        assert_eq!(json["configmaps"]["files"]["feature.flags"], "beta=on");
        assert!(json["resources"].is_object());
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_whoami_prefers_forwarded_for() {
        let dir = TempDir::new().unwrap();
        let request = Request::builder()
            .uri("/whoami?x=1")
            .header("X-Forwarded-For", "1.2.3.4, 5.6.7.8")
            .header("X-Real-IP", "9.9.9.9")
            .header("Accept", "text/plain")
            .header("Accept", "application/json")
            .body(Body::empty())
            .unwrap();

        let (status, _, json) = send(test_app(dir.path()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["client_ip"], "1.2.3.4");
        assert_eq!(json["remote_ip"], "10.0.0.7:43210");
        assert_eq!(json["pod_ip"], "10.244.3.21");
        assert_eq!(json["method"], "GET");
        assert_eq!(json["path"], "/whoami");
        assert_eq!(json["protocol"], "HTTP/1.1");
        assert_eq!(json["headers"]["accept"], json!(["text/plain", "application/json"]));
        assert_eq!(json["headers"]["x-real-ip"], json!(["9.9.9.9"]));
    }

    #[tokio::test]
    async fn test_whoami_without_forwarding_headers_uses_peer() {
        let dir = TempDir::new().unwrap();
        let (status, _, json) = get_json(test_app(dir.path()), "/whoami").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["client_ip"], "10.0.0.7:43210");
        assert_eq!(json["client_ip"], json["remote_ip"]);
    }

    #[tokio::test]
    async fn test_unknown_path_is_json_404() {
        let dir = TempDir::new().unwrap();
        let (status, _, json) = get_json(test_app(dir.path()), "/metrics").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, json!({ "error": "not found", "path": "/metrics" }));
    }

    #[tokio::test]
    async fn test_exact_paths_only() {
        let dir = TempDir::new().unwrap();
        let (status, _, _) = get_json(test_app(dir.path()), "/version/extra").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_is_not_allowed() {
        let dir = TempDir::new().unwrap();
        let request = Request::builder()
            .method("POST")
            .uri("/healthz")
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(test_app(dir.path()), request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
