use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors a request can end in. Collectors never produce these; only
/// requests that miss every route do.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Route not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(path) => {
                tracing::debug!(%path, "No route for path");
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "not found", "path": path })),
                )
                    .into_response()
            }
        }
    }
}
