//! Request ID middleware for correlating logs with requests.
//!
//! Generates a UUID v4 for each incoming request and creates a tracing span
//! that wraps the entire request lifecycle. All logs emitted during request
//! processing will include the request_id field for correlation.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

/// Middleware that generates a request ID and creates a request span.
///
/// This should be the outermost layer so the span wraps all request
/// processing. It never changes the response.
pub async fn request_id_layer(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();

    async move {
        let response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::Span::current().record("duration_ms", duration_ms);
        // Probes hit every few seconds; keep them out of the info stream
        if response.extensions().get::<ProbeResponse>().is_some() {
            tracing::debug!(status = response.status().as_u16(), duration_ms, "Probe completed");
        } else {
            tracing::info!(status = response.status().as_u16(), duration_ms, "Request completed");
        }

        response
    }
    .instrument(span)
    .await
}

/// Marker set on health and readiness responses.
#[derive(Clone, Copy, Debug)]
pub struct ProbeResponse;
