//! Per-request access log.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, info, warn};

/// Path of the liveness probe; logged at debug level only.
const HEALTH_PATH: &str = "/api/health";

/// Logs method, path, status and latency of every request.
///
/// Server errors and rejected credentials are logged at `warn`.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let latency_ms = started.elapsed().as_millis() as u64;

    if path == HEALTH_PATH {
        debug!(%method, %path, status, latency_ms, "HTTP request");
    } else if response.status().is_server_error() || status == 401 {
        warn!(%method, %path, status, latency_ms, "HTTP request");
    } else {
        info!(%method, %path, status, latency_ms, "HTTP request");
    }

    response
}
