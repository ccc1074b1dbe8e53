use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{error, info};

/// Log each request on arrival and its outcome on completion
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    info!(%method, %uri, "incoming request");

    let response = next.run(request).await;
    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status < 400 {
        info!(%method, %uri, status, elapsed_ms, "response sent");
    } else {
        error!(%method, %uri, status, elapsed_ms, "response sent with error");
    }

    response
}
