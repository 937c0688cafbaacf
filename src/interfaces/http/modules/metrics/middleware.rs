//! Request counters and latency histograms for every API route
//!
//! Rendered next to the engine's `parking_*` counters on `/metrics`.

use std::time::Instant;

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};

/// Route template (`/api/v1/sessions/{id}`), never the concrete path,
/// so plates and ids stay out of label values.
fn route_label(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |route| route.as_str().to_string())
}

/// Records `http_requests_total{method, path, status}` and
/// `http_request_duration_seconds{method, path}`.
pub async fn http_metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().as_str().to_string();
    let path = route_label(&request);
    let started = Instant::now();

    let response = next.run(request).await;

    let elapsed = started.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();
    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!("http_request_duration_seconds", "method" => method, "path" => path)
        .record(elapsed);

    response
}
