use std::time::Instant;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
pub const NOTIFICATIONS_CONSUMED_TOTAL: &str = "notifications_consumed_total";

/// Counts and times every request, labelled by route template rather than raw URI.
pub async fn metrics_middleware(
    matched_path: Option<MatchedPath>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let route = match matched_path {
        Some(path) => path.as_str().to_string(),
        None => "unmatched".to_string(),
    };

    let response = next.run(req).await;

    let labels = [
        ("method", method),
        ("path", route),
        ("status", response.status().as_u16().to_string()),
    ];
    counter!(HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(HTTP_REQUEST_DURATION_SECONDS, &labels).record(start.elapsed().as_secs_f64());

    response
}

/// One queue delivery handled, by outcome (`persisted`, `rejected`, `failed`).
pub fn record_consumed(outcome: &'static str) {
    counter!(NOTIFICATIONS_CONSUMED_TOTAL, "outcome" => outcome).increment(1);
}

/// Installs the global Prometheus recorder. Only the binary calls this; without
/// it the macros above are no-ops.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}
