use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use notifications_shared::types::api::HealthResponse;

use crate::AppState;

const SERVICE: &str = "notifications-ms";

/// Reports `degraded` while the broker connection is down; HTTP reads still work.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let broker_connected = state.rabbitmq.as_ref().map_or(true, |r| r.is_connected());
    Json(health_for(broker_connected))
}

fn health_for(broker_connected: bool) -> HealthResponse {
    if broker_connected {
        HealthResponse::healthy(SERVICE, env!("CARGO_PKG_VERSION"))
    } else {
        tracing::warn!("rabbitmq connection lost, reporting degraded health");
        HealthResponse::degraded(SERVICE, env!("CARGO_PKG_VERSION"))
    }
}

/// Returns Prometheus metrics.
pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}
