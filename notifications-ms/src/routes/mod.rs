use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use notifications_shared::middleware::metrics_middleware;

use crate::AppState;

pub mod health;
pub mod notifications;

pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/notifications",
            get(notifications::list_notifications).delete(notifications::delete_notifications),
        );

    if state.metrics_handle.is_some() {
        app = app.route("/api/metrics", get(health::metrics));
    }

    app.layer(axum::middleware::from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
