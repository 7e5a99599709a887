use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use notifications_shared::types::auth::AuthUser;

use crate::models::NotificationDto;
use crate::AppState;

/// GET /notifications
/// Every notification owned by the caller.
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> Json<Vec<NotificationDto>> {
    tracing::info!(user_auth0_id = %auth_user.id, "received get notifications request");

    let service = state.notifications.clone();
    let owner_id = auth_user.id;
    let notifications = tokio::task::spawn_blocking(move || service.get_notifications(&owner_id))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "get notifications task failed");
            Vec::new()
        });

    Json(notifications)
}

/// DELETE /notifications
pub async fn delete_notifications(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
) -> StatusCode {
    tracing::info!(user_auth0_id = %auth_user.id, "received delete notifications request");

    let service = state.notifications.clone();
    let owner_id = auth_user.id.clone();
    if let Err(e) = tokio::task::spawn_blocking(move || service.delete_notifications(&owner_id)).await {
        tracing::error!(error = %e, "delete notifications task failed");
    }

    state
        .events
        .emit(format!("Notifications deleted for user {}", auth_user.id));

    StatusCode::OK
}
