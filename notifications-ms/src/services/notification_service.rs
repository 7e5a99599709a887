use std::sync::Arc;

use tracing::Span;

use notifications_shared::errors::AppResult;

use crate::models::{CreateNotification, Notification, NotificationDto};
use crate::repository::NotificationRepository;

/// Validation and mapping around the notification repository.
///
/// Log lines are emitted under the span handed to [`NotificationService::new`].
#[derive(Clone)]
pub struct NotificationService {
    repository: Arc<dyn NotificationRepository>,
    span: Span,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepository>, span: Span) -> Self {
        Self { repository, span }
    }

    /// Validate and persist a new notification.
    ///
    /// Validation failures never reach the repository. Storage failures are
    /// returned unchanged.
    pub fn add_notification(&self, input: CreateNotification) -> AppResult<Notification> {
        let _entered = self.span.enter();

        let new_notification = input.into_new_notification().map_err(|e| {
            tracing::debug!(error = %e, "notification rejected by validation");
            e
        })?;

        tracing::info!(
            user_auth0_id = %new_notification.user_auth0_id,
            "adding notification for user"
        );

        let notification = self
            .repository
            .add_notification(new_notification)
            .map_err(|e| {
                tracing::debug!(error = %e, "failed to store notification");
                e
            })?;

        tracing::info!(
            notification_id = notification.id,
            user_auth0_id = %notification.user_auth0_id,
            notification_type = %notification.notification_type,
            "successfully added notification for user"
        );

        Ok(notification)
    }

    /// Same as [`get_notifications`](Self::get_notifications) but with the
    /// storage error visible.
    pub fn try_get_notifications(&self, owner_id: &str) -> AppResult<Vec<NotificationDto>> {
        let _entered = self.span.enter();
        tracing::info!(user_auth0_id = %owner_id, "getting notifications for user in database");

        let notifications = self.repository.get_notifications_by_owner(owner_id)?;

        tracing::info!(
            user_auth0_id = %owner_id,
            count = notifications.len(),
            "successfully got notifications for user"
        );

        Ok(notifications.into_iter().map(NotificationDto::from).collect())
    }

    /// All notifications owned by `owner_id`. A storage failure reads as an
    /// empty list.
    pub fn get_notifications(&self, owner_id: &str) -> Vec<NotificationDto> {
        self.try_get_notifications(owner_id).unwrap_or_else(|e| {
            let _entered = self.span.enter();
            tracing::error!(error = %e, user_auth0_id = %owner_id, "failed to get notifications");
            Vec::new()
        })
    }

    pub fn try_delete_notifications(&self, owner_id: &str) -> AppResult<usize> {
        let _entered = self.span.enter();

        let deleted = self.repository.delete_notifications_by_owner(owner_id)?;

        tracing::info!(user_auth0_id = %owner_id, deleted, "successfully deleted notifications for user");
        Ok(deleted)
    }

    /// Delete everything owned by `owner_id`. Nothing is reported back.
    pub fn delete_notifications(&self, owner_id: &str) {
        if let Err(e) = self.try_delete_notifications(owner_id) {
            let _entered = self.span.enter();
            tracing::error!(error = %e, user_auth0_id = %owner_id, "failed to delete notifications");
        }
    }
}
