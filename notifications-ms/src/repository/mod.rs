use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::RwLock;

use notifications_shared::errors::{AppError, AppResult};

use crate::models::{NewNotification, Notification};
use crate::owner::OwnerMatch;

mod postgres;

pub use postgres::{ensure_schema, PgNotificationRepository};

/// Persistence for notification records. Records are never updated.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationRepository: Send + Sync {
    /// Insert a record and return it with its store-assigned id.
    fn add_notification(&self, notification: NewNotification) -> AppResult<Notification>;

    /// Every record owned by exactly `owner_id`, in store order.
    fn get_notifications_by_owner(&self, owner_id: &str) -> AppResult<Vec<Notification>>;

    /// Delete using [`OwnerMatch::for_delete`]; returns the number of rows removed.
    fn delete_notifications_by_owner(&self, owner_id: &str) -> AppResult<usize>;
}

/// In-process store with the same owner-matching rules as Postgres.
/// Backs the HTTP and consumer tests.
#[derive(Debug, Default)]
pub struct InMemoryNotificationRepository {
    notifications: RwLock<Vec<Notification>>,
    next_id: AtomicI32,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.notifications.read().map(|n| n.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> AppError {
    AppError::internal("notification store lock poisoned")
}

impl NotificationRepository for InMemoryNotificationRepository {
    fn add_notification(&self, notification: NewNotification) -> AppResult<Notification> {
        let mut notifications = self.notifications.write().map_err(poisoned)?;

        let stored = Notification {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            message: notification.message,
            user_auth0_id: notification.user_auth0_id,
            notification_type: notification.notification_type,
        };
        notifications.push(stored.clone());

        Ok(stored)
    }

    fn get_notifications_by_owner(&self, owner_id: &str) -> AppResult<Vec<Notification>> {
        let rule = OwnerMatch::for_read(owner_id);
        let notifications = self.notifications.read().map_err(poisoned)?;

        Ok(notifications
            .iter()
            .filter(|n| rule.matches(&n.user_auth0_id))
            .cloned()
            .collect())
    }

    fn delete_notifications_by_owner(&self, owner_id: &str) -> AppResult<usize> {
        let rule = OwnerMatch::for_delete(owner_id);
        let mut notifications = self.notifications.write().map_err(poisoned)?;

        let before = notifications.len();
        notifications.retain(|n| !rule.matches(&n.user_auth0_id));

        Ok(before - notifications.len())
    }
}
