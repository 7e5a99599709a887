#![allow(dead_code)]

use std::sync::Arc;

use jsonwebtoken::{encode, EncodingKey, Header};
use metrics_exporter_prometheus::PrometheusHandle;
use notifications_shared::clients::events::EventsClient;
use notifications_shared::middleware::UnverifiedClaims;
use notifications_shared::types::auth::Claims;

use notifications_ms::config::AppConfig;
use notifications_ms::models::{NewNotification, NotificationType};
use notifications_ms::repository::{InMemoryNotificationRepository, NotificationRepository};
use notifications_ms::services::NotificationService;
use notifications_ms::AppState;

pub struct TestContext {
    pub repository: Arc<InMemoryNotificationRepository>,
    pub service: NotificationService,
}

impl TestContext {
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryNotificationRepository::new());
        let service = NotificationService::new(repository.clone(), tracing::Span::none());
        Self { repository, service }
    }

    pub fn seed(&self, message: &str, owner: &str, notification_type: NotificationType) {
        self.repository
            .add_notification(NewNotification {
                message: message.into(),
                user_auth0_id: owner.into(),
                notification_type,
            })
            .unwrap();
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state_with_metrics(None)
    }

    pub fn state_with_metrics(&self, metrics_handle: Option<PrometheusHandle>) -> Arc<AppState> {
        Arc::new(AppState {
            config: AppConfig::default(),
            notifications: self.service.clone(),
            identity: Arc::new(UnverifiedClaims),
            events: EventsClient::disabled(),
            rabbitmq: None,
            metrics_handle,
        })
    }
}

/// Bearer token whose signature nobody here can check, like the ones the
/// upstream gateway forwards.
pub fn bearer(subject: &str) -> String {
    let token = encode(
        &Header::default(),
        &Claims::new(subject, 3600),
        &EncodingKey::from_secret(b"issuer-secret"),
    )
    .unwrap();
    format!("Bearer {token}")
}
