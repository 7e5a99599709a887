use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use notifications_shared::clients::events::EventsClient;
use notifications_shared::clients::rabbitmq::RabbitMQClient;
use notifications_shared::middleware::{HasIdentityVerifier, IdentityVerifier};

pub mod config;
pub mod events;
pub mod models;
pub mod owner;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

use config::AppConfig;
use services::NotificationService;

pub struct AppState {
    pub config: AppConfig,
    pub notifications: NotificationService,
    pub identity: Arc<dyn IdentityVerifier>,
    pub events: EventsClient,
    /// Broker connection reported by `/health`. `None` when running without one.
    pub rabbitmq: Option<RabbitMQClient>,
    /// `None` keeps `/api/metrics` unrouted.
    pub metrics_handle: Option<PrometheusHandle>,
}

impl HasIdentityVerifier for AppState {
    fn identity_verifier(&self) -> &dyn IdentityVerifier {
        self.identity.as_ref()
    }
}
