use std::sync::Arc;
use std::time::Duration;

use notifications_shared::clients::db::create_pool;
use notifications_shared::clients::events::EventsClient;
use notifications_shared::clients::rabbitmq::RabbitMQClient;
use notifications_shared::middleware::{Hs256Verifier, IdentityVerifier, UnverifiedClaims};

use notifications_ms::config::AppConfig;
use notifications_ms::events::consumer;
use notifications_ms::repository::{ensure_schema, PgNotificationRepository};
use notifications_ms::routes;
use notifications_ms::services::NotificationService;
use notifications_ms::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    notifications_shared::middleware::init_tracing("notifications-ms", config.json_logs);

    let port = config.port;
    let metrics_handle = notifications_shared::middleware::init_metrics()?;

    let pool = create_pool(
        &config.database_url,
        config.db_pool_size,
        Duration::from_secs(config.db_connection_timeout_secs),
    )?;
    ensure_schema(&pool)?;

    let repository = Arc::new(PgNotificationRepository::new(pool));
    let notifications = NotificationService::new(
        repository,
        tracing::info_span!("notification_service"),
    );

    let identity: Arc<dyn IdentityVerifier> = match &config.jwt_secret {
        Some(secret) if !secret.is_empty() => Arc::new(Hs256Verifier::new(secret)),
        _ => {
            tracing::warn!("no jwt secret configured, bearer token signatures are not checked");
            Arc::new(UnverifiedClaims)
        }
    };

    let events = EventsClient::new(
        config.events_url.clone(),
        Duration::from_secs(config.events_timeout_secs),
    )?;
    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;

    let state = Arc::new(AppState {
        config,
        notifications,
        identity,
        events,
        rabbitmq: Some(rabbitmq.clone()),
        metrics_handle: Some(metrics_handle),
    });

    let consumer_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = consumer::listen_add_notification(consumer_state, rabbitmq).await {
            tracing::error!(error = %e, "notification consumer failed");
        }
    });

    let app = routes::router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "notifications-ms starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
