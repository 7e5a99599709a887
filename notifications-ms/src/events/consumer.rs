use std::sync::Arc;

use futures_lite::StreamExt;
use lapin::message::Delivery;
use lapin::options::{BasicAckOptions, BasicNackOptions};
use serde::Deserialize;

use notifications_shared::clients::rabbitmq::RabbitMQClient;
use notifications_shared::errors::AppError;
use notifications_shared::middleware::record_consumed;

use crate::models::{CreateNotification, Notification};
use crate::services::NotificationService;
use crate::AppState;

/// Who settles deliveries: the broker on send, or this consumer after handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckMode {
    #[default]
    Auto,
    Manual,
}

/// Result of running one delivery through decode and the service.
#[derive(Debug)]
pub enum HandleOutcome {
    Persisted(Notification),
    /// The payload itself is unusable: malformed or failing validation.
    Rejected(AppError),
    /// The payload was fine but storing it failed.
    Failed(AppError),
}

impl HandleOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Persisted(_) => "persisted",
            Self::Rejected(_) => "rejected",
            Self::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckAction {
    /// Already settled by the broker.
    None,
    Ack,
    Reject { requeue: bool },
}

impl AckMode {
    /// Settlement for a handled delivery. A storage failure is retried once;
    /// the redelivered copy is dead-lettered if it fails again.
    pub fn action_for(self, outcome: &HandleOutcome, redelivered: bool) -> AckAction {
        match self {
            AckMode::Auto => AckAction::None,
            AckMode::Manual => match outcome {
                HandleOutcome::Persisted(_) => AckAction::Ack,
                HandleOutcome::Rejected(_) => AckAction::Reject { requeue: false },
                HandleOutcome::Failed(_) => AckAction::Reject { requeue: !redelivered },
            },
        }
    }
}

/// Decode a queue body and hand it to the service.
pub fn handle_add_notification(service: &NotificationService, body: &[u8]) -> HandleOutcome {
    let payload = match CreateNotification::decode(body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(error = %e, "failed to decode notification payload");
            return HandleOutcome::Rejected(e);
        }
    };

    match service.add_notification(payload) {
        Ok(notification) => HandleOutcome::Persisted(notification),
        Err(e) if e.is_rejection() => {
            tracing::error!(error = %e, "notification payload rejected");
            HandleOutcome::Rejected(e)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to add notification");
            HandleOutcome::Failed(e)
        }
    }
}

async fn settle(delivery: &Delivery, action: AckAction) -> Result<(), lapin::Error> {
    match action {
        AckAction::None => Ok(()),
        AckAction::Ack => delivery.ack(BasicAckOptions::default()).await,
        AckAction::Reject { requeue } => {
            delivery
                .nack(BasicNackOptions {
                    requeue,
                    ..Default::default()
                })
                .await
        }
    }
}

/// Drain the `AddNotification-MS` queue, one delivery at a time.
pub async fn listen_add_notification(
    state: Arc<AppState>,
    rabbitmq: RabbitMQClient,
) -> anyhow::Result<()> {
    let config = &state.config;
    rabbitmq.declare(&config.topology()).await?;

    let mut consumer = rabbitmq
        .consume(
            &config.queue_name,
            &config.consumer_tag,
            config.ack_mode == AckMode::Auto,
        )
        .await?;

    tracing::info!(queue = %config.queue_name, ack_mode = ?config.ack_mode, "listening for notifications");

    while let Some(delivery) = consumer.next().await {
        let delivery = match delivery {
            Ok(delivery) => delivery,
            Err(e) => {
                tracing::error!(error = %e, "notification consumer error");
                continue;
            }
        };

        let outcome = handle_add_notification(&state.notifications, &delivery.data);
        record_consumed(outcome.label());

        if let HandleOutcome::Persisted(notification) = &outcome {
            state.events.emit(format!(
                "New notification added for user {}, type: {}",
                notification.user_auth0_id,
                i32::from(notification.notification_type)
            ));
        }

        let action = config.ack_mode.action_for(&outcome, delivery.redelivered);
        if action == AckAction::None && !matches!(outcome, HandleOutcome::Persisted(_)) {
            tracing::warn!(outcome = outcome.label(), "delivery already acknowledged, message dropped");
        }

        if let Err(e) = settle(&delivery, action).await {
            tracing::error!(error = %e, ?action, "failed to settle delivery");
        }
    }

    tracing::warn!(queue = %config.queue_name, "notification consumer stream ended");
    Ok(())
}
