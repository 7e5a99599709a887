use std::time::Duration;

use reqwest::Client;

use crate::types::event::SystemEvent;

/// Best-effort client for the sibling events service.
///
/// A client built without an endpoint is a no-op, which is what tests and
/// local runs use.
#[derive(Clone, Default)]
pub struct EventsClient {
    client: Client,
    endpoint: Option<String>,
}

impl EventsClient {
    /// Every send is bounded by `timeout`, so a hung events service cannot
    /// pile up `emit` tasks.
    pub fn new(endpoint: Option<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.filter(|e| !e.trim().is_empty()),
        })
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    pub async fn send(&self, event: &SystemEvent) -> Result<(), reqwest::Error> {
        let Some(endpoint) = &self.endpoint else {
            return Ok(());
        };

        tracing::info!(endpoint = %endpoint, "sending system event to events service");

        self.client
            .post(endpoint)
            .json(event)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    /// Fire-and-forget: failures are logged and dropped.
    pub fn emit(&self, message: impl Into<String>) {
        if !self.is_enabled() {
            return;
        }

        let client = self.clone();
        let event = SystemEvent::new(message);
        tokio::spawn(async move {
            if let Err(e) = client.send(&event).await {
                tracing::debug!(error = %e, "error happened during sending system event");
            }
        });
    }
}
