use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp layout expected by the events service.
pub const SYSTEM_EVENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Human-readable audit line posted to the events service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemEvent {
    pub timestamp: String,
    pub message: String,
}

impl SystemEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self::at(Utc::now(), message)
    }

    pub fn at(time: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            timestamp: time.format(SYSTEM_EVENT_TIME_FORMAT).to_string(),
            message: message.into(),
        }
    }
}
