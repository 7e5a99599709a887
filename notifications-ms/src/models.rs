use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::prelude::*;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Integer;
use serde::{Deserialize, Serialize};
use validator::Validate;

use notifications_shared::errors::{AppError, AppResult};

use crate::schema::notifications;

/// What happened to the owner. Stored and sent on the wire as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[serde(try_from = "i32", into = "i32")]
#[diesel(sql_type = Integer)]
pub enum NotificationType {
    Message = 0,
    Follow = 1,
    Like = 2,
    Comment = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown notification type: {0}")]
pub struct UnknownNotificationType(pub i32);

impl TryFrom<i32> for NotificationType {
    type Error = UnknownNotificationType;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Message),
            1 => Ok(Self::Follow),
            2 => Ok(Self::Like),
            3 => Ok(Self::Comment),
            other => Err(UnknownNotificationType(other)),
        }
    }
}

impl From<NotificationType> for i32 {
    fn from(value: NotificationType) -> Self {
        value as i32
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::Message => write!(f, "message"),
            NotificationType::Follow => write!(f, "follow"),
            NotificationType::Like => write!(f, "like"),
            NotificationType::Comment => write!(f, "comment"),
        }
    }
}

impl ToSql<Integer, Pg> for NotificationType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        let code = i32::from(*self);
        <i32 as ToSql<Integer, Pg>>::to_sql(&code, &mut out.reborrow())
    }
}

impl FromSql<Integer, Pg> for NotificationType {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let code = <i32 as FromSql<Integer, Pg>>::from_sql(bytes)?;
        Ok(NotificationType::try_from(code)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Notification {
    pub id: i32,
    pub message: String,
    pub user_auth0_id: String,
    pub notification_type: NotificationType,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotification {
    pub message: String,
    pub user_auth0_id: String,
    pub notification_type: NotificationType,
}

/// Body of an `AddNotification-MS` queue message.
///
/// Missing strings decode as empty and a missing type as `None`, so that
/// absence is reported by validation rather than by the decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateNotification {
    #[serde(default)]
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
    #[serde(default, rename = "userAuth0ID")]
    #[validate(length(min = 1, message = "userAuth0ID is required"))]
    pub user_auth0_id: String,
    #[serde(default, rename = "notificationType")]
    #[validate(required(message = "notificationType is required"))]
    pub notification_type: Option<NotificationType>,
}

impl CreateNotification {
    /// Only a JSON object is accepted. Sequences would otherwise fill the
    /// fields by position.
    pub fn decode(body: &[u8]) -> AppResult<Self> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        if !value.is_object() {
            return Err(AppError::Decode(serde::de::Error::custom(
                "notification payload must be a JSON object",
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Map onto the stored shape, refusing anything that breaks the
    /// record invariants.
    pub fn into_new_notification(self) -> AppResult<NewNotification> {
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let notification_type = self
            .notification_type
            .ok_or_else(|| AppError::Validation("notificationType is required".into()))?;

        Ok(NewNotification {
            message: self.message,
            user_auth0_id: self.user_auth0_id,
            notification_type,
        })
    }
}

/// Representation returned by `GET /notifications`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDto {
    pub id: i32,
    pub message: String,
    #[serde(rename = "userAuth0ID")]
    pub user_auth0_id: String,
    #[serde(rename = "notificationType")]
    pub notification_type: NotificationType,
}

impl From<Notification> for NotificationDto {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            message: notification.message,
            user_auth0_id: notification.user_auth0_id,
            notification_type: notification.notification_type,
        }
    }
}
