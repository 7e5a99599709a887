//! Errors, bearer-token handling, observability setup, and the Postgres,
//! RabbitMQ, and events-service clients used by `notifications-ms`.

pub mod clients;
pub mod errors;
pub mod middleware;
pub mod types;

pub use errors::{AppError, AppResult, ErrorCode};
