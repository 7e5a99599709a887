pub mod api;
pub mod auth;
pub mod event;

pub use api::{ApiErrorResponse, HealthResponse, HealthStatus};
pub use auth::{AuthUser, Claims};
pub use event::SystemEvent;
