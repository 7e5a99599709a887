mod auth_extractor;
mod metrics_layer;
mod tracing_layer;

pub use auth_extractor::{
    extract_bearer_token, HasIdentityVerifier, Hs256Verifier, IdentityVerifier, UnverifiedClaims,
};
pub use metrics_layer::{init_metrics, metrics_middleware, record_consumed};
pub use tracing_layer::init_tracing;
