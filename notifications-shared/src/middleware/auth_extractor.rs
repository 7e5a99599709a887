use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::errors::{AppError, ErrorCode};
use crate::types::auth::{AuthUser, Claims};

/// Turns a raw bearer token into verified claims.
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Claims, AppError>;
}

/// Router state that can hand out the configured verifier.
pub trait HasIdentityVerifier {
    fn identity_verifier(&self) -> &dyn IdentityVerifier;
}

impl<T: HasIdentityVerifier> HasIdentityVerifier for Arc<T> {
    fn identity_verifier(&self) -> &dyn IdentityVerifier {
        (**self).identity_verifier()
    }
}

/// Reads the `sub` claim without checking signature or expiry.
///
/// This matches what upstream callers have always relied on. Swap in
/// [`Hs256Verifier`] once the issuer's key is available to this service.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnverifiedClaims;

impl IdentityVerifier for UnverifiedClaims {
    fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|e| AppError::new(ErrorCode::TokenInvalid, format!("invalid token: {e}")))?;

        require_subject(token_data.claims)
    }
}

/// Checks an HS256 signature and expiry before trusting the subject.
#[derive(Clone)]
pub struct Hs256Verifier {
    key: DecodingKey,
}

impl Hs256Verifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl IdentityVerifier for Hs256Verifier {
    fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;

        let token_data = decode::<Claims>(token, &self.key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::new(ErrorCode::TokenExpired, "token has expired")
            }
            _ => AppError::new(ErrorCode::TokenInvalid, format!("invalid token: {e}")),
        })?;

        require_subject(token_data.claims)
    }
}

fn require_subject(claims: Claims) -> Result<Claims, AppError> {
    if claims.sub.trim().is_empty() {
        return Err(AppError::new(ErrorCode::TokenInvalid, "token has no subject"));
    }
    Ok(claims)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: HasIdentityVerifier + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;
        let claims = state.identity_verifier().verify(&token)?;

        Ok(AuthUser::from(claims))
    }
}

pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::unauthorized("missing authorization header"))?
        .to_str()
        .map_err(|_| AppError::unauthorized("invalid authorization header"))?;

    // Auth schemes are case-insensitive.
    match auth_header.trim().split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim().to_string())
        }
        _ => Err(AppError::unauthorized("authorization header must use Bearer scheme")),
    }
}
