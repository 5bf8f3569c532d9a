//! Bearer-token credential verification.
//!
//! Tokens are HS256 JWTs whose `id` claim names the owner identity. The
//! verifier is a pure function of the token and the shared secret; the
//! [`require_auth`] middleware runs it for every task route before any
//! handler and injects the resulting [`OwnerId`] as a request extension.
//!
//! Token issuance (login/registration) belongs to an external service
//! that shares the same secret; [`issue`] mints tokens in that service's
//! format for tests and local tooling.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use taskhub_model::task::OwnerId;

/// Claims carried inside a `TaskHub` bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Owner identity of the caller.
    pub id: String,
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
}

/// Why a credential was refused.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization: Bearer <token>` header was supplied.
    #[error("no token, authorization denied")]
    MissingToken,
    /// The token failed structure, signature, or expiry checks.
    #[error("token is not valid")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
}

/// Verifies a bearer token against the shared secret and extracts the
/// caller's owner identity.
///
/// Stateless: the outcome depends only on the token, the secret, and the
/// clock (for expiry). Failure is terminal for the request; there is
/// nothing to retry.
///
/// # Errors
///
/// Returns [`AuthError::InvalidToken`] for malformed tokens, bad
/// signatures, and expired credentials.
pub fn verify(secret: &str, token: &str) -> Result<OwnerId, AuthError> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(AuthError::InvalidToken)?;
    Ok(OwnerId::new(data.claims.id))
}

/// Mints a bearer token for the given owner, valid for `ttl_secs`.
///
/// This mirrors what the external auth service produces; the server never
/// calls it on the request path.
///
/// # Errors
///
/// Returns the underlying encoding error if signing fails.
pub fn issue(
    secret: &str,
    owner: &OwnerId,
    ttl_secs: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        id: owner.as_str().to_string(),
        exp: Utc::now().timestamp() + ttl_secs,
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Pulls the token out of an `Authorization` header value.
fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    header
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingToken)
}

/// axum middleware guarding the task routes.
///
/// Verifies the bearer token before the route handler runs and stores the
/// caller's [`OwnerId`] as a request extension. On failure the request is
/// answered with a 401 JSON body and never reaches the store.
pub async fn require_auth(
    State(secret): State<Arc<String>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match bearer_token(header).and_then(|token| verify(&secret, token)) {
        Ok(owner) => {
            request.extensions_mut().insert(owner);
            next.run(request).await
        }
        Err(err) => {
            tracing::debug!(error = %err, "rejected unauthenticated request");
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "message": err.to_string() })),
            )
                .into_response()
        }
    }
}
