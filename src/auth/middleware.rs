//! Access gate middleware for axum.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::{self, Next},
    response::Response,
    Router,
};

use crate::auth::{TokenCodec, VerifiedToken};
use crate::domain::PrivilegeTier;
use crate::error::{GateError, GateResult};

/// Scheme word expected in the `Authorization` header.
const BEARER_SCHEME: &str = "Bearer";

/// Minimum privilege a wrapped operation demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRequirement {
    /// Any valid, unexpired token.
    Any,
    /// Moderator or administrator.
    Moderator,
    /// Administrator only.
    Administrator,
}

impl AccessRequirement {
    /// Whether a token of `tier` satisfies this requirement.
    pub fn permits(self, tier: PrivilegeTier) -> bool {
        match self {
            AccessRequirement::Any => true,
            AccessRequirement::Moderator => tier >= PrivilegeTier::Moderator,
            AccessRequirement::Administrator => tier >= PrivilegeTier::Administrator,
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The header must split on single spaces into exactly the scheme word and
/// the token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) => Some(token),
        _ => None,
    }
}

/// Verify the presented token and check it against `requirement`.
pub fn authorize(
    codec: &TokenCodec,
    headers: &HeaderMap,
    requirement: AccessRequirement,
) -> GateResult<VerifiedToken> {
    let token = bearer_token(headers)
        .ok_or_else(|| GateError::TokenMalformed("Missing or malformed bearer header".to_string()))?;

    let verified = codec.verify(token)?;

    if !requirement.permits(verified.tier) {
        return Err(GateError::InsufficientPrivilege);
    }

    Ok(verified)
}

async fn enforce(
    codec: &TokenCodec,
    requirement: AccessRequirement,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, GateError> {
    let verified = authorize(codec, request.headers(), requirement).map_err(|e| {
        tracing::debug!(error = %e, requirement = ?requirement, "Access denied");
        e
    })?;

    tracing::debug!(
        tier = %verified.tier,
        expires_at = %verified.expires_at,
        "Access granted"
    );

    // Add verified claims to request extensions for handlers to access
    request.extensions_mut().insert(verified);

    Ok(next.run(request).await)
}

/// Require any valid token.
pub async fn require_token(
    State(codec): State<Arc<TokenCodec>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, GateError> {
    enforce(&codec, AccessRequirement::Any, request, next).await
}

/// Require a moderator or administrator token.
pub async fn require_moderator(
    State(codec): State<Arc<TokenCodec>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, GateError> {
    enforce(&codec, AccessRequirement::Moderator, request, next).await
}

/// Require an administrator token.
pub async fn require_admin(
    State(codec): State<Arc<TokenCodec>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, GateError> {
    enforce(&codec, AccessRequirement::Administrator, request, next).await
}

/// Wrap every route of `router` with the gate for `requirement`.
pub fn gate<S>(router: Router<S>, codec: Arc<TokenCodec>, requirement: AccessRequirement) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    match requirement {
        AccessRequirement::Any => router.layer(middleware::from_fn_with_state(codec, require_token)),
        AccessRequirement::Moderator => {
            router.layer(middleware::from_fn_with_state(codec, require_moderator))
        }
        AccessRequirement::Administrator => {
            router.layer(middleware::from_fn_with_state(codec, require_admin))
        }
    }
}
