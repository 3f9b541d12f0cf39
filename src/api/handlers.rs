//! HTTP request handlers.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, Json};

use crate::api::types::*;
use crate::auth::{CredentialVerifier, TokenCodec};
use crate::error::GateResult;

/// Authentication state for the login endpoint.
#[derive(Clone)]
pub struct AuthState {
    pub codec: Arc<TokenCodec>,
    pub verifier: CredentialVerifier,
}

// ==================== Authentication Endpoints ====================

/// Exchange a shared secret for a session token.
///
/// POST /api/login
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed body or unknown secret"),
        (status = 500, description = "Token signing failed")
    ),
    tag = "auth"
)]
pub async fn login(State(auth_state): State<AuthState>, body: Bytes) -> GateResult<Json<LoginResponse>> {
    // Parsed by hand so a bad body is a bare 400 like every other failure.
    let request: LoginRequest = serde_json::from_slice(&body)?;

    let tier = auth_state.verifier.verify(&request.password)?;
    let issued = auth_state.codec.issue(tier)?;
    let flags = tier.flags();

    tracing::info!(
        tier = %tier,
        expires = %issued.expires.to_rfc3339(),
        "Token issued"
    );

    Ok(Json(LoginResponse {
        token: issued.token,
        expires: issued.expires,
        admin: flags.is_admin,
        moderator: flags.is_mod,
        read_only: flags.is_read_only,
    }))
}

/// Succeeds only when the presented token is valid.
///
/// GET /api/token
#[utoipa::path(
    get,
    path = "/api/token",
    responses(
        (status = 200, description = "Token is valid"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn token_probe() -> StatusCode {
    StatusCode::OK
}

// ==================== Health ====================

/// Health check endpoint.
///
/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
