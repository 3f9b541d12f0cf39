//! API request and response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ==================== Authentication ====================

/// Login request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// One of the configured tier secrets.
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Signed session token.
    pub token: String,
    /// When the token stops being accepted.
    pub expires: DateTime<Utc>,
    /// Administrator flag.
    pub admin: bool,
    /// Moderator flag.
    #[serde(rename = "mod")]
    pub moderator: bool,
    /// Read-only flag.
    pub read_only: bool,
}

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Timestamp.
    pub timestamp: String,
}
