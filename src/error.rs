//! Error types for Token Gate.
//!
//! Every failure maps to a status code with an empty body. Clients never
//! learn which authentication check rejected them.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Unified error type for Token Gate operations.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Invalid credentials")]
    CredentialInvalid,

    #[error("Malformed token: {0}")]
    TokenMalformed(String),

    #[error("Invalid token signature")]
    TokenSignatureInvalid,

    #[error("Unexpected signing method: {0}")]
    TokenAlgorithmUnexpected(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Insufficient privilege")]
    InsufficientPrivilege,

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GateError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            GateError::CredentialInvalid
            | GateError::BadRequest(_)
            | GateError::Serialization(_) => StatusCode::BAD_REQUEST,
            GateError::TokenMalformed(_)
            | GateError::TokenSignatureInvalid
            | GateError::TokenAlgorithmUnexpected(_)
            | GateError::TokenExpired
            | GateError::TokenNotYetValid
            | GateError::InsufficientPrivilege => StatusCode::UNAUTHORIZED,
            GateError::Signing(_) | GateError::Config(_) | GateError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            // Log the actual error but don't expose internals
            tracing::error!(error = %self, "Internal error");
        }

        status.into_response()
    }
}

/// Result type alias for Token Gate operations.
pub type GateResult<T> = Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_failures_collapse_to_unauthorized() {
        let errors = [
            GateError::TokenMalformed("bad".to_string()),
            GateError::TokenSignatureInvalid,
            GateError::TokenAlgorithmUnexpected("HS256".to_string()),
            GateError::TokenExpired,
            GateError::TokenNotYetValid,
            GateError::InsufficientPrivilege,
        ];

        for error in errors {
            assert_eq!(error.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_client_and_server_statuses() {
        assert_eq!(GateError::CredentialInvalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            GateError::Signing("no key".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_response_body_is_empty() {
        let response = GateError::TokenExpired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }
}
