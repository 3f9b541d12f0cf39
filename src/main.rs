//! Token Gate - stateless tiered token authentication.
//!
//! Exchanges shared secrets for RSA-signed session tokens and guards
//! protected handlers behind a bearer-token check.

use std::sync::Arc;

use tokio::net::TcpListener;

mod api;
mod auth;
mod config;
mod domain;
mod error;
mod logging;
mod pages;

use crate::api::build_router;
use crate::api::handlers::AuthState;
use crate::auth::{validity_from_hours, CredentialVerifier, SigningKeys, TokenCodec};
use crate::config::Config;
use crate::pages::{SharedRenderer, TemplateDir};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    // Initialize logging
    logging::init();

    tracing::info!("Starting Token Gate v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        auth = ?config.auth,
        template_dir = %config.pages.template_dir.display(),
        "Configuration loaded"
    );

    // Load the signing keypair once; it is never rotated
    let keys = SigningKeys::from_pem_files(
        &config.auth.private_key_path,
        &config.auth.public_key_path,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to load signing keys");
        anyhow::anyhow!("{}", e)
    })?;

    let codec = validity_from_hours(config.auth.token_validity_hours)
        .and_then(|validity| TokenCodec::new(keys, validity))
        .map_err(|e| {
            tracing::error!(error = %e, "Invalid token validity window");
            anyhow::anyhow!("{}", e)
        })?;
    let codec = Arc::new(codec);

    let verifier = CredentialVerifier::new(&config.auth.secrets()).map_err(|e| {
        tracing::error!(error = %e, "Invalid tier secrets");
        anyhow::anyhow!("{}", e)
    })?;

    tracing::info!(
        validity_hours = codec.validity().num_hours(),
        "Authentication ready"
    );

    let auth_state = AuthState { codec, verifier };
    let renderer: SharedRenderer = Arc::new(TemplateDir::new(config.pages.template_dir.clone()));

    // Build router
    let app = build_router(auth_state, renderer);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
