//! Route definitions for the API.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers::{self, AuthState};
use crate::auth::{gate, AccessRequirement};
use crate::pages::{self, SharedRenderer};

/// Security scheme modifier for OpenAPI.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::login,
        handlers::token_probe,
        handlers::health_check,
    ),
    components(schemas(
        crate::api::types::LoginRequest,
        crate::api::types::LoginResponse,
        crate::api::types::HealthResponse,
        crate::domain::PrivilegeTier,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Token issuance and validation"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Token Gate API",
        version = "0.1.0",
        description = "Stateless tiered token authentication",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the application router.
pub fn build_router(auth_state: AuthState, renderer: SharedRenderer) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes requiring a valid token of any tier
    let token_routes = gate(
        Router::new().route("/api/token", get(handlers::token_probe)),
        auth_state.codec.clone(),
        AccessRequirement::Any,
    );

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/login", post(handlers::login))
        .route("/api/health", get(handlers::health_check))
        .with_state(auth_state);

    let page_routes = Router::new()
        .route("/", get(pages::status))
        .route("/status", get(pages::status))
        .with_state(renderer);

    Router::new()
        .merge(token_routes)
        .merge(public_routes)
        .merge(page_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
