//! HTTP API layer for Token Gate.
//!
//! Provides the login, token probe and health endpoints plus the status page.

pub mod handlers;
mod routes;
mod types;

pub use routes::build_router;
