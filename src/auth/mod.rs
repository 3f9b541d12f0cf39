//! Authentication module for Token Gate.
//!
//! - Credentials: shared secrets mapped to a privilege tier
//! - Token: RSA-signed, time-bounded session tokens
//! - Middleware: the access gate in front of protected handlers

mod credentials;
mod middleware;
mod token;

pub use credentials::*;
pub use middleware::*;
pub use token::*;
