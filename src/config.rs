//! Configuration module for Token Gate.
//!
//! Loads configuration from YAML files and environment variables. Read once
//! at startup and never changed afterwards.

use std::path::PathBuf;

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

use crate::auth::{TierSecrets, DEFAULT_TOKEN_VALIDITY_HOURS};

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub pages: PagesConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Signing keys and tier secrets.
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// PEM-encoded RSA private key.
    pub private_key_path: PathBuf,
    /// PEM-encoded RSA public key.
    pub public_key_path: PathBuf,
    pub admin_password: String,
    pub mod_password: String,
    pub read_only_password: String,
    /// Token validity window in hours.
    #[serde(default = "default_token_validity_hours")]
    pub token_validity_hours: i64,
}

// Secrets stay out of logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("private_key_path", &self.private_key_path)
            .field("public_key_path", &self.public_key_path)
            .field("token_validity_hours", &self.token_validity_hours)
            .finish_non_exhaustive()
    }
}

impl AuthConfig {
    /// The three tier secrets.
    pub fn secrets(&self) -> TierSecrets {
        TierSecrets {
            admin: self.admin_password.clone(),
            moderator: self.mod_password.clone(),
            read_only: self.read_only_password.clone(),
        }
    }
}

fn default_token_validity_hours() -> i64 {
    DEFAULT_TOKEN_VALIDITY_HOURS
}

/// Page rendering configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PagesConfig {
    /// Directory holding page templates.
    pub template_dir: PathBuf,
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (TOKEN_GATE__*)
    /// 2. config/local.yaml (if exists)
    /// 3. config/default.yaml
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            // Start with default config
            .add_source(File::with_name("config/default").required(false))
            // Layer on local overrides
            .add_source(File::with_name("config/local").required(false))
            // Layer on environment variables with TOKEN_GATE prefix
            .add_source(
                Environment::with_prefix("TOKEN_GATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("templates"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pages_config() {
        let config = PagesConfig::default();
        assert_eq!(config.template_dir, PathBuf::from("templates"));
    }

    #[test]
    fn test_auth_config_defaults_validity() {
        let config: AuthConfig = serde_json::from_value(serde_json::json!({
            "private_key_path": "keys/a.pem",
            "public_key_path": "keys/a.pub.pem",
            "admin_password": "a",
            "mod_password": "m",
            "read_only_password": "r"
        }))
        .unwrap();

        assert_eq!(config.token_validity_hours, 6);
        assert_eq!(config.secrets().moderator, "m");
    }

    #[test]
    fn test_auth_config_debug_hides_secrets() {
        let config: AuthConfig = serde_json::from_value(serde_json::json!({
            "private_key_path": "keys/a.pem",
            "public_key_path": "keys/a.pub.pem",
            "admin_password": "super-secret",
            "mod_password": "m",
            "read_only_password": "r"
        }))
        .unwrap();

        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
