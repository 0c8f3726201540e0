//! Backend configuration for the ChatBI client.
//!
//! Supports reading the endpoint and credential from
//! `~/.config/chatbi/secret.json`, with environment variables as a
//! fallback (`CHATBI_ENDPOINT`, `CHATBI_LOGIN_TOKEN`).

use chatbi_core::{ChatBiError, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the ChatBI backend.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend, e.g. `http://localhost:8080`.
    pub endpoint: String,
    /// Opaque credential sent as the `Login-Token` header.
    #[serde(default)]
    pub login_token: Option<String>,
    /// Per-call timeout in seconds. Translation calls go through a large
    /// language model, so the default is generous.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl BackendConfig {
    /// Creates a config for the given endpoint with defaults.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            login_token: None,
            request_timeout_secs: None,
        }
    }

    /// Sets the credential.
    pub fn with_login_token(mut self, token: impl Into<String>) -> Self {
        self.login_token = Some(token.into());
        self
    }

    /// The per-call timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// The (shorter) health-check timeout.
    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(DEFAULT_HEALTH_TIMEOUT_SECS)
    }

    /// Loads configuration from `secret.json`, falling back to
    /// environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when neither source provides an endpoint.
    pub fn load() -> Result<Self> {
        if let Some(config) = Self::load_from_file()? {
            return Ok(config);
        }

        let endpoint = env::var("CHATBI_ENDPOINT").map_err(|_| {
            ChatBiError::internal(
                "CHATBI_ENDPOINT not found in secret.json or environment variables",
            )
        })?;
        let login_token = env::var("CHATBI_LOGIN_TOKEN").ok();

        Ok(Self {
            endpoint,
            login_token,
            request_timeout_secs: None,
        })
    }

    fn load_from_file() -> Result<Option<Self>> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| {
            ChatBiError::io(format!(
                "Failed to read configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;
        let config = serde_json::from_str(&content).map_err(|e| {
            ChatBiError::internal(format!(
                "Failed to parse configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Some(config))
    }

    /// Returns the path to the configuration file:
    /// `~/.config/chatbi/secret.json`.
    fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ChatBiError::io("Could not determine home directory"))?;
        Ok(home.join(".config").join("chatbi").join("secret.json"))
    }
}
