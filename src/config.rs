//! Configuration handling for the TUI

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default storefront API address
const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_REGISTER_PATH: &str = "/api/register";
const DEFAULT_VERIFICATION_TTL_SECS: u64 = 120;
const MAX_VERIFICATION_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_REDIRECT_DELAY_MS: u64 = 1500;

/// Environment variable overriding the API address
pub const API_URL_ENV: &str = "STOREFRONT_API_URL";

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorefrontConfig {
    /// Base URL of the storefront API
    pub api_base_url: Option<String>,
    /// Registration endpoint path
    pub register_path: Option<String>,
    /// Request timeout. Unset leaves the transport default in place.
    pub request_timeout_secs: Option<u64>,
    /// Lifetime of a verification token
    pub verification_ttl_secs: Option<u64>,
    /// Pause before leaving the wizard after a successful registration
    pub redirect_delay_ms: Option<u64>,
}

impl StorefrontConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("tn", "storefront", "storefront-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path)?;
                serde_json::from_str(&content)?
            }
            _ => Self::default(),
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.api_base_url = Some(url);
        }

        Ok(config)
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
    }

    pub fn register_path(&self) -> &str {
        self.register_path.as_deref().unwrap_or(DEFAULT_REGISTER_PATH)
    }

    /// Full registration endpoint URL
    pub fn register_url(&self) -> String {
        let path = self.register_path();
        if path.starts_with('/') {
            format!("{}{}", self.api_base_url(), path)
        } else {
            format!("{}/{}", self.api_base_url(), path)
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn verification_ttl(&self) -> chrono::Duration {
        let secs = self
            .verification_ttl_secs
            .unwrap_or(DEFAULT_VERIFICATION_TTL_SECS)
            .min(MAX_VERIFICATION_TTL_SECS);
        chrono::Duration::seconds(secs as i64)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms.unwrap_or(DEFAULT_REDIRECT_DELAY_MS))
    }
}
