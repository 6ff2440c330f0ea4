//! Application configuration management.
//!
//! Configuration is stored at `~/.config/gymportal/config.json` and created
//! with defaults on first run. `GYMPORTAL_API_URL` overrides the stored API
//! base URL for the current process.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::guard::RouteTable;

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "gymportal";

const CONFIG_FILE: &str = "config.json";

pub const API_URL_ENV: &str = "GYMPORTAL_API_URL";
pub const EMAIL_ENV: &str = "GYMPORTAL_EMAIL";
pub const PASSWORD_ENV: &str = "GYMPORTAL_PASSWORD";

const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Front desk WhatsApp number used by the contact form.
const DEFAULT_WHATSAPP_PHONE: &str = "542304355852";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub request_timeout_secs: u64,
    /// Keep the session token in the OS keychain instead of a file.
    pub secure_token_storage: bool,
    pub last_email: Option<String>,
    pub whatsapp_phone: String,
    pub routes: RouteTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            secure_token_storage: false,
            last_email: None,
            whatsapp_phone: DEFAULT_WHATSAPP_PHONE.to_string(),
            routes: RouteTable::default(),
        }
    }
}

impl Config {
    /// Load from disk (writing defaults on first run) and apply env overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")?
        } else {
            let config = Self::default();
            config.save()?;
            config
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, contents).context("Failed to write config file")?;
        Ok(())
    }

    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                debug!(url = %url, "API URL taken from environment");
                self.api_url = url.trim().to_string();
            }
        }
    }

    /// The API base URL must be an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_url)
            .with_context(|| format!("Invalid API URL '{}'", self.api_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("API URL must use http or https, got '{}'", url.scheme());
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Session files and logs live here.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Login form prefill: env credentials win over the remembered email.
    pub fn login_prefill(&self) -> (String, String) {
        let email = std::env::var(EMAIL_ENV)
            .ok()
            .or_else(|| self.last_email.clone())
            .unwrap_or_default();
        let password = std::env::var(PASSWORD_ENV).unwrap_or_default();
        (email, password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:3001/api");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(!config.secure_token_storage);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"api_url":"https://api.olimpo.gym/api","last_email":"ana@olimpo.gym"}"#)
                .expect("valid config");
        assert_eq!(config.api_url, "https://api.olimpo.gym/api");
        assert_eq!(config.last_email.as_deref(), Some("ana@olimpo.gym"));
        assert_eq!(config.routes, RouteTable::default());
        assert_eq!(config.whatsapp_phone, "542304355852");
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut config = Config {
            api_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
        config.api_url = "ftp://files.olimpo.gym".to_string();
        assert!(config.validate().is_err());
        config.api_url = "https://api.olimpo.gym/api".to_string();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
