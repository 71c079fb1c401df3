/// Application configuration
///
/// Loaded from `<config dir>/style-intake/config.json`, then overridden by
/// environment variables. Anything missing falls back to defaults.
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub const BACKEND_URL_VAR: &str = "STYLE_INTAKE_BACKEND_URL";
pub const SESSION_COOKIE_VAR: &str = "STYLE_INTAKE_SESSION_COOKIE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the style backend
    pub backend_url: String,
    /// Path of the intake submission endpoint
    pub submit_path: String,
    /// Path of the results page shown after a successful submission
    pub results_path: String,
    pub request_timeout_secs: u64,
    /// Cookie header value for an authenticated backend session
    pub session_cookie: Option<String>,
    /// Longest edge of photo previews, in pixels
    pub preview_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:5000".to_string(),
            submit_path: "/api/onboarding".to_string(),
            results_path: "/results".to_string(),
            request_timeout_secs: 30,
            session_cookie: None,
            preview_size: 320,
        }
    }
}

impl Config {
    /// Load the config file and environment, logging and falling back to
    /// defaults on any problem
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path).unwrap_or_else(|e| {
                warn!("⚠️  {}; using defaults", e);
                Self::default()
            }),
            Some(path) => {
                info!("No config at {}, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| env::var(key).ok());
        config
    }

    /// Where the config file is expected:
    /// - Linux: ~/.config/style-intake/config.json
    /// - macOS: ~/Library/Application Support/style-intake/config.json
    /// - Windows: %APPDATA%\style-intake\config.json
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("style-intake");
        path.push("config.json");
        Some(path)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        // Fail early on a malformed backend URL
        config.submit_url()?;
        info!("📁 Config loaded from {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides through `lookup` (usually `env::var`)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(BACKEND_URL_VAR) {
            info!("{} set, backend is {}", BACKEND_URL_VAR, url);
            self.backend_url = url;
        }
        if let Some(cookie) = lookup(SESSION_COOKIE_VAR) {
            self.session_cookie = Some(cookie);
        }
    }

    pub fn submit_url(&self) -> Result<Url, ConfigError> {
        self.join(&self.submit_path)
    }

    pub fn results_url(&self) -> Result<Url, ConfigError> {
        self.join(&self.results_path)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn join(&self, path: &str) -> Result<Url, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidUrl {
            url: self.backend_url.clone(),
            message,
        };
        let base = Url::parse(&self.backend_url).map_err(|e| invalid(e.to_string()))?;
        base.join(path).map_err(|e| invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_urls() {
        let config = Config::default();
        assert_eq!(
            config.submit_url().unwrap().as_str(),
            "http://127.0.0.1:5000/api/onboarding"
        );
        assert_eq!(config.results_url().unwrap().as_str(), "http://127.0.0.1:5000/results");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "backend_url": "https://style.example.com" }"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.backend_url, "https://style.example.com");
        assert_eq!(config.submit_path, "/api/onboarding");
        assert_eq!(config.preview_size, 320);
    }

    #[test]
    fn test_bad_url_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "backend_url": "not a url" }"#).unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{").unwrap();

        assert!(matches!(Config::from_file(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_environment_overrides() {
        let vars: HashMap<&str, &str> = [
            (BACKEND_URL_VAR, "http://10.0.0.2:8080"),
            (SESSION_COOKIE_VAR, "session=abc"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.backend_url, "http://10.0.0.2:8080");
        assert_eq!(config.session_cookie.as_deref(), Some("session=abc"));
    }
}
