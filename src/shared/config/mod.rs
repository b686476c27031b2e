//! Application configuration module
//!
//! Provides the configuration types for the client. Values come from the
//! builder defaults, then an optional TOML file, then environment variables
//! (`API_URL`, `APP_ENV`, `JWT_COOKIE`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api/v1/";

/// Default HTTP timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Session is dropped after this long without user input.
pub const DEFAULT_INACTIVITY_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Rows per page for every paginated list.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// API base URL, always ending with `/`
    pub api_url: String,
    /// Deployment environment label (`development`, `production`, ...)
    pub app_env: String,
    /// Refresh tokens travel in cookies instead of the token store
    pub cookie_mode: bool,
    pub request_timeout: Duration,
    pub inactivity_timeout: Duration,
    pub page_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            app_env: "development".to_string(),
            cookie_mode: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            inactivity_timeout: DEFAULT_INACTIVITY_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load the config file (when present) and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = AppConfig::builder();
        if let Some(path) = default_config_path() {
            if path.exists() {
                builder = builder.merge_file(&path)?;
            }
        }
        builder.merge_env().build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.api_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.api_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "{}: unsupported scheme {}",
                self.api_url,
                url.scheme()
            )));
        }
        if self.page_size == 0 {
            return Err(ConfigError::MissingValue("page_size"));
        }
        Ok(())
    }

    /// Scheme + host + port of the API, i.e. the base URL without `/api/v1/`.
    ///
    /// Media paths returned by the backend (avatars) are relative to it.
    pub fn api_origin(&self) -> &str {
        let trimmed = self.api_url.trim_end_matches('/');
        trimmed.strip_suffix("/api/v1").unwrap_or(trimmed)
    }
}

/// `<config_dir>/lgpd-mobile/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lgpd-mobile").join("config.toml"))
}

/// Ensure a trailing slash so relative paths append instead of replacing the
/// last segment.
pub fn normalize_api_url(url: &str) -> String {
    let url = url.trim();
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

/// On-disk representation; every key is optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_url: Option<String>,
    app_env: Option<String>,
    cookie_mode: Option<bool>,
    request_timeout_secs: Option<u64>,
    inactivity_timeout_mins: Option<u64>,
    page_size: Option<u32>,
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    api_url: Option<String>,
    app_env: Option<String>,
    cookie_mode: Option<bool>,
    request_timeout: Option<Duration>,
    inactivity_timeout: Option<Duration>,
    page_size: Option<u32>,
}

impl AppConfigBuilder {
    /// Set the API base URL
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn app_env(mut self, env: impl Into<String>) -> Self {
        self.app_env = Some(env.into());
        self
    }

    pub fn cookie_mode(mut self, enabled: bool) -> Self {
        self.cookie_mode = Some(enabled);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn inactivity_timeout(mut self, timeout: Duration) -> Self {
        self.inactivity_timeout = Some(timeout);
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Layer values from a TOML file over the current ones.
    pub fn merge_file(self, path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        self.merge_toml(&raw)
    }

    pub fn merge_toml(mut self, raw: &str) -> Result<Self, ConfigError> {
        let file: FileConfig =
            toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if let Some(url) = file.api_url {
            self.api_url = Some(url);
        }
        if let Some(env) = file.app_env {
            self.app_env = Some(env);
        }
        if let Some(cookie) = file.cookie_mode {
            self.cookie_mode = Some(cookie);
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(mins) = file.inactivity_timeout_mins {
            self.inactivity_timeout = Some(Duration::from_secs(mins * 60));
        }
        if let Some(size) = file.page_size {
            self.page_size = Some(size);
        }
        Ok(self)
    }

    /// Apply `API_URL`, `APP_ENV` and `JWT_COOKIE` from the process environment.
    pub fn merge_env(self) -> Self {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    fn merge_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = var("API_URL").filter(|v| !v.trim().is_empty()) {
            self.api_url = Some(url);
        }
        if let Some(env) = var("APP_ENV").filter(|v| !v.trim().is_empty()) {
            self.app_env = Some(env);
        }
        if let Some(cookie) = var("JWT_COOKIE") {
            self.cookie_mode = Some(cookie.trim().eq_ignore_ascii_case("true"));
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            api_url: self
                .api_url
                .map(|u| normalize_api_url(&u))
                .unwrap_or(defaults.api_url),
            app_env: self.app_env.unwrap_or(defaults.app_env),
            cookie_mode: self.cookie_mode.unwrap_or(defaults.cookie_mode),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            inactivity_timeout: self
                .inactivity_timeout
                .unwrap_or(defaults.inactivity_timeout),
            page_size: self.page_size.unwrap_or(defaults.page_size),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("cannot read config file: {0}")]
    Io(String),
    #[error("cannot parse config file: {0}")]
    Parse(String),
}
