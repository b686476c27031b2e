use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};

/// Client-side view of the application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
}

impl Config {
    /// Load from the config file and environment.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            app: AppConfig::load()?,
        })
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self {
            app: builder.build()?,
        })
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.app.api_url, path.trim_start_matches('/'))
    }

    /// Base URL without the `/api/v1` suffix; media paths are relative to it.
    pub fn origin(&self) -> &str {
        self.app.api_origin()
    }

    /// Make a server-supplied file or media URL absolute.
    ///
    /// Absolute URLs pass through; anything else is joined to the origin.
    pub fn absolute_url(&self, raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Some(raw.to_string());
        }
        let slash = if raw.starts_with('/') { "" } else { "/" };
        Some(format!("{}{}{}", self.origin(), slash, raw))
    }

    pub fn cookie_mode(&self) -> bool {
        self.app.cookie_mode
    }
}
