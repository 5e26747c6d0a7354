//! Client configuration for cinelist
//!
//! Settings live in `settings.json` inside the config directory. Missing
//! fields fall back to defaults and a couple of environment variables can
//! override the file.

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::Paths;

static CLIENT_CONFIG: OnceCell<Arc<RwLock<ClientConfig>>> = OnceCell::new();

pub const ENV_API_URL: &str = "CINELIST_API_URL";
pub const ENV_SESSION_COOKIE: &str = "CINELIST_SESSION_COOKIE";

/// Client configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Base url of the lists API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Raw `Cookie` header value identifying the session
    #[serde(default)]
    pub session_cookie: Option<String>,

    /// Per-request HTTP timeout, 0 disables it
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Deadline for one modal submission, 0 disables it
    #[serde(default = "default_submit_timeout")]
    pub submit_timeout_secs: u64,

    /// Where the sign-in prompt links to
    #[serde(default = "default_sign_in_path")]
    pub sign_in_path: String,

    /// Prefix for poster paths returned by the catalog
    #[serde(default = "default_poster_base_url")]
    pub poster_base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            session_cookie: None,
            request_timeout_secs: default_request_timeout(),
            submit_timeout_secs: default_submit_timeout(),
            sign_in_path: default_sign_in_path(),
            poster_base_url: default_poster_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the settings file in the config directory
    pub fn load() -> Result<Self> {
        let paths = Paths::get()?;
        let mut config = Self::load_from(&paths.settings_path())?;
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from `path`, writing defaults when it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).context("Failed to read settings file")?;
            let config: ClientConfig =
                serde_json::from_str(&content).context("Failed to parse settings file")?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, content).context("Failed to write settings file")?;
        Ok(())
    }

    /// Get the global config instance
    pub fn global() -> Arc<RwLock<ClientConfig>> {
        CLIENT_CONFIG
            .get_or_init(|| {
                let config = ClientConfig::load().unwrap_or_default();
                Arc::new(RwLock::new(config))
            })
            .clone()
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        if let Some(cookie) = lookup(ENV_SESSION_COOKIE).filter(|v| !v.trim().is_empty()) {
            self.session_cookie = Some(cookie);
        }
    }

    /// Deadline for a modal submission, `None` when disabled
    pub fn submit_timeout(&self) -> Option<Duration> {
        (self.submit_timeout_secs > 0).then(|| Duration::from_secs(self.submit_timeout_secs))
    }

    /// Full url of a poster path, `None` for an empty path
    pub fn poster_url(&self, poster: &str) -> Option<String> {
        poster_url(&self.poster_base_url, poster)
    }
}

/// Join a catalog poster path onto `base`; absolute urls pass through
pub fn poster_url(base: &str, poster: &str) -> Option<String> {
    if poster.is_empty() {
        return None;
    }
    if poster.starts_with("http://") || poster.starts_with("https://") {
        return Some(poster.to_string());
    }
    Some(format!(
        "{}/{}",
        base.trim_end_matches('/'),
        poster.trim_start_matches('/')
    ))
}

// Default value functions for serde

fn default_api_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_submit_timeout() -> u64 {
    30
}

fn default_sign_in_path() -> String {
    "/sign-in".to_string()
}

fn default_poster_base_url() -> String {
    "https://www.themoviedb.org/t/p/w220_and_h330_face".to_string()
}

fn default_user_agent() -> String {
    format!("cinelist/{}", env!("CARGO_PKG_VERSION"))
}
