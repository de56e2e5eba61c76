//! Engine Configuration
//!
//! Environment-driven configuration, matching how the rest of the process
//! is expected to be deployed (no config file; a `.env`-style environment).

use std::time::Duration;

/// Default catalog API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.poiskkino.dev/v1.4";

/// Default outbound request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Engine configuration
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Catalog API credential; requests short-circuit without it
    pub api_key: Option<String>,
    /// Catalog API base URL
    pub base_url: String,
    /// Bound on every outbound catalog request
    pub timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables
    ///
    /// `CINESCOUT_API_KEY` (falling back to the legacy `POISKINO_API_KEY`),
    /// `CINESCOUT_API_URL`, and `CINESCOUT_HTTP_TIMEOUT_SECS`.
    #[must_use]
    pub fn from_env() -> Self {
        let api_key = std::env::var("CINESCOUT_API_KEY")
            .or_else(|_| std::env::var("POISKINO_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());
        let base_url =
            std::env::var("CINESCOUT_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_secs = std::env::var("CINESCOUT_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            api_key,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}
