//! Recognition service location.

use ink_core::protocol::CALCULATE_PATH;
use std::time::Duration;

/// Environment variable naming the service base URL.
pub const API_URL_VAR: &str = "INKCALC_API_URL";

/// Used when neither the runtime environment nor the build set a URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Self {
            base_url,
            timeout: Duration::from_secs(30),
        }
    }

    /// `INKCALC_API_URL` from the process environment, then the value baked
    /// in at build time, then [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Self {
        let base = std::env::var(API_URL_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| option_env!("INKCALC_API_URL").map(str::to_string))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the recognition endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{CALCULATE_PATH}", self.base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
