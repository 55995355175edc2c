//! Client configuration.

use serde::Deserialize;

/// Default backend URL.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for reaching the diagram backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Sent as the `Cookie` header; backend routes need a logged-in session.
    #[serde(default)]
    pub session_cookie: Option<String>,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            session_cookie: None,
        }
    }
}

impl ClientConfig {
    /// Read `CDAG_API_URL`, `CDAG_TIMEOUT_SECS` and `CDAG_SESSION`,
    /// falling back to defaults.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("CDAG_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout_secs = std::env::var("CDAG_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let session_cookie = std::env::var("CDAG_SESSION").ok().filter(|v| !v.is_empty());

        Self {
            base_url,
            timeout_secs,
            session_cookie,
        }
    }

    pub fn with_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }
}
