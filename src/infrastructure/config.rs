//! Connection settings for the analysis service.

/// Fallback when `DASHBOARD_API_URL` was not set at build time
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Root of every route, without a trailing slash
    pub base_url: String,
    /// `0` disables the timeout
    pub request_timeout_ms: u32,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }

    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    /// Base URL baked in at compile time; the browser has no process environment.
    pub fn from_build_env() -> Self {
        let base_url = option_env!("DASHBOARD_API_URL")
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL);
        Self::new(base_url)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_build_env()
    }
}
