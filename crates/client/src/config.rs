use std::time::Duration;

/// HTTP client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the console API, without a trailing slash.
    pub base_url: String,
    /// Bearer token attached to every request, if any.
    pub api_token: Option<String>,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            api_token: None,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                     |
    /// |------------------------|-----------------------------|
    /// | `STATION_API_URL`      | `http://localhost:8080/api` |
    /// | `STATION_API_TOKEN`    | (none)                      |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                        |
    pub fn from_env() -> Self {
        let base_url = std::env::var("STATION_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080/api".into());

        let api_token = std::env::var("STATION_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Self {
            base_url: normalize_base_url(base_url),
            api_token,
            request_timeout: Duration::from_secs(request_timeout_secs),
        }
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
