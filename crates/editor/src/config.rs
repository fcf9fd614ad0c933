use std::time::Duration;

use stationdesk_core::images::DEFAULT_MAX_IMAGE_BYTES;

/// Default display time for success/error notices.
const DEFAULT_NOTICE_AUTO_CLOSE_MS: u64 = 2000;

/// Editor settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Largest accepted local image file, in bytes.
    pub max_image_bytes: usize,
    /// How long a notice stays on screen before closing itself.
    pub notice_auto_close: Duration,
    /// Query passed to the station directory when listing parent candidates.
    pub candidate_query: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            notice_auto_close: Duration::from_millis(DEFAULT_NOTICE_AUTO_CLOSE_MS),
            candidate_query: String::new(),
        }
    }
}

impl EditorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default   |
    /// |------------------------|-----------|
    /// | `MAX_IMAGE_BYTES`      | `5242880` |
    /// | `NOTICE_AUTO_CLOSE_MS` | `2000`    |
    /// | `CANDIDATE_QUERY`      | (empty)   |
    ///
    /// Unparseable numbers fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let max_image_bytes = std::env::var("MAX_IMAGE_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_image_bytes);

        let notice_auto_close = std::env::var("NOTICE_AUTO_CLOSE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.notice_auto_close);

        let candidate_query = std::env::var("CANDIDATE_QUERY").unwrap_or(defaults.candidate_query);

        Self {
            max_image_bytes,
            notice_auto_close,
            candidate_query,
        }
    }
}
