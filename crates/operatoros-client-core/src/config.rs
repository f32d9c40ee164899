use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CHAT_ENDPOINT: &str = "/ai_chat";
pub const DEFAULT_GOAL_ENDPOINT: &str = "/create_goal";
pub const DEFAULT_RATING_ENDPOINT: &str = "/rate_response";
pub const DEFAULT_HISTORY_STORAGE_KEY: &str = "aiResponseHistory";
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const DEFAULT_TOAST_TTL_MS: u64 = 5_000;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 2_000;
pub const DEFAULT_TIMESTAMP_REFRESH_MS: u64 = 30_000;
pub const DEFAULT_GOAL_RELOAD_DELAY_MS: u64 = 1_000;
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_SERVICE_WORKER_PATH: &str = "/service-worker.js";

/// Page-level client settings.
///
/// Every field has a default, so a page may override any subset through a
/// JSON object and leave the rest alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub chat_endpoint: String,
    pub goal_endpoint: String,
    pub rating_endpoint: String,
    pub history_storage_key: String,
    pub history_limit: usize,
    pub toast_ttl_ms: u64,
    pub search_debounce_ms: u64,
    pub autosave_debounce_ms: u64,
    pub timestamp_refresh_ms: u64,
    pub goal_reload_delay_ms: u64,
    pub max_upload_bytes: u64,
    pub service_worker_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            chat_endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            goal_endpoint: DEFAULT_GOAL_ENDPOINT.to_string(),
            rating_endpoint: DEFAULT_RATING_ENDPOINT.to_string(),
            history_storage_key: DEFAULT_HISTORY_STORAGE_KEY.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            toast_ttl_ms: DEFAULT_TOAST_TTL_MS,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            autosave_debounce_ms: DEFAULT_AUTOSAVE_DEBOUNCE_MS,
            timestamp_refresh_ms: DEFAULT_TIMESTAMP_REFRESH_MS,
            goal_reload_delay_ms: DEFAULT_GOAL_RELOAD_DELAY_MS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            service_worker_path: DEFAULT_SERVICE_WORKER_PATH.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid client config: {0}")]
pub struct ConfigError(#[from] serde_json::Error);

impl ClientConfig {
    /// Parses a page-supplied override object. Unknown keys are ignored.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(raw)?;
        config.history_limit = config.history_limit.max(1);
        Ok(config)
    }

    #[must_use]
    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ttl_ms)
    }

    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    #[must_use]
    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }

    #[must_use]
    pub fn timestamp_refresh(&self) -> Duration {
        Duration::from_millis(self.timestamp_refresh_ms)
    }

    #[must_use]
    pub fn goal_reload_delay(&self) -> Duration {
        Duration::from_millis(self.goal_reload_delay_ms)
    }
}
