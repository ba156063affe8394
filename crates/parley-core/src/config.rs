//! Configuration model.

use serde::{Deserialize, Serialize};

/// Default backend address (the development server bind).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default timeout for chat sends, in seconds. Generation can be slow.
pub const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 120;

/// Default timeout for document operations, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Root of the on-disk configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RootConfig {
    /// Backend connection settings.
    pub backend: BackendConfig,
}

/// Connection settings for the chat/retrieval backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout for chat sends, in seconds.
    pub chat_timeout_secs: u64,
    /// Per-request timeout for document list/upload/delete, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_timeout_secs: DEFAULT_CHAT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}
