use serde::{Deserialize, Serialize};

/// Where the assistant backend lives and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL the `/auth/*` and `/chat/*` paths are appended to.
    pub base_url: String,
    /// Connect timeout in seconds (valid range: 1-120).
    pub connect_timeout_secs: u32,
    /// Whole-request timeout in seconds (valid range: 1-600).
    pub request_timeout_secs: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            connect_timeout_secs: 10,
            request_timeout_secs: 60,
        }
    }
}
