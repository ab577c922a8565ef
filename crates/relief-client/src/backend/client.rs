//! HTTP backend struct, URL building, and error-body helpers.

use std::time::Duration;

use relief_common::ReliefError;
use relief_config::schema::ApiConfig;

pub(crate) const LOGIN_PATH: &str = "/auth/login";
pub(crate) const REGISTER_PATH: &str = "/auth/register";
pub(crate) const ME_PATH: &str = "/auth/me";
pub(crate) const QUERY_PATH: &str = "/chat/query";
pub(crate) const HISTORY_PATH: &str = "/chat/history";

pub(crate) const REGISTRATION_FAILED: &str = "Registration failed";

/// reqwest-backed implementation of the backend contract.
pub struct HttpBackend {
    pub(crate) base_url: String,
    pub(crate) http: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &ApiConfig) -> Result<Self, ReliefError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(u64::from(config.connect_timeout_secs)))
            .timeout(Duration::from_secs(u64::from(config.request_timeout_secs)))
            .build()
            .map_err(|e| ReliefError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach `Authorization: Bearer` when a token is available.
    pub(crate) fn authorize(
        request: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Keep error bodies short enough for a log line.
pub(crate) fn truncate_body(text: &str) -> String {
    text.chars().take(200).collect()
}

/// Pull a human-readable message out of a FastAPI-style error body.
///
/// `detail` is either a string or a list of `{ "msg": ... }` validation
/// entries. Anything else yields the generic registration failure.
pub(crate) fn registration_detail(body: &str) -> String {
    let json: serde_json::Value = match serde_json::from_str(body) {
        Ok(json) => json,
        Err(_) => return REGISTRATION_FAILED.to_string(),
    };

    match &json["detail"] {
        serde_json::Value::String(detail) if !detail.trim().is_empty() => detail.clone(),
        serde_json::Value::Array(entries) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry["msg"].as_str())
                .collect();
            if messages.is_empty() {
                REGISTRATION_FAILED.to_string()
            } else {
                messages.join("; ")
            }
        }
        _ => REGISTRATION_FAILED.to_string(),
    }
}
