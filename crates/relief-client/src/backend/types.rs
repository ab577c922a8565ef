//! Wire types for the assistant backend.

use std::fmt;

use serde::{Deserialize, Serialize};

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Body returned by `/auth/login` and `/auth/register`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// JSON body for `/auth/register`.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("full_name", &self.full_name)
            .finish()
    }
}

/// The signed-in user as reported by `/auth/me`.
///
/// Every field is optional on the wire; an unexpected but well-formed
/// profile still counts as a successful resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    /// Server timestamp, kept as the raw string the backend sent.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Profile {
    /// Full name when present, otherwise the email address.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct QueryRequest<'a> {
    pub question: &'a str,
}

/// Body returned by `/chat/query`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    #[serde(default)]
    pub context: Vec<RawSnippet>,
}

/// One retrieved snippet exactly as the backend sent it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSnippet {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: Option<f64>,
}

/// One entry of `/chat/history`, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: i64,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub created_at: Option<String>,
}
