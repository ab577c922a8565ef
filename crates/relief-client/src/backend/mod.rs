//! Assistant backend contract.
//!
//! The session manager only needs [`AuthApi`] and the query client only
//! needs [`ChatApi`]; [`HttpBackend`] implements both over HTTP.

mod api;
mod client;
mod types;

use async_trait::async_trait;
use relief_common::{AuthError, QueryError, SessionExpiredError};

pub use client::HttpBackend;
pub use types::{
    AuthResponse, HistoryItem, Profile, QueryResponse, RawSnippet, RegisterRequest,
};

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /auth/login`. Any non-success status is `InvalidCredentials`.
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError>;

    /// `POST /auth/register`. Failures carry the backend's `detail`.
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AuthError>;

    /// `GET /auth/me`. Any failure means the token is no longer usable.
    async fn fetch_profile(&self, token: &str) -> Result<Profile, SessionExpiredError>;
}

#[async_trait]
pub trait ChatApi: Send + Sync {
    /// `POST /chat/query`.
    async fn query(&self, question: &str, token: Option<&str>)
        -> Result<QueryResponse, QueryError>;

    /// `GET /chat/history`.
    async fn history(&self, token: Option<&str>) -> Result<Vec<HistoryItem>, QueryError>;
}
