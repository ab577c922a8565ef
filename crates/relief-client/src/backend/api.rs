//! `AuthApi` / `ChatApi` implementations for `HttpBackend`.

use async_trait::async_trait;
use relief_common::{AuthError, QueryError, SessionExpiredError};
use tracing::debug;

use super::client::{
    registration_detail, truncate_body, HttpBackend, HISTORY_PATH, LOGIN_PATH, ME_PATH,
    QUERY_PATH, REGISTER_PATH,
};
use super::types::{
    AuthResponse, HistoryItem, Profile, QueryRequest, QueryResponse, RegisterRequest,
};
use super::{AuthApi, ChatApi};

#[async_trait]
impl AuthApi for HttpBackend {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        debug!(url = %self.url(LOGIN_PATH), "login request");

        let response = self
            .http
            .post(self.url(LOGIN_PATH))
            .form(&[("username", email), ("password", password)])
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        response
            .json::<AuthResponse>()
            .await
            .map_err(|e| AuthError::Parse(e.to_string()))
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AuthError> {
        debug!(url = %self.url(REGISTER_PATH), "register request");

        let response = self
            .http
            .post(self.url(REGISTER_PATH))
            .json(request)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(%status, body = %truncate_body(&text), "registration rejected");
            return Err(AuthError::Registration(registration_detail(&text)));
        }

        response
            .json::<AuthResponse>()
            .await
            .map_err(|e| AuthError::Parse(e.to_string()))
    }

    async fn fetch_profile(&self, token: &str) -> Result<Profile, SessionExpiredError> {
        debug!(url = %self.url(ME_PATH), "profile request");

        let response = self
            .http
            .get(self.url(ME_PATH))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| SessionExpiredError::new(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionExpiredError::new(format!("HTTP {status}")));
        }

        response
            .json::<Profile>()
            .await
            .map_err(|e| SessionExpiredError::new(format!("unreadable profile: {e}")))
    }
}

#[async_trait]
impl ChatApi for HttpBackend {
    async fn query(
        &self,
        question: &str,
        token: Option<&str>,
    ) -> Result<QueryResponse, QueryError> {
        debug!(url = %self.url(QUERY_PATH), "chat query request");

        let request = self
            .http
            .post(self.url(QUERY_PATH))
            .json(&QueryRequest { question });
        let response = Self::authorize(request, token)
            .send()
            .await
            .map_err(|e| QueryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(QueryError::Api {
                status: status.as_u16(),
                body: truncate_body(&text),
            });
        }

        response
            .json::<QueryResponse>()
            .await
            .map_err(|e| QueryError::Parse(e.to_string()))
    }

    async fn history(&self, token: Option<&str>) -> Result<Vec<HistoryItem>, QueryError> {
        debug!(url = %self.url(HISTORY_PATH), "chat history request");

        let request = self.http.get(self.url(HISTORY_PATH));
        let response = Self::authorize(request, token)
            .send()
            .await
            .map_err(|e| QueryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(QueryError::Api {
                status: status.as_u16(),
                body: truncate_body(&text),
            });
        }

        response
            .json::<Vec<HistoryItem>>()
            .await
            .map_err(|e| QueryError::Parse(e.to_string()))
    }
}
