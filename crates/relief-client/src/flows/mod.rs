//! Login and registration form flows, independent of any UI toolkit.
//!
//! A flow drives a [`FormView`] (error, success, and loading indicators) and
//! a [`Navigator`], calling into an [`Authenticator`] for the actual work.

mod login;
mod redirect;
mod registration;
mod view;

use async_trait::async_trait;
use relief_common::AuthError;

use crate::backend::AuthResponse;
use crate::session::SessionManager;

pub use login::{submit_login, LOGIN_FAILED};
pub use redirect::{
    ImmediateScheduler, RedirectCallback, RedirectHandle, RedirectScheduler, TokioScheduler,
};
pub use registration::{
    submit_registration, RegistrationFlow, RegistrationForm, DEFAULT_REDIRECT_DELAY,
    REGISTRATION_FAILED, REGISTRATION_SUCCESS_MESSAGE,
};
pub use view::{FormView, Navigator, Route};

/// The authentication operations the forms need.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError>;

    async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<AuthResponse, AuthError>;
}

#[async_trait]
impl Authenticator for SessionManager {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        SessionManager::login(self, email, password).await
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<AuthResponse, AuthError> {
        SessionManager::register(self, email, password, full_name).await
    }
}

/// Error text to show for a failed call, or `fallback` when it has none.
pub(crate) fn message_or(err: &AuthError, fallback: &str) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
