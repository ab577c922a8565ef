//! Registration form flow with a delayed hand-off to the login screen.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::redirect::{RedirectHandle, RedirectScheduler};
use super::view::{FormView, Navigator, Route};
use super::{message_or, Authenticator};

pub const REGISTRATION_SUCCESS_MESSAGE: &str = "Account created! Redirecting you to sign in…";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(1200);

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Submit the registration form once.
///
/// On success the success message is shown and a redirect to
/// [`Route::Login`] is scheduled; its handle is returned. On failure the
/// error is shown and nothing is scheduled. `loading` is switched off last
/// in both cases.
pub async fn submit_registration(
    registrar: &dyn Authenticator,
    form: &RegistrationForm,
    view: &mut dyn FormView,
    navigator: Arc<dyn Navigator>,
    scheduler: &dyn RedirectScheduler,
    delay: Duration,
) -> Option<RedirectHandle> {
    view.set_error("");
    view.set_success("");
    view.set_loading(true);

    let handle = match registrar
        .register(&form.email, &form.password, &form.full_name)
        .await
    {
        Ok(_) => {
            view.set_success(REGISTRATION_SUCCESS_MESSAGE);
            debug!(?delay, "scheduling redirect to login");
            Some(scheduler.schedule(
                Box::new(move || navigator.navigate(Route::Login)),
                delay,
            ))
        }
        Err(err) => {
            view.set_error(&message_or(&err, REGISTRATION_FAILED));
            None
        }
    };

    view.set_loading(false);
    handle
}

/// Registration screen state: owns at most one pending redirect.
///
/// Any earlier redirect is cancelled before a new submission, and whatever
/// is still pending is cancelled when the flow is dropped.
pub struct RegistrationFlow<S: RedirectScheduler> {
    scheduler: S,
    delay: Duration,
    pending: Option<RedirectHandle>,
}

impl<S: RedirectScheduler> RegistrationFlow<S> {
    pub fn new(scheduler: S, delay: Duration) -> Self {
        Self {
            scheduler,
            delay,
            pending: None,
        }
    }

    /// Returns true when registration succeeded and a redirect is pending.
    pub async fn submit(
        &mut self,
        registrar: &dyn Authenticator,
        form: &RegistrationForm,
        view: &mut dyn FormView,
        navigator: Arc<dyn Navigator>,
    ) -> bool {
        self.cancel_pending();
        self.pending = submit_registration(
            registrar,
            form,
            view,
            navigator,
            &self.scheduler,
            self.delay,
        )
        .await;
        self.pending.is_some()
    }

    pub fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.cancel();
        }
    }

    pub fn pending(&self) -> Option<&RedirectHandle> {
        self.pending.as_ref()
    }
}

impl<S: RedirectScheduler> Drop for RegistrationFlow<S> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
