//! Login form flow.

use super::view::{FormView, Navigator, Route};
use super::{message_or, Authenticator};

pub const LOGIN_FAILED: &str = "Login failed";

/// Submit the login form once. Navigates home on success and reports
/// whether it did.
pub async fn submit_login(
    authenticator: &dyn Authenticator,
    email: &str,
    password: &str,
    view: &mut dyn FormView,
    navigator: &dyn Navigator,
) -> bool {
    view.set_loading(true);
    view.set_error("");
    view.set_success("");

    let signed_in = match authenticator.login(email, password).await {
        Ok(_) => {
            navigator.navigate(Route::Home);
            true
        }
        Err(err) => {
            view.set_error(&message_or(&err, LOGIN_FAILED));
            false
        }
    };

    view.set_loading(false);
    signed_in
}
