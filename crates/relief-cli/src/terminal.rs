//! Terminal implementations of the form-view and navigation seams, plus the
//! password prompt.

use std::io::{self, Write};

use relief_client::flows::{FormView, Navigator, Route};
use tokio::sync::mpsc;

/// Environment variable consulted before prompting for a password.
pub const PASSWORD_ENV: &str = "RELIEF_PASSWORD";

/// Prints form feedback as lines. Empty messages print nothing; entering
/// the loading state prints a one-line notice.
pub struct TerminalView<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> FormView for TerminalView<W> {
    fn set_error(&mut self, message: &str) {
        if !message.is_empty() {
            let _ = writeln!(self.out, "error: {message}");
        }
    }

    fn set_success(&mut self, message: &str) {
        if !message.is_empty() {
            let _ = writeln!(self.out, "{message}");
        }
    }

    fn set_loading(&mut self, loading: bool) {
        if loading {
            let _ = writeln!(self.out, "Please wait...");
        }
        let _ = self.out.flush();
    }
}

/// Forwards navigation requests to whoever holds the receiver.
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        // The receiver is gone once the command has finished; nothing to do.
        let _ = self.tx.send(route);
    }
}

/// Password from the flag, then the environment, then an interactive prompt.
pub fn resolve_password(flag: Option<String>) -> io::Result<String> {
    resolve_password_with(flag, |key| std::env::var(key).ok(), || {
        rpassword::prompt_password("Password: ")
    })
}

fn resolve_password_with(
    flag: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
    prompt: impl FnOnce() -> io::Result<String>,
) -> io::Result<String> {
    if let Some(password) = flag {
        return Ok(password);
    }
    if let Some(password) = lookup(PASSWORD_ENV).filter(|p| !p.is_empty()) {
        return Ok(password);
    }
    prompt()
}
