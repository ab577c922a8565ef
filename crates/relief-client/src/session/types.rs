//! Session snapshot and access-gate types.

use std::fmt;

use crate::backend::Profile;

/// Authenticated identity currently held by the client.
///
/// `user` is only ever `Some` while `token` is `Some` and the profile
/// lookup for that exact token succeeded.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<Profile>,
    /// True exactly while a profile lookup is in flight.
    pub loading: bool,
}

impl Session {
    /// Startup state before the persisted token has been read.
    pub(crate) fn booting() -> Self {
        Self {
            token: None,
            user: None,
            loading: true,
        }
    }

    /// What the presentation layer should show for this state.
    pub fn access(&self) -> Access {
        if self.loading {
            return Access::Loading;
        }
        match self.user {
            Some(ref user) => Access::Granted(user.clone()),
            None => Access::Denied,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .field("loading", &self.loading)
            .finish()
    }
}

/// Route-guard outcome for views that require a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Still resolving; show a loading indicator.
    Loading,
    Granted(Profile),
    /// Anonymous; send the user to the login view.
    Denied,
}
