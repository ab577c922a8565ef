//! Pure session state machine.
//!
//! Every token mutation goes through [`Machine::on_token_changed`], which
//! returns the effect to run. Profile lookups are tagged with the epoch they
//! were issued in; a result that arrives after another transition is stale
//! and is dropped by [`Machine::on_profile_resolved`].

use relief_common::SessionExpiredError;

use crate::backend::Profile;

use super::types::Session;

/// Identifies one profile lookup: the token it is for and the transition
/// that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionTicket {
    epoch: u64,
    token: String,
}

impl ResolutionTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Work the caller must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    FetchProfile(ResolutionTicket),
}

/// What happened when a profile lookup completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Profile stored; the session is ready.
    Ready,
    /// Token rejected; session cleared back to anonymous.
    Expired(SessionExpiredError),
    /// A newer transition happened meanwhile; result ignored.
    Stale,
}

#[derive(Debug, Clone)]
pub struct Machine {
    session: Session,
    epoch: u64,
}

impl Machine {
    pub fn new() -> Self {
        Self {
            session: Session::booting(),
            epoch: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Move to a new token. `Some` starts a lookup; `None` settles to
    /// anonymous immediately. Either way any outstanding lookup goes stale.
    pub fn on_token_changed(&mut self, token: Option<String>) -> Effect {
        self.epoch += 1;
        self.session.user = None;

        match token {
            Some(token) => {
                self.session.token = Some(token.clone());
                self.session.loading = true;
                Effect::FetchProfile(ResolutionTicket {
                    epoch: self.epoch,
                    token,
                })
            }
            None => {
                self.session.token = None;
                self.session.loading = false;
                Effect::None
            }
        }
    }

    /// Apply the outcome of the lookup issued with `ticket`.
    pub fn on_profile_resolved(
        &mut self,
        ticket: &ResolutionTicket,
        outcome: Result<Profile, SessionExpiredError>,
    ) -> Resolution {
        if !self.is_current(ticket) {
            return Resolution::Stale;
        }

        match outcome {
            Ok(profile) => {
                self.session.user = Some(profile);
                self.session.loading = false;
                Resolution::Ready
            }
            Err(err) => {
                self.on_token_changed(None);
                Resolution::Expired(err)
            }
        }
    }

    fn is_current(&self, ticket: &ResolutionTicket) -> bool {
        ticket.epoch == self.epoch && self.session.token.as_deref() == Some(ticket.token.as_str())
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
