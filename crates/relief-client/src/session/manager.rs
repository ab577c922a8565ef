//! SessionManager: owns the token, the resolved profile, and `loading`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use relief_common::{AuthError, Event, EventBus};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::backend::{AuthApi, AuthResponse, RegisterRequest};
use crate::store::TokenStore;

use super::machine::{Effect, Machine, Resolution, ResolutionTicket};
use super::types::{Access, Session};

/// Shared handle to the session. Cloning is cheap and every clone sees the
/// same state.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn TokenStore>,
    machine: Mutex<Machine>,
    state_tx: watch::Sender<Session>,
    events: Option<Arc<EventBus>>,
}

impl SessionManager {
    /// Read the persisted token once and start resolving it.
    ///
    /// Must be called from within a Tokio runtime: profile lookups run as
    /// spawned tasks.
    pub fn init(api: Arc<dyn AuthApi>, store: Arc<dyn TokenStore>) -> Self {
        Self::init_with_events(api, store, None)
    }

    pub fn init_with_events(
        api: Arc<dyn AuthApi>,
        store: Arc<dyn TokenStore>,
        events: Option<Arc<EventBus>>,
    ) -> Self {
        let persisted = match store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!("failed to read persisted token, starting anonymous: {e}");
                None
            }
        };

        let (state_tx, _) = watch::channel(Session::booting());
        let manager = Self {
            inner: Arc::new(Inner {
                api,
                store,
                machine: Mutex::new(Machine::new()),
                state_tx,
                events,
            }),
        };

        debug!(has_token = persisted.is_some(), "session init");
        // The token came from the store, so there is nothing to write back.
        manager.inner.transition(persisted, false);
        manager
    }

    /// Exchange credentials for a token and start resolving the profile.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let response = self.inner.api.login(email, password).await?;
        info!("login succeeded");
        self.acquire(&response);
        Ok(response)
    }

    /// Create an account; on success behaves exactly like [`Self::login`].
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<AuthResponse, AuthError> {
        let request = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.to_string(),
        };
        let response = self.inner.api.register(&request).await?;
        info!("registration succeeded");
        self.acquire(&response);
        Ok(response)
    }

    /// Drop the token and profile. Synchronous, idempotent, no network.
    pub fn logout(&self) {
        self.inner.transition(None, true);
        info!("logged out");
        self.inner.publish(Event::LoggedOut);
    }

    fn acquire(&self, response: &AuthResponse) {
        self.inner
            .transition(Some(response.access_token.clone()), true);
        self.inner.publish(Event::TokenAcquired);
    }

    /// Current state.
    pub fn snapshot(&self) -> Session {
        self.inner.machine().session().clone()
    }

    /// Current bearer token, for attaching to queries.
    pub fn token(&self) -> Option<String> {
        self.inner.machine().session().token.clone()
    }

    pub fn access(&self) -> Access {
        self.snapshot().access()
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state_tx.subscribe()
    }

    /// Wait until no profile lookup is in flight and return that state.
    pub async fn settled(&self) -> Session {
        let mut rx = self.subscribe();
        let settled = rx.wait_for(|session| !session.loading).await;
        match settled {
            Ok(session) => session.clone(),
            Err(_) => self.snapshot(),
        }
    }
}

impl Inner {
    fn machine(&self) -> MutexGuard<'_, Machine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: Event) {
        if let Some(ref bus) = self.events {
            bus.publish(event);
        }
    }

    /// Persist, update in memory, and broadcast under one critical section,
    /// then kick off any profile lookup.
    fn transition(self: &Arc<Self>, token: Option<String>, persist: bool) {
        let (effect, snapshot) = {
            let mut machine = self.machine();
            if persist {
                self.persist(token.as_deref());
            }
            let effect = machine.on_token_changed(token);
            let snapshot = machine.session().clone();
            self.state_tx.send_replace(snapshot.clone());
            (effect, snapshot)
        };

        debug!(loading = snapshot.loading, "session transition");

        if let Effect::FetchProfile(ticket) = effect {
            let inner = Arc::clone(self);
            tokio::spawn(async move { inner.resolve(ticket).await });
        }
    }

    fn persist(&self, token: Option<&str>) {
        let result = match token {
            Some(token) => self.store.save(token),
            None => self.store.clear(),
        };
        if let Err(e) = result {
            warn!("failed to update persisted token: {e}");
        }
    }

    async fn resolve(self: Arc<Self>, ticket: ResolutionTicket) {
        debug!(epoch = ticket.epoch(), "resolving profile");
        let outcome = self.api.fetch_profile(ticket.token()).await;

        let mut machine = self.machine();
        let resolution = machine.on_profile_resolved(&ticket, outcome);
        match resolution {
            Resolution::Stale => {
                debug!(epoch = ticket.epoch(), "discarding stale profile lookup");
                return;
            }
            Resolution::Ready => {
                let email = machine
                    .session()
                    .user
                    .as_ref()
                    .map(|u| u.email.clone())
                    .unwrap_or_default();
                info!("profile resolved");
                self.publish(Event::ProfileResolved { email });
            }
            Resolution::Expired(ref err) => {
                self.persist(None);
                warn!("{err}; signing out");
                self.publish(Event::SessionExpired {
                    reason: err.reason.clone(),
                });
            }
        }
        self.state_tx.send_replace(machine.session().clone());
    }
}
