//! Wiring of config, backend, session, and chat, plus the one-shot commands.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use relief_client::backend::{HistoryItem, HttpBackend};
use relief_client::flows::{submit_login, RegistrationFlow, RegistrationForm, TokioScheduler};
use relief_client::render::{render_context_panel, render_turn, welcome_line};
use relief_client::{Access, AskOutcome, FileTokenStore, Profile, QueryClient, SessionManager};
use relief_common::{Event, EventBus, Result};
use relief_config::schema::ReliefConfig;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info};

use crate::terminal::{resolve_password, ChannelNavigator, TerminalView};

pub struct App {
    pub config: ReliefConfig,
    pub session: SessionManager,
    pub chat: QueryClient,
    events: Arc<EventBus>,
}

impl App {
    /// Must be called from within a Tokio runtime.
    pub fn new(config: ReliefConfig) -> Result<Self> {
        let backend = Arc::new(HttpBackend::new(&config.api)?);
        let token_path = relief_config::token_path(&config)?;
        debug!(path = %token_path.display(), "token store");

        let events = Arc::new(EventBus::default());
        spawn_event_logger(&events);

        let session = SessionManager::init_with_events(
            backend.clone(),
            Arc::new(FileTokenStore::new(token_path)),
            Some(events.clone()),
        );
        let chat = QueryClient::with_events(backend, &config.chat, Some(events.clone()));

        info!(base_url = %config.api.base_url, "client ready");
        Ok(Self {
            config,
            session,
            chat,
            events,
        })
    }

    /// Stop the background event logger.
    pub fn shutdown(&self) {
        self.events.publish(Event::Shutdown);
    }

    /// Wait for the session to settle and return the profile, or explain how
    /// to sign in.
    pub async fn require_profile(&self) -> Option<Profile> {
        self.session.settled().await;
        match self.session.access() {
            Access::Granted(profile) => Some(profile),
            Access::Loading | Access::Denied => {
                eprintln!("Not signed in. Run `relief login <email>` first.");
                None
            }
        }
    }

    pub async fn login(&self, email: &str, password: Option<String>) -> Result<ExitCode> {
        let password = resolve_password(password)?;
        let (navigator, _routes) = ChannelNavigator::new();
        let mut view = TerminalView::new(std::io::stderr());

        if !submit_login(&self.session, email, &password, &mut view, &navigator).await {
            return Ok(ExitCode::FAILURE);
        }

        let settled = self.session.settled().await;
        match settled.user {
            Some(profile) => {
                println!("{}", welcome_line(&profile));
                Ok(ExitCode::SUCCESS)
            }
            None => {
                eprintln!("Signed in, but your profile could not be loaded.");
                Ok(ExitCode::FAILURE)
            }
        }
    }

    pub async fn register(
        &self,
        email: &str,
        full_name: &str,
        password: Option<String>,
    ) -> Result<ExitCode> {
        let form = RegistrationForm {
            email: email.to_string(),
            password: resolve_password(password)?,
            full_name: full_name.to_string(),
        };
        let (navigator, mut routes) = ChannelNavigator::new();
        let mut view = TerminalView::new(std::io::stderr());
        let delay = Duration::from_millis(self.config.chat.redirect_delay_ms);
        let mut flow = RegistrationFlow::new(TokioScheduler, delay);

        if !flow
            .submit(&self.session, &form, &mut view, Arc::new(navigator))
            .await
        {
            return Ok(ExitCode::FAILURE);
        }

        // Keep the flow alive until its redirect fires.
        if let Some(route) = routes.recv().await {
            debug!(route = route.path(), "registration redirect");
        }
        drop(flow);
        println!("You can now sign in with `relief login {email}`.");
        Ok(ExitCode::SUCCESS)
    }

    pub fn logout(&self) -> ExitCode {
        self.session.logout();
        println!("Signed out.");
        ExitCode::SUCCESS
    }

    pub async fn whoami(&self) -> ExitCode {
        match self.require_profile().await {
            Some(profile) => {
                println!("{}", welcome_line(&profile));
                println!("email: {}", profile.email);
                if let Some(ref created) = profile.created_at {
                    println!("member since: {created}");
                }
                ExitCode::SUCCESS
            }
            None => ExitCode::FAILURE,
        }
    }

    pub async fn ask(&self, question: &str) -> ExitCode {
        if self.require_profile().await.is_none() {
            return ExitCode::FAILURE;
        }

        let token = self.session.token();
        let outcome = self.chat.ask(question, token.as_deref()).await;
        if let Some(reply) = self.chat.transcript().last() {
            println!("{}", render_turn(reply));
        }
        match outcome {
            AskOutcome::Answered => {
                println!();
                println!("{}", render_context_panel(&self.chat.contexts()));
                ExitCode::SUCCESS
            }
            AskOutcome::Ignored => {
                eprintln!("Nothing to ask.");
                ExitCode::FAILURE
            }
            AskOutcome::Failed(_) => ExitCode::FAILURE,
        }
    }

    pub async fn history(&self) -> ExitCode {
        if self.require_profile().await.is_none() {
            return ExitCode::FAILURE;
        }

        let token = self.session.token();
        match self.chat.history(token.as_deref()).await {
            Ok(items) if items.is_empty() => {
                println!("No questions yet.");
                ExitCode::SUCCESS
            }
            Ok(items) => {
                for item in &items {
                    println!("{}", render_history_item(item));
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Could not load history: {e}");
                ExitCode::FAILURE
            }
        }
    }
}

fn spawn_event_logger(events: &EventBus) {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(Event::Shutdown) | Err(RecvError::Closed) => break,
                Ok(event) => debug!(?event, "client event"),
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "event logger lagged"),
            }
        }
    });
}

pub fn render_history_item(item: &HistoryItem) -> String {
    let when = item.created_at.as_deref().unwrap_or("-");
    format!("[{when}] Q: {}\n    A: {}", item.question, item.answer)
}
