//! QueryClient: transcript, latest context cards, busy flag, pending input.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use relief_common::{new_correlation_id, Event, EventBus, QueryError};
use relief_config::schema::ChatConfig;
use tracing::{debug, info_span, warn, Instrument};

use crate::backend::{ChatApi, HistoryItem};

use super::guard::BusyGuard;
use super::types::{ContextSnippet, Turn};

/// Result of one `ask`. Failures are already reflected in the transcript;
/// this only tells the caller which path was taken.
#[derive(Debug, Clone, PartialEq)]
pub enum AskOutcome {
    /// Blank question; nothing happened.
    Ignored,
    Answered,
    /// The fallback reply was appended in place of an answer.
    Failed(QueryError),
}

#[derive(Debug, Clone)]
struct Conversation {
    transcript: Vec<Turn>,
    contexts: Vec<ContextSnippet>,
    draft: String,
}

struct Inner {
    api: Arc<dyn ChatApi>,
    conversation: Mutex<Conversation>,
    in_flight: AtomicUsize,
    fallback_message: String,
    events: Option<Arc<EventBus>>,
}

/// Shared handle to one conversation. Clones see the same transcript.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

impl QueryClient {
    pub fn new(api: Arc<dyn ChatApi>, config: &ChatConfig) -> Self {
        Self::with_events(api, config, None)
    }

    pub fn with_events(
        api: Arc<dyn ChatApi>,
        config: &ChatConfig,
        events: Option<Arc<EventBus>>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                conversation: Mutex::new(Conversation {
                    transcript: vec![Turn::assistant(config.welcome_message.clone())],
                    contexts: Vec::new(),
                    draft: String::new(),
                }),
                in_flight: AtomicUsize::new(0),
                fallback_message: config.fallback_message.clone(),
                events,
            }),
        }
    }

    fn conversation(&self) -> MutexGuard<'_, Conversation> {
        self.inner
            .conversation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Ask one question.
    ///
    /// The user turn is appended before the request goes out. On success the
    /// answer is appended and the context cards are replaced; on failure the
    /// fallback reply is appended and the cards are left as they were.
    /// Overlapping calls are not serialised: replies land in completion order.
    pub async fn ask(&self, question: &str, token: Option<&str>) -> AskOutcome {
        if question.trim().is_empty() {
            return AskOutcome::Ignored;
        }

        let span = info_span!("ask", cid = %new_correlation_id());
        async move {
            self.conversation().transcript.push(Turn::user(question));
            let outcome = {
                let _busy = BusyGuard::acquire(&self.inner.in_flight);
                self.run_query(question, token).await
            };
            self.conversation().draft.clear();
            outcome
        }
        .instrument(span)
        .await
    }

    async fn run_query(&self, question: &str, token: Option<&str>) -> AskOutcome {
        debug!(chars = question.chars().count(), "sending question");

        match self.inner.api.query(question, token).await {
            Ok(response) => {
                let contexts: Vec<ContextSnippet> = response
                    .context
                    .into_iter()
                    .enumerate()
                    .map(|(index, raw)| ContextSnippet::from_raw(index, raw))
                    .collect();
                let snippets = contexts.len();
                {
                    let mut conversation = self.conversation();
                    conversation.transcript.push(Turn::assistant(response.answer));
                    conversation.contexts = contexts;
                }
                debug!(snippets, "answer received");
                self.publish(Event::AnswerReceived { snippets });
                AskOutcome::Answered
            }
            Err(err) => {
                warn!("query failed: {err}");
                self.conversation()
                    .transcript
                    .push(Turn::assistant(self.inner.fallback_message.clone()));
                self.publish(Event::QueryFailed {
                    message: err.to_string(),
                });
                AskOutcome::Failed(err)
            }
        }
    }

    /// Ask whatever is currently in the pending input.
    pub async fn submit(&self, token: Option<&str>) -> AskOutcome {
        let question = self.draft();
        self.ask(&question, token).await
    }

    /// Fetch the signed-in user's past questions, newest first.
    pub async fn history(&self, token: Option<&str>) -> Result<Vec<HistoryItem>, QueryError> {
        self.inner.api.history(token).await
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        self.conversation().draft = text.into();
    }

    pub fn draft(&self) -> String {
        self.conversation().draft.clone()
    }

    pub fn transcript(&self) -> Vec<Turn> {
        self.conversation().transcript.clone()
    }

    /// Evidence behind the most recent successful answer.
    pub fn contexts(&self) -> Vec<ContextSnippet> {
        self.conversation().contexts.clone()
    }

    /// True while any query is in flight.
    pub fn is_busy(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire) > 0
    }

    fn publish(&self, event: Event) {
        if let Some(ref bus) = self.inner.events {
            bus.publish(event);
        }
    }
}
