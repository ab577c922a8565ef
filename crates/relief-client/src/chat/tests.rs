//! QueryClient behaviour against a scripted backend.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use relief_common::{Event, EventBus, QueryError};
use relief_config::schema::{ChatConfig, DEFAULT_FALLBACK_MESSAGE, DEFAULT_WELCOME_MESSAGE};
use tokio::sync::oneshot;

use super::*;
use crate::backend::{ChatApi, HistoryItem, QueryResponse, RawSnippet};

type Reply = Result<QueryResponse, QueryError>;

/// Answers queries from a script. A scripted entry may be held back behind a
/// oneshot so tests can choose completion order.
#[derive(Default)]
struct ScriptedChat {
    replies: Mutex<VecDeque<(Option<oneshot::Receiver<()>>, Reply)>>,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl ScriptedChat {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn reply(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back((None, reply));
    }

    fn reply_when_released(&self, reply: Reply) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back((Some(rx), reply));
        tx
    }

    fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatApi for ScriptedChat {
    async fn query(
        &self,
        question: &str,
        token: Option<&str>,
    ) -> Result<QueryResponse, QueryError> {
        self.calls
            .lock()
            .unwrap()
            .push((question.to_string(), token.map(String::from)));
        let (gate, reply) = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected query");
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        reply
    }

    async fn history(&self, _token: Option<&str>) -> Result<Vec<HistoryItem>, QueryError> {
        Ok(vec![HistoryItem {
            id: 1,
            question: "What triggers migraines?".into(),
            answer: "Common triggers include stress.".into(),
            created_at: None,
        }])
    }
}

fn answer(text: &str, context: Vec<RawSnippet>) -> Reply {
    Ok(QueryResponse {
        answer: text.into(),
        context,
    })
}

fn snippet(title: Option<&str>, content: &str, score: Option<f64>) -> RawSnippet {
    RawSnippet {
        title: title.map(String::from),
        content: content.into(),
        score,
    }
}

fn client(api: &Arc<ScriptedChat>) -> QueryClient {
    QueryClient::new(api.clone(), &ChatConfig::default())
}

#[test]
fn starts_with_welcome_turn_and_no_context() {
    let api = ScriptedChat::new();
    let chat = client(&api);

    assert_eq!(chat.transcript(), vec![Turn::assistant(DEFAULT_WELCOME_MESSAGE)]);
    assert!(chat.contexts().is_empty());
    assert!(!chat.is_busy());
}

#[tokio::test]
async fn blank_questions_are_ignored() {
    let api = ScriptedChat::new();
    let chat = client(&api);

    assert_eq!(chat.ask("", Some("t")).await, AskOutcome::Ignored);
    assert_eq!(chat.ask("   ", Some("t")).await, AskOutcome::Ignored);
    assert_eq!(chat.ask("\n\t", Some("t")).await, AskOutcome::Ignored);

    assert_eq!(chat.transcript().len(), 1);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn successful_query_appends_two_turns_and_replaces_context() {
    let api = ScriptedChat::new();
    api.reply(answer("X", vec![snippet(None, "Y", None)]));
    let chat = client(&api);

    let outcome = chat.ask("What helps?", Some("token-1")).await;

    assert_eq!(outcome, AskOutcome::Answered);
    let transcript = chat.transcript();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[1], Turn::user("What helps?"));
    assert_eq!(transcript[2], Turn::assistant("X"));
    assert_eq!(
        chat.contexts(),
        vec![ContextSnippet {
            title: "Source 1".into(),
            content: "Y".into(),
            score: None,
        }]
    );
    assert_eq!(
        api.calls(),
        vec![("What helps?".to_string(), Some("token-1".to_string()))]
    );
}

#[tokio::test]
async fn server_order_and_titles_are_preserved() {
    let api = ScriptedChat::new();
    api.reply(answer(
        "Rest in a dark room.",
        vec![
            snippet(Some("Light sensitivity"), "Dim the lights.", Some(0.91)),
            snippet(None, "Sleep regularly.", Some(0.42)),
        ],
    ));
    let chat = client(&api);

    chat.ask("How do I feel better?", None).await;

    let contexts = chat.contexts();
    assert_eq!(contexts[0].title, "Light sensitivity");
    assert_eq!(contexts[0].relevance_percent(), Some(91));
    assert_eq!(contexts[1].title, "Source 2");
    assert_eq!(contexts[1].score, Some(0.42));
}

#[tokio::test]
async fn failed_query_appends_fallback_and_keeps_context() {
    let api = ScriptedChat::new();
    api.reply(answer("First", vec![snippet(Some("Hydration"), "Drink water.", None)]));
    api.reply(Err(QueryError::Api {
        status: 500,
        body: "internal error".into(),
    }));
    let chat = client(&api);

    chat.ask("First question", Some("t")).await;
    let before = chat.contexts();

    let outcome = chat.ask("Second question", Some("t")).await;

    assert!(matches!(outcome, AskOutcome::Failed(QueryError::Api { status: 500, .. })));
    let transcript = chat.transcript();
    assert_eq!(transcript.len(), 5);
    assert_eq!(transcript[3], Turn::user("Second question"));
    assert_eq!(transcript[4], Turn::assistant(DEFAULT_FALLBACK_MESSAGE));
    assert_eq!(chat.contexts(), before);
}

#[tokio::test]
async fn network_failure_also_uses_fallback() {
    let api = ScriptedChat::new();
    api.reply(Err(QueryError::Network("connection refused".into())));
    let chat = client(&api);

    chat.ask("Anyone there?", None).await;

    let transcript = chat.transcript();
    assert_eq!(transcript.last().unwrap().text, DEFAULT_FALLBACK_MESSAGE);
    assert!(chat.contexts().is_empty());
}

#[tokio::test]
async fn user_turn_is_visible_while_query_is_in_flight() {
    let api = ScriptedChat::new();
    let release = api.reply_when_released(answer("Later", vec![]));
    let chat = client(&api);
    chat.set_draft("Is caffeine a trigger?");

    let pending = {
        let chat = chat.clone();
        tokio::spawn(async move { chat.submit(Some("t")).await })
    };
    while api.calls().is_empty() {
        tokio::task::yield_now().await;
    }

    assert!(chat.is_busy());
    assert_eq!(
        chat.transcript().last(),
        Some(&Turn::user("Is caffeine a trigger?"))
    );

    release.send(()).unwrap();
    assert_eq!(pending.await.unwrap(), AskOutcome::Answered);
    assert!(!chat.is_busy());
    assert_eq!(chat.draft(), "");
}

#[tokio::test]
async fn busy_and_draft_clear_after_failure() {
    let api = ScriptedChat::new();
    api.reply(Err(QueryError::Parse("bad json".into())));
    let chat = client(&api);
    chat.set_draft("Why do I get headaches?");

    chat.submit(None).await;

    assert!(!chat.is_busy());
    assert_eq!(chat.draft(), "");
}

#[tokio::test]
async fn overlapping_asks_append_in_completion_order() {
    let api = ScriptedChat::new();
    let release_first = api.reply_when_released(answer("answer one", vec![]));
    let release_second = api.reply_when_released(answer("answer two", vec![]));
    let chat = client(&api);

    let first = {
        let chat = chat.clone();
        tokio::spawn(async move { chat.ask("question one", None).await })
    };
    while api.calls().len() < 1 {
        tokio::task::yield_now().await;
    }
    let second = {
        let chat = chat.clone();
        tokio::spawn(async move { chat.ask("question two", None).await })
    };
    while api.calls().len() < 2 {
        tokio::task::yield_now().await;
    }

    release_second.send(()).unwrap();
    second.await.unwrap();
    assert!(chat.is_busy(), "first query is still in flight");

    release_first.send(()).unwrap();
    first.await.unwrap();

    let texts: Vec<String> = chat.transcript().into_iter().map(|t| t.text).collect();
    assert_eq!(
        &texts[1..],
        &["question one", "question two", "answer two", "answer one"]
    );
    assert!(!chat.is_busy());
}

#[tokio::test]
async fn outcomes_are_published() {
    let api = ScriptedChat::new();
    api.reply(answer("ok", vec![snippet(None, "a", None), snippet(None, "b", None)]));
    api.reply(Err(QueryError::Network("down".into())));
    let bus = Arc::new(EventBus::new(8));
    let mut rx = bus.subscribe();
    let chat = QueryClient::with_events(api.clone(), &ChatConfig::default(), Some(bus));

    chat.ask("one", None).await;
    chat.ask("two", None).await;

    assert!(matches!(rx.recv().await.unwrap(), Event::AnswerReceived { snippets: 2 }));
    assert!(matches!(rx.recv().await.unwrap(), Event::QueryFailed { .. }));
}

#[tokio::test]
async fn history_passes_through() {
    let api = ScriptedChat::new();
    let chat = client(&api);

    let items = chat.history(Some("t")).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].question, "What triggers migraines?");
}

#[tokio::test]
async fn custom_copy_comes_from_config() {
    let api = ScriptedChat::new();
    api.reply(Err(QueryError::Network("down".into())));
    let config = ChatConfig {
        welcome_message: "Hello!".into(),
        fallback_message: "Try later.".into(),
        ..ChatConfig::default()
    };
    let chat = QueryClient::new(api.clone(), &config);

    chat.ask("hi", None).await;

    let texts: Vec<String> = chat.transcript().into_iter().map(|t| t.text).collect();
    assert_eq!(texts, vec!["Hello!", "hi", "Try later."]);
}
