//! Plain-text rendering of the chat screen pieces.

use std::fmt::Write as _;

use crate::backend::Profile;
use crate::chat::{ContextSnippet, Role, Turn};

pub const APP_TITLE: &str = "Migraine RAG Assistant";
pub const CONTEXT_PANEL_TITLE: &str = "Key Facts Used";
pub const CONTEXT_EMPTY_STATE: &str = "Ask a question to see supporting details.";
pub const INPUT_PLACEHOLDER: &str = "Ask about migraine care, triggers, or ways to feel better...";

/// Submit button label for the given busy state.
pub fn ask_label(busy: bool) -> &'static str {
    if busy {
        "Thinking..."
    } else {
        "Ask"
    }
}

pub fn render_turn(turn: &Turn) -> String {
    let speaker = match turn.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    format!("{speaker}> {}", turn.text)
}

/// Title, then `Relevance: N%` when scored, then the content.
pub fn render_context_card(card: &ContextSnippet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## {}", card.title);
    if let Some(percent) = card.relevance_percent() {
        let _ = writeln!(out, "Relevance: {percent}%");
    }
    out.push_str(&card.content);
    out
}

pub fn render_context_panel(cards: &[ContextSnippet]) -> String {
    let mut out = format!("# {CONTEXT_PANEL_TITLE}\n");
    if cards.is_empty() {
        out.push_str(CONTEXT_EMPTY_STATE);
        return out;
    }
    let rendered: Vec<String> = cards.iter().map(render_context_card).collect();
    out.push_str(&rendered.join("\n\n"));
    out
}

pub fn welcome_line(profile: &Profile) -> String {
    format!("Welcome, {}", profile.display_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(title: &str, score: Option<f64>) -> ContextSnippet {
        ContextSnippet {
            title: title.into(),
            content: "Keep a headache diary.".into(),
            score,
        }
    }

    #[test]
    fn turns_are_prefixed_by_speaker() {
        assert_eq!(render_turn(&Turn::user("Why?")), "you> Why?");
        assert_eq!(render_turn(&Turn::assistant("Because.")), "assistant> Because.");
    }

    #[test]
    fn card_shows_rounded_relevance() {
        let text = render_context_card(&card("Triggers", Some(0.873)));
        assert_eq!(text, "## Triggers\nRelevance: 87%\nKeep a headache diary.");
    }

    #[test]
    fn card_without_score_omits_relevance() {
        let text = render_context_card(&card("Source 2", None));
        assert!(!text.contains("Relevance"));
        assert!(text.starts_with("## Source 2\n"));
    }

    #[test]
    fn empty_panel_shows_hint() {
        assert_eq!(
            render_context_panel(&[]),
            "# Key Facts Used\nAsk a question to see supporting details."
        );
    }

    #[test]
    fn panel_keeps_card_order() {
        let text = render_context_panel(&[card("First", None), card("Second", Some(0.5))]);
        let first = text.find("First").unwrap();
        let second = text.find("Second").unwrap();
        assert!(first < second);
        assert!(text.contains("Relevance: 50%"));
        assert!(!text.contains(CONTEXT_EMPTY_STATE));
    }

    #[test]
    fn welcome_prefers_full_name() {
        let profile = Profile {
            email: "taylor@example.com".into(),
            full_name: Some("Taylor".into()),
            ..Default::default()
        };
        assert_eq!(welcome_line(&profile), "Welcome, Taylor");

        let anonymous_name = Profile {
            email: "taylor@example.com".into(),
            ..Default::default()
        };
        assert_eq!(welcome_line(&anonymous_name), "Welcome, taylor@example.com");
    }

    #[test]
    fn ask_label_tracks_busy() {
        assert_eq!(ask_label(true), "Thinking...");
        assert_eq!(ask_label(false), "Ask");
    }
}
