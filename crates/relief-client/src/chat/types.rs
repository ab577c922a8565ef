//! Transcript and context-card types.

use serde::{Deserialize, Serialize};

use crate::backend::RawSnippet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// One piece of evidence behind the latest answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSnippet {
    pub title: String,
    pub content: String,
    /// Probability-like relevance in `[0, 1]`, when the backend sent one.
    pub score: Option<f64>,
}

impl ContextSnippet {
    /// Build from the wire form; `index` is the 0-based server position and
    /// only matters when the title is missing.
    pub fn from_raw(index: usize, raw: RawSnippet) -> Self {
        Self {
            title: raw
                .title
                .unwrap_or_else(|| format!("Source {}", index + 1)),
            content: raw.content,
            score: raw.score,
        }
    }

    /// Score as a whole percentage, e.g. `0.873` -> `87`.
    pub fn relevance_percent(&self) -> Option<i64> {
        self.score
            .filter(|s| s.is_finite())
            .map(|s| (s * 100.0).round() as i64)
    }
}
