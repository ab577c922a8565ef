use serde::{Deserialize, Serialize};

pub const DEFAULT_WELCOME_MESSAGE: &str = "Hi there! I am here to help answer your migraine questions in a teen-friendly way. Ask me anything!";

pub const DEFAULT_FALLBACK_MESSAGE: &str =
    "Sorry, I had trouble reaching the assistant. Please try again in a moment.";

/// Conversation copy and flow timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Synthetic assistant turn every conversation starts with.
    pub welcome_message: String,
    /// Assistant turn appended when a query fails.
    pub fallback_message: String,
    /// Delay before leaving the registration screen (valid range: 0-60000).
    pub redirect_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            welcome_message: DEFAULT_WELCOME_MESSAGE.into(),
            fallback_message: DEFAULT_FALLBACK_MESSAGE.into(),
            redirect_delay_ms: 1200,
        }
    }
}
