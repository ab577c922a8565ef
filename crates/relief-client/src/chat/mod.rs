//! Conversation state and the question/answer protocol.

mod client;
mod guard;
mod types;

#[cfg(test)]
mod tests;

pub use client::{AskOutcome, QueryClient};
pub use types::{ContextSnippet, Role, Turn};
