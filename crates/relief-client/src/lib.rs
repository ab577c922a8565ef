//! Client core for the Relief migraine assistant.
//!
//! Provides:
//! - An HTTP backend over the assistant's auth and chat endpoints
//! - Token persistence (file-backed, plus an in-memory store for tests)
//! - Session management with passive profile re-resolution
//! - A query client that keeps the transcript and the latest context cards
//! - Login and registration form flows, and plain-text rendering

pub mod backend;
pub mod chat;
pub mod flows;
pub mod render;
pub mod session;
pub mod store;

pub use backend::{AuthApi, ChatApi, HttpBackend, Profile};
pub use chat::{AskOutcome, ContextSnippet, QueryClient, Role, Turn};
pub use flows::{Authenticator, FormView, Navigator, RegistrationFlow, Route};
pub use session::{Access, Session, SessionManager};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
