//! Session and token lifecycle.
//!
//! A [`SessionManager`] holds the bearer token, the profile resolved for it,
//! and a `loading` flag. Token changes are driven through the pure
//! [`Machine`] so that a profile lookup which finishes after a newer login or
//! logout is discarded instead of overwriting the newer state.

mod machine;
mod manager;
mod types;


pub use machine::{Effect, Machine, Resolution, ResolutionTicket};
pub use manager::SessionManager;
pub use types::{Access, Session};
