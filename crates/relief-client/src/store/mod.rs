//! Durable single-slot storage for the bearer token.

mod file;
mod memory;

use relief_common::StoreError;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

/// One key-value slot holding the current bearer token.
///
/// Calls are synchronous and each one is atomic on its own; the session
/// manager serialises them, so implementations need no extra locking for
/// correctness beyond being `Send + Sync`.
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if one is present.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Replace the persisted token.
    fn save(&self, token: &str) -> Result<(), StoreError>;

    /// Remove the persisted token. Clearing an empty slot is not an error.
    fn clear(&self) -> Result<(), StoreError>;
}
