//! Configuration schema types for Relief.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod api;
mod chat;
mod system;

pub use api::*;
pub use chat::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Relief.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct ReliefConfig {
    pub api: ApiConfig,
    pub chat: ChatConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}
