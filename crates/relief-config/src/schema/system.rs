//! System configuration types: token storage and logging.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Token persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct StorageConfig {
    /// Override for the token file. Defaults to `<data_dir>/relief/token`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_path: Option<PathBuf>,
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
#[derive(Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// `tracing_subscriber` filter directive for this level.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "relief=debug",
            LogLevel::Info => "relief=info",
            LogLevel::Warning => "relief=warn",
            LogLevel::Error => "relief=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
