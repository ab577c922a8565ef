//! Relief configuration system.
//!
//! TOML-based configuration with environment overrides and validation.
//! All sections use defaults, so a partial (or missing) file works.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! let config = relief_config::load_config(None).expect("failed to load config");
//! println!("{}", config.api.base_url);
//! ```

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use env::{apply_env_overrides, API_BASE_ENV};
pub use schema::{ReliefConfig, CONFIG_SCHEMA_VERSION};
pub use toml_loader::{default_config_path, default_token_path};

use relief_common::ConfigError;
use std::path::{Path, PathBuf};

/// Load config from `path`, or from the platform default path when `None`.
///
/// An explicit path must exist. The default path is created from the
/// commented template on first run. Environment overrides are applied
/// before the result is validated.
pub fn load_config(path: Option<&Path>) -> Result<ReliefConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };

    apply_env_overrides(&mut config);
    validation::validate(&config)?;
    Ok(config)
}

/// Token file location: the configured override, else the platform default.
pub fn token_path(config: &ReliefConfig) -> Result<PathBuf, ConfigError> {
    match config.storage.token_path {
        Some(ref path) => Ok(path.clone()),
        None => default_token_path(),
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &ReliefConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
