//! Reading a config file into a `ReliefConfig`.
//!
//! Nothing here validates; [`crate::load_config`] does that once, after
//! environment overrides are applied.

use std::io;
use std::path::Path;

use relief_common::ConfigError;
use tracing::{debug, info};

use super::paths::{create_default_config, default_config_path};
use crate::schema::ReliefConfig;

/// Parse TOML text. `origin` names the source in error messages.
pub(crate) fn parse_config(text: &str, origin: &Path) -> Result<ReliefConfig, ConfigError> {
    toml::from_str(text)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", origin.display())))
}

/// Read and parse the file at `path`. Missing fields take their defaults;
/// a missing file is [`ConfigError::FileNotFound`].
pub fn load_from_path(path: &Path) -> Result<ReliefConfig, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "cannot read {}: {e}",
                path.display()
            )));
        }
    };

    let config = parse_config(&text, path)?;
    debug!(path = %path.display(), "config file read");
    Ok(config)
}

/// Read `<config_dir>/relief/config.toml`, writing the commented template
/// there first if no file exists yet.
pub fn load_default() -> Result<ReliefConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            info!("first run: writing config template to {}", path.display());
            create_default_config(&path)?;
            Ok(ReliefConfig::default())
        }
        other => other,
    }
}
