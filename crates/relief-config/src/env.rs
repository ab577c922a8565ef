//! Environment variable overrides applied on top of the loaded file.

use crate::schema::ReliefConfig;
use tracing::debug;

/// Overrides `api.base_url`.
pub const API_BASE_ENV: &str = "RELIEF_API_BASE";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut ReliefConfig) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

pub(crate) fn apply_overrides_from(
    config: &mut ReliefConfig,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(base) = lookup(API_BASE_ENV).filter(|v| !v.trim().is_empty()) {
        debug!("api.base_url overridden by {API_BASE_ENV}");
        config.api.base_url = base.trim().to_string();
    }
}
