//! Full configuration validation.
//!
//! Every check pushes onto one list so the user sees all problems at once.

mod helpers;


use crate::schema::ReliefConfig;
use relief_common::ConfigError;

use helpers::{validate_not_blank, validate_range};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ReliefConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_api(&mut errors, config);
    validate_chat(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_api(errors: &mut Vec<String>, config: &ReliefConfig) {
    let base_url = config.api.base_url.trim();
    if base_url.is_empty() {
        errors.push("api.base_url must not be empty".into());
    } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(format!(
            "api.base_url = {base_url} must start with http:// or https://"
        ));
    }

    validate_range(
        errors,
        "api.connect_timeout_secs",
        config.api.connect_timeout_secs,
        1,
        120,
    );
    validate_range(
        errors,
        "api.request_timeout_secs",
        config.api.request_timeout_secs,
        1,
        600,
    );
}

fn validate_chat(errors: &mut Vec<String>, config: &ReliefConfig) {
    validate_not_blank(errors, "chat.welcome_message", &config.chat.welcome_message);
    validate_not_blank(errors, "chat.fallback_message", &config.chat.fallback_message);
    validate_range(
        errors,
        "chat.redirect_delay_ms",
        config.chat.redirect_delay_ms,
        0,
        60_000,
    );
}
