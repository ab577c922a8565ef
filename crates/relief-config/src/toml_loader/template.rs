//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Relief Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[api]
# base_url = "http://localhost:8000"   # also settable via RELIEF_API_BASE
# connect_timeout_secs = 10            # 1-120
# request_timeout_secs = 60            # 1-600

[chat]
# welcome_message = "Hi there! I am here to help answer your migraine questions in a teen-friendly way. Ask me anything!"
# fallback_message = "Sorry, I had trouble reaching the assistant. Please try again in a moment."
# redirect_delay_ms = 1200             # 0-60000

[storage]
# token_path = "/path/to/token"        # default: <data dir>/relief/token

[logging]
# level = "INFO"                       # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
