use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures from `login` / `register`. These are user-correctable and the
/// `Display` text is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Carries the backend's `detail` message, or the generic fallback.
    #[error("{0}")]
    Registration(String),

    #[error("unable to reach the server: {0}")]
    Network(String),

    #[error("unexpected response from server: {0}")]
    Parse(String),
}

/// The profile lookup for the current token failed. Handled inside the
/// session manager by dropping back to the anonymous state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("session expired: {reason}")]
pub struct SessionExpiredError {
    pub reason: String,
}

impl SessionExpiredError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("parse error: {0}")]
    Parse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("token store path error: {0}")]
    Path(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ReliefError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    SessionExpired(#[from] SessionExpiredError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("api.base_url is empty".into());
        assert_eq!(
            err.to_string(),
            "config validation error: api.base_url is empty"
        );
    }

    #[test]
    fn auth_error_display_is_user_facing() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid credentials"
        );
        assert_eq!(
            AuthError::Registration("Email already registered".into()).to_string(),
            "Email already registered"
        );
        assert_eq!(
            AuthError::Network("connection refused".into()).to_string(),
            "unable to reach the server: connection refused"
        );
    }

    #[test]
    fn session_expired_display() {
        let err = SessionExpiredError::new("HTTP 401");
        assert_eq!(err.to_string(), "session expired: HTTP 401");
    }

    #[test]
    fn query_error_display() {
        let err = QueryError::Api {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");

        let err = QueryError::Network("timed out".into());
        assert_eq!(err.to_string(), "network error: timed out");
    }

    #[test]
    fn relief_error_from_auth() {
        let err: ReliefError = AuthError::InvalidCredentials.into();
        assert!(matches!(err, ReliefError::Auth(_)));
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn relief_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: ReliefError = config_err.into();
        assert!(matches!(err, ReliefError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn relief_error_from_store_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: ReliefError = StoreError::from(io_err).into();
        assert!(matches!(err, ReliefError::Store(_)));
        assert!(err.to_string().contains("read-only"));
    }

    #[test]
    fn relief_error_other() {
        let err = ReliefError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
