pub mod errors;
pub mod events;
pub mod id;

pub use errors::{
    AuthError, ConfigError, QueryError, ReliefError, SessionExpiredError, StoreError,
};
pub use events::{Event, EventBus};
pub use id::new_correlation_id;

pub type Result<T> = std::result::Result<T, ReliefError>;
