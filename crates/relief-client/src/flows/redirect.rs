//! Cancellable delayed navigation.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

pub type RedirectCallback = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a scheduled redirect. Cancelling after it fired is a no-op.
#[derive(Debug, Clone, Default)]
pub struct RedirectHandle {
    cancel: CancellationToken,
}

impl RedirectHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

pub trait RedirectScheduler: Send + Sync {
    /// Run `callback` after `delay` unless the returned handle is cancelled first.
    fn schedule(&self, callback: RedirectCallback, delay: Duration) -> RedirectHandle;
}

/// Sleeps on the Tokio runtime. Must be used from within a runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl RedirectScheduler for TokioScheduler {
    fn schedule(&self, callback: RedirectCallback, delay: Duration) -> RedirectHandle {
        let handle = RedirectHandle::new();
        let cancelled = handle.token();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => debug!("redirect cancelled"),
                _ = tokio::time::sleep(delay) => callback(),
            }
        });
        handle
    }
}

/// Runs the callback inline, ignoring the delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl RedirectScheduler for ImmediateScheduler {
    fn schedule(&self, callback: RedirectCallback, _delay: Duration) -> RedirectHandle {
        callback();
        RedirectHandle::new()
    }
}
