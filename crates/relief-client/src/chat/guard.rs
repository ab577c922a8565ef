//! In-flight counter guard.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts one in-flight query for as long as it lives. The count drops on
/// every exit path, including a cancelled future.
pub(crate) struct BusyGuard<'a> {
    in_flight: &'a AtomicUsize,
}

impl<'a> BusyGuard<'a> {
    pub(crate) fn acquire(in_flight: &'a AtomicUsize) -> Self {
        in_flight.fetch_add(1, Ordering::AcqRel);
        Self { in_flight }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}
