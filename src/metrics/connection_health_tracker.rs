use crate::metrics::HealthCheck;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// Tracks the health of the API connection by counting consecutive failures.
///
/// The adapter notes the outcome of every request; the connection counts as
/// healthy while the number of consecutive failures stays below the
/// configured maximum. Any success resets the counter.
#[derive(Debug, Clone)]
pub struct ConnectionHealthTracker {
    max_consecutive_failures: usize,
    consecutive_failures: Arc<AtomicUsize>,
}

impl HealthCheck for ConnectionHealthTracker {
    fn healthy(&self) -> bool {
        self.consecutive_failures.load(Ordering::Relaxed) < self.max_consecutive_failures
    }
}

impl ConnectionHealthTracker {
    #[must_use]
    pub fn new(max_consecutive_failures: usize) -> Self {
        Self {
            max_consecutive_failures,
            consecutive_failures: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Records a failed request.
    pub fn note_failure(&self) {
        self.consecutive_failures.fetch_add(1, Ordering::SeqCst);
    }

    /// Records a successful request, resetting the failure streak.
    pub fn note_success(&self) {
        self.consecutive_failures.store(0, Ordering::SeqCst);
    }

    pub fn max_consecutive_failures(&self) -> usize {
        self.max_consecutive_failures
    }
}
