//! Cancellation handle for in-flight polls.

use std::sync::Arc;

use tokio::sync::watch;

/// Clonable token that cancels any poll observing it.
///
/// Cancellation is sticky: once cancelled, every current and future poll
/// using the token returns immediately. Safe to trigger from any task
/// (e.g. test teardown) while a poll is sleeping.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Signal cancellation. Calling more than once is harmless.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
        tracing::debug!("Poll cancellation requested");
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
