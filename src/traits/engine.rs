//! Sync engine collaborator trait.
//!
//! The actual data-synchronization engine is owned elsewhere; the lifecycle
//! model only depends on two pull-based queries. The trait enables
//! dependency injection so tests can drive convergence with a mock instead
//! of a live engine.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

use crate::account::AccountIdentity;
use crate::status::StatusSnapshot;

/// The engine could not be reached or timed out producing a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("sync engine unreachable: {reason}")]
pub struct FetchError {
    /// Engine-reported reason, for diagnostics only.
    pub reason: String,
}

impl FetchError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Pull-based queries against the external sync engine.
///
/// Implementations must be thread-safe (Send + Sync) so poll predicates can
/// query them from the runtime.
pub trait SyncBackend: Send + Sync {
    /// Fetch a fresh status snapshot for the given account.
    ///
    /// May fail when the engine is unreachable; callers treat that as
    /// recoverable and leave their own state untouched.
    fn fetch_status(&self, identity: &AccountIdentity) -> Result<StatusSnapshot, FetchError>;

    /// Whether the engine is actively syncing the authority for the account.
    fn is_sync_active(&self, identity: &AccountIdentity, authority: &str) -> bool;
}

/// Mock engine for testing.
///
/// Status and per-pair activity are settable from the test while a poll is
/// in flight, to simulate an engine converging on its own schedule.
///
/// # Thread Safety
///
/// Uses a `Mutex` internally so tests can mutate it across task boundaries.
#[derive(Debug, Default)]
pub struct MockSyncBackend {
    inner: Mutex<MockBackendInner>,
}

#[derive(Debug, Default)]
struct MockBackendInner {
    status: Option<StatusSnapshot>,
    active: HashMap<(String, String), bool>,
    unreachable: bool,
    fetch_count: u64,
}

impl MockSyncBackend {
    /// Create a mock with no status configured; fetches fail until
    /// [`MockSyncBackend::set_status`] is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that serves the given snapshot.
    pub fn with_status(snapshot: StatusSnapshot) -> Self {
        let mock = Self::default();
        mock.set_status(snapshot);
        mock
    }

    /// Replace the snapshot served to fetches.
    pub fn set_status(&self, snapshot: StatusSnapshot) {
        self.inner.lock().unwrap().status = Some(snapshot);
    }

    /// Mark the engine's sync activity for an account+authority pair.
    pub fn set_active(&self, identity: &AccountIdentity, authority: &str, active: bool) {
        self.inner
            .lock()
            .unwrap()
            .active
            .insert((identity.name().to_string(), authority.to_string()), active);
    }

    /// Simulate the engine going offline (fetches fail) or back online.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.inner.lock().unwrap().unreachable = unreachable;
    }

    /// Number of fetches served so far (for caching assertions).
    pub fn fetch_count(&self) -> u64 {
        self.inner.lock().unwrap().fetch_count
    }
}

impl SyncBackend for MockSyncBackend {
    fn fetch_status(&self, identity: &AccountIdentity) -> Result<StatusSnapshot, FetchError> {
        let mut inner = self.inner.lock().unwrap();
        inner.fetch_count += 1;
        if inner.unreachable {
            return Err(FetchError::new("engine offline"));
        }
        inner
            .status
            .clone()
            .ok_or_else(|| FetchError::new(format!("no status available for {}", identity)))
    }

    fn is_sync_active(&self, identity: &AccountIdentity, authority: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .active
            .get(&(identity.name().to_string(), authority.to_string()))
            .copied()
            .unwrap_or(false)
    }
}
