//! Common fixtures for integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use accountsync::convergence::{ConvergencePoller, PollConfig};
use accountsync::service::SyncService;
use accountsync::status::StatusSnapshot;
use accountsync::traits::MockSyncBackend;
use accountsync::AccountIdentity;

pub const CONTACTS: &str = "contacts";
pub const BOOKMARKS: &str = "bookmarks";

pub fn test_identity(name: &str) -> AccountIdentity {
    AccountIdentity::new(name)
}

/// Cadence tuned for tests: tight interval, budget generous enough for CI.
pub fn test_poller() -> ConvergencePoller {
    ConvergencePoller::new(PollConfig::new(
        Duration::from_millis(500),
        Duration::from_millis(10),
    ))
}

/// Service wired to a mock engine that serves an idle status snapshot.
pub fn test_service() -> (SyncService, Arc<MockSyncBackend>) {
    init_tracing();
    let backend = Arc::new(MockSyncBackend::with_status(
        StatusSnapshot::new("Sync service initialized").with("Transport state", "Waiting"),
    ));
    let service = SyncService::new(backend.clone(), [CONTACTS, BOOKMARKS]);
    (service, backend)
}

/// Sign the account in and mark the engine converged for both authorities.
pub fn sign_in_and_converge(
    service: &SyncService,
    backend: &MockSyncBackend,
    identity: &AccountIdentity,
) {
    service.sign_in(identity.clone());
    backend.set_active(identity, CONTACTS, true);
    backend.set_active(identity, BOOKMARKS, true);
    backend.set_status(StatusSnapshot::new("Sync is active").with("Transport state", "Active"));
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
