//! Convergence awaiters over the verification surface.
//!
//! Thin combinations of [`SyncService`] queries and a
//! [`ConvergencePoller`], mirroring what external verification code
//! actually waits for: sync active for an account, sync disabled, signed
//! out, or a particular status summary. On failure the last engine-reported
//! summary is attached for diagnosis.

use thiserror::Error;

use crate::account::AccountIdentity;
use crate::convergence::{ConvergencePoller, PollError};
use crate::service::SyncService;

/// A poll that failed, with the last observed status summary attached.
#[derive(Debug, Error)]
#[error("sync did not converge: {source} (last status: {last_summary:?})")]
pub struct ConvergenceFailure {
    #[source]
    pub source: PollError,
    /// Last engine-reported summary, when one could still be read.
    pub last_summary: Option<String>,
}

fn attach_status(service: &SyncService, source: PollError) -> ConvergenceFailure {
    let last_summary = service
        .get_status()
        .ok()
        .map(|snapshot| snapshot.summary().to_string());
    tracing::warn!(
        "Convergence failure: {} (last status: {:?})",
        source,
        last_summary
    );
    ConvergenceFailure {
        source,
        last_summary,
    }
}

/// Wait until both the local toggles and the engine report the authority
/// actively syncing for the account.
pub async fn await_sync_active(
    service: &SyncService,
    poller: &ConvergencePoller,
    identity: &AccountIdentity,
    authority: &str,
) -> Result<(), ConvergenceFailure> {
    poller
        .poll_until(|| service.is_sync_active(identity, authority))
        .await
        .map_err(|err| attach_status(service, err))
}

/// Wait until sync is effectively disabled for the account+authority pair.
pub async fn await_sync_disabled(
    service: &SyncService,
    poller: &ConvergencePoller,
    identity: &AccountIdentity,
    authority: &str,
) -> Result<(), ConvergenceFailure> {
    poller
        .poll_until(|| !service.is_effectively_active(identity, authority))
        .await
        .map_err(|err| attach_status(service, err))
}

/// Wait until no account is signed in.
pub async fn await_signed_out(
    service: &SyncService,
    poller: &ConvergencePoller,
) -> Result<(), ConvergenceFailure> {
    poller
        .poll_until(|| service.signed_in().is_none())
        .await
        .map_err(|err| attach_status(service, err))
}

/// Wait until the engine-reported summary equals the expected line.
///
/// Transient fetch failures count as "not yet", per the predicate
/// convention; only the timeout budget bounds them.
pub async fn await_status_summary(
    service: &SyncService,
    poller: &ConvergencePoller,
    expected: &str,
) -> Result<(), ConvergenceFailure> {
    poller
        .poll_until(|| {
            service
                .get_status()
                .map(|snapshot| snapshot.summary() == expected)
                .unwrap_or(false)
        })
        .await
        .map_err(|err| attach_status(service, err))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::convergence::PollConfig;
    use crate::status::StatusSnapshot;
    use crate::traits::MockSyncBackend;

    fn alice() -> AccountIdentity {
        AccountIdentity::new("alice@example.com")
    }

    fn fast_poller() -> ConvergencePoller {
        ConvergencePoller::new(PollConfig::new(
            Duration::from_millis(300),
            Duration::from_millis(10),
        ))
    }

    #[tokio::test]
    async fn test_await_sync_active_converges_when_engine_catches_up() {
        let backend = Arc::new(MockSyncBackend::with_status(StatusSnapshot::new(
            "Sync is active",
        )));
        let service = SyncService::new(backend.clone(), ["contacts"]);
        service.sign_in(alice());

        let flip = backend.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            flip.set_active(&AccountIdentity::new("alice@example.com"), "contacts", true);
        });

        await_sync_active(&service, &fast_poller(), &alice(), "contacts")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_failure_attaches_last_summary() {
        let backend = Arc::new(MockSyncBackend::with_status(StatusSnapshot::new(
            "Sync is paused",
        )));
        let service = SyncService::new(backend, ["contacts"]);
        service.sign_in(alice());

        // Engine never reports active.
        let failure = await_sync_active(&service, &fast_poller(), &alice(), "contacts")
            .await
            .unwrap_err();

        assert!(matches!(failure.source, PollError::Timeout { .. }));
        assert_eq!(failure.last_summary.as_deref(), Some("Sync is paused"));
    }

    #[tokio::test]
    async fn test_await_signed_out_attaches_no_summary() {
        let backend = Arc::new(MockSyncBackend::new());
        let service = SyncService::new(backend, ["contacts"]);

        await_signed_out(&service, &fast_poller()).await.unwrap();
    }
}
