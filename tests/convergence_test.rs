//! Integration tests for the polling primitive against live state mutation.
//!
//! The poller runs on the runtime while another task drives the service;
//! each predicate evaluation observes a consistent snapshot through the
//! service's single lock.

mod common;

use std::time::{Duration, Instant};

use accountsync::convergence::{ConvergencePoller, PollConfig, PollError};
use accountsync::error::SyncError;

use common::{sign_in_and_converge, test_identity, test_poller, test_service, CONTACTS};

#[tokio::test]
async fn test_poll_observes_concurrent_state_mutation() {
    let (service, backend) = test_service();
    let alice = test_identity("alice@example.com");
    sign_in_and_converge(&service, &backend, &alice);
    service.stop_sync(CONTACTS).unwrap();

    let mutator = service.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        mutator.start_sync(CONTACTS).unwrap();
    });

    test_poller()
        .poll_until(|| service.is_effectively_active(&alice, CONTACTS))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_poll_true_from_start_skips_the_interval() {
    let (service, backend) = test_service();
    let alice = test_identity("alice@example.com");
    sign_in_and_converge(&service, &backend, &alice);

    // Interval far larger than the acceptable latency.
    let poller = ConvergencePoller::new(PollConfig::new(
        Duration::from_secs(10),
        Duration::from_secs(5),
    ));

    let start = Instant::now();
    poller
        .poll_until(|| service.is_effectively_active(&alice, CONTACTS))
        .await
        .unwrap();
    assert!(start.elapsed() < Duration::from_millis(500));
}

#[tokio::test]
async fn test_timeout_carries_elapsed_and_attempts() {
    let (service, _backend) = test_service();
    let alice = test_identity("alice@example.com");
    // Never signed in, so the predicate can never hold.

    let poller = ConvergencePoller::new(PollConfig::new(
        Duration::from_millis(100),
        Duration::from_millis(10),
    ));
    let err = poller
        .poll_until(|| service.is_effectively_active(&alice, CONTACTS))
        .await
        .unwrap_err();

    match err {
        PollError::Timeout {
            budget,
            elapsed,
            attempts,
        } => {
            assert_eq!(budget, Duration::from_millis(100));
            assert!(elapsed >= budget);
            assert!(attempts > 1, "expected repeated attempts, got {}", attempts);
        }
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_teardown_cancellation_beats_the_budget() {
    let (service, _backend) = test_service();
    let alice = test_identity("alice@example.com");

    let poller = ConvergencePoller::new(PollConfig::new(
        Duration::from_secs(60),
        Duration::from_millis(20),
    ));
    let token = poller.cancel_token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let start = Instant::now();
    let err = poller
        .poll_until(|| service.is_effectively_active(&alice, CONTACTS))
        .await
        .unwrap_err();

    assert!(matches!(err, PollError::Cancelled { .. }));
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_predicate_error_fails_the_poll_immediately() {
    let (service, _backend) = test_service();
    // Signed out: get_status errors, and this predicate propagates instead
    // of swallowing it.

    let err = test_poller()
        .try_poll_until(|| {
            service
                .get_status()
                .map(|snapshot| snapshot.summary() == "Sync is active")
        })
        .await
        .unwrap_err();

    match err {
        PollError::Predicate(source) => {
            let sync_err = source.downcast::<SyncError>().unwrap();
            assert_eq!(*sync_err, SyncError::NotSignedIn);
        }
        other => panic!("expected predicate failure, got {:?}", other),
    }
}
