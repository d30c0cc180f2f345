//! Bounded-retry polling until a predicate holds.
//!
//! The underlying engine converges on its own schedule; the poller is the
//! designed-in tolerance for that eventual consistency. A poll evaluates
//! its predicate at a fixed cadence until the predicate returns true, the
//! timeout budget runs out, or the poll is cancelled.

use std::convert::Infallible;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use super::cancel::CancelToken;

/// Timing configuration for a poll: overall budget and check cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Overall budget before the poll gives up.
    pub timeout: Duration,
    /// Cadence between predicate evaluations.
    pub interval: Duration,
}

impl PollConfig {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }
}

impl Default for PollConfig {
    /// 3 second budget at a 100 ms cadence.
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(3),
            interval: Duration::from_millis(100),
        }
    }
}

/// Why a poll did not converge.
#[derive(Debug, Error)]
pub enum PollError {
    /// The predicate never held within the budget.
    #[error("condition not met within {budget:?} ({attempts} attempts over {elapsed:?})")]
    Timeout {
        budget: Duration,
        elapsed: Duration,
        attempts: u32,
    },

    /// The poll was cancelled externally before converging.
    #[error("poll cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },

    /// The predicate itself failed. Never retried: predicates are expected
    /// to swallow transient evaluation errors and return false instead.
    #[error("poll predicate failed")]
    Predicate(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Repeatedly evaluates predicates at a fixed cadence.
///
/// The first evaluation happens before any sleep, so a predicate that is
/// true from the start returns without waiting an interval. Sleeps run on
/// the tokio runtime and never block the caller's state mutations.
#[derive(Debug, Clone)]
pub struct ConvergencePoller {
    config: PollConfig,
    cancel: CancelToken,
}

impl ConvergencePoller {
    pub fn new(config: PollConfig) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Poller with the default 3 s / 100 ms configuration.
    pub fn with_defaults() -> Self {
        Self::new(PollConfig::default())
    }

    pub fn config(&self) -> PollConfig {
        self.config
    }

    /// Token that cancels polls running on this poller.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Poll an infallible predicate until it returns true.
    pub async fn poll_until<F>(&self, mut predicate: F) -> Result<(), PollError>
    where
        F: FnMut() -> bool,
    {
        self.try_poll_until(move || Ok::<_, Infallible>(predicate()))
            .await
    }

    /// Poll a fallible predicate until it returns `Ok(true)`.
    ///
    /// A predicate error aborts the poll immediately and is forwarded as
    /// [`PollError::Predicate`].
    pub async fn try_poll_until<F, E>(&self, mut predicate: F) -> Result<(), PollError>
    where
        F: FnMut() -> Result<bool, E>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let start = Instant::now();
        let deadline = start + self.config.timeout;
        let mut cancel_rx = self.cancel.subscribe();
        let mut attempts: u32 = 0;

        loop {
            if *cancel_rx.borrow() {
                tracing::debug!("Poll cancelled after {} attempts", attempts);
                return Err(PollError::Cancelled { attempts });
            }

            attempts += 1;
            match predicate() {
                Ok(true) => {
                    tracing::debug!(
                        "Poll converged after {} attempts ({:?})",
                        attempts,
                        start.elapsed()
                    );
                    return Ok(());
                }
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!("Poll predicate failed on attempt {}: {}", attempts, err);
                    return Err(PollError::Predicate(Box::new(err)));
                }
            }

            let now = Instant::now();
            if now >= deadline {
                let elapsed = now - start;
                tracing::warn!(
                    "Poll timed out after {} attempts ({:?} of {:?} budget)",
                    attempts,
                    elapsed,
                    self.config.timeout
                );
                return Err(PollError::Timeout {
                    budget: self.config.timeout,
                    elapsed,
                    attempts,
                });
            }

            // Never sleep past the deadline; the final check lands within
            // one interval of the budget.
            let wait = self.config.interval.min(deadline - now);
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                changed = cancel_rx.changed() => {
                    if changed.is_ok() && *cancel_rx.borrow() {
                        tracing::debug!("Poll cancelled mid-wait after {} attempts", attempts);
                        return Err(PollError::Cancelled { attempts });
                    }
                }
            }
        }
    }
}

impl Default for ConvergencePoller {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_poller() -> ConvergencePoller {
        ConvergencePoller::new(PollConfig::new(
            Duration::from_millis(200),
            Duration::from_millis(10),
        ))
    }

    #[tokio::test]
    async fn test_true_from_start_returns_without_sleeping() {
        let poller = ConvergencePoller::new(PollConfig::new(
            Duration::from_secs(5),
            Duration::from_secs(1),
        ));

        let start = std::time::Instant::now();
        poller.poll_until(|| true).await.unwrap();
        // Well under one interval.
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_converges_after_some_attempts() {
        let poller = fast_poller();
        let mut calls = 0;
        poller
            .poll_until(|| {
                calls += 1;
                calls >= 3
            })
            .await
            .unwrap();
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_never_true_times_out_near_budget() {
        let poller = fast_poller();
        let start = std::time::Instant::now();
        let err = poller.poll_until(|| false).await.unwrap_err();
        let elapsed = start.elapsed();

        match err {
            PollError::Timeout {
                budget, attempts, ..
            } => {
                assert_eq!(budget, Duration::from_millis(200));
                assert!(attempts > 1);
            }
            other => panic!("expected timeout, got {:?}", other),
        }
        assert!(elapsed >= Duration::from_millis(200));
        // Within one interval's tolerance, with CI slack.
        assert!(elapsed < Duration::from_millis(600));
    }

    #[tokio::test]
    async fn test_cancellation_short_circuits_the_wait() {
        let poller = ConvergencePoller::new(PollConfig::new(
            Duration::from_secs(30),
            Duration::from_secs(10),
        ));
        let token = poller.cancel_token();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let start = std::time::Instant::now();
        let err = poller.poll_until(|| false).await.unwrap_err();
        assert!(matches!(err, PollError::Cancelled { .. }));
        // Nowhere near the 10 s interval or the 30 s budget.
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_already_cancelled_returns_before_evaluating() {
        let poller = fast_poller();
        poller.cancel_token().cancel();

        let mut calls = 0;
        let err = poller
            .poll_until(|| {
                calls += 1;
                true
            })
            .await
            .unwrap_err();

        assert!(matches!(err, PollError::Cancelled { attempts: 0 }));
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_predicate_error_is_forwarded_not_retried() {
        #[derive(Debug, Error)]
        #[error("boom")]
        struct Boom;

        let poller = fast_poller();
        let mut calls = 0;
        let err = poller
            .try_poll_until(|| {
                calls += 1;
                Err::<bool, Boom>(Boom)
            })
            .await
            .unwrap_err();

        assert!(matches!(err, PollError::Predicate(_)));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_default_config_matches_documented_cadence() {
        let config = PollConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.interval, Duration::from_millis(100));
    }
}
