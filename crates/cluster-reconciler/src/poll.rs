//! # Fixed-interval polling
//!
//! Waits for a remote cluster to converge on a condition. The first fetch runs
//! immediately, later fetches are spaced by a fixed interval, and the whole
//! wait is bounded by a deadline. Every suspension point (the fetch itself and
//! the sleep between fetches) also watches the caller's cancellation token.
//!
//! ```text
//! Polling --predicate holds--> Converged
//!    |----deadline reached---> TimedOut
//!    |----fetch error--------> Failed
//!    `----token cancelled----> Cancelled
//! ```

use crate::config::PollSettings;
use clusters_client::ClusterError;
use std::fmt;
use std::future::Future;
use tokio::time::{Instant, sleep, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// What a poll waits for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOperation {
    /// The cluster reports `ready`
    Readiness,
    /// The cluster is no longer found
    Removal,
}

impl fmt::Display for PollOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Readiness => f.write_str("readiness"),
            Self::Removal => f.write_str("removal"),
        }
    }
}

/// Terminal state of a poll
#[derive(Debug)]
pub enum PollOutcome<T> {
    /// The predicate held; carries the fetched value, `None` when the
    /// predicate was satisfied by an error (e.g. not found)
    Converged(Option<T>),
    /// The deadline passed first
    TimedOut,
    /// A fetch failed with an error the predicate did not accept
    Failed(ClusterError),
    /// The cancellation token fired
    Cancelled,
}

/// Fixed-interval poller bounded by a deadline
#[derive(Debug, Clone, Copy)]
pub struct Poller {
    operation: PollOperation,
    settings: PollSettings,
}

impl Poller {
    /// Create a poller for `operation`
    #[must_use]
    pub fn new(operation: PollOperation, settings: PollSettings) -> Self {
        Self { operation, settings }
    }

    /// What this poller waits for
    #[must_use]
    pub fn operation(&self) -> PollOperation {
        self.operation
    }

    /// Interval and deadline
    #[must_use]
    pub fn settings(&self) -> PollSettings {
        self.settings
    }

    /// Fetch until `predicate` accepts the result
    ///
    /// `predicate` sees every fetch result, errors included, so a removal poll
    /// can treat "not found" as convergence. An error it rejects ends the poll
    /// with [`PollOutcome::Failed`].
    pub async fn poll<T, F, Fut, P>(
        &self,
        id: &str,
        cancel: &CancellationToken,
        mut fetch: F,
        predicate: P,
    ) -> PollOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClusterError>>,
        P: Fn(&Result<T, ClusterError>) -> bool,
    {
        let deadline = Instant::now() + self.settings.timeout;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => return PollOutcome::Cancelled,
                () = sleep_until(deadline) => return PollOutcome::TimedOut,
                result = fetch() => result,
            };

            if predicate(&result) {
                debug!(
                    "Cluster {} reached {} after {} attempt(s)",
                    id, self.operation, attempt
                );
                return PollOutcome::Converged(result.ok());
            }
            if let Err(e) = result {
                return PollOutcome::Failed(e);
            }
            debug!(
                "Cluster {} has not reached {} yet (attempt {}), retrying in {:?}",
                id, self.operation, attempt, self.settings.interval
            );

            tokio::select! {
                biased;
                () = cancel.cancelled() => return PollOutcome::Cancelled,
                () = sleep_until(deadline) => return PollOutcome::TimedOut,
                () = sleep(self.settings.interval) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn poller() -> Poller {
        Poller::new(
            PollOperation::Removal,
            PollSettings::new(Duration::from_secs(30), Duration::from_secs(600)),
        )
    }

    fn not_found(result: &Result<u32, ClusterError>) -> bool {
        matches!(result, Err(e) if e.is_not_found())
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_is_immediate() {
        let start = Instant::now();
        let outcome = poller()
            .poll("1", &CancellationToken::new(), || async { Ok(7) }, |r| r.is_ok())
            .await;
        assert!(matches!(outcome, PollOutcome::Converged(Some(7))));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_converges_on_not_found() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&attempts);
        let start = Instant::now();

        let outcome = poller()
            .poll(
                "1",
                &CancellationToken::new(),
                move || {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    async move {
                        if n < 2 {
                            Ok(n)
                        } else {
                            Err(ClusterError::NotFound("gone".to_string()))
                        }
                    }
                },
                not_found,
            )
            .await;

        assert!(matches!(outcome, PollOutcome::Converged(None)));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_at_deadline() {
        let start = Instant::now();
        let outcome = poller()
            .poll("1", &CancellationToken::new(), || async { Ok(0) }, not_found)
            .await;
        assert!(matches!(outcome, PollOutcome::TimedOut));
        assert_eq!(start.elapsed(), Duration::from_secs(600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_errors_fail_immediately() {
        let outcome = poller()
            .poll(
                "1",
                &CancellationToken::new(),
                || async { Err(ClusterError::Transport("connection reset".to_string())) },
                not_found,
            )
            .await;
        assert!(matches!(outcome, PollOutcome::Failed(ClusterError::Transport(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_interrupts_sleep() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_secs(45)).await;
            trigger.cancel();
        });

        let start = Instant::now();
        let outcome = poller().poll("1", &cancel, || async { Ok(0) }, not_found).await;
        assert!(matches!(outcome, PollOutcome::Cancelled));
        assert_eq!(start.elapsed(), Duration::from_secs(45));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_interrupts_fetch() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = poller()
            .poll("1", &cancel, || std::future::pending::<Result<u32, ClusterError>>(), not_found)
            .await;
        assert!(matches!(outcome, PollOutcome::Cancelled));
    }
}
