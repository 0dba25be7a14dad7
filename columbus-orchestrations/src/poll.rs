//! Waiting on external conditions with exponential backoff, a deadline and
//! cancellation.
//!
//! ```ignore
//! use columbus_orchestrations::poll::poll_until;
//!
//! let claim = poll_until(&policy, &cancel, "claim to bind", || async {
//!     Ok(client.get_storage_claim("demo-alice").await?.filter(is_bound))
//! })
//! .await?;
//! ```

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::LifecycleError;
use crate::types::PollPolicy;

/// Run `probe` until it yields `Some(value)`.
///
/// Between attempts the task sleeps for a jittered, exponentially growing
/// delay capped at `policy.max_delay`. Errors from `probe` end the wait
/// immediately. Fails with [`LifecycleError::Timeout`] once `policy.timeout`
/// has elapsed and with [`LifecycleError::Cancelled`] when `cancel` fires.
pub async fn poll_until<T, F, Fut>(
    policy: &PollPolicy,
    cancel: &CancellationToken,
    waiting_for: &str,
    mut probe: F,
) -> Result<T, LifecycleError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, LifecycleError>>,
{
    let deadline = Instant::now() + policy.timeout;
    let mut delay = policy.initial_delay;
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        if let Some(value) = probe().await? {
            if attempt > 1 {
                debug!(waiting_for = %waiting_for, attempt, "Condition met");
            }
            return Ok(value);
        }

        let now = Instant::now();
        if now >= deadline {
            warn!(waiting_for = %waiting_for, attempt, "Gave up waiting");
            return Err(LifecycleError::Timeout {
                waiting_for: waiting_for.to_string(),
                after: policy.timeout,
            });
        }

        // Jitter: 0.5x to 1.5x of the delay
        let jitter = rand::thread_rng().gen_range(0.5..1.5);
        let sleep_for = delay.mul_f64(jitter).min(deadline - now);

        debug!(
            waiting_for = %waiting_for,
            attempt,
            delay_ms = sleep_for.as_millis() as u64,
            "Condition not met yet"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(LifecycleError::Cancelled {
                    waiting_for: waiting_for.to_string(),
                });
            }
            _ = tokio::time::sleep(sleep_for) => {}
        }

        delay = Duration::from_secs_f64(
            (delay.as_secs_f64() * policy.multiplier).min(policy.max_delay.as_secs_f64()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClusterError;
    use crate::types::ResourceKind;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy(timeout: Duration) -> PollPolicy {
        PollPolicy {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            multiplier: 2.0,
            timeout,
        }
    }

    #[tokio::test]
    async fn test_returns_immediately_when_ready() {
        let result = poll_until(
            &fast_policy(Duration::from_secs(1)),
            &CancellationToken::new(),
            "ready",
            || async { Ok(Some(42)) },
        )
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_polls_until_condition_holds() {
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();

        let result = poll_until(
            &fast_policy(Duration::from_secs(5)),
            &CancellationToken::new(),
            "third attempt",
            || {
                let c = c.clone();
                async move {
                    if c.fetch_add(1, Ordering::SeqCst) < 2 {
                        Ok(None)
                    } else {
                        Ok(Some("bound"))
                    }
                }
            },
        )
        .await;

        assert_eq!(result.unwrap(), "bound");
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_times_out() {
        let result: Result<(), _> = poll_until(
            &fast_policy(Duration::from_millis(20)),
            &CancellationToken::new(),
            "never",
            || async { Ok(None) },
        )
        .await;

        match result {
            Err(LifecycleError::Timeout { waiting_for, after }) => {
                assert_eq!(waiting_for, "never");
                assert_eq!(after, Duration::from_millis(20));
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancellation_stops_waiting() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result: Result<(), _> = poll_until(
            &fast_policy(Duration::from_secs(60)),
            &cancel,
            "cancelled",
            || async { Ok(None) },
        )
        .await;

        assert!(matches!(result, Err(LifecycleError::Cancelled { .. })));
    }

    #[tokio::test]
    async fn test_probe_error_ends_wait() {
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();

        let result: Result<(), _> = poll_until(
            &fast_policy(Duration::from_secs(5)),
            &CancellationToken::new(),
            "failing",
            || {
                let c = c.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err(LifecycleError::from(ClusterError::Api {
                        kind: ResourceKind::StorageClaim,
                        name: "demo-alice".to_string(),
                        code: 500,
                        message: "etcd unavailable".to_string(),
                    }))
                }
            },
        )
        .await;

        assert!(matches!(result, Err(LifecycleError::Cluster(_))));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
