use std::time::Duration;

use tracing::warn;

use crate::error::CloudError;

/// Bounded retry schedule for transient control-plane failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total tries, including the first one.
    pub attempts: u32,
    pub first_delay: Duration,
    pub max_delay: Duration,
    pub factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            first_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
            factor: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            attempts: 1,
            ..Self::default()
        }
    }

    fn next_delay(&self, current: Duration) -> Duration {
        current.mul_f64(self.factor).min(self.max_delay)
    }
}

/// Run `op`, retrying transient errors per `policy`.
///
/// Non-transient errors and the final transient error surface unmodified.
pub async fn with_retries<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, CloudError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CloudError>>,
{
    let mut delay = policy.first_delay;
    let mut attempt = 1u32;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.attempts => {
                warn!(attempt, delay_ms = delay.as_millis() as u64, "transient control plane error: {e}, retrying");
                tokio::time::sleep(delay).await;
                delay = policy.next_delay(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn transient() -> CloudError {
        CloudError::Transport("connection reset".into())
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_first_try_without_sleeping() {
        let calls = AtomicU32::new(0);
        let result = with_retries(&RetryPolicy::default(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, CloudError>(42)
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retries(&RetryPolicy::default(), || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(transient())
            } else {
                Ok(7)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_attempts_and_surfaces_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retries(&RetryPolicy::default(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(transient())
        })
        .await;

        assert!(matches!(result, Err(CloudError::Transport(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn non_transient_fails_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retries(&RetryPolicy::default(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(CloudError::Api {
                code: "ValidationError".into(),
                message: "bad template".into(),
            })
        })
        .await;

        assert!(matches!(result, Err(CloudError::Api { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
