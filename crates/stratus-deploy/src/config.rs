use std::time::Duration;

use stratus_cloud::RetryPolicy;

/// Timing of one polling loop: fetch, deliver, check, sleep, repeat.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Sleep between ticks.
    pub interval: Duration,
    /// Overall bound; exceeding it yields a timeout error.
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(600),
        }
    }
}

impl PollConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Configuration for a full deploy run.
#[derive(Debug, Clone, Default)]
pub struct DeployConfig {
    /// Stack-creation polling.
    pub create: PollConfig,
    /// Service-stabilization polling.
    pub stabilize: PollConfig,
    /// Transient-error retry schedule for individual control-plane calls.
    pub retry: RetryPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_override_defaults() {
        let poll = PollConfig::default()
            .with_interval(Duration::from_millis(100))
            .with_timeout(Duration::from_secs(30));

        assert_eq!(poll.interval, Duration::from_millis(100));
        assert_eq!(poll.timeout, Duration::from_secs(30));
    }
}
