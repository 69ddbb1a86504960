use std::sync::Arc;

use stratus_cloud::{RetryPolicy, ServiceRegistry, with_retries};
use stratus_model::{DeployObservation, ServiceSample};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::PollConfig;
use crate::error::DeployError;
use crate::progress::{ProgressSender, emit};

/// Polls a service's deployment record until it converges on the desired
/// task definition at full capacity.
pub struct ServiceStabilizer {
    registry: Arc<dyn ServiceRegistry>,
    config: PollConfig,
    retry: RetryPolicy,
}

impl ServiceStabilizer {
    pub fn new(registry: Arc<dyn ServiceRegistry>) -> Self {
        Self {
            registry,
            config: PollConfig::default(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_config(mut self, config: PollConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Wait for steady state: a single deployment on
    /// `desired_task_definition` with `running == desired`.
    ///
    /// Every other shape (overlapping rollover deployments, counts behind,
    /// wrong task definition) keeps the loop polling. The record is
    /// re-fetched on every tick, never cached.
    pub async fn poll_until_deployed(
        &self,
        cluster: &str,
        service: &str,
        desired_task_definition: &str,
        cancel: &CancellationToken,
        progress: &ProgressSender,
    ) -> Result<(), DeployError> {
        let deadline = tokio::time::Instant::now() + self.config.timeout;

        loop {
            if cancel.is_cancelled() {
                return Err(DeployError::Cancelled);
            }

            let record = with_retries(&self.retry, || {
                self.registry.describe_service(cluster, service)
            })
            .await?
            .ok_or_else(|| DeployError::ServiceNotFound {
                service: service.to_string(),
                cluster: cluster.to_string(),
            })?;

            let sample = ServiceSample::of(&record);
            debug!(
                service,
                deployments = sample.deployment_count,
                running = sample.running_count,
                desired = sample.desired_count,
                "service sample"
            );
            emit(progress, DeployObservation::ServiceSample(sample));

            if record.is_stable_on(desired_task_definition) {
                info!(service, "service reached a steady state");
                return Ok(());
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(DeployError::Timeout {
                    phase: "service stabilization",
                    waited: self.config.timeout,
                });
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                _ = cancel.cancelled() => return Err(DeployError::Cancelled),
            }
        }
    }
}
