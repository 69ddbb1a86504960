use std::sync::Arc;

use stratus_cloud::{CreateStackRequest, RetryPolicy, StackRegistry, with_retries};
use stratus_model::{DeployObservation, OutputMap, Stack};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::PollConfig;
use crate::cursor::EventCursor;
use crate::error::DeployError;
use crate::progress::{ProgressSender, emit};

/// Creates a stack and drives its creation-event stream to a terminal state.
pub struct StackProvisioner {
    registry: Arc<dyn StackRegistry>,
    config: PollConfig,
    retry: RetryPolicy,
}

impl StackProvisioner {
    pub fn new(registry: Arc<dyn StackRegistry>) -> Self {
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

    /// Issue a single, non-idempotent creation request.
    ///
    /// The registry rejects duplicate names; callers needing idempotency
    /// must pre-check through the locator.
    pub async fn create_stack(
        &self,
        name: &str,
        template_body: &str,
        parameters: OutputMap,
    ) -> Result<String, DeployError> {
        let request = CreateStackRequest {
            name: name.to_string(),
            template_body: template_body.to_string(),
            parameters,
            client_token: uuid::Uuid::new_v4().to_string(),
        };

        let stack_id = self.registry.create_stack(&request).await?;
        info!(stack = name, stack_id, "stack creation requested");
        Ok(stack_id)
    }

    /// Poll the creation-event stream until the stack reaches a terminal
    /// state.
    ///
    /// Each distinct event is delivered exactly once, in timestamp order,
    /// over `progress`. Transient fetch errors are retried a bounded number
    /// of times; cancellation aborts promptly.
    pub async fn poll_until_created(
        &self,
        name: &str,
        cancel: &CancellationToken,
        progress: &ProgressSender,
    ) -> Result<(), DeployError> {
        let deadline = tokio::time::Instant::now() + self.config.timeout;
        let mut cursor = EventCursor::new();

        loop {
            if cancel.is_cancelled() {
                return Err(DeployError::Cancelled);
            }

            let stream =
                with_retries(&self.retry, || self.registry.describe_stack_events(name)).await?;
            for event in cursor.advance(stream) {
                debug!(
                    resource = %event.logical_resource_id,
                    status = %event.resource_status,
                    "stack event"
                );
                emit(progress, DeployObservation::StackEvent(event));
            }

            let stack = self.fetch_stack(name).await?;
            if stack.status.is_create_complete() {
                info!(stack = name, "stack created");
                return Ok(());
            }
            if stack.status.is_create_failed() {
                return Err(DeployError::CreateFailed {
                    status: stack.status,
                    reason: stack
                        .status_reason
                        .unwrap_or_else(|| "no reason reported".to_string()),
                });
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(DeployError::Timeout {
                    phase: "stack creation",
                    waited: self.config.timeout,
                });
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                _ = cancel.cancelled() => return Err(DeployError::Cancelled),
            }
        }
    }

    /// Final output mapping of a (presumed complete) stack.
    pub async fn stack_outputs(&self, name: &str) -> Result<OutputMap, DeployError> {
        let stack = self.fetch_stack(name).await?;
        Ok(stack.outputs)
    }

    async fn fetch_stack(&self, name: &str) -> Result<Stack, DeployError> {
        with_retries(&self.retry, || self.registry.describe_stack(name))
            .await?
            .ok_or_else(|| DeployError::StackMissing {
                name: name.to_string(),
            })
    }
}
