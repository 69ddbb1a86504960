use std::sync::Arc;

use stratus_cloud::{RetryPolicy, StackRegistry, with_retries};
use stratus_model::{NetworkOutputs, OutputMap, Stack};
use tracing::debug;

use crate::error::DeployError;

/// Output value identifying a service stack created by this system.
pub const SERVICE_STACK_TYPE: &str = "stratus::ecs-service";

const OUTPUT_STACK_TYPE: &str = "StackType";
const OUTPUT_CLUSTER: &str = "ECSCluster";
const OUTPUT_TASK_FAMILY: &str = "TaskFamily";
const NETWORK_SUFFIX: &str = "-network";

/// Read-only queries against the stack registry.
///
/// Stack outputs are the durable registry: rediscovery matches on the
/// output key/value convention, plus the `<cluster>-network` naming
/// convention for the shared network stack.
pub struct StackLocator {
    registry: Arc<dyn StackRegistry>,
    retry: RetryPolicy,
}

impl StackLocator {
    pub fn new(registry: Arc<dyn StackRegistry>) -> Self {
        Self {
            registry,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Every stack whose outputs contain all `filter` pairs.
    ///
    /// No ordering beyond the registry's listing order; callers handle
    /// ambiguity when several stacks satisfy the filter.
    pub async fn find_stacks_by_outputs(
        &self,
        filter: &OutputMap,
    ) -> Result<Vec<Stack>, DeployError> {
        let stacks = with_retries(&self.retry, || self.registry.describe_stacks()).await?;
        Ok(stacks
            .into_iter()
            .filter(|s| s.matches_outputs(filter))
            .collect())
    }

    /// Direct name lookup; an absent stack yields an empty list, not an error.
    pub async fn find_stacks_by_name(&self, name: &str) -> Result<Vec<Stack>, DeployError> {
        let stack = with_retries(&self.retry, || self.registry.describe_stack(name)).await?;
        Ok(stack.into_iter().collect())
    }

    /// First stack registered as the service stack for (cluster, family).
    pub async fn find_service_stack(
        &self,
        cluster: &str,
        task_family: &str,
    ) -> Result<Stack, DeployError> {
        let filter: OutputMap = [
            (OUTPUT_STACK_TYPE.to_string(), SERVICE_STACK_TYPE.to_string()),
            (OUTPUT_CLUSTER.to_string(), cluster.to_string()),
            (OUTPUT_TASK_FAMILY.to_string(), task_family.to_string()),
        ]
        .into();

        self.find_stacks_by_outputs(&filter)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DeployError::StackNotFound {
                task_family: task_family.to_string(),
                cluster: cluster.to_string(),
            })
    }

    /// Network stack of a cluster, located by the `<cluster>-network`
    /// naming convention and validated for the required outputs.
    pub async fn find_network_stack(&self, cluster: &str) -> Result<NetworkOutputs, DeployError> {
        let name = format!("{cluster}{NETWORK_SUFFIX}");

        let stack = with_retries(&self.retry, || self.registry.describe_stack(&name))
            .await?
            .ok_or_else(|| DeployError::StackMissing { name: name.clone() })?;

        NetworkOutputs::from_outputs(&name, &stack.outputs).map_err(|keys| {
            DeployError::MissingOutputs {
                stack_name: name,
                keys,
            }
        })
    }

    /// Union of the cluster's tag-matched stacks and its conventionally
    /// named network stack.
    ///
    /// A failure of the tag-filtered search aborts the listing. The network
    /// stack being absent is tolerated; a lookup failure for it is not.
    pub async fn find_all_stacks_for_cluster(
        &self,
        cluster: &str,
    ) -> Result<Vec<Stack>, DeployError> {
        let filter: OutputMap = [(OUTPUT_CLUSTER.to_string(), cluster.to_string())].into();
        let mut stacks = self.find_stacks_by_outputs(&filter).await?;

        let name = format!("{cluster}{NETWORK_SUFFIX}");
        match with_retries(&self.retry, || self.registry.describe_stack(&name)).await? {
            Some(network) if !stacks.iter().any(|s| s.name == network.name) => {
                stacks.push(network);
            }
            Some(_) => {}
            None => debug!(stack = %name, "cluster has no network stack"),
        }

        Ok(stacks)
    }
}
