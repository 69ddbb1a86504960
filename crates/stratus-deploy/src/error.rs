use std::time::Duration;

use stratus_cloud::CloudError;
use stratus_model::StackStatus;
use thiserror::Error;

/// Terminal failure of an orchestration run.
///
/// Every variant is returned to the caller unmodified; only
/// connectivity-transient errors are retried internally (and become
/// [`DeployError::Remote`] once retries are exhausted). Halting and
/// reporting belong to the outermost caller.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("failed to find a service stack for task {task_family:?}, cluster {cluster:?}")]
    StackNotFound {
        task_family: String,
        cluster: String,
    },

    #[error("stack {name:?} not found")]
    StackMissing { name: String },

    #[error("service {service:?} not found in cluster {cluster:?}")]
    ServiceNotFound { service: String, cluster: String },

    #[error("a service already exists for {task_family:?} in cluster {cluster:?}")]
    ServiceAlreadyDeployed {
        task_family: String,
        cluster: String,
    },

    #[error("stack {stack_name:?} is missing required outputs: {keys:?}")]
    MissingOutputs {
        stack_name: String,
        keys: Vec<String>,
    },

    #[error("task definition must expose exactly 1 host-mapped port, found {count}")]
    ExposedPortCount { count: usize },

    #[error(
        "container {container:?} maps port {container_port} to a dynamically assigned host port"
    )]
    DynamicHostPort {
        container: String,
        container_port: u16,
    },

    #[error("control plane error: {0}")]
    Remote(#[from] CloudError),

    #[error("stack creation failed: {status}: {reason}")]
    CreateFailed { status: StackStatus, reason: String },

    #[error("{phase} did not finish within {waited:?}")]
    Timeout { phase: &'static str, waited: Duration },

    #[error("deployment cancelled")]
    Cancelled,
}
