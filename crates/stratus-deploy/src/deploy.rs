use std::sync::Arc;

use stratus_cloud::{ServiceRegistry, StackRegistry};
use stratus_model::TaskDefinition;
use time::OffsetDateTime;
use time::macros::format_description;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::DeployConfig;
use crate::error::DeployError;
use crate::locator::StackLocator;
use crate::params::service_parameters;
use crate::progress::ProgressSender;
use crate::provision::StackProvisioner;
use crate::stabilize::ServiceStabilizer;

/// Outputs a service-stack template must declare for read-back.
const OUTPUT_SERVICE: &str = "ECSService";
const OUTPUT_LOAD_BALANCER: &str = "ECSLoadBalancer";

/// One service deployment to run.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub cluster: String,
    /// An already-registered task definition; registration itself is the
    /// caller's concern.
    pub task_definition: TaskDefinition,
    pub health_check_url: String,
    /// Service-stack template, passed to the registry verbatim.
    pub template_body: String,
    /// Override for the generated `<cluster>-ecs-service-<timestamp>` name.
    pub stack_name: Option<String>,
}

/// Where the deployed service ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub stack_name: String,
    /// Deployed service identifier, from the stack's outputs.
    pub service: String,
    /// Externally reachable address, from the stack's outputs.
    pub load_balancer: String,
}

/// Sequential deployment flow: discover, build parameters, provision,
/// stabilize.
///
/// Holds no authoritative state; every decision re-reads the control plane.
/// Nothing is cleaned up on failure — partially created stacks are left to
/// the registry's own rollback behavior and to the operator.
pub struct Deployer {
    locator: StackLocator,
    provisioner: StackProvisioner,
    stabilizer: ServiceStabilizer,
}

impl Deployer {
    pub fn new(
        stacks: Arc<dyn StackRegistry>,
        services: Arc<dyn ServiceRegistry>,
        config: DeployConfig,
    ) -> Self {
        Self {
            locator: StackLocator::new(stacks.clone()).with_retry(config.retry.clone()),
            provisioner: StackProvisioner::new(stacks)
                .with_config(config.create.clone())
                .with_retry(config.retry.clone()),
            stabilizer: ServiceStabilizer::new(services)
                .with_config(config.stabilize.clone())
                .with_retry(config.retry),
        }
    }

    pub async fn deploy(
        &self,
        request: &DeployRequest,
        cancel: &CancellationToken,
        progress: &ProgressSender,
    ) -> Result<DeployOutcome, DeployError> {
        let cluster = &request.cluster;
        let family = &request.task_definition.family;

        match self.locator.find_service_stack(cluster, family).await {
            Ok(_) => {
                return Err(DeployError::ServiceAlreadyDeployed {
                    task_family: family.clone(),
                    cluster: cluster.clone(),
                });
            }
            Err(DeployError::StackNotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let network = self.locator.find_network_stack(cluster).await?;
        info!(stack = %network.stack_name, "found network stack for cluster");

        let parameters = service_parameters(
            cluster,
            &request.task_definition,
            &network,
            &request.health_check_url,
        )?;

        let stack_name = request
            .stack_name
            .clone()
            .unwrap_or_else(|| service_stack_name(cluster));

        info!(stack = %stack_name, "creating service stack");
        self.provisioner
            .create_stack(&stack_name, &request.template_body, parameters)
            .await?;
        self.provisioner
            .poll_until_created(&stack_name, cancel, progress)
            .await?;

        let outputs = self.provisioner.stack_outputs(&stack_name).await?;
        let missing: Vec<String> = [OUTPUT_SERVICE, OUTPUT_LOAD_BALANCER]
            .iter()
            .filter(|key| outputs.get(**key).is_none_or(|v| v.is_empty()))
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DeployError::MissingOutputs {
                stack_name,
                keys: missing,
            });
        }

        let service = outputs[OUTPUT_SERVICE].clone();
        info!(service = %service, "waiting for service to reach a steady state");
        self.stabilizer
            .poll_until_deployed(
                cluster,
                &service,
                &request.task_definition.arn,
                cancel,
                progress,
            )
            .await?;

        Ok(DeployOutcome {
            stack_name,
            service,
            load_balancer: outputs[OUTPUT_LOAD_BALANCER].clone(),
        })
    }
}

/// `<cluster>-ecs-service-<yyyymmdd-hhmmss>`, UTC.
fn service_stack_name(cluster: &str) -> String {
    let stamp_format = format_description!("[year][month][day]-[hour][minute][second]");
    let stamp = OffsetDateTime::now_utc()
        .format(&stamp_format)
        .expect("formatting with a constant description");
    format!("{cluster}-ecs-service-{stamp}")
}
