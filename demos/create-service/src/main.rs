use std::env;
use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::info;

use stratus_cloud::{HttpControlPlane, ServiceRegistry, StackRegistry};
use stratus_deploy::{DeployConfig, DeployRequest, Deployer};
use stratus_model::TaskDefinition;
use stratus_observe::{LoggerConfig, log_observation, logger_init};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Logger
    logger_init(&LoggerConfig::default())?;

    // 2) Control plane client, constructed once and shared
    let endpoint =
        env::var("STRATUS_ENDPOINT").context("STRATUS_ENDPOINT must point at the control plane")?;
    let control_plane = Arc::new(HttpControlPlane::new(endpoint));

    // 3) Inputs: an already-registered task definition and the service template
    let task_definition_path =
        env::var("TASK_DEFINITION_FILE").context("TASK_DEFINITION_FILE is required")?;
    let task_definition: TaskDefinition = serde_json::from_str(
        &tokio::fs::read_to_string(&task_definition_path).await?,
    )
    .with_context(|| format!("parsing {task_definition_path}"))?;

    let template_path = env::var("TEMPLATE_FILE").context("TEMPLATE_FILE is required")?;
    let template_body = tokio::fs::read_to_string(&template_path).await?;

    let request = DeployRequest {
        cluster: env::var("CLUSTER").context("CLUSTER is required")?,
        task_definition,
        health_check_url: env::var("HEALTH_CHECK_URL").unwrap_or_else(|_| "/".to_string()),
        template_body,
        stack_name: env::var("STACK_NAME").ok(),
    };
    info!(
        cluster = %request.cluster,
        task_family = %request.task_definition.family,
        "deploying service"
    );

    // 4) Progress consumer
    let (progress, mut observations) = tokio::sync::mpsc::channel(64);
    let consumer = tokio::spawn(async move {
        while let Some(observation) = observations.recv().await {
            log_observation(&observation);
        }
    });

    // 5) Cancel on Ctrl+C
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, cancelling");
            signal_cancel.cancel();
        }
    });

    // 6) One sequential deploy run
    let deployer = Deployer::new(
        control_plane.clone() as Arc<dyn StackRegistry>,
        control_plane as Arc<dyn ServiceRegistry>,
        DeployConfig::default(),
    );
    let outcome = deployer.deploy(&request, &cancel, &progress).await?;

    drop(progress);
    let _ = consumer.await;

    println!("Service available at {}", outcome.load_balancer);
    println!("Stack: {}", outcome.stack_name);
    Ok(())
}
