use stratus_model::DeployObservation;
use tracing::{info, warn};

/// Log one polling observation at an appropriate level.
///
/// Consumers of the progress channel call this per received observation;
/// convergence never depends on it.
pub fn log_observation(observation: &DeployObservation) {
    match observation {
        DeployObservation::StackEvent(event) => {
            if event.resource_status.is_create_failed() {
                warn!(
                    resource = %event.logical_resource_id,
                    resource_type = %event.resource_type,
                    status = %event.resource_status,
                    reason = event.resource_status_reason.as_deref().unwrap_or(""),
                    "stack resource failed"
                );
            } else {
                info!(
                    resource = %event.logical_resource_id,
                    resource_type = %event.resource_type,
                    status = %event.resource_status,
                    "stack event"
                );
            }
        }
        DeployObservation::ServiceSample(sample) => {
            info!(
                service = %sample.service,
                deployments = sample.deployment_count,
                running = sample.running_count,
                desired = sample.desired_count,
                "waiting for service to stabilize"
            );
        }
    }
}
