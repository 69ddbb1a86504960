use serde::{Deserialize, Serialize};

use crate::{Service, StackEvent};

/// Per-tick view of a service's deployment record during stabilization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSample {
    pub service: String,
    /// Task definition of the leading (primary) deployment, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_definition: Option<String>,
    pub deployment_count: usize,
    pub desired_count: u32,
    pub running_count: u32,
}

impl ServiceSample {
    /// Snapshot the leading deployment of a freshly fetched service record.
    pub fn of(service: &Service) -> Self {
        let primary = service.deployments.first();
        Self {
            service: service.name.clone(),
            task_definition: primary.map(|d| d.task_definition.clone()),
            deployment_count: service.deployments.len(),
            desired_count: primary.map(|d| d.desired_count).unwrap_or(0),
            running_count: primary.map(|d| d.running_count).unwrap_or(0),
        }
    }
}

/// One immutable observation produced by a polling loop.
///
/// The orchestrator emits these over a channel; consumers (logging, UIs)
/// subscribe without ever influencing convergence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeployObservation {
    /// A newly observed stack creation event.
    StackEvent(StackEvent),
    /// A service deployment-record sample.
    ServiceSample(ServiceSample),
}
