use serde::{Deserialize, Serialize};

/// One in-flight or settled rollout of a task definition within a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    /// ARN of the task definition this deployment runs.
    pub task_definition: String,
    /// Rollout label as reported by the cluster (`PRIMARY`, `ACTIVE`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub desired_count: u32,
    pub running_count: u32,
    #[serde(default)]
    pub pending_count: u32,
}

/// A service's deployment record as observed from the cluster.
///
/// Re-fetched on every poll tick; never cached across ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub name: String,
    pub cluster: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deployments: Vec<Deployment>,
}

impl Service {
    /// Steady state: exactly one deployment, on the desired task definition,
    /// with its running count matching its desired count.
    pub fn is_stable_on(&self, desired_task_definition: &str) -> bool {
        match self.deployments.as_slice() {
            [only] => {
                only.task_definition == desired_task_definition
                    && only.running_count == only.desired_count
            }
            _ => false,
        }
    }
}
