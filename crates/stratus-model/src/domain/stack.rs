use serde::{Deserialize, Serialize};

use crate::{OutputMap, TagMap};

/// Lifecycle state of a stack, as reported by the control plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StackStatus {
    /// Creation request accepted, resources are being provisioned.
    CreateInProgress,
    /// All resources provisioned successfully.
    CreateComplete,
    /// Creation failed before rollback started.
    CreateFailed,
    /// A failed creation is being rolled back.
    RollbackInProgress,
    /// Rollback finished; the stack holds no usable resources.
    RollbackComplete,
    /// Rollback itself failed; operator intervention required.
    RollbackFailed,
    /// Stack is being deleted.
    DeleteInProgress,
    /// Stack has been deleted.
    DeleteComplete,
}

impl StackStatus {
    /// Wire form of the status (`CREATE_IN_PROGRESS`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            StackStatus::CreateInProgress => "CREATE_IN_PROGRESS",
            StackStatus::CreateComplete => "CREATE_COMPLETE",
            StackStatus::CreateFailed => "CREATE_FAILED",
            StackStatus::RollbackInProgress => "ROLLBACK_IN_PROGRESS",
            StackStatus::RollbackComplete => "ROLLBACK_COMPLETE",
            StackStatus::RollbackFailed => "ROLLBACK_FAILED",
            StackStatus::DeleteInProgress => "DELETE_IN_PROGRESS",
            StackStatus::DeleteComplete => "DELETE_COMPLETE",
        }
    }

    /// Returns `true` once creation finished successfully.
    pub fn is_create_complete(&self) -> bool {
        matches!(self, StackStatus::CreateComplete)
    }

    /// Returns `true` when creation failed or the stack is rolling back.
    pub fn is_create_failed(&self) -> bool {
        matches!(
            self,
            StackStatus::CreateFailed
                | StackStatus::RollbackInProgress
                | StackStatus::RollbackComplete
                | StackStatus::RollbackFailed
        )
    }

    /// Returns `true` if the status won't transition further on its own.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StackStatus::CreateComplete
                | StackStatus::CreateFailed
                | StackStatus::RollbackComplete
                | StackStatus::RollbackFailed
                | StackStatus::DeleteComplete
        )
    }
}

impl std::fmt::Display for StackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named unit of provisioned infrastructure tracked by the control plane.
///
/// The event history is served by a separate control-plane call and is not
/// embedded here; every read reflects current remote state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stack {
    pub name: String,
    pub status: StackStatus,
    /// Reason text accompanying a failed or rolled-back status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,
    #[serde(default, skip_serializing_if = "OutputMap::is_empty")]
    pub outputs: OutputMap,
    #[serde(default, skip_serializing_if = "TagMap::is_empty")]
    pub tags: TagMap,
}

impl Stack {
    /// Returns `true` when the stack's outputs contain every `filter` pair
    /// (logical AND, exact string match).
    pub fn matches_outputs(&self, filter: &OutputMap) -> bool {
        filter
            .iter()
            .all(|(k, v)| self.outputs.get(k).is_some_and(|out| out == v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_with_outputs(pairs: &[(&str, &str)]) -> Stack {
        Stack {
            name: "demo".to_string(),
            status: StackStatus::CreateComplete,
            status_reason: None,
            outputs: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            tags: TagMap::new(),
        }
    }

    fn filter(pairs: &[(&str, &str)]) -> OutputMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn status_wire_casing() {
        let json = serde_json::to_string(&StackStatus::CreateInProgress).unwrap();
        assert_eq!(json, r#""CREATE_IN_PROGRESS""#);

        let back: StackStatus = serde_json::from_str(r#""ROLLBACK_COMPLETE""#).unwrap();
        assert_eq!(back, StackStatus::RollbackComplete);
    }

    #[test]
    fn terminal_states() {
        assert!(StackStatus::CreateComplete.is_terminal());
        assert!(StackStatus::CreateFailed.is_terminal());
        assert!(StackStatus::RollbackComplete.is_terminal());
        assert!(StackStatus::RollbackFailed.is_terminal());

        assert!(!StackStatus::CreateInProgress.is_terminal());
        assert!(!StackStatus::RollbackInProgress.is_terminal());
    }

    #[test]
    fn failed_family_covers_rollback() {
        assert!(StackStatus::CreateFailed.is_create_failed());
        assert!(StackStatus::RollbackInProgress.is_create_failed());
        assert!(StackStatus::RollbackComplete.is_create_failed());

        assert!(!StackStatus::CreateComplete.is_create_failed());
        assert!(!StackStatus::CreateInProgress.is_create_failed());
    }

    #[test]
    fn matches_outputs_requires_every_pair() {
        let stack = stack_with_outputs(&[("StackType", "service"), ("ECSCluster", "prod")]);

        assert!(stack.matches_outputs(&filter(&[("ECSCluster", "prod")])));
        assert!(stack.matches_outputs(&filter(&[
            ("StackType", "service"),
            ("ECSCluster", "prod"),
        ])));

        assert!(!stack.matches_outputs(&filter(&[("ECSCluster", "staging")])));
        assert!(!stack.matches_outputs(&filter(&[("TaskFamily", "web")])));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let stack = stack_with_outputs(&[]);
        assert!(stack.matches_outputs(&OutputMap::new()));
    }
}
