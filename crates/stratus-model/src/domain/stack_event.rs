use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::StackStatus;

/// One entry in a stack's creation-event stream.
///
/// Event ids are unique within a stack; pollers deduplicate on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackEvent {
    /// Unique event identifier.
    pub id: String,
    pub stack_name: String,
    /// Logical name of the resource the event refers to.
    pub logical_resource_id: String,
    /// Provider-specific resource type (e.g. `AWS::ECS::Service`).
    pub resource_type: String,
    pub resource_status: StackStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_status_reason: Option<String>,
    #[serde(with = "time_serde")]
    pub timestamp: SystemTime,
}

mod time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let since_epoch = time
            .duration_since(UNIX_EPOCH)
            .map_err(serde::ser::Error::custom)?;
        since_epoch.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + std::time::Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_roundtrip() {
        let event = StackEvent {
            id: "evt-1".to_string(),
            stack_name: "prod-ecs-service-20250101-000000".to_string(),
            logical_resource_id: "ECSService".to_string(),
            resource_type: "AWS::ECS::Service".to_string(),
            resource_status: StackStatus::CreateInProgress,
            resource_status_reason: None,
            timestamp: SystemTime::now(),
        };

        let json = serde_json::to_string(&event).unwrap();
        let back: StackEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, event.id);
        assert_eq!(back.resource_status, event.resource_status);
        assert!(!json.contains("resourceStatusReason"));
    }
}
