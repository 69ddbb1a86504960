use serde::{Deserialize, Serialize};

use crate::OutputMap;

/// Derived view of a shared network stack's outputs.
///
/// All four fields are non-empty once constructed; construction fails with
/// the list of missing keys otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkOutputs {
    pub stack_name: String,
    pub vpc: String,
    /// Comma-separated subnet identifiers, passed through verbatim.
    pub subnets: String,
    pub security_group: String,
}

impl NetworkOutputs {
    /// Output keys a network stack must expose.
    pub const REQUIRED_KEYS: &'static [&'static str] = &["Vpc", "Subnets", "SecurityGroup"];

    /// Required keys that are absent or empty, in declaration order.
    pub fn missing_keys(outputs: &OutputMap) -> Vec<String> {
        Self::REQUIRED_KEYS
            .iter()
            .filter(|key| outputs.get(**key).is_none_or(|v| v.is_empty()))
            .map(|key| key.to_string())
            .collect()
    }

    /// Build from a network stack's outputs, failing with the missing keys.
    pub fn from_outputs(stack_name: &str, outputs: &OutputMap) -> Result<Self, Vec<String>> {
        let missing = Self::missing_keys(outputs);
        if !missing.is_empty() {
            return Err(missing);
        }

        Ok(Self {
            stack_name: stack_name.to_string(),
            vpc: outputs["Vpc"].clone(),
            subnets: outputs["Subnets"].clone(),
            security_group: outputs["SecurityGroup"].clone(),
        })
    }
}
