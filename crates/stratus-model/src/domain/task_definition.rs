use serde::{Deserialize, Serialize};

/// Pairing of a container's internal port with a port exposed on the host.
///
/// A missing or zero `host_port` means the cluster assigns the host port
/// dynamically at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    pub container_port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_port: Option<u16>,
}

impl PortMapping {
    /// Returns `true` if the mapping declares a host port at all.
    pub fn is_host_mapped(&self) -> bool {
        self.host_port.is_some()
    }

    /// Returns the host port only when it is fixed at definition time.
    pub fn fixed_host_port(&self) -> Option<u16> {
        match self.host_port {
            Some(0) | None => None,
            port => port,
        }
    }
}

/// One container within a task definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub port_mappings: Vec<PortMapping>,
}

/// A host-mapped port together with its owning container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExposedPort {
    pub container: String,
    pub mapping: PortMapping,
}

/// An immutable, versioned description of one or more containers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    pub family: String,
    pub revision: u32,
    /// Unique identifier of this (family, revision) registration.
    pub arn: String,
    pub containers: Vec<ContainerDefinition>,
}

impl TaskDefinition {
    /// Every host-mapped port across all containers, in container order.
    pub fn exposed_ports(&self) -> Vec<ExposedPort> {
        self.containers
            .iter()
            .flat_map(|c| {
                c.port_mappings
                    .iter()
                    .filter(|m| m.is_host_mapped())
                    .map(|m| ExposedPort {
                        container: c.name.clone(),
                        mapping: *m,
                    })
            })
            .collect()
    }
}
