use stratus_model::{NetworkOutputs, OutputMap, TaskDefinition};

use crate::error::DeployError;

/// Build the parameter mapping for a service-stack creation.
///
/// The receiving template supports a single load-balanced port, so the task
/// definition must expose exactly one host-mapped container port across all
/// its containers, and that port must be fixed at definition time. The
/// result is template-agnostic data, handed to stack creation verbatim.
pub fn service_parameters(
    cluster: &str,
    task_definition: &TaskDefinition,
    network: &NetworkOutputs,
    health_check_url: &str,
) -> Result<OutputMap, DeployError> {
    let exposed = task_definition.exposed_ports();
    let [port] = exposed.as_slice() else {
        return Err(DeployError::ExposedPortCount {
            count: exposed.len(),
        });
    };

    let host_port = port
        .mapping
        .fixed_host_port()
        .ok_or_else(|| DeployError::DynamicHostPort {
            container: port.container.clone(),
            container_port: port.mapping.container_port,
        })?;

    Ok([
        ("ECSCluster".to_string(), cluster.to_string()),
        ("TaskFamily".to_string(), task_definition.family.clone()),
        ("TaskDefinition".to_string(), task_definition.arn.clone()),
        ("Subnets".to_string(), network.subnets.clone()),
        ("Vpc".to_string(), network.vpc.clone()),
        (
            "ECSSecurityGroup".to_string(),
            network.security_group.clone(),
        ),
        ("ContainerName".to_string(), port.container.clone()),
        (
            "ContainerPort".to_string(),
            port.mapping.container_port.to_string(),
        ),
        ("HealthCheckUrl".to_string(), health_check_url.to_string()),
        ("ELBPort".to_string(), host_port.to_string()),
    ]
    .into())
}

#[cfg(test)]
mod tests {
    use stratus_model::{ContainerDefinition, PortMapping};

    use super::*;

    fn network() -> NetworkOutputs {
        NetworkOutputs {
            stack_name: "prod-network".to_string(),
            vpc: "vpc-1".to_string(),
            subnets: "subnet-1,subnet-2".to_string(),
            security_group: "sg-1".to_string(),
        }
    }

    fn task_def(containers: Vec<ContainerDefinition>) -> TaskDefinition {
        TaskDefinition {
            family: "web".to_string(),
            revision: 5,
            arn: "arn:aws:ecs:task-definition/web:5".to_string(),
            containers,
        }
    }

    fn container(name: &str, mappings: &[(u16, Option<u16>)]) -> ContainerDefinition {
        ContainerDefinition {
            name: name.to_string(),
            port_mappings: mappings
                .iter()
                .map(|(c, h)| PortMapping {
                    container_port: *c,
                    host_port: *h,
                })
                .collect(),
        }
    }

    #[test]
    fn single_exposed_port_builds_full_mapping() {
        let td = task_def(vec![container("app", &[(8080, Some(80))])]);

        let params = service_parameters("prod", &td, &network(), "/healthz").unwrap();

        let keys: Vec<&str> = params.keys().map(String::as_str).collect();
        let mut expected = vec![
            "ECSCluster",
            "TaskFamily",
            "TaskDefinition",
            "Subnets",
            "Vpc",
            "ECSSecurityGroup",
            "ContainerName",
            "ContainerPort",
            "HealthCheckUrl",
            "ELBPort",
        ];
        expected.sort_unstable();
        assert_eq!(keys, expected);

        assert_eq!(params["ECSCluster"], "prod");
        assert_eq!(params["TaskDefinition"], "arn:aws:ecs:task-definition/web:5");
        assert_eq!(params["ContainerName"], "app");
        assert_eq!(params["ContainerPort"], "8080");
        assert_eq!(params["ELBPort"], "80");
        assert_eq!(params["HealthCheckUrl"], "/healthz");
        assert_eq!(params["Vpc"], "vpc-1");
        assert_eq!(params["Subnets"], "subnet-1,subnet-2");
        assert_eq!(params["ECSSecurityGroup"], "sg-1");
    }

    #[test]
    fn zero_exposed_ports_is_rejected() {
        let td = task_def(vec![container("app", &[(8080, None)])]);

        let err = service_parameters("prod", &td, &network(), "/").unwrap_err();
        assert!(matches!(err, DeployError::ExposedPortCount { count: 0 }));
    }

    #[test]
    fn two_containers_each_exposing_one_port_reports_two() {
        let td = task_def(vec![
            container("app", &[(8080, Some(80))]),
            container("admin", &[(9090, Some(9090))]),
        ]);

        let err = service_parameters("prod", &td, &network(), "/").unwrap_err();
        assert!(matches!(err, DeployError::ExposedPortCount { count: 2 }));
    }

    #[test]
    fn dynamic_host_port_fails_explicitly() {
        let td = task_def(vec![container("app", &[(8080, Some(0))])]);

        let err = service_parameters("prod", &td, &network(), "/").unwrap_err();
        match err {
            DeployError::DynamicHostPort {
                container,
                container_port,
            } => {
                assert_eq!(container, "app");
                assert_eq!(container_port, 8080);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
