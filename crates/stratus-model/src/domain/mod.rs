use std::collections::BTreeMap;

mod stack;
pub use stack::{Stack, StackStatus};

mod stack_event;
pub use stack_event::StackEvent;

mod task_definition;
pub use task_definition::{ContainerDefinition, ExposedPort, PortMapping, TaskDefinition};

mod network;
pub use network::NetworkOutputs;

mod service;
pub use service::{Deployment, Service};

mod observation;
pub use observation::{DeployObservation, ServiceSample};

/// Output mapping exposed by a stack after creation.
///
/// Outputs double as the durable registry: there is no separate database,
/// later rediscovery matches on output key/value pairs.
pub type OutputMap = BTreeMap<String, String>;

/// Tag mapping attached to a stack.
pub type TagMap = BTreeMap<String, String>;
