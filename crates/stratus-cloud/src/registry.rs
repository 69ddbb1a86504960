use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stratus_model::{OutputMap, Service, Stack, StackEvent};

use crate::error::CloudError;

/// Stack creation request, passed to the control plane verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStackRequest {
    pub name: String,
    pub template_body: String,
    pub parameters: OutputMap,
    /// Caller-generated token identifying this request. The control plane
    /// still rejects duplicate stack names; the token only disambiguates
    /// retransmissions of the same request.
    pub client_token: String,
}

/// Read/write access to the infrastructure-stack registry.
///
/// Implementations are explicit client objects constructed once and shared
/// by reference; there is no package-level client state.
#[async_trait]
pub trait StackRegistry: Send + Sync + 'static {
    /// All stacks visible to this client, in the registry's listing order.
    async fn describe_stacks(&self) -> Result<Vec<Stack>, CloudError>;

    /// Single stack by name; `None` when absent.
    async fn describe_stack(&self, name: &str) -> Result<Option<Stack>, CloudError>;

    /// Creation-event stream of a stack, newest first as the control plane
    /// serves it. Callers are responsible for ordering and deduplication.
    async fn describe_stack_events(&self, name: &str) -> Result<Vec<StackEvent>, CloudError>;

    /// Issue a single, non-idempotent creation request; returns the stack id.
    async fn create_stack(&self, request: &CreateStackRequest) -> Result<String, CloudError>;
}

/// Read access to the cluster's service deployment records.
#[async_trait]
pub trait ServiceRegistry: Send + Sync + 'static {
    /// Deployment record of a named service; `None` when the service does
    /// not exist in the cluster.
    async fn describe_service(
        &self,
        cluster: &str,
        service: &str,
    ) -> Result<Option<Service>, CloudError>;
}
