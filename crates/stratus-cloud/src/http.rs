use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use stratus_model::{Service, Stack, StackEvent};
use tracing::debug;

use crate::error::CloudError;
use crate::registry::{CreateStackRequest, ServiceRegistry, StackRegistry};

/// JSON-over-HTTP control-plane client.
///
/// One POST per operation against `<endpoint>/v1/...`; session/credential
/// material is expected to be baked into the endpoint's gateway and is not
/// handled here.
pub struct HttpControlPlane {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpControlPlane {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn post<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp, CloudError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        debug!(path, "control plane request");

        let response = self
            .client
            .post(format!("{}{}", self.endpoint, path))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.as_u16() == 429 {
            return Err(CloudError::Throttled(body));
        }
        if status.is_server_error() {
            return Err(CloudError::Transport(format!("{status}: {body}")));
        }
        if !status.is_success() {
            return Err(match serde_json::from_str::<ErrorBody>(&body) {
                Ok(err) => CloudError::Api {
                    code: err.code,
                    message: err.message,
                },
                Err(_) => CloudError::Api {
                    code: status.to_string(),
                    message: body,
                },
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            CloudError::InvalidResponse(format!("failed to parse response: {e}, body: {body}"))
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DescribeStacksRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    stack_name: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct DescribeStacksResponse {
    stacks: Vec<Stack>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DescribeStackEventsRequest<'a> {
    stack_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct DescribeStackEventsResponse {
    events: Vec<StackEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateStackResponse {
    stack_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DescribeServiceRequest<'a> {
    cluster: &'a str,
    service: &'a str,
}

#[derive(Debug, Deserialize)]
struct DescribeServiceResponse {
    #[serde(default)]
    service: Option<Service>,
}

#[async_trait]
impl StackRegistry for HttpControlPlane {
    async fn describe_stacks(&self) -> Result<Vec<Stack>, CloudError> {
        let response: DescribeStacksResponse = self
            .post("/v1/describe-stacks", &DescribeStacksRequest { stack_name: None })
            .await?;
        Ok(response.stacks)
    }

    async fn describe_stack(&self, name: &str) -> Result<Option<Stack>, CloudError> {
        let response: DescribeStacksResponse = self
            .post(
                "/v1/describe-stacks",
                &DescribeStacksRequest {
                    stack_name: Some(name),
                },
            )
            .await?;
        Ok(response.stacks.into_iter().next())
    }

    async fn describe_stack_events(&self, name: &str) -> Result<Vec<StackEvent>, CloudError> {
        let response: DescribeStackEventsResponse = self
            .post(
                "/v1/describe-stack-events",
                &DescribeStackEventsRequest { stack_name: name },
            )
            .await?;
        Ok(response.events)
    }

    async fn create_stack(&self, request: &CreateStackRequest) -> Result<String, CloudError> {
        let response: CreateStackResponse = self.post("/v1/create-stack", request).await?;
        Ok(response.stack_id)
    }
}

#[async_trait]
impl ServiceRegistry for HttpControlPlane {
    async fn describe_service(
        &self,
        cluster: &str,
        service: &str,
    ) -> Result<Option<Service>, CloudError> {
        let response: DescribeServiceResponse = self
            .post(
                "/v1/describe-service",
                &DescribeServiceRequest { cluster, service },
            )
            .await?;
        Ok(response.service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_parses_control_plane_envelope() {
        let body = r#"{"code":"AlreadyExistsException","message":"stack prod-web exists"}"#;
        let err: ErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(err.code, "AlreadyExistsException");
        assert_eq!(err.message, "stack prod-web exists");
    }

    #[test]
    fn describe_service_tolerates_absent_service() {
        let response: DescribeServiceResponse = serde_json::from_str("{}").unwrap();
        assert!(response.service.is_none());
    }
}
