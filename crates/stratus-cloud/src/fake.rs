use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use stratus_model::{OutputMap, Service, Stack, StackEvent, StackStatus};

use crate::error::CloudError;
use crate::registry::{CreateStackRequest, ServiceRegistry, StackRegistry};

/// Operation selector for scripted failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeOp {
    DescribeStacks,
    DescribeStack,
    DescribeStackEvents,
    DescribeService,
    CreateStack,
}

#[derive(Default)]
struct FakeState {
    stacks: Vec<Stack>,
    /// Scripted creation progress per stack; one tick is consumed per
    /// `describe_stack_events` call, mimicking the remote stream growing
    /// between polls. Events are stored newest first, like the real thing.
    event_scripts: HashMap<String, VecDeque<ProgressTick>>,
    current_events: HashMap<String, Vec<StackEvent>>,
    service_scripts: HashMap<String, VecDeque<Service>>,
    current_service: HashMap<String, Service>,
    created: Vec<CreateStackRequest>,
    failures: HashMap<FakeOp, VecDeque<CloudError>>,
}

struct ProgressTick {
    status: StackStatus,
    reason: Option<String>,
    stream: Vec<StackEvent>,
}

/// Scripted in-memory control plane for tests.
///
/// Stacks, event streams and service records are replayed exactly as seeded;
/// transient failures can be injected ahead of any operation.
#[derive(Default)]
pub struct FakeControlPlane {
    inner: Mutex<FakeState>,
}

impl FakeControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a pre-existing stack.
    pub fn add_stack(&self, stack: Stack) {
        self.inner.lock().unwrap().stacks.push(stack);
    }

    /// Append one creation-progress tick for `name`: the full event stream
    /// as of that tick (newest first) and the stack status it lands on.
    pub fn push_progress(
        &self,
        name: &str,
        status: StackStatus,
        reason: Option<&str>,
        stream: Vec<StackEvent>,
    ) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .event_scripts
            .entry(name.to_string())
            .or_default()
            .push_back(ProgressTick {
                status,
                reason: reason.map(str::to_string),
                stream,
            });
    }

    /// Set the outputs a stack exposes (visible on every later describe).
    pub fn set_outputs(&self, name: &str, outputs: OutputMap) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(stack) = inner.stacks.iter_mut().find(|s| s.name == name) {
            stack.outputs = outputs;
        }
    }

    /// Append one service deployment-record sample; the final sample is
    /// repeated once the script runs dry.
    pub fn push_service_state(&self, cluster: &str, service: &str, state: Service) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .service_scripts
            .entry(service_key(cluster, service))
            .or_default()
            .push_back(state);
    }

    /// Inject a failure for an upcoming call to `op`; injected failures
    /// drain in FIFO order before normal behavior resumes.
    pub fn fail_next(&self, op: FakeOp, error: CloudError) {
        let mut inner = self.inner.lock().unwrap();
        inner.failures.entry(op).or_default().push_back(error);
    }

    /// Creation requests accepted so far, in order.
    pub fn created_requests(&self) -> Vec<CreateStackRequest> {
        self.inner.lock().unwrap().created.clone()
    }

    fn take_failure(inner: &mut FakeState, op: FakeOp) -> Option<CloudError> {
        inner.failures.get_mut(&op).and_then(VecDeque::pop_front)
    }
}

fn service_key(cluster: &str, service: &str) -> String {
    format!("{cluster}/{service}")
}

#[async_trait]
impl StackRegistry for FakeControlPlane {
    async fn describe_stacks(&self) -> Result<Vec<Stack>, CloudError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(err) = Self::take_failure(&mut inner, FakeOp::DescribeStacks) {
            return Err(err);
        }
        Ok(inner.stacks.clone())
    }

    async fn describe_stack(&self, name: &str) -> Result<Option<Stack>, CloudError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(err) = Self::take_failure(&mut inner, FakeOp::DescribeStack) {
            return Err(err);
        }
        Ok(inner.stacks.iter().find(|s| s.name == name).cloned())
    }

    async fn describe_stack_events(&self, name: &str) -> Result<Vec<StackEvent>, CloudError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(err) = Self::take_failure(&mut inner, FakeOp::DescribeStackEvents) {
            return Err(err);
        }

        if let Some(tick) = inner
            .event_scripts
            .get_mut(name)
            .and_then(VecDeque::pop_front)
        {
            inner.current_events.insert(name.to_string(), tick.stream);
            if let Some(stack) = inner.stacks.iter_mut().find(|s| s.name == name) {
                stack.status = tick.status;
                stack.status_reason = tick.reason;
            }
        }

        Ok(inner.current_events.get(name).cloned().unwrap_or_default())
    }

    async fn create_stack(&self, request: &CreateStackRequest) -> Result<String, CloudError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(err) = Self::take_failure(&mut inner, FakeOp::CreateStack) {
            return Err(err);
        }

        if inner.stacks.iter().any(|s| s.name == request.name) {
            return Err(CloudError::Api {
                code: "AlreadyExistsException".to_string(),
                message: format!("stack {} already exists", request.name),
            });
        }

        inner.stacks.push(Stack {
            name: request.name.clone(),
            status: StackStatus::CreateInProgress,
            status_reason: None,
            outputs: OutputMap::new(),
            tags: Default::default(),
        });
        inner.created.push(request.clone());

        Ok(format!("stack/{}", request.name))
    }
}

#[async_trait]
impl ServiceRegistry for FakeControlPlane {
    async fn describe_service(
        &self,
        cluster: &str,
        service: &str,
    ) -> Result<Option<Service>, CloudError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(err) = Self::take_failure(&mut inner, FakeOp::DescribeService) {
            return Err(err);
        }

        let key = service_key(cluster, service);
        if let Some(state) = inner
            .service_scripts
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
        {
            inner.current_service.insert(key.clone(), state);
        }

        Ok(inner.current_service.get(&key).cloned())
    }
}
