mod error;
pub use error::CloudError;

mod registry;
pub use registry::{CreateStackRequest, ServiceRegistry, StackRegistry};

mod retry;
pub use retry::{RetryPolicy, with_retries};

mod http;
pub use http::HttpControlPlane;

#[cfg(feature = "fake")]
mod fake;
#[cfg(feature = "fake")]
pub use fake::{FakeControlPlane, FakeOp};
