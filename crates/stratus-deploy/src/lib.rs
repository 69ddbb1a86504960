mod error;
pub use error::DeployError;

mod config;
pub use config::{DeployConfig, PollConfig};

mod progress;
pub use progress::ProgressSender;

mod cursor;
pub use cursor::EventCursor;

mod locator;
pub use locator::StackLocator;

mod params;
pub use params::service_parameters;

mod provision;
pub use provision::StackProvisioner;

mod stabilize;
pub use stabilize::ServiceStabilizer;

mod deploy;
pub use deploy::{DeployOutcome, DeployRequest, Deployer};
