mod logger;
pub use logger::{LoggerConfig, LoggerError, LoggerFormat, logger_init};

mod progress;
pub use progress::log_observation;
