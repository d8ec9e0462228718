//! Common utilities shared by all mailview crates

pub mod error;
pub mod logging;
pub mod paths;

pub use error::{MailviewError, Result};
pub use logging::{init_logging, init_logging_with_config, LogConfig, LogOutput};
pub use paths::{log_dir, runtime_dir, sockets_dir};
