//! KDL configuration parsing for the Corral job scheduler.
//!
//! This crate handles parsing of:
//! - Server configuration (corral.kdl)
//! - Job definition files

pub mod error;
pub mod jobs;
mod node;
pub mod system;

pub use error::{ConfigError, ConfigResult};
pub use jobs::{JobDefinition, load_jobs, parse_jobs};
pub use system::{LogFormat, LoggingConfig, SystemConfig, parse_system_config};
