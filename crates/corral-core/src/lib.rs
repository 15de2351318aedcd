//! Core domain types for the Corral job scheduler.
//!
//! This crate contains:
//! - Job and manager identifiers
//! - Job configuration payloads
//! - Service discovery registration payloads
//! - The shared error type

pub mod discovery;
pub mod error;
pub mod id;
pub mod job;

pub use error::{Error, Result};
pub use id::{JobKey, ManagerId};
pub use job::{CronCollisionPolicy, JobConfiguration, TaskConfig};
