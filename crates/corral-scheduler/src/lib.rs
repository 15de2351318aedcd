//! Job scheduling service for the Corral job scheduler.
//!
//! [`SchedulerService`] registers jobs in a job store under the immediate or
//! cron manager. [`LoggingSchedulerAdmin`] wraps any [`SchedulerAdmin`] and
//! logs every administrative call before forwarding it.

pub mod admin;
pub mod logging;
pub mod service;

pub use admin::{ManagedJob, SchedulerAdmin, Session};
pub use logging::LoggingSchedulerAdmin;
pub use service::SchedulerService;
