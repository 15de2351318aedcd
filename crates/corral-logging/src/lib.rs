//! Log formatting and tracing setup for the Corral job scheduler.
//!
//! Log lines follow the glog layout:
//!
//! ```text
//! I0218 17:36:47.461 THREAD3 corral_scheduler::logging.create_job: message
//! ```

pub mod format;
pub mod glog;
mod init;

pub use format::GlogFormat;
pub use glog::{Level, LogRecord, format_record, render_error_chain};
pub use init::init_tracing;
