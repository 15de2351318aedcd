//! HTTP API server for the Corral job scheduler.

pub mod error;
pub mod routes;
pub mod state;

pub use state::{AppState, seed_jobs};
