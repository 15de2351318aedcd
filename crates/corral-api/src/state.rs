//! Application state.

use corral_config::JobDefinition;
use corral_core::discovery::ServiceInstance;
use corral_scheduler::{LoggingSchedulerAdmin, SchedulerAdmin, SchedulerService};
use corral_store::{JobStore, MemJobStore, MutableJobStore};
use std::sync::Arc;
use tracing::info;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub admin: Arc<dyn SchedulerAdmin>,
    pub store: Arc<dyn JobStore>,
    pub instance: Arc<ServiceInstance>,
}

impl AppState {
    /// Wire the scheduler, with request logging, over `store`.
    pub fn new(store: Arc<MemJobStore>, instance: ServiceInstance) -> Self {
        let service = SchedulerService::new(store.clone());
        Self {
            admin: Arc::new(LoggingSchedulerAdmin::new(service)),
            store,
            instance: Arc::new(instance),
        }
    }
}

/// Load job definitions into the store under their declared managers.
pub fn seed_jobs(store: &dyn MutableJobStore, jobs: Vec<JobDefinition>) {
    let count = jobs.len();
    for job in jobs {
        store.save_accepted_job(&job.manager, job.config);
    }
    info!(count, managers = store.fetch_manager_ids().len(), "Seeded job store");
}
