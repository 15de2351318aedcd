//! Scheduler backed by a job store.

use async_trait::async_trait;
use corral_core::{Error, JobConfiguration, JobKey, ManagerId, Result};
use corral_store::{JobStore, MutableJobStore};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::admin::{ManagedJob, SchedulerAdmin, Session};

/// Registers jobs under the cron manager when they carry a schedule and
/// under the immediate manager otherwise.
pub struct SchedulerService {
    store: Arc<dyn MutableJobStore>,
    /// Serializes check-then-write sequences across requests.
    writes: Mutex<()>,
}

impl SchedulerService {
    pub fn new(store: Arc<dyn MutableJobStore>) -> Self {
        Self {
            store,
            writes: Mutex::new(()),
        }
    }

    fn manager_for(config: &JobConfiguration) -> ManagerId {
        if config.is_cron() {
            ManagerId::cron()
        } else {
            ManagerId::immediate()
        }
    }

    fn find(&self, key: &JobKey) -> Option<ManagedJob> {
        self.store
            .find_job(key)
            .map(|(manager, config)| ManagedJob { manager, config })
    }
}

/// Fill in defaults and reject configurations that cannot be scheduled.
fn populate(mut config: JobConfiguration) -> Result<JobConfiguration> {
    if config.task.image.trim().is_empty() {
        return Err(Error::InvalidInput(format!(
            "job {} has no task image",
            config.key
        )));
    }

    if config.instance_count == 0 {
        config.instance_count = 1;
    }

    config.cron_schedule = match config.cron_schedule.take() {
        Some(schedule) if schedule.trim().is_empty() => None,
        Some(schedule) => {
            let fields = schedule.split_whitespace().count();
            if fields != 5 {
                return Err(Error::InvalidInput(format!(
                    "cron schedule '{schedule}' must have 5 fields, found {fields}"
                )));
            }
            Some(schedule.split_whitespace().collect::<Vec<_>>().join(" "))
        }
        None => None,
    };

    Ok(config)
}

#[async_trait]
impl SchedulerAdmin for SchedulerService {
    async fn create_job(
        &self,
        config: JobConfiguration,
        _session: &Session,
    ) -> Result<ManagedJob> {
        let config = populate(config)?;
        let manager = Self::manager_for(&config);

        let _guard = self.writes.lock().await;
        if let Some(existing) = self.find(&config.key) {
            return Err(Error::Conflict(format!(
                "job {} already exists under manager {}",
                config.key, existing.manager
            )));
        }

        self.store.save_accepted_job(&manager, config.clone());
        info!(job = %config.key, manager = %manager, "Accepted job");
        Ok(ManagedJob { manager, config })
    }

    async fn replace_job(
        &self,
        config: JobConfiguration,
        _session: &Session,
    ) -> Result<ManagedJob> {
        let config = populate(config)?;
        let manager = Self::manager_for(&config);

        let _guard = self.writes.lock().await;
        let Some(previous) = self.find(&config.key) else {
            return Err(Error::NotFound(format!("job {}", config.key)));
        };

        self.store.replace_job(&manager, config.clone());
        info!(
            job = %config.key,
            from = %previous.manager,
            to = %manager,
            "Replaced job"
        );
        Ok(ManagedJob { manager, config })
    }

    async fn populate_job_config(&self, config: JobConfiguration) -> Result<JobConfiguration> {
        populate(config)
    }

    async fn get_job(&self, key: &JobKey) -> Result<Option<ManagedJob>> {
        Ok(self.find(key))
    }

    async fn get_jobs(&self, manager: &ManagerId) -> Result<Vec<JobConfiguration>> {
        Ok(self.store.fetch_jobs(manager))
    }

    async fn get_managers(&self) -> Result<BTreeSet<ManagerId>> {
        Ok(self.store.fetch_manager_ids())
    }

    async fn delete_job(&self, key: &JobKey, _session: &Session) -> Result<()> {
        let _guard = self.writes.lock().await;
        if self.find(key).is_none() {
            return Err(Error::NotFound(format!("job {key}")));
        }

        self.store.remove_job(key);
        info!(job = %key, "Removed job");
        Ok(())
    }

    async fn delete_all_jobs(&self, _session: &Session) -> Result<()> {
        let _guard = self.writes.lock().await;
        let count = self.store.job_count();
        self.store.delete_jobs();
        info!(count, "Removed all jobs");
        Ok(())
    }
}
