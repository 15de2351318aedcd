//! Administrative interface of the scheduler.

use async_trait::async_trait;
use corral_core::{JobConfiguration, JobKey, ManagerId, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Caller identity attached to an administrative request.
///
/// Carried for logging only; no permission checks are made against it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(user: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
        }
    }
}

/// A job together with the manager it is registered under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagedJob {
    pub manager: ManagerId,
    pub config: JobConfiguration,
}

/// Administrative operations on scheduled jobs.
#[async_trait]
pub trait SchedulerAdmin: Send + Sync {
    /// Accept a new job. Fails with `Conflict` if its key is held by any manager.
    async fn create_job(&self, config: JobConfiguration, session: &Session)
    -> Result<ManagedJob>;

    /// Replace an existing job, moving it to another manager if its
    /// schedule changed. Fails with `NotFound` if the key is not held.
    async fn replace_job(
        &self,
        config: JobConfiguration,
        session: &Session,
    ) -> Result<ManagedJob>;

    /// Validate a job and fill in defaults without storing it.
    async fn populate_job_config(&self, config: JobConfiguration) -> Result<JobConfiguration>;

    /// Look a job up under any manager.
    async fn get_job(&self, key: &JobKey) -> Result<Option<ManagedJob>>;

    /// Jobs registered under one manager.
    async fn get_jobs(&self, manager: &ManagerId) -> Result<Vec<JobConfiguration>>;

    /// Managers holding at least one job.
    async fn get_managers(&self) -> Result<BTreeSet<ManagerId>>;

    /// Remove a job from every manager. Fails with `NotFound` if no manager holds it.
    async fn delete_job(&self, key: &JobKey, session: &Session) -> Result<()>;

    /// Remove every job.
    async fn delete_all_jobs(&self, session: &Session) -> Result<()>;
}
