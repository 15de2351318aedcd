//! Job configuration storage for the Corral job scheduler.
//!
//! Jobs are registered by managers (the immediate path, the cron path, ...)
//! and stored per manager. A [`JobKey`] is global across managers for
//! deletion: removing a key removes it from every manager holding it.
//!
//! Absence is never an error here; reads return `None` or an empty
//! collection. Malformed keys and manager ids cannot be constructed, so
//! writes cannot fail part way.

pub mod mem;

pub use mem::MemJobStore;

use corral_core::{JobConfiguration, JobKey, ManagerId};
use std::collections::BTreeSet;

/// Read access to stored job configurations.
pub trait JobStore: Send + Sync {
    /// Managers that currently hold at least one job.
    fn fetch_manager_ids(&self) -> BTreeSet<ManagerId>;

    /// All jobs stored under `manager`, ordered by key.
    fn fetch_jobs(&self, manager: &ManagerId) -> Vec<JobConfiguration>;

    /// The job stored under exactly this manager and key.
    fn fetch_job(&self, manager: &ManagerId, key: &JobKey) -> Option<JobConfiguration>;

    /// The job stored under `key` by any manager, with that manager.
    ///
    /// When several managers hold the key, the lowest manager id wins.
    fn find_job(&self, key: &JobKey) -> Option<(ManagerId, JobConfiguration)>;

    /// Total number of stored (manager, key) entries.
    fn job_count(&self) -> usize;
}

/// Write access to stored job configurations.
pub trait MutableJobStore: JobStore {
    /// Insert or overwrite the job for `(manager, config.key)`.
    fn save_accepted_job(&self, manager: &ManagerId, config: JobConfiguration);

    /// Remove `key` from every manager holding it. No-op when absent.
    fn remove_job(&self, key: &JobKey);

    /// Remove `config.key` from every manager and store `config` under
    /// `manager`, as one write.
    fn replace_job(&self, manager: &ManagerId, config: JobConfiguration);

    /// Remove every job for every manager.
    fn delete_jobs(&self);
}
