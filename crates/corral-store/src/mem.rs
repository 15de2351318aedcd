//! In-memory job store.

use corral_core::{JobConfiguration, JobKey, ManagerId};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{JobStore, MutableJobStore};

/// Forward and reverse indexes, always updated together under one lock.
#[derive(Debug, Default)]
struct Partitions {
    /// manager -> key -> job. Managers with no jobs are never kept.
    by_manager: HashMap<ManagerId, HashMap<JobKey, JobConfiguration>>,
    /// key -> managers holding it. Keys held by no manager are never kept.
    owners: HashMap<JobKey, HashSet<ManagerId>>,
}

impl Partitions {
    fn insert(&mut self, manager: &ManagerId, config: JobConfiguration) {
        self.owners
            .entry(config.key.clone())
            .or_default()
            .insert(manager.clone());
        self.by_manager
            .entry(manager.clone())
            .or_default()
            .insert(config.key.clone(), config);
    }

    fn remove_key(&mut self, key: &JobKey) {
        let Some(managers) = self.owners.remove(key) else {
            return;
        };

        for manager in managers {
            if let Some(jobs) = self.by_manager.get_mut(&manager) {
                jobs.remove(key);
                if jobs.is_empty() {
                    self.by_manager.remove(&manager);
                }
            }
        }
    }

    fn clear(&mut self) {
        self.by_manager.clear();
        self.owners.clear();
    }
}

/// Job store held entirely in memory.
///
/// Readers share the lock; every mutation takes it exclusively, so a reader
/// sees either all or none of a concurrent `save`, `remove` or `delete`.
#[derive(Debug, Default)]
pub struct MemJobStore {
    partitions: RwLock<Partitions>,
}

impl MemJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Mutations restore both indexes before returning and never panic
    // mid-update, so a poisoned lock still guards consistent state.
    fn read(&self) -> RwLockReadGuard<'_, Partitions> {
        self.partitions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Partitions> {
        self.partitions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl JobStore for MemJobStore {
    fn fetch_manager_ids(&self) -> BTreeSet<ManagerId> {
        self.read().by_manager.keys().cloned().collect()
    }

    fn fetch_jobs(&self, manager: &ManagerId) -> Vec<JobConfiguration> {
        let partitions = self.read();
        let mut jobs: Vec<JobConfiguration> = partitions
            .by_manager
            .get(manager)
            .map(|jobs| jobs.values().cloned().collect())
            .unwrap_or_default();
        jobs.sort_by(|a, b| a.key.cmp(&b.key));
        jobs
    }

    fn fetch_job(&self, manager: &ManagerId, key: &JobKey) -> Option<JobConfiguration> {
        self.read()
            .by_manager
            .get(manager)
            .and_then(|jobs| jobs.get(key))
            .cloned()
    }

    fn find_job(&self, key: &JobKey) -> Option<(ManagerId, JobConfiguration)> {
        let partitions = self.read();
        let manager = partitions.owners.get(key)?.iter().min()?;
        let config = partitions.by_manager.get(manager)?.get(key)?;
        Some((manager.clone(), config.clone()))
    }

    fn job_count(&self) -> usize {
        self.read().by_manager.values().map(HashMap::len).sum()
    }
}

impl MutableJobStore for MemJobStore {
    fn save_accepted_job(&self, manager: &ManagerId, config: JobConfiguration) {
        self.write().insert(manager, config);
    }

    fn remove_job(&self, key: &JobKey) {
        self.write().remove_key(key);
    }

    fn replace_job(&self, manager: &ManagerId, config: JobConfiguration) {
        let mut partitions = self.write();
        partitions.remove_key(&config.key);
        partitions.insert(manager, config);
    }

    fn delete_jobs(&self) {
        self.write().clear();
    }
}
