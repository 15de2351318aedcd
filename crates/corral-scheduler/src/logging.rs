//! Request logging around a [`SchedulerAdmin`].

use async_trait::async_trait;
use corral_core::{JobConfiguration, JobKey, ManagerId, Result};
use futures::FutureExt;
use std::collections::BTreeSet;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::{info, warn};

use crate::admin::{ManagedJob, SchedulerAdmin, Session};

/// Logs each administrative call, then forwards it to the wrapped admin.
///
/// Internal errors and panics escaping the delegate are logged at WARN and
/// then returned or resumed unchanged.
pub struct LoggingSchedulerAdmin<A> {
    delegate: A,
}

impl<A: SchedulerAdmin> LoggingSchedulerAdmin<A> {
    pub fn new(delegate: A) -> Self {
        Self { delegate }
    }

    async fn guarded<T, F>(&self, operation: &str, args: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send,
    {
        match AssertUnwindSafe(call).catch_unwind().await {
            Ok(Err(e)) if e.is_internal() => {
                warn!(error = %e, "Uncaught error while handling {operation}({args})");
                Err(e)
            }
            Ok(result) => result,
            Err(panic) => {
                warn!("Uncaught panic while handling {operation}({args})");
                std::panic::resume_unwind(panic)
            }
        }
    }
}

fn log_user_action(session: &Session, operation: &str, args: &str) {
    let user = session.user.as_deref().unwrap_or("<unauthenticated>");
    if args.is_empty() {
        info!("Request by user {user} to {operation}");
    } else {
        info!("Request by user {user} to {operation}|{args}");
    }
}

fn log_unauthenticated_action(operation: &str, args: &str) {
    if args.is_empty() {
        info!("{operation}");
    } else {
        info!("{operation}|{args}");
    }
}

#[async_trait]
impl<A: SchedulerAdmin> SchedulerAdmin for LoggingSchedulerAdmin<A> {
    async fn create_job(
        &self,
        config: JobConfiguration,
        session: &Session,
    ) -> Result<ManagedJob> {
        let args = format!("config: {config:?}");
        log_user_action(session, "create_job", &args);
        self.guarded("create_job", &args, self.delegate.create_job(config, session))
            .await
    }

    async fn replace_job(
        &self,
        config: JobConfiguration,
        session: &Session,
    ) -> Result<ManagedJob> {
        let args = format!("config: {config:?}");
        log_user_action(session, "replace_job", &args);
        self.guarded("replace_job", &args, self.delegate.replace_job(config, session))
            .await
    }

    async fn populate_job_config(&self, config: JobConfiguration) -> Result<JobConfiguration> {
        let args = format!("config: {config:?}");
        log_unauthenticated_action("populate_job_config", &args);
        self.guarded(
            "populate_job_config",
            &args,
            self.delegate.populate_job_config(config),
        )
        .await
    }

    async fn get_job(&self, key: &JobKey) -> Result<Option<ManagedJob>> {
        let args = format!("key: {key}");
        log_unauthenticated_action("get_job", &args);
        self.guarded("get_job", &args, self.delegate.get_job(key)).await
    }

    async fn get_jobs(&self, manager: &ManagerId) -> Result<Vec<JobConfiguration>> {
        let args = format!("manager: {manager}");
        log_unauthenticated_action("get_jobs", &args);
        self.guarded("get_jobs", &args, self.delegate.get_jobs(manager))
            .await
    }

    async fn get_managers(&self) -> Result<BTreeSet<ManagerId>> {
        log_unauthenticated_action("get_managers", "");
        self.guarded("get_managers", "", self.delegate.get_managers())
            .await
    }

    async fn delete_job(&self, key: &JobKey, session: &Session) -> Result<()> {
        let args = format!("key: {key}");
        log_user_action(session, "delete_job", &args);
        self.guarded("delete_job", &args, self.delegate.delete_job(key, session))
            .await
    }

    async fn delete_all_jobs(&self, session: &Session) -> Result<()> {
        log_user_action(session, "delete_all_jobs", "");
        self.guarded("delete_all_jobs", "", self.delegate.delete_all_jobs(session))
            .await
    }
}
