//! Job configuration payloads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::JobKey;

/// A job definition as accepted by the scheduler.
///
/// The embedded key is the key the job is stored and looked up under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfiguration {
    /// Identity of the job.
    pub key: JobKey,
    /// User that owns the job, if known.
    #[serde(default)]
    pub owner: Option<String>,
    /// Number of instances to run.
    #[serde(default = "default_instance_count")]
    pub instance_count: u32,
    /// Cron expression for periodic jobs.
    #[serde(default)]
    pub cron_schedule: Option<String>,
    /// What to do when a cron run fires while the previous one is active.
    #[serde(default)]
    pub cron_collision_policy: CronCollisionPolicy,
    /// Task template shared by all instances.
    pub task: TaskConfig,
}

fn default_instance_count() -> u32 {
    1
}

impl JobConfiguration {
    pub fn new(key: JobKey, task: TaskConfig) -> Self {
        Self {
            key,
            owner: None,
            instance_count: default_instance_count(),
            cron_schedule: None,
            cron_collision_policy: CronCollisionPolicy::default(),
            task,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_instances(mut self, count: u32) -> Self {
        self.instance_count = count;
        self
    }

    pub fn with_cron(mut self, schedule: impl Into<String>) -> Self {
        self.cron_schedule = Some(schedule.into());
        self
    }

    pub fn is_cron(&self) -> bool {
        self.cron_schedule.is_some()
    }
}

/// Cron collision handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CronCollisionPolicy {
    /// Kill the running instances and start the new run.
    #[default]
    KillExisting,
    /// Skip the new run.
    CancelNew,
    /// Let both runs proceed.
    RunOverlap,
}

impl std::str::FromStr for CronCollisionPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "kill_existing" | "kill-existing" => Ok(Self::KillExisting),
            "cancel_new" | "cancel-new" => Ok(Self::CancelNew),
            "run_overlap" | "run-overlap" => Ok(Self::RunOverlap),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown cron collision policy: {other}"
            ))),
        }
    }
}

/// Task template for a job's instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Container image to run.
    pub image: String,
    /// Command to execute.
    #[serde(default)]
    pub command: Vec<String>,
    /// Environment variables.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// CPU cores per instance.
    #[serde(default = "default_cpus")]
    pub cpus: f64,
    /// Memory per instance, in MiB.
    #[serde(default = "default_ram_mb")]
    pub ram_mb: u64,
    /// Disk per instance, in MiB.
    #[serde(default = "default_disk_mb")]
    pub disk_mb: u64,
}

fn default_cpus() -> f64 {
    1.0
}

fn default_ram_mb() -> u64 {
    128
}

fn default_disk_mb() -> u64 {
    256
}

impl TaskConfig {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            command: Vec::new(),
            env: BTreeMap::new(),
            cpus: default_cpus(),
            ram_mb: default_ram_mb(),
            disk_mb: default_disk_mb(),
        }
    }

    pub fn with_command(mut self, command: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.command = command.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json_gets_defaults() {
        let json = r#"{
            "key": {"role": "www", "environment": "prod", "name": "hello"},
            "task": {"image": "nginx:1.27"}
        }"#;

        let config: JobConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(config.instance_count, 1);
        assert_eq!(config.cron_collision_policy, CronCollisionPolicy::KillExisting);
        assert!(!config.is_cron());
        assert_eq!(config.task.ram_mb, 128);
        assert!(config.task.command.is_empty());
    }

    #[test]
    fn test_builders_match_full_json() {
        let json = r#"{
            "key": {"role": "batch", "environment": "prod", "name": "report"},
            "owner": "analytics",
            "instance_count": 2,
            "cron_schedule": "0 3 * * *",
            "task": {
                "image": "alpine:3.20",
                "command": ["sh", "-c", "echo report"],
                "env": {"TZ": "UTC"}
            }
        }"#;

        let task = TaskConfig::new("alpine:3.20")
            .with_command(["sh", "-c", "echo report"])
            .with_env("TZ", "UTC");
        let built = JobConfiguration::new("batch/prod/report".parse().unwrap(), task)
            .with_owner("analytics")
            .with_instances(2)
            .with_cron("0 3 * * *");

        let parsed: JobConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(built, parsed);
        assert!(built.is_cron());
    }

    #[test]
    fn test_collision_policy_names() {
        assert_eq!(
            "cancel-new".parse::<CronCollisionPolicy>().unwrap(),
            CronCollisionPolicy::CancelNew
        );
        assert_eq!(
            serde_json::to_string(&CronCollisionPolicy::RunOverlap).unwrap(),
            r#""run_overlap""#
        );
        assert!("sometimes".parse::<CronCollisionPolicy>().is_err());
    }
}
