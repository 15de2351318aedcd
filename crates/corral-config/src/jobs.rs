//! Job definition file parsing.
//!
//! ```kdl
//! job "www/prod/hello" {
//!     manager "immediate"
//!     owner "alice"
//!     instances 3
//!     image "nginx:1.27"
//!     command "nginx" "-g" "daemon off;"
//!     cpus 0.5
//!     ram 512
//!     env {
//!         PORT "8080"
//!     }
//! }
//! ```

use crate::node::{
    get_all_string_args, get_first_f64_arg, get_first_u64_arg, require_string_arg,
};
use crate::{ConfigError, ConfigResult};
use corral_core::{JobConfiguration, JobKey, ManagerId, TaskConfig};
use kdl::{KdlDocument, KdlNode};
use std::collections::HashSet;
use std::path::Path;

/// A job and the manager it should be registered under.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDefinition {
    pub manager: ManagerId,
    pub config: JobConfiguration,
}

/// Read and parse a job definition file.
pub fn load_jobs(path: &Path) -> ConfigResult<Vec<JobDefinition>> {
    let text = std::fs::read_to_string(path)?;
    parse_jobs(&text)
}

/// Parse job definitions from KDL text.
pub fn parse_jobs(kdl: &str) -> ConfigResult<Vec<JobDefinition>> {
    let doc: KdlDocument = kdl.parse()?;

    let mut seen = HashSet::new();
    let mut jobs = Vec::new();

    for node in doc.nodes() {
        if node.name().value() != "job" {
            continue;
        }

        let job = parse_job(node)?;
        if !seen.insert((job.manager.clone(), job.config.key.clone())) {
            return Err(ConfigError::Duplicate(format!(
                "job '{}' under manager '{}'",
                job.config.key, job.manager
            )));
        }
        jobs.push(job);
    }

    Ok(jobs)
}

fn parse_job(node: &KdlNode) -> ConfigResult<JobDefinition> {
    let key: JobKey = require_string_arg(node, "job key")?
        .parse()
        .map_err(|e| ConfigError::invalid("job key", e))?;

    let mut manager = None;
    let mut owner = None;
    let mut instances = None;
    let mut cron = None;
    let mut collision = None;
    let mut task = TaskConfig::new("");

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "manager" => {
                    let id = require_string_arg(child, "manager")?;
                    manager = Some(
                        ManagerId::new(id).map_err(|e| ConfigError::invalid("manager", e))?,
                    );
                }
                "owner" => owner = Some(require_string_arg(child, "owner")?),
                "instances" => {
                    let count = get_first_u64_arg(child, "instances")?;
                    instances = Some(
                        u32::try_from(count).map_err(|e| ConfigError::invalid("instances", e))?,
                    );
                }
                "cron" => cron = Some(require_string_arg(child, "cron")?),
                "collision" => {
                    collision = Some(
                        require_string_arg(child, "collision")?
                            .parse()
                            .map_err(|e| ConfigError::invalid("collision", e))?,
                    );
                }
                "image" => task.image = require_string_arg(child, "image")?,
                "command" => task.command = get_all_string_args(child),
                "cpus" => task.cpus = get_first_f64_arg(child, "cpus")?,
                "ram" => task.ram_mb = get_first_u64_arg(child, "ram")?,
                "disk" => task.disk_mb = get_first_u64_arg(child, "disk")?,
                "env" => {
                    if let Some(grandchildren) = child.children() {
                        for gc in grandchildren.nodes() {
                            let name = gc.name().value().to_string();
                            let value = require_string_arg(gc, &format!("env {name}"))?;
                            task.env.insert(name, value);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    if task.image.is_empty() {
        return Err(ConfigError::MissingField(format!("image for job '{}'", key)));
    }

    let mut config = JobConfiguration::new(key, task);
    config.owner = owner;
    config.cron_schedule = cron;
    if let Some(count) = instances {
        config.instance_count = count;
    }
    if let Some(policy) = collision {
        config.cron_collision_policy = policy;
    }

    let manager = manager.unwrap_or_else(|| {
        if config.is_cron() {
            ManagerId::cron()
        } else {
            ManagerId::immediate()
        }
    });

    Ok(JobDefinition { manager, config })
}

#[cfg(test)]
mod tests {
    use super::*;
    use corral_core::CronCollisionPolicy;

    #[test]
    fn test_parse_simple_job() {
        let kdl = r#"
            job "www/prod/hello" {
                image "nginx:1.27"
                command "nginx" "-g" "daemon off;"
                instances 3
                cpus 0.5
                ram 512
                env {
                    PORT "8080"
                }
            }
        "#;

        let jobs = parse_jobs(kdl).unwrap();
        assert_eq!(jobs.len(), 1);

        let job = &jobs[0];
        assert_eq!(job.manager, ManagerId::immediate());
        assert_eq!(job.config.key.to_string(), "www/prod/hello");
        assert_eq!(job.config.instance_count, 3);
        assert_eq!(job.config.task.command, vec!["nginx", "-g", "daemon off;"]);
        assert_eq!(job.config.task.cpus, 0.5);
        assert_eq!(job.config.task.ram_mb, 512);
        assert_eq!(job.config.task.env.get("PORT").map(String::as_str), Some("8080"));
    }

    #[test]
    fn test_cron_job_defaults_to_cron_manager() {
        let kdl = r#"
            job "batch/prod/report" {
                image "report:2"
                cron "0 3 * * *"
                collision "cancel_new"
            }
        "#;

        let jobs = parse_jobs(kdl).unwrap();
        assert_eq!(jobs[0].manager, ManagerId::cron());
        assert_eq!(jobs[0].config.cron_schedule.as_deref(), Some("0 3 * * *"));
        assert_eq!(
            jobs[0].config.cron_collision_policy,
            CronCollisionPolicy::CancelNew
        );
    }

    #[test]
    fn test_same_key_under_two_managers() {
        let kdl = r#"
            job "www/prod/hello" {
                image "nginx"
            }
            job "www/prod/hello" {
                manager "cron"
                image "nginx"
            }
        "#;

        let jobs = parse_jobs(kdl).unwrap();
        assert_eq!(jobs.len(), 2);
    }

    #[test]
    fn test_duplicate_job() {
        let kdl = r#"
            job "www/prod/hello" {
                image "nginx"
            }
            job "www/prod/hello" {
                image "nginx:latest"
            }
        "#;

        assert!(matches!(parse_jobs(kdl), Err(ConfigError::Duplicate(_))));
    }

    #[test]
    fn test_missing_image() {
        let kdl = r#"
            job "www/prod/hello" {
                instances 2
            }
        "#;

        assert!(matches!(parse_jobs(kdl), Err(ConfigError::MissingField(_))));
    }

    #[test]
    fn test_malformed_key() {
        let kdl = r#"
            job "www//hello" {
                image "nginx"
            }
        "#;

        assert!(matches!(
            parse_jobs(kdl),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_negative_instances() {
        let kdl = r#"
            job "www/prod/hello" {
                image "nginx"
                instances -1
            }
        "#;

        assert!(matches!(
            parse_jobs(kdl),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
