//! Job commands.

use anyhow::{Context, Result, bail};
use corral_config::load_jobs;
use corral_core::{JobConfiguration, JobKey, ManagerId};
use std::path::Path;

use crate::client::ApiClient;

/// One listing line: key, instances, and schedule when present.
fn summary(config: &JobConfiguration) -> String {
    let key = config.key.to_string();
    let mut line = format!("{key:<40} x{}", config.instance_count);
    if let Some(schedule) = &config.cron_schedule {
        line.push_str(&format!("  cron '{schedule}'"));
    }
    line
}

pub async fn list(client: &ApiClient, manager: &ManagerId) -> Result<()> {
    let jobs = client.list_jobs(manager).await?;
    if jobs.is_empty() {
        println!("No jobs under manager {manager}");
        return Ok(());
    }
    for job in &jobs {
        println!("{}", summary(job));
    }
    Ok(())
}

pub async fn show(client: &ApiClient, key: &JobKey) -> Result<()> {
    match client.get_job(key).await? {
        Some(job) => {
            println!("Manager: {}", job.manager);
            println!("{}", serde_json::to_string_pretty(&job.config)?);
            Ok(())
        }
        None => bail!("Job {key} not found"),
    }
}

pub async fn create(client: &ApiClient, path: &str) -> Result<()> {
    let jobs = load_jobs(Path::new(path))
        .with_context(|| format!("Failed to load job file: {}", path))?;

    for job in jobs {
        let created = client
            .create_job(&job.config)
            .await
            .with_context(|| format!("Failed to create job {}", job.config.key))?;
        if created.manager != job.manager {
            println!(
                "Created {} under {} (file names manager {})",
                created.config.key, created.manager, job.manager
            );
        } else {
            println!("Created {} under {}", created.config.key, created.manager);
        }
    }
    Ok(())
}

pub async fn delete(client: &ApiClient, key: &JobKey) -> Result<()> {
    client.delete_job(key).await?;
    println!("Deleted {key}");
    Ok(())
}

pub async fn purge(client: &ApiClient, yes: bool) -> Result<()> {
    if !yes {
        bail!("Refusing to delete all jobs without --yes");
    }
    client.delete_all_jobs().await?;
    println!("Deleted all jobs");
    Ok(())
}
