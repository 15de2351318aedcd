//! CLI command implementations.

pub mod jobs;

use anyhow::Result;
use corral_config::load_jobs;
use std::path::Path;

use crate::client::ApiClient;

pub async fn managers(client: &ApiClient) -> Result<()> {
    let managers = client.managers().await?;
    if managers.is_empty() {
        println!("No managers hold jobs");
    }
    for manager in managers {
        println!("{manager}");
    }
    Ok(())
}

pub fn validate(path: &str) -> Result<()> {
    match load_jobs(Path::new(path)) {
        Ok(jobs) => {
            println!("Job file is valid ({} jobs)", jobs.len());
            Ok(())
        }
        Err(e) => {
            println!("Job file error: {}", e);
            std::process::exit(1);
        }
    }
}
