//! Corral CLI tool.

use clap::{Parser, Subcommand};
use corral_core::{JobKey, ManagerId};
use tracing_subscriber::EnvFilter;

mod client;
mod commands;

use client::ApiClient;

#[derive(Parser)]
#[command(name = "corral")]
#[command(about = "Corral job scheduler CLI", long_about = None)]
struct Cli {
    /// API server URL
    #[arg(long, env = "CORRAL_API_URL", default_value = "http://localhost:7070")]
    api_url: String,

    /// User to act as
    #[arg(long, env = "CORRAL_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List managers holding jobs
    Managers,
    /// Manage jobs
    Jobs {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Validate a job definition file
    Validate {
        /// Path to the job definition file
        #[arg(default_value = "jobs.kdl")]
        path: String,
    },
}

#[derive(Subcommand)]
enum JobCommands {
    /// List jobs registered under a manager
    List {
        /// Manager id
        #[arg(long, default_value = ManagerId::IMMEDIATE)]
        manager: ManagerId,
    },
    /// Show one job
    Show {
        /// Job key as role/environment/name
        key: JobKey,
    },
    /// Create every job in a job definition file
    Create {
        /// Path to the job definition file
        path: String,
    },
    /// Delete one job from every manager
    Delete {
        /// Job key as role/environment/name
        key: JobKey,
    },
    /// Delete all jobs
    Purge {
        /// Skip the confirmation guard
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Managers => {
            let client = ApiClient::new(&cli.api_url, cli.user)?;
            commands::managers(&client).await?;
        }
        Commands::Jobs { command } => {
            let client = ApiClient::new(&cli.api_url, cli.user)?;
            match command {
                JobCommands::List { manager } => {
                    commands::jobs::list(&client, &manager).await?;
                }
                JobCommands::Show { key } => {
                    commands::jobs::show(&client, &key).await?;
                }
                JobCommands::Create { path } => {
                    commands::jobs::create(&client, &path).await?;
                }
                JobCommands::Delete { key } => {
                    commands::jobs::delete(&client, &key).await?;
                }
                JobCommands::Purge { yes } => {
                    commands::jobs::purge(&client, yes).await?;
                }
            }
        }
        Commands::Validate { path } => {
            commands::validate(&path)?;
        }
    }

    Ok(())
}
