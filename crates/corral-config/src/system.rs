//! Server configuration parsing.

use crate::node::require_string_arg;
use crate::{ConfigError, ConfigResult};
use kdl::{KdlDocument, KdlNode};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Server-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Address the HTTP API listens on.
    pub bind: SocketAddr,
    /// Host name advertised in the service registration payload.
    pub hostname: String,
    pub logging: LoggingConfig,
    /// Job definitions loaded into the store at startup.
    pub jobs_file: Option<PathBuf>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 7070)),
            hostname: "localhost".to_string(),
            logging: LoggingConfig::default(),
            jobs_file: None,
        }
    }
}

impl SystemConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist. A relative `jobs` path is resolved against the
    /// directory containing the config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        let mut config = parse_system_config(&text)?;
        if let (Some(jobs), Some(dir)) = (&config.jobs_file, path.parent()) {
            if jobs.is_relative() {
                config.jobs_file = Some(dir.join(jobs));
            }
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Glog,
        }
    }
}

/// Log line layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `I1016 17:36:47.461 THREAD3 module.span: message`
    #[default]
    Glog,
    /// JSON lines.
    Json,
    /// Multi-line human readable output.
    Pretty,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "glog" => Ok(LogFormat::Glog),
            "json" | "jsonl" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(ConfigError::invalid(
                "logging format",
                format!("unknown log format: {other}"),
            )),
        }
    }
}

/// Parse server configuration from KDL text.
pub fn parse_system_config(kdl: &str) -> ConfigResult<SystemConfig> {
    let doc: KdlDocument = kdl.parse()?;
    let mut config = SystemConfig::default();

    for node in doc.nodes() {
        match node.name().value() {
            "server" => parse_server(node, &mut config)?,
            "logging" => config.logging = parse_logging(node)?,
            "jobs" => {
                config.jobs_file = Some(PathBuf::from(require_string_arg(node, "jobs path")?));
            }
            _ => {} // Ignore unknown nodes
        }
    }

    Ok(config)
}

fn parse_server(node: &KdlNode, config: &mut SystemConfig) -> ConfigResult<()> {
    let Some(children) = node.children() else {
        return Ok(());
    };

    for child in children.nodes() {
        match child.name().value() {
            "bind" => {
                let bind = require_string_arg(child, "server bind")?;
                config.bind = bind
                    .parse()
                    .map_err(|e| ConfigError::invalid("server bind", e))?;
            }
            "hostname" => {
                config.hostname = require_string_arg(child, "server hostname")?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_logging(node: &KdlNode) -> ConfigResult<LoggingConfig> {
    let mut logging = LoggingConfig::default();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "level" => logging.level = require_string_arg(child, "logging level")?,
                "format" => logging.format = require_string_arg(child, "logging format")?.parse()?,
                _ => {}
            }
        }
    }

    Ok(logging)
}
