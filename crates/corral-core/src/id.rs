//! Job and manager identifiers.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Identity of a job configuration, independent of the manager holding it.
///
/// All three components are non-empty and contain no `/`, so the canonical
/// `role/environment/name` form always parses back to the same key.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(try_from = "RawJobKey")]
#[display("{role}/{environment}/{name}")]
pub struct JobKey {
    role: String,
    environment: String,
    name: String,
}

#[derive(Deserialize)]
struct RawJobKey {
    role: String,
    environment: String,
    name: String,
}

impl TryFrom<RawJobKey> for JobKey {
    type Error = Error;

    fn try_from(raw: RawJobKey) -> Result<Self> {
        JobKey::new(raw.role, raw.environment, raw.name)
    }
}

impl JobKey {
    pub fn new(
        role: impl Into<String>,
        environment: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self> {
        let role = role.into();
        let environment = environment.into();
        let name = name.into();

        validate_component("role", &role)?;
        validate_component("environment", &environment)?;
        validate_component("name", &name)?;

        Ok(Self {
            role,
            environment,
            name,
        })
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Copy of this key in another environment.
    pub fn with_environment(&self, environment: impl Into<String>) -> Result<Self> {
        JobKey::new(self.role.clone(), environment, self.name.clone())
    }
}

fn validate_component(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidInput(format!("job key {field} must not be empty")));
    }
    if value.contains('/') {
        return Err(Error::InvalidInput(format!(
            "job key {field} must not contain '/': {value}"
        )));
    }
    Ok(())
}

impl std::str::FromStr for JobKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split('/');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(role), Some(environment), Some(name), None) => {
                JobKey::new(role, environment, name)
            }
            _ => Err(Error::InvalidInput(format!(
                "expected role/environment/name, got '{s}'"
            ))),
        }
    }
}

/// Name of the subsystem that registered a job. A pure partition label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(try_from = "String", into = "String")]
#[display("{_0}")]
pub struct ManagerId(String);

impl ManagerId {
    /// Manager for jobs scheduled as soon as they are accepted.
    pub const IMMEDIATE: &'static str = "immediate";
    /// Manager for jobs launched on a cron schedule.
    pub const CRON: &'static str = "cron";

    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::InvalidInput("manager id must not be empty".to_string()));
        }
        Ok(Self(id))
    }

    pub fn immediate() -> Self {
        Self(Self::IMMEDIATE.to_string())
    }

    pub fn cron() -> Self {
        Self(Self::CRON.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ManagerId {
    type Error = Error;

    fn try_from(id: String) -> Result<Self> {
        ManagerId::new(id)
    }
}

impl From<ManagerId> for String {
    fn from(id: ManagerId) -> Self {
        id.0
    }
}

impl std::str::FromStr for ManagerId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ManagerId::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_equality_includes_environment() {
        let prod = JobKey::new("www", "prod", "hello").unwrap();
        let staging = prod.with_environment("staging").unwrap();

        assert_ne!(prod, staging);
        assert_eq!(prod, JobKey::new("www", "prod", "hello").unwrap());
        assert_eq!(staging.role(), "www");
        assert_eq!(staging.name(), "hello");
    }

    #[test]
    fn test_empty_components_rejected() {
        assert!(matches!(JobKey::new("", "prod", "n"), Err(Error::InvalidInput(_))));
        assert!(matches!(JobKey::new("r", "", "n"), Err(Error::InvalidInput(_))));
        assert!(matches!(JobKey::new("r", "prod", ""), Err(Error::InvalidInput(_))));
        assert!(matches!(JobKey::new("r/x", "prod", "n"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_parse_and_display() {
        let key: JobKey = "www/prod/hello".parse().unwrap();
        assert_eq!(key.to_string(), "www/prod/hello");
        assert_eq!(key.environment(), "prod");

        assert!("www/prod".parse::<JobKey>().is_err());
        assert!("www/prod/hello/extra".parse::<JobKey>().is_err());
        assert!("www//hello".parse::<JobKey>().is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let key: JobKey =
            serde_json::from_str(r#"{"role":"www","environment":"prod","name":"hello"}"#).unwrap();
        assert_eq!(key.to_string(), "www/prod/hello");

        let bad = serde_json::from_str::<JobKey>(r#"{"role":"","environment":"prod","name":"x"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_manager_id() {
        assert!(ManagerId::new("").is_err());
        assert_eq!(ManagerId::cron().as_str(), "cron");

        let id: ManagerId = serde_json::from_str(r#""immediate""#).unwrap();
        assert_eq!(id, ManagerId::immediate());
        assert!(serde_json::from_str::<ManagerId>(r#""""#).is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""immediate""#);
    }
}
