//! Service discovery registration payloads.
//!
//! A running server announces itself as a [`ServiceInstance`]; registries
//! store the bytes produced by a [`Codec`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::Result;

/// A host and port a service listens on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

/// Lifecycle status advertised by a service instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Dead,
    Starting,
    Alive,
    Stopping,
    Stopped,
    Warning,
}

/// Registration payload for one running service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInstance {
    /// Primary endpoint.
    pub service_endpoint: Endpoint,
    /// Named secondary endpoints (admin port, metrics, ...).
    #[serde(default)]
    pub additional_endpoints: BTreeMap<String, Endpoint>,
    pub status: Status,
}

/// Converts values to and from their registry representation.
pub trait Codec<T> {
    fn serialize(&self, value: &T) -> Result<Vec<u8>>;
    fn deserialize(&self, data: &[u8]) -> Result<T>;
}

/// JSON codec; the default registry encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<T> Codec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned,
{
    fn serialize(&self, value: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    fn deserialize(&self, data: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(data)?)
    }
}

/// Build and encode the registration payload for an endpoint.
pub fn serialize_service_instance(
    endpoint: Endpoint,
    additional_endpoints: BTreeMap<String, Endpoint>,
    status: Status,
    codec: &impl Codec<ServiceInstance>,
) -> Result<Vec<u8>> {
    let instance = ServiceInstance {
        service_endpoint: endpoint,
        additional_endpoints,
        status,
    };
    codec.serialize(&instance)
}

pub fn deserialize_service_instance(
    data: &[u8],
    codec: &impl Codec<ServiceInstance>,
) -> Result<ServiceInstance> {
    codec.deserialize(data)
}
