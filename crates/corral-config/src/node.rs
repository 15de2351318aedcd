// Helper functions for extracting values from KDL nodes

use kdl::KdlNode;

use crate::{ConfigError, ConfigResult};

pub(crate) fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

pub(crate) fn get_all_string_args(node: &KdlNode) -> Vec<String> {
    node.entries()
        .iter()
        .filter(|e| e.name().is_none())
        .filter_map(|e| e.value().as_string())
        .map(|s| s.to_string())
        .collect()
}

/// First argument as a non-negative integer, reporting `field` on mismatch.
pub(crate) fn get_first_u64_arg(node: &KdlNode, field: &str) -> ConfigResult<u64> {
    let value = node
        .entries()
        .iter()
        .find(|e| e.name().is_none())
        .ok_or_else(|| ConfigError::MissingField(field.to_string()))?
        .value();

    value
        .as_integer()
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| ConfigError::invalid(field, format!("expected a non-negative integer, got {value}")))
}

/// First argument as a number; integers are accepted.
pub(crate) fn get_first_f64_arg(node: &KdlNode, field: &str) -> ConfigResult<f64> {
    let value = node
        .entries()
        .iter()
        .find(|e| e.name().is_none())
        .ok_or_else(|| ConfigError::MissingField(field.to_string()))?
        .value();

    value
        .as_float()
        .or_else(|| value.as_integer().map(|n| n as f64))
        .ok_or_else(|| ConfigError::invalid(field, format!("expected a number, got {value}")))
}

/// Required string argument.
pub(crate) fn require_string_arg(node: &KdlNode, field: &str) -> ConfigResult<String> {
    get_first_string_arg(node).ok_or_else(|| ConfigError::MissingField(field.to_string()))
}
