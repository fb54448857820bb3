//! Configuration validation logic
//!
//! Validation is two-phase: the raw document is first checked against the
//! embedded JSON schema, and only a structurally valid document is turned into
//! a typed [`DevEnvConfig`] with defaults applied. Either phase reports every
//! problem it finds; there is no partial success.

use crate::config::DevEnvConfig;
use crate::config::schema::schema_issues;
use crate::error::{DevkitError, FieldIssue};
use serde_json::Value;
use tracing::debug;

/// Sections holding entries whose port fields may be written as strings
const PORT_FIELDS: &[(&str, &[&str])] = &[
    ("databases", &["port"]),
    ("services", &["port", "management_port"]),
];

/// Validate a raw (already env-resolved) YAML document
///
/// # Errors
///
/// Returns [`DevkitError::ConfigInvalid`] listing every violated field path.
pub fn validate_config_value(raw: &serde_yaml::Value) -> Result<DevEnvConfig, DevkitError> {
    let mut document = serde_json::to_value(raw).map_err(|e| {
        DevkitError::invalid("", format!("document cannot be represented as data: {e}"))
    })?;

    coerce_numeric_ports(&mut document);
    validate_config_json(document)
}

/// Validate a JSON view of the configuration document
///
/// # Errors
///
/// Returns [`DevkitError::ConfigInvalid`] listing every violated field path.
pub fn validate_config_json(document: Value) -> Result<DevEnvConfig, DevkitError> {
    let issues = schema_issues(&document)?;
    if !issues.is_empty() {
        debug!("Schema validation found {} issue(s)", issues.len());
        return Err(DevkitError::ConfigInvalid { issues });
    }

    let config: DevEnvConfig = serde_json::from_value(document)
        .map_err(|e| DevkitError::invalid("", e.to_string()))?;

    let issues = semantic_issues(&config);
    if !issues.is_empty() {
        return Err(DevkitError::ConfigInvalid { issues });
    }

    Ok(config)
}

/// Re-validate an in-memory config, e.g. one assembled by the init wizard
///
/// # Errors
///
/// Returns [`DevkitError::ConfigInvalid`] when the config would not load back.
pub fn validate_config(config: &DevEnvConfig) -> Result<DevEnvConfig, DevkitError> {
    let document = serde_json::to_value(config)
        .map_err(|e| DevkitError::invalid("", format!("config cannot be serialized: {e}")))?;
    validate_config_json(document)
}

/// Checks the schema language cannot express
fn semantic_issues(config: &DevEnvConfig) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    if config.name.trim().is_empty() {
        issues.push(FieldIssue::new("name", "must not be blank"));
    }

    for (index, dependency) in config.dependencies.iter().enumerate() {
        if dependency.command.trim().is_empty() {
            issues.push(FieldIssue::new(
                format!("dependencies.{index}.command"),
                "must not be blank",
            ));
        }
    }

    issues
}

/// Turn port values such as `"5432"` (typically produced by `${DB_PORT}`) into integers
///
/// Strings that are not plain digits are left alone for the schema to report.
pub fn coerce_numeric_ports(document: &mut Value) {
    for (section, fields) in PORT_FIELDS {
        let Some(entries) = document.get_mut(*section).and_then(Value::as_array_mut) else {
            continue;
        };

        for entry in entries.iter_mut().filter_map(Value::as_object_mut) {
            for field in *fields {
                let Some(value) = entry.get_mut(*field) else {
                    continue;
                };
                let coerced = value
                    .as_str()
                    .map(str::trim)
                    .filter(|text| !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()))
                    .and_then(|text| text.parse::<u64>().ok());
                if let Some(number) = coerced {
                    *value = Value::from(number);
                }
            }
        }
    }
}
