//! JSON Schema validation for devkit configuration

use crate::error::{DevkitError, FieldIssue};
use jsonschema::Validator;
use jsonschema::error::ValidationErrorKind;
use serde_json::Value;

const SCHEMA_SOURCE: &str = include_str!("../../docs/schema.json");

/// Compile the embedded JSON schema for `.dev-env.yml`
///
/// # Errors
///
/// Returns an internal error if the embedded schema is not valid JSON Schema.
pub fn config_validator() -> Result<Validator, DevkitError> {
    let schema: Value = serde_json::from_str(SCHEMA_SOURCE)
        .map_err(|e| DevkitError::internal(format!("Failed to parse embedded JSON schema: {e}")))?;

    jsonschema::validator_for(&schema)
        .map_err(|e| DevkitError::internal(format!("Failed to compile JSON schema: {e}")))
}

/// Check a document against the schema, returning every violation
///
/// An empty list means the document is structurally valid.
///
/// # Errors
///
/// Returns an internal error if the schema itself cannot be compiled.
pub fn schema_issues(instance: &Value) -> Result<Vec<FieldIssue>, DevkitError> {
    let validator = config_validator()?;

    let mut issues: Vec<FieldIssue> = validator
        .iter_errors(instance)
        .map(|error| {
            let parent = pointer_to_field_path(error.instance_path.as_str());
            match &error.kind {
                ValidationErrorKind::Required { property } => {
                    let property = property
                        .as_str()
                        .map_or_else(|| property.to_string(), str::to_owned);
                    FieldIssue::new(join_field_path(&parent, &property), "is required")
                }
                _ => FieldIssue::new(parent, error.to_string()),
            }
        })
        .collect();

    issues.sort_by(|a, b| a.path.cmp(&b.path));
    issues.dedup();
    Ok(issues)
}

/// Convert a JSON pointer (`/databases/0/type`) into a dotted path (`databases.0.type`)
#[must_use]
pub fn pointer_to_field_path(pointer: &str) -> String {
    pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".")
}

fn join_field_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_owned()
    } else {
        format!("{parent}.{child}")
    }
}
