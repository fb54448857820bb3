//! `${VAR}` interpolation and `.env` loading

use crate::error::DevkitError;
use crate::system::System;
use regex::{Captures, Regex};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

/// Name of the optional dotenv file next to `.dev-env.yml`
pub const ENV_FILE_NAME: &str = ".env";

const PLACEHOLDER_PATTERN: &str = r"\$\{([^}]+)\}";

fn placeholder_regex() -> Result<Regex, DevkitError> {
    Regex::new(PLACEHOLDER_PATTERN)
        .map_err(|e| DevkitError::internal(format!("Invalid placeholder pattern: {e}")))
}

/// Replace every `${NAME}` in `raw`
///
/// Lookups try `explicit` first and fall back to the process environment.
/// A name found in neither is left in place, placeholder and all, and logged.
///
/// # Errors
///
/// Returns [`DevkitError::Internal`] if the placeholder pattern fails to compile.
pub fn resolve_env_vars(
    system: &dyn System,
    raw: &str,
    explicit: &BTreeMap<String, String>,
) -> Result<String, DevkitError> {
    let pattern = placeholder_regex()?;
    Ok(substitute(&pattern, system, raw, explicit))
}

fn substitute(
    pattern: &Regex,
    system: &dyn System,
    raw: &str,
    explicit: &BTreeMap<String, String>,
) -> String {
    pattern
        .replace_all(raw, |caps: &Captures<'_>| {
            let name = &caps[1];
            if let Some(value) = explicit.get(name) {
                return value.clone();
            }
            match system.env_var(name) {
                Ok(value) => value,
                Err(_) => {
                    warn!("Environment variable {name} is not set");
                    caps[0].to_owned()
                }
            }
        })
        .into_owned()
}

/// Apply `resolve` to every string leaf of a YAML tree
///
/// Mapping keys and non-string scalars are kept as they are.
#[must_use]
pub fn resolve_tree<F>(value: Value, resolve: &F) -> Value
where
    F: Fn(&str) -> String,
{
    match value {
        Value::String(text) => Value::String(resolve(&text)),
        Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(|item| resolve_tree(item, resolve))
                .collect(),
        ),
        Value::Mapping(entries) => Value::Mapping(
            entries
                .into_iter()
                .map(|(key, item)| (key, resolve_tree(item, resolve)))
                .collect(),
        ),
        Value::Tagged(mut tagged) => {
            tagged.value = resolve_tree(tagged.value, resolve);
            Value::Tagged(tagged)
        }
        scalar @ (Value::Null | Value::Bool(_) | Value::Number(_)) => scalar,
    }
}

/// Resolve placeholders across a whole document against the process environment
///
/// # Errors
///
/// Returns [`DevkitError::Internal`] if the placeholder pattern fails to compile.
pub fn resolve_document(system: &dyn System, document: Value) -> Result<Value, DevkitError> {
    let pattern = placeholder_regex()?;
    let explicit = BTreeMap::new();
    Ok(resolve_tree(document, &|text: &str| {
        substitute(&pattern, system, text, &explicit)
    }))
}

/// Load `<root>/.env` into the environment without overriding existing variables
///
/// Returns the number of variables that were set. A missing file is not an
/// error; a malformed line is skipped with a warning.
pub fn load_env_file(system: &dyn System, root: &Path) -> usize {
    let env_path = root.join(ENV_FILE_NAME);
    if !system.is_file(&env_path) {
        debug!("No {} file in {}", ENV_FILE_NAME, root.display());
        return 0;
    }

    let content = match system.read_to_string(&env_path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {}: {e}", env_path.display());
            return 0;
        }
    };

    let mut loaded = 0;
    for item in dotenvy::from_read_iter(Cursor::new(content.into_bytes())) {
        match item {
            Ok((key, value)) => {
                if system.env_var(&key).is_ok() {
                    continue;
                }
                system.set_env_var(&key, &value);
                loaded += 1;
            }
            Err(e) => warn!("Skipping invalid line in {}: {e}", env_path.display()),
        }
    }

    debug!("Loaded {loaded} variable(s) from {}", env_path.display());
    loaded
}
