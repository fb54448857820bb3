//! `devkit share`: credential-free config export and validated import
//!
//! Credential detection is a best-effort filter to avoid leaking secrets in
//! an exported file. It is not a security boundary.

use crate::config::validation::validate_config_value;
use crate::config::yaml::parse_document;
use crate::config::{DevEnvConfig, HealthCheck};
use crate::error::DevkitError;
use crate::system::System;
use crate::utils::fs::{read_text_file, write_text_file};
use crate::utils::path::{display_relative, resolve_output_path};
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

pub const DEFAULT_EXPORT_FILE: &str = "dev-env.shared.yml";

const DB_USER_PLACEHOLDER: &str = "${DB_USER}";
const DB_PASSWORD_PLACEHOLDER: &str = "${DB_PASSWORD}";
const CONNECTION_STRING_PLACEHOLDER: &str = "${CONNECTION_STRING}";
const HEALTH_CHECK_URL_PLACEHOLDER: &str = "${HEALTH_CHECK_URL}";

/// Query parameter name fragments that usually carry secrets
const SECRET_PARAM_HINTS: &[&str] = &["password", "passwd", "pwd", "secret", "token", "key", "auth"];

/// Copy of `config` with credentials replaced by `${...}` placeholders
///
/// - database `user`/`password` become `${DB_USER}`/`${DB_PASSWORD}` when set
/// - every `env` value becomes `${KEY}`
/// - credential-bearing health-check connection strings and URLs become
///   `${CONNECTION_STRING}`/`${HEALTH_CHECK_URL}`
#[must_use]
pub fn sanitize_config_for_share(config: &DevEnvConfig) -> DevEnvConfig {
    let mut shared = config.clone();

    for db in &mut shared.databases {
        if db.user.is_some() {
            db.user = Some(DB_USER_PLACEHOLDER.to_owned());
        }
        if db.password.is_some() {
            db.password = Some(DB_PASSWORD_PLACEHOLDER.to_owned());
        }
    }

    for (key, value) in &mut shared.env {
        *value = format!("${{{key}}}");
    }

    for check in &mut shared.health_checks {
        sanitize_health_check(check);
    }

    shared
}

fn sanitize_health_check(check: &mut HealthCheck) {
    if check
        .connection_string
        .as_deref()
        .is_some_and(embeds_credentials)
    {
        check.connection_string = Some(CONNECTION_STRING_PLACEHOLDER.to_owned());
    }
    if check.url.as_deref().is_some_and(embeds_credentials) {
        check.url = Some(HEALTH_CHECK_URL_PLACEHOLDER.to_owned());
    }
}

/// Whether a connection string or URL appears to carry credentials
///
/// True for a URL with a username or password, or with a query parameter
/// whose name looks secret. Values that do not parse as URLs are treated as
/// credential-bearing when they contain `@`.
#[must_use]
pub fn embeds_credentials(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => {
            !url.username().is_empty()
                || url.password().is_some()
                || url.query_pairs().any(|(name, _)| {
                    let name = name.to_lowercase();
                    SECRET_PARAM_HINTS.iter().any(|hint| name.contains(hint))
                })
        }
        Err(_) => value.contains('@'),
    }
}

/// Write a sanitized copy of `config` to `output` (relative to `root`)
///
/// # Errors
///
/// Returns `PathEscape` for an output outside the project, or a filesystem
/// error if the file cannot be written.
pub fn run_share_export(
    system: &dyn System,
    root: &Path,
    config: &DevEnvConfig,
    output: &str,
) -> Result<PathBuf> {
    let output_path = resolve_output_path(root, output)?;
    let shared = sanitize_config_for_share(config);
    let yaml = serde_yaml::to_string(&shared).context("Failed to serialize shared config")?;

    write_text_file(system, &output_path, &yaml)?;
    info!(
        "Exported sanitized config to {}",
        display_relative(&output_path, root)
    );
    Ok(output_path)
}

/// Validate a shared config file and write it as the project config
///
/// Placeholders are kept as written; they resolve when the config is loaded.
///
/// # Errors
///
/// - `ConfigNotFound` if `file` does not exist
/// - `ConfigParse` / `ConfigInvalid` if it is not a valid config
/// - `PathEscape` or filesystem errors for the output
pub fn run_share_import(
    system: &dyn System,
    root: &Path,
    file: &Path,
    output: &str,
) -> Result<PathBuf> {
    if !system.is_file(file) {
        return Err(DevkitError::ConfigNotFound {
            path: file.to_path_buf(),
            hint: "Check the path of the shared config file.".to_owned(),
        }
        .into());
    }

    let content = read_text_file(system, file)?;
    let document = parse_document(&content, file)?;
    let config = validate_config_value(&document)?;

    let output_path = resolve_output_path(root, output)?;
    let yaml = serde_yaml::to_string(&config).context("Failed to serialize imported config")?;
    write_text_file(system, &output_path, &yaml)?;

    info!(
        "Imported {} to {}",
        file.display(),
        display_relative(&output_path, root)
    );
    Ok(output_path)
}
