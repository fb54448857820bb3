//! YAML configuration loading and parsing

use crate::cli::prompt::Prompter;
use crate::config::environment::{load_env_file, resolve_document};
use crate::config::validation::validate_config_value;
use crate::config::{CONFIG_FILE_NAME, DevEnvConfig};
use crate::error::DevkitError;
use crate::operations::init::run_init;
use crate::system::System;
use anyhow::Result;
use std::path::Path;
use tracing::{debug, info};

const CREATE_HINT: &str = "Please create a .dev-env.yml file in your project root.";
const INIT_HINT: &str =
    "Run `devkit init` to create one, or create a .dev-env.yml file in your project root.";

/// Load, resolve and validate `<root>/.dev-env.yml`
///
/// A `.env` file next to the config is loaded first so its variables are
/// available to `${VAR}` placeholders.
///
/// # Errors
///
/// - [`DevkitError::ConfigNotFound`] if the file does not exist
/// - [`DevkitError::ConfigParse`] if it is not valid YAML
/// - [`DevkitError::ConfigInvalid`] if it does not match the schema
pub fn load_config(system: &dyn System, root: &Path) -> Result<DevEnvConfig, DevkitError> {
    let config_path = root.join(CONFIG_FILE_NAME);

    if !system.is_file(&config_path) {
        return Err(DevkitError::ConfigNotFound {
            path: config_path,
            hint: CREATE_HINT.to_owned(),
        });
    }

    load_env_file(system, root);

    let content = system.read_to_string(&config_path).map_err(|e| {
        DevkitError::filesystem(format!(
            "Failed to read configuration file {}: {e}",
            config_path.display()
        ))
    })?;

    let document = parse_document(&content, &config_path)?;
    let resolved = resolve_document(system, document)?;
    let config = validate_config_value(&resolved)?;

    debug!(
        "Loaded configuration for '{}' ({} dependencies, {} databases, {} services)",
        config.name,
        config.dependencies.len(),
        config.databases.len(),
        config.services.len()
    );
    Ok(config)
}

/// Parse YAML text into an untyped document
///
/// # Errors
///
/// Returns [`DevkitError::ConfigParse`] naming `path` on a syntax error.
pub fn parse_document(content: &str, path: &Path) -> Result<serde_yaml::Value, DevkitError> {
    serde_yaml::from_str(content).map_err(|e| DevkitError::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Like [`load_config`], but offers the init wizard when no config exists
///
/// The offer is only made on an interactive terminal. Declining it, or
/// running non-interactively, yields a `ConfigNotFound` error that points
/// at `devkit init`.
///
/// # Errors
///
/// Returns the loader's errors, a `ConfigNotFound` error when no config is
/// created, or any error raised by the wizard.
pub fn load_config_or_prompt_init(
    system: &dyn System,
    root: &Path,
    prompter: &dyn Prompter,
) -> Result<DevEnvConfig> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if system.is_file(&config_path) {
        return Ok(load_config(system, root)?);
    }

    let not_found = || DevkitError::ConfigNotFound {
        path: config_path.clone(),
        hint: INIT_HINT.to_owned(),
    };

    if !system.is_interactive() {
        return Err(not_found().into());
    }

    let create = prompter.confirm(
        &format!(
            "No {CONFIG_FILE_NAME} found in {}. Create one now?",
            root.display()
        ),
        true,
    )?;
    if !create {
        return Err(not_found().into());
    }

    run_init(system, root, prompter)?;
    info!("Continuing with the new configuration");
    Ok(load_config(system, root)?)
}
