//! `devkit generate`: write the Docker Compose file

use crate::compose::generate_compose_content;
use crate::compose::template::TemplateSource;
use crate::config::DevEnvConfig;
use crate::system::System;
use crate::utils::fs::write_text_file;
use crate::utils::path::{display_relative, resolve_output_path};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Overrides `docker.output_file`
    pub output: Option<String>,
    pub template: TemplateSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    Written(PathBuf),
    /// `docker.enabled` is false
    Disabled,
}

/// Render the Compose file for `config` into the project
///
/// # Errors
///
/// - `PathEscape` if a relative output path leaves the project root
/// - template errors from the generator
/// - filesystem errors while writing
pub fn run_generate(
    system: &dyn System,
    root: &Path,
    config: &DevEnvConfig,
    options: &GenerateOptions,
) -> Result<GenerateOutcome> {
    if !config.docker.enabled {
        info!("Docker generation is disabled in config (docker.enabled: false). Skipping.");
        return Ok(GenerateOutcome::Disabled);
    }

    let output = options
        .output
        .as_deref()
        .unwrap_or(&config.docker.output_file);
    let output_path = resolve_output_path(root, output)?;

    let content = generate_compose_content(system, config, &options.template)?;
    write_text_file(system, &output_path, &content)?;

    info!("Generated {}", display_relative(&output_path, root));
    Ok(GenerateOutcome::Written(output_path))
}
