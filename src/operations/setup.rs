//! `devkit setup`: install dependencies, migrate and seed databases

use crate::config::DevEnvConfig;
use crate::operations::commands::{analyze_command_safety, execute_command};
use crate::utils::path::normalize_path;
use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Which parts of setup to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetupOptions {
    pub skip_deps: bool,
    pub skip_db: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    /// Dependency install of the given tool
    Dependency(String),
    /// Migration of the given database type
    Migration(String),
    /// Seed of the given database type
    Seed(String),
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dependency(tool) => write!(f, "Installing dependencies ({tool})"),
            Self::Migration(db) => write!(f, "Running migration ({db})"),
            Self::Seed(db) => write!(f, "Running seed ({db})"),
        }
    }
}

/// One command setup runs, with where it runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupStep {
    pub kind: StepKind,
    pub command: String,
    /// Path as written in the config, relative to the project root
    pub display_dir: String,
    pub working_dir: PathBuf,
}

/// What setup planned and whether it ran it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport {
    pub steps: Vec<SetupStep>,
    pub executed: bool,
}

/// Steps for `config` in execution order
///
/// Dependencies come first in config order, then per database its
/// migrations followed by its seed.
#[must_use]
pub fn plan_setup(config: &DevEnvConfig, root: &Path, options: SetupOptions) -> Vec<SetupStep> {
    let mut steps = Vec::new();

    if options.skip_deps {
        debug!("Skipping dependency installation (--skip-deps)");
    } else {
        steps.extend(config.dependencies.iter().map(|dep| SetupStep {
            kind: StepKind::Dependency(dep.kind.to_string()),
            command: dep.command.clone(),
            display_dir: dep.path.clone(),
            working_dir: normalize_path(&root.join(&dep.path)),
        }));
    }

    if options.skip_db {
        debug!("Skipping database setup (--skip-db)");
        return steps;
    }

    for db in &config.databases {
        steps.extend(db.migrations.iter().map(|migration| SetupStep {
            kind: StepKind::Migration(db.kind.to_string()),
            command: migration.command.clone(),
            display_dir: migration.path.clone(),
            working_dir: normalize_path(&root.join(&migration.path)),
        }));

        if let Some(seed) = &db.seed {
            steps.push(SetupStep {
                kind: StepKind::Seed(db.kind.to_string()),
                command: seed.command.clone(),
                display_dir: ".".to_owned(),
                working_dir: root.to_path_buf(),
            });
        }
    }

    steps
}

/// Plan and (unless dry-running) execute setup for `config`
///
/// Each command sees the process environment overlaid with `config.env`.
/// The first failing command aborts the run.
///
/// # Errors
///
/// Returns the error of the first command that fails.
pub fn run_setup(config: &DevEnvConfig, root: &Path, options: SetupOptions) -> Result<SetupReport> {
    let steps = plan_setup(config, root, options);

    if options.dry_run {
        info!("Dry run: no commands will be executed.");
        for step in &steps {
            info!("[dry-run] Would run in {}: {}", step.display_dir, step.command);
            for issue in analyze_command_safety(&step.command) {
                warn!("  {issue}");
            }
        }
        return Ok(SetupReport {
            steps,
            executed: false,
        });
    }

    for step in &steps {
        info!("{} in {}...", step.kind, step.display_dir);
        execute_command(&step.command, &step.working_dir, &config.env)?;
    }

    info!("Setup complete for {}", config.name);
    Ok(SetupReport {
        steps,
        executed: true,
    })
}
