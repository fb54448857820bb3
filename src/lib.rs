//! `devkit` - a CLI tool for reproducible local development environments
//!
//! A project describes its dependencies, databases, services and Docker
//! settings in `.dev-env.yml`. This library locates that file, resolves
//! `${VAR}` placeholders, validates it, and drives setup, Compose file
//! generation, config snapshots and credential-free sharing.

pub mod cli;
pub mod compose;
pub mod config;
pub mod error;
pub mod operations;
pub mod system;
pub mod utils;

use anyhow::{Context as _, Result};
use chrono::Utc;
use cli::prompt::{Prompter, TerminalPrompter};
use cli::{Args, Command, GenerateArgs, SetupArgs, ShareCommand, SnapshotCommand};
use compose::template::TemplateSource;
use config::root::current_project_root;
use config::warnings::check_config_warnings;
use config::yaml::{load_config, load_config_or_prompt_init};
use operations::generate::{GenerateOptions, run_generate};
use operations::init::run_init;
use operations::setup::{SetupOptions, run_setup};
use operations::share::{run_share_export, run_share_import};
use operations::snapshot::{create_snapshot, list_snapshots, restore_snapshot};
use std::path::Path;
use system::{RealSystem, System};
use tracing::{debug, info};

/// Main entry point for the devkit library
///
/// # Errors
///
/// Returns the error of the executed command; `DevkitError` values inside
/// carry the process exit code.
pub fn run(args: Args) -> Result<()> {
    let system = RealSystem::new();
    run_with(&system, &TerminalPrompter, args)
}

/// Execute a parsed command against the given system and prompter
///
/// # Errors
///
/// Returns the error of the executed command.
pub fn run_with(system: &dyn System, prompter: &dyn Prompter, args: Args) -> Result<()> {
    let root =
        current_project_root(system).context("Failed to determine the current directory")?;
    debug!("Project root: {}", root.display());

    match args.command {
        Command::Init => {
            run_init(system, &root, prompter)?;
        }
        Command::Setup(setup) => run_setup_command(system, prompter, &root, &setup)?,
        Command::Generate(generate) => run_generate_command(system, &root, generate)?,
        Command::Snapshot(SnapshotCommand::Create { name }) => {
            create_snapshot(system, &root, name.as_deref(), Utc::now())?;
        }
        Command::Snapshot(SnapshotCommand::List) => run_snapshot_list(system, &root)?,
        Command::Snapshot(SnapshotCommand::Restore { name }) => {
            restore_snapshot(system, &root, &name)?;
        }
        Command::Share(ShareCommand::Export { output }) => {
            let config = load_config(system, &root)?;
            run_share_export(system, &root, &config, &output)?;
        }
        Command::Share(ShareCommand::Import { file, output }) => {
            let file = if file.is_absolute() {
                file
            } else {
                system
                    .current_dir()
                    .context("Failed to determine the current directory")?
                    .join(file)
            };
            run_share_import(system, &root, &file, &output)?;
        }
    }

    Ok(())
}

fn run_setup_command(
    system: &dyn System,
    prompter: &dyn Prompter,
    root: &Path,
    args: &SetupArgs,
) -> Result<()> {
    let config = load_config_or_prompt_init(system, root, prompter)?;
    check_config_warnings(&config);

    let options = SetupOptions {
        skip_deps: args.skip_deps,
        skip_db: args.skip_db,
        dry_run: args.dry_run,
    };
    run_setup(&config, root, options)?;
    Ok(())
}

fn run_generate_command(system: &dyn System, root: &Path, args: GenerateArgs) -> Result<()> {
    let config = load_config(system, root)?;
    check_config_warnings(&config);

    let options = GenerateOptions {
        output: args.output,
        template: args
            .templates_dir
            .map_or(TemplateSource::Embedded, TemplateSource::Directory),
    };
    run_generate(system, root, &config, &options)?;
    Ok(())
}

fn run_snapshot_list(system: &dyn System, root: &Path) -> Result<()> {
    let snapshots = list_snapshots(system, root)?;
    if snapshots.is_empty() {
        info!("No snapshots found. Create one with: devkit snapshot create [name]");
        return Ok(());
    }

    info!("Found {} snapshot(s):", snapshots.len());
    for snapshot in &snapshots {
        info!("  {}  ({})", snapshot.name, snapshot.created_at);
    }
    Ok(())
}
