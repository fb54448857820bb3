use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for devkit
#[derive(Parser, Debug, Clone)]
#[command(name = "devkit")]
#[command(about = "A CLI tool for reproducible local development environments")]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Enable verbose logging output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only report errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Default log filter for the selected verbosity
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a .dev-env.yml interactively
    Init,

    /// Install dependencies, run migrations and seed databases
    Setup(SetupArgs),

    /// Generate a Docker Compose file from .dev-env.yml
    Generate(GenerateArgs),

    /// Save, list and restore copies of .dev-env.yml
    #[command(subcommand)]
    Snapshot(SnapshotCommand),

    /// Export a credential-free config or import a shared one
    #[command(subcommand)]
    Share(ShareCommand),
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct SetupArgs {
    /// Skip dependency installation
    #[arg(long)]
    pub skip_deps: bool,

    /// Skip database migrations and seeds
    #[arg(long)]
    pub skip_db: bool,

    /// Show the commands that would run without executing them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Output file (defaults to docker.output_file from the config)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,

    /// Directory containing a custom docker-compose.yml.j2
    #[arg(long, value_name = "DIR", env = "DEVKIT_TEMPLATES_DIR")]
    pub templates_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SnapshotCommand {
    /// Save the current .dev-env.yml
    Create {
        /// Snapshot name (defaults to a timestamp)
        name: Option<String>,
    },

    /// List saved snapshots, newest first
    List,

    /// Replace .dev-env.yml with a saved copy
    Restore {
        /// Snapshot name
        name: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ShareCommand {
    /// Write a copy of the config with credentials replaced by placeholders
    Export {
        /// Output file
        #[arg(short, long, value_name = "PATH", default_value = "dev-env.shared.yml")]
        output: String,
    },

    /// Validate a shared config and install it as .dev-env.yml
    Import {
        /// Shared config file
        file: PathBuf,

        /// Output file
        #[arg(short, long, value_name = "PATH", default_value = ".dev-env.yml")]
        output: String,
    },
}
