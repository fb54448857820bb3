//! # devkit
//!
//! Reads a project's `.dev-env.yml` and drives local environment chores:
//! dependency installation, database migrations and seeds, Docker Compose
//! generation, config snapshots and credential-free config sharing.
//!
//! ```sh
//! devkit init
//! devkit setup --dry-run
//! devkit generate --output compose.yml
//! devkit snapshot create before-upgrade
//! devkit share export
//! ```

use clap::Parser as _;
use devkit::cli::Args;
use devkit::error::DevkitError;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    fmt().with_target(false).with_env_filter(filter).init();

    match devkit::run(args) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            error!("{}", err);
            std::process::exit(
                err.downcast_ref::<DevkitError>()
                    .map_or(1, DevkitError::exit_code),
            );
        }
    }
}
