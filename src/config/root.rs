//! Project root discovery

use crate::config::CONFIG_FILE_NAME;
use crate::system::System;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Manifest files that mark a project directory, in check order
pub const PROJECT_MARKERS: &[&str] = &["package.json", "requirements.txt", "Cargo.toml", "go.mod"];

/// Find the directory devkit should treat as the project root
///
/// Walks from `start` towards the filesystem root. The nearest directory
/// holding `.dev-env.yml` wins, even when a project marker sits closer to
/// `start`; without any config file the nearest marker directory is used,
/// and failing that `start` itself. The filesystem root is never inspected.
#[must_use]
pub fn find_project_root(system: &dyn System, start: &Path) -> PathBuf {
    let start = if start.is_absolute() {
        start.to_path_buf()
    } else {
        system
            .current_dir()
            .map_or_else(|_| start.to_path_buf(), |cwd| cwd.join(start))
    };

    let mut nearest_marker: Option<PathBuf> = None;

    for dir in start.ancestors() {
        if dir.parent().is_none() {
            break;
        }

        if system.exists(&dir.join(CONFIG_FILE_NAME)) {
            debug!("Found {} in {}", CONFIG_FILE_NAME, dir.display());
            return dir.to_path_buf();
        }

        if nearest_marker.is_none()
            && let Some(marker) = PROJECT_MARKERS
                .iter()
                .find(|marker| system.exists(&dir.join(marker)))
        {
            debug!("Found project marker {marker} in {}", dir.display());
            nearest_marker = Some(dir.to_path_buf());
        }
    }

    nearest_marker.unwrap_or(start)
}

/// Project root for the process working directory
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn current_project_root(system: &dyn System) -> std::io::Result<PathBuf> {
    let cwd = system.current_dir()?;
    Ok(find_project_root(system, &cwd))
}
