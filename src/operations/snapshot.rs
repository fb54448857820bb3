//! `devkit snapshot`: named copies of `.dev-env.yml`
//!
//! Each snapshot is a directory `.devkit/snapshots/<name>/` holding
//! `metadata.json` and a verbatim `dev-env.yml`.

use crate::config::CONFIG_FILE_NAME;
use crate::config::yaml::load_config;
use crate::error::DevkitError;
use crate::system::System;
use crate::utils::fs::{read_text_file, write_text_file};
use anyhow::{Context as _, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SNAPSHOT_DIR_NAME: &str = ".devkit";
pub const SNAPSHOTS_SUBDIR: &str = "snapshots";
pub const METADATA_FILE_NAME: &str = "metadata.json";
pub const SNAPSHOT_CONFIG_FILE_NAME: &str = "dev-env.yml";

const UNSAFE_CHARS: &str = r"[^A-Za-z0-9_-]+";

/// Contents of `metadata.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    pub name: String,
    /// RFC 3339 UTC timestamp
    pub created_at: String,
}

impl SnapshotMeta {
    fn created_at_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|time| time.with_timezone(&Utc))
    }
}

/// `<root>/.devkit/snapshots`
#[must_use]
pub fn snapshots_dir(root: &Path) -> PathBuf {
    root.join(SNAPSHOT_DIR_NAME).join(SNAPSHOTS_SUBDIR)
}

/// Turn a user-supplied name into a safe directory name
///
/// Runs of characters outside `[A-Za-z0-9_-]` become one `-`, repeated and
/// surrounding dashes are dropped, and an empty result becomes `snapshot`.
///
/// # Errors
///
/// Returns [`DevkitError::Internal`] if the character pattern fails to compile.
pub fn sanitize_snapshot_name(name: &str) -> Result<String, DevkitError> {
    let pattern = Regex::new(UNSAFE_CHARS)
        .map_err(|e| DevkitError::internal(format!("Invalid snapshot name pattern: {e}")))?;
    let replaced = pattern.replace_all(name, "-");

    let collapsed = replaced
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if collapsed.is_empty() {
        Ok("snapshot".to_owned())
    } else {
        Ok(collapsed)
    }
}

/// `snapshot-YYYY-MM-DDTHH-MM-SS` for `now`
#[must_use]
pub fn default_snapshot_name(now: DateTime<Utc>) -> String {
    format!("snapshot-{}", now.format("%Y-%m-%dT%H-%M-%S"))
}

/// Save the current config as a snapshot
///
/// The config is validated first so only loadable configs are saved.
///
/// # Errors
///
/// - config loading errors
/// - [`DevkitError::Snapshot`] if a snapshot with the same name exists
/// - filesystem errors while writing
pub fn create_snapshot(
    system: &dyn System,
    root: &Path,
    name: Option<&str>,
    now: DateTime<Utc>,
) -> Result<SnapshotMeta> {
    load_config(system, root)?;
    let config_text = read_text_file(system, &root.join(CONFIG_FILE_NAME))?;

    let name = name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map_or_else(|| default_snapshot_name(now), str::to_owned);
    let dir = snapshots_dir(root).join(sanitize_snapshot_name(&name)?);

    if system.exists(&dir) {
        return Err(DevkitError::snapshot(format!(
            "Snapshot \"{name}\" already exists at {}",
            dir.display()
        ))
        .into());
    }

    let meta = SnapshotMeta {
        name,
        created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    let meta_json =
        serde_json::to_string_pretty(&meta).context("Failed to serialize snapshot metadata")?;

    write_text_file(system, &dir.join(METADATA_FILE_NAME), &meta_json)?;
    write_text_file(system, &dir.join(SNAPSHOT_CONFIG_FILE_NAME), &config_text)?;

    info!("Snapshot \"{}\" created at {}", meta.name, meta.created_at);
    Ok(meta)
}

/// All readable snapshots, newest first
///
/// Entries without valid metadata are skipped.
///
/// # Errors
///
/// Returns a filesystem error if the snapshots directory cannot be listed.
pub fn list_snapshots(system: &dyn System, root: &Path) -> Result<Vec<SnapshotMeta>> {
    let dir = snapshots_dir(root);
    if !system.is_dir(&dir) {
        return Ok(Vec::new());
    }

    let entries = system
        .read_dir(&dir)
        .map_err(|e| DevkitError::filesystem(format!("Failed to list {}: {e}", dir.display())))?;

    let mut snapshots: Vec<SnapshotMeta> = entries
        .iter()
        .filter(|entry| system.is_dir(entry))
        .filter_map(|entry| read_metadata(system, entry))
        .collect();

    snapshots.sort_by(|a, b| {
        b.created_at_time()
            .cmp(&a.created_at_time())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    Ok(snapshots)
}

fn read_metadata(system: &dyn System, dir: &Path) -> Option<SnapshotMeta> {
    let path = dir.join(METADATA_FILE_NAME);
    let text = system.read_to_string(&path).ok()?;
    match serde_json::from_str::<SnapshotMeta>(&text) {
        Ok(meta) if !meta.name.is_empty() && !meta.created_at.is_empty() => Some(meta),
        Ok(_) => {
            debug!("Skipping snapshot with incomplete metadata: {}", path.display());
            None
        }
        Err(e) => {
            debug!("Skipping snapshot with invalid metadata {}: {e}", path.display());
            None
        }
    }
}

/// Copy a snapshot's config back to `<root>/.dev-env.yml`
///
/// # Errors
///
/// Returns [`DevkitError::Snapshot`] if no snapshot of that name exists.
pub fn restore_snapshot(system: &dyn System, root: &Path, name: &str) -> Result<PathBuf> {
    let dir = snapshots_dir(root).join(sanitize_snapshot_name(name)?);
    let snapshot_config = dir.join(SNAPSHOT_CONFIG_FILE_NAME);

    if !system.is_file(&snapshot_config) {
        return Err(DevkitError::snapshot(format!(
            "Snapshot \"{name}\" not found. List available snapshots with: devkit snapshot list"
        ))
        .into());
    }

    let content = read_text_file(system, &snapshot_config)?;
    let target = root.join(CONFIG_FILE_NAME);
    write_text_file(system, &target, &content)?;

    info!("Restored snapshot \"{name}\" to {CONFIG_FILE_NAME}");
    Ok(target)
}
