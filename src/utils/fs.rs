//! File system utilities

use crate::error::DevkitError;
use crate::system::System;
use std::path::Path;

/// Create parent directories for a file path if they don't exist
///
/// # Errors
///
/// Returns a filesystem error when the directories cannot be created.
pub fn create_parent_directories(system: &dyn System, file_path: &Path) -> Result<(), DevkitError> {
    if let Some(parent) = file_path.parent()
        && !parent.as_os_str().is_empty()
        && !system.exists(parent)
    {
        system.create_dir_all(parent).map_err(|e| {
            DevkitError::filesystem(format!(
                "Failed to create parent directories for {}: {e}",
                file_path.display()
            ))
        })?;
    }

    Ok(())
}

/// Write a text file, creating missing parent directories first
///
/// # Errors
///
/// Returns a filesystem error when the directories or the file cannot be written.
pub fn write_text_file(system: &dyn System, path: &Path, contents: &str) -> Result<(), DevkitError> {
    create_parent_directories(system, path)?;
    system.write(path, contents.as_bytes()).map_err(|e| {
        DevkitError::filesystem(format!("Failed to write {}: {e}", path.display()))
    })
}

/// Read a text file, mapping failures to a filesystem error
///
/// # Errors
///
/// Returns a filesystem error when the file cannot be read.
pub fn read_text_file(system: &dyn System, path: &Path) -> Result<String, DevkitError> {
    system
        .read_to_string(path)
        .map_err(|e| DevkitError::filesystem(format!("Failed to read {}: {e}", path.display())))
}
