//! Path manipulation and validation utilities

use crate::error::DevkitError;
use std::path::{Component, Path, PathBuf};

/// Normalize a path by resolving `.` and `..` components lexically
///
/// Leading `..` components that cannot be cancelled are kept, so a result
/// starting with `..` means the path climbs above its starting point.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                // `/..` is still `/`
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

/// Resolve an output path against `base`
///
/// Absolute paths are returned as given. Relative paths are joined onto
/// `base` and must stay inside it.
///
/// # Errors
///
/// Returns [`DevkitError::PathEscape`] when a relative path climbs out of `base`.
pub fn resolve_output_path(base: &Path, output: &str) -> Result<PathBuf, DevkitError> {
    let output_path = Path::new(output);
    if output_path.is_absolute() {
        return Ok(normalize_path(output_path));
    }

    let relative = normalize_path(output_path);
    if matches!(relative.components().next(), Some(Component::ParentDir)) {
        return Err(DevkitError::PathEscape {
            path: output.to_owned(),
        });
    }

    Ok(normalize_path(&base.join(relative)))
}

/// Display `path` relative to `base` when possible
#[must_use]
pub fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .map_or_else(|_| path.display().to_string(), |p| p.display().to_string())
}
