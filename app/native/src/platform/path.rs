//! Shell-like path expansion for configuration values.
//!
//! Every path read from the INI configuration goes through [`expand`] or
//! [`expand_and_resolve`], so users can write `~/Pictures/Wallpapers` or a
//! path relative to the configuration file.

use std::path::{Path, PathBuf};

/// Expands a leading tilde to the user's home directory.
///
/// Absolute and relative paths are returned unchanged. An empty or
/// whitespace-only value yields an empty `PathBuf`.
#[must_use]
pub fn expand(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return PathBuf::new();
    }

    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Expands a path and resolves it against `base_dir` when still relative.
///
/// ```ignore
/// let base = Path::new("/home/me/.config/wallselect");
/// assert_eq!(
///     expand_and_resolve("generators.conf", base),
///     PathBuf::from("/home/me/.config/wallselect/generators.conf"),
/// );
/// ```
#[must_use]
pub fn expand_and_resolve(path: &str, base_dir: &Path) -> PathBuf {
    let expanded = expand(path);

    if expanded.as_os_str().is_empty() || expanded.is_absolute() {
        return expanded;
    }

    base_dir.join(expanded)
}

/// Splits a colon-separated list of paths, expanding each entry.
///
/// Empty segments are dropped.
#[must_use]
pub fn expand_list(value: &str, base_dir: &Path) -> Vec<PathBuf> {
    value
        .split(':')
        .filter(|segment| !segment.trim().is_empty())
        .map(|segment| expand_and_resolve(segment, base_dir))
        .collect()
}
