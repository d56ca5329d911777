//! Generator manifest parsing and resolution.
//!
//! The manifest lists one generator per line as `name:enabled:priority`.
//! A generator is usable when it is enabled and `<name>.py` or `<name>.sh`
//! exists and is executable in one of the search directories. The usable
//! list is computed once per registry and reused.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use super::{GeneratorError, GeneratorKind, ResolvedGenerator};
use crate::utils::command::is_executable;

/// One manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorDescriptor {
    /// Generator name, also the executable file stem.
    pub name: String,
    /// Whether the generator may be used.
    pub enabled: bool,
    /// Lower runs first.
    pub priority: i64,
}

/// Parses manifest text into descriptors in manifest order.
///
/// Blank lines and `#` comments are skipped. Malformed lines are skipped
/// with a debug log. Only the first entry for a given name is kept.
#[must_use]
pub fn parse_manifest(contents: &str) -> Vec<GeneratorDescriptor> {
    let mut seen = HashSet::new();
    let mut descriptors = Vec::new();

    for (index, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some(descriptor) = parse_line(line) else {
            tracing::debug!(line = index + 1, content = line, "skipping malformed manifest line");
            continue;
        };

        if seen.insert(descriptor.name.clone()) {
            descriptors.push(descriptor);
        } else {
            tracing::debug!(name = %descriptor.name, "skipping duplicate manifest entry");
        }
    }

    descriptors
}

fn parse_line(line: &str) -> Option<GeneratorDescriptor> {
    let mut parts = line.split(':').map(str::trim);
    let name = parts.next().filter(|name| !name.is_empty())?;
    let enabled = match parts.next()?.to_lowercase().as_str() {
        "true" | "yes" | "1" => true,
        "false" | "no" | "0" => false,
        _ => return None,
    };
    let priority = parts.next()?.parse().ok()?;

    if parts.next().is_some() {
        return None;
    }

    Some(GeneratorDescriptor { name: name.to_string(), enabled, priority })
}

/// Resolves manifest entries against a list of search directories.
#[derive(Debug)]
pub struct GeneratorRegistry {
    manifest: PathBuf,
    search_dirs: Vec<PathBuf>,
    usable: OnceLock<Vec<ResolvedGenerator>>,
}

impl GeneratorRegistry {
    /// Creates a registry; nothing is read until first use.
    #[must_use]
    pub fn new(manifest: impl Into<PathBuf>, search_dirs: Vec<PathBuf>) -> Self {
        Self {
            manifest: manifest.into(),
            search_dirs,
            usable: OnceLock::new(),
        }
    }

    /// Enabled and resolvable generators, ascending by priority.
    ///
    /// Ties keep manifest order. A missing or unreadable manifest yields an
    /// empty list.
    pub fn list_usable_generators(&self) -> &[ResolvedGenerator] {
        self.usable.get_or_init(|| self.compute_usable())
    }

    /// Highest-priority usable generator, if any.
    #[must_use]
    pub fn preferred(&self) -> Option<&ResolvedGenerator> { self.list_usable_generators().first() }

    /// Looks up `name` in the usable set.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::NotFound` if the generator is disabled,
    /// unresolvable, or absent from the manifest.
    pub fn resolve(&self, name: &str) -> Result<&ResolvedGenerator, GeneratorError> {
        self.list_usable_generators()
            .iter()
            .find(|generator| generator.name == name)
            .ok_or_else(|| GeneratorError::NotFound(name.to_string()))
    }

    fn compute_usable(&self) -> Vec<ResolvedGenerator> {
        let contents = match fs::read_to_string(&self.manifest) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::debug!(
                    path = %self.manifest.display(),
                    error = %err,
                    "generator manifest unavailable"
                );
                return Vec::new();
            }
        };

        let mut descriptors: Vec<_> =
            parse_manifest(&contents).into_iter().filter(|d| d.enabled).collect();
        descriptors.sort_by_key(|d| d.priority);

        let usable: Vec<_> = descriptors
            .iter()
            .filter_map(|descriptor| {
                let resolved = resolve_executable(&descriptor.name, &self.search_dirs);
                if resolved.is_none() {
                    tracing::debug!(name = %descriptor.name, "generator not resolvable, skipping");
                }
                resolved
            })
            .collect();

        tracing::debug!(count = usable.len(), "usable generators resolved");
        usable
    }
}

/// Finds the first `<dir>/<name>.<ext>` that is executable.
///
/// Directories are tried in order; within a directory `.py` wins over `.sh`.
fn resolve_executable(name: &str, search_dirs: &[PathBuf]) -> Option<ResolvedGenerator> {
    search_dirs.iter().find_map(|dir| {
        GeneratorKind::ALL.into_iter().find_map(|kind| {
            let candidate = dir.join(format!("{name}.{}", kind.extension()));
            is_executable(&candidate).then(|| ResolvedGenerator {
                name: name.to_string(),
                executable: candidate,
                kind,
            })
        })
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::TempDir;

    use super::*;

    #[cfg(unix)]
    fn install(dir: &Path, file: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        fs::create_dir_all(dir).unwrap();
        let path = dir.join(file);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn usable_names(registry: &GeneratorRegistry) -> Vec<&str> {
        registry.list_usable_generators().iter().map(|g| g.name.as_str()).collect()
    }

    fn registry(dir: &TempDir, manifest: &str, search_dirs: Vec<PathBuf>) -> GeneratorRegistry {
        let path = dir.path().join("generators.conf");
        fs::write(&path, manifest).unwrap();
        GeneratorRegistry::new(path, search_dirs)
    }

    // ========================================================================
    // Manifest parsing
    // ========================================================================

    #[test]
    fn test_parse_manifest_skips_comments_and_blanks() {
        let descriptors = parse_manifest("# header\n\nmatugen:true:1\n   \n# pywal:true:2\n");
        assert_eq!(descriptors.len(), 1);
        assert_eq!(
            descriptors[0],
            GeneratorDescriptor { name: "matugen".to_string(), enabled: true, priority: 1 }
        );
    }

    #[test]
    fn test_parse_manifest_skips_malformed_lines() {
        let descriptors = parse_manifest(
            "good:true:1\nmissing:true\nbadflag:maybe:2\nbadprio:true:high\n:true:3\nextra:true:1:x\n",
        );
        let names: Vec<_> = descriptors.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["good"]);
    }

    #[test]
    fn test_parse_manifest_keeps_first_duplicate() {
        let descriptors = parse_manifest("pywal:false:1\npywal:true:0\n");
        assert_eq!(descriptors.len(), 1);
        assert!(!descriptors[0].enabled);
    }

    #[test]
    fn test_parse_manifest_accepts_negative_priority_and_spaces() {
        let descriptors = parse_manifest(" wal : TRUE : -3 \n");
        assert_eq!(descriptors[0].name, "wal");
        assert!(descriptors[0].enabled);
        assert_eq!(descriptors[0].priority, -3);
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    #[test]
    fn test_missing_manifest_yields_empty_list() {
        let dir = TempDir::new().unwrap();
        let registry = GeneratorRegistry::new(dir.path().join("absent.conf"), vec![]);
        assert!(registry.list_usable_generators().is_empty());
        assert!(registry.preferred().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_unresolvable_generator_is_dropped() {
        let dir = TempDir::new().unwrap();
        let gens = dir.path().join("gens");
        install(&gens, "a.sh");

        let registry = registry(&dir, "a:true:2\nb:true:1\n", vec![gens]);
        assert_eq!(usable_names(&registry), vec!["a"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_usable_generators_sorted_by_priority_stable() {
        let dir = TempDir::new().unwrap();
        let gens = dir.path().join("gens");
        for name in ["c.sh", "a.py", "b.sh", "d.sh"] {
            install(&gens, name);
        }

        let registry = registry(&dir, "c:true:5\na:true:2\nb:true:2\nd:false:0\n", vec![gens]);
        assert_eq!(usable_names(&registry), vec!["a", "b", "c"]);
        assert_eq!(registry.preferred().unwrap().name, "a");
    }

    #[cfg(unix)]
    #[test]
    fn test_python_preferred_over_shell_in_same_dir() {
        let dir = TempDir::new().unwrap();
        let gens = dir.path().join("gens");
        install(&gens, "wal.sh");
        let py = install(&gens, "wal.py");

        let registry = registry(&dir, "wal:true:1\n", vec![gens]);
        let resolved = registry.resolve("wal").unwrap();
        assert_eq!(resolved.kind, GeneratorKind::Python);
        assert_eq!(resolved.executable, py);
    }

    #[cfg(unix)]
    #[test]
    fn test_earlier_directory_wins() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("project");
        let user = dir.path().join("user");
        install(&user, "wal.py");
        let project_sh = install(&project, "wal.sh");

        let registry = registry(&dir, "wal:true:1\n", vec![project, user]);
        assert_eq!(registry.resolve("wal").unwrap().executable, project_sh);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_file_is_not_resolvable() {
        let dir = TempDir::new().unwrap();
        let gens = dir.path().join("gens");
        fs::create_dir_all(&gens).unwrap();
        fs::write(gens.join("wal.sh"), "#!/bin/sh\n").unwrap();

        assert!(resolve_executable("wal", std::slice::from_ref(&gens)).is_none());
        let registry = registry(&dir, "wal:true:1\n", vec![gens]);
        assert!(usable_names(&registry).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_disabled_generator_is_not_found() {
        let dir = TempDir::new().unwrap();
        let gens = dir.path().join("gens");
        install(&gens, "wal.sh");

        let registry = registry(&dir, "wal:false:1\n", vec![gens]);
        assert!(matches!(registry.resolve("wal"), Err(GeneratorError::NotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_usable_list_is_memoized() {
        let dir = TempDir::new().unwrap();
        let gens = dir.path().join("gens");
        install(&gens, "wal.sh");

        let registry = registry(&dir, "wal:true:1\n", vec![gens.clone()]);
        assert_eq!(usable_names(&registry), vec!["wal"]);

        fs::remove_file(gens.join("wal.sh")).unwrap();
        assert_eq!(usable_names(&registry), vec!["wal"]);
    }
}
