//! Configuration module for Wallselect.
//!
//! The configuration file is INI-style and shared with the generator plugins,
//! which read their own sections (`[Matugen]`, `[Pywal]`, ...) from the same
//! file when it is handed to them with `--config`. The core only ever talks
//! to a [`ConfigProvider`]; discovery precedence and template creation live
//! here and never leak into the pipeline.

mod file;
pub mod settings;
pub mod template;

use std::path::{Path, PathBuf};

pub use file::IniConfig;
pub use settings::{BlurSettings, Settings};
use thiserror::Error;

use crate::constants::APP_NAME;

/// Read-only access to configuration values.
///
/// Lookups never fail: a missing section or key yields `default`.
pub trait ConfigProvider: Send + Sync {
    /// Returns the value of `key` in `section`, or `default` when absent.
    fn get(&self, section: &str, key: &str, default: &str) -> String;

    /// Path of the file backing this provider, if any.
    ///
    /// Handed to generator plugins that accept a `--config` argument.
    fn source_path(&self) -> Option<&Path>;
}

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file exists in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/wallselect/config.ini or ~/.wallselect.ini"
    )]
    NotFound,
    /// The explicitly requested configuration file does not exist.
    #[error("Configuration file not found: {0}")]
    Missing(PathBuf),
    /// The configuration file exists but could not be read or parsed.
    #[error("Failed to read configuration file: {0}")]
    Read(#[from] ini::Error),
    /// The configuration text is not valid INI.
    #[error("Invalid configuration: {0}")]
    Syntax(#[from] ini::ParseError),
}

/// Configuration file name inside the application config directory.
const CONFIG_FILE_NAME: &str = "config.ini";

/// Legacy configuration file name in the home directory.
const LEGACY_CONFIG_FILE_NAME: &str = ".wallselect.ini";

/// Returns the application configuration directory.
///
/// `$XDG_CONFIG_HOME/wallselect` when set, `~/.config/wallselect` otherwise.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return PathBuf::from(xdg_config).join(APP_NAME);
    }

    dirs::home_dir().map_or_else(
        || PathBuf::from(format!("/tmp/{APP_NAME}")),
        |home| home.join(".config").join(APP_NAME),
    )
}

/// Returns the possible configuration file paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/wallselect/config.ini` (if set)
/// 2. `~/.config/wallselect/config.ini`
/// 3. `~/.wallselect.ini`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![config_dir().join(CONFIG_FILE_NAME)];

    if let Some(home) = dirs::home_dir() {
        let dot_config = home.join(".config").join(APP_NAME).join(CONFIG_FILE_NAME);
        if !paths.contains(&dot_config) {
            paths.push(dot_config);
        }
        paths.push(home.join(LEGACY_CONFIG_FILE_NAME));
    }

    paths
}

/// Loads the configuration from `custom` or the first existing default path.
///
/// # Errors
///
/// Returns `ConfigError::Missing` if `custom` does not exist,
/// `ConfigError::NotFound` if no default file exists, and
/// `ConfigError::Read` if a file exists but cannot be read or parsed.
pub fn load_config(custom: Option<&Path>) -> Result<IniConfig, ConfigError> {
    if let Some(path) = custom {
        if !path.is_file() {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }
        return IniConfig::from_path(path);
    }

    config_paths()
        .into_iter()
        .find(|path| path.is_file())
        .map_or(Err(ConfigError::NotFound), |path| IniConfig::from_path(&path))
}

/// Loads the configuration, falling back to defaults.
///
/// When no configuration exists anywhere, a commented template is written to
/// the preferred location so the next run (and the generator plugins) find it.
#[must_use]
pub fn load_or_default(custom: Option<&Path>) -> IniConfig {
    match load_config(custom) {
        Ok(config) => config,
        Err(ConfigError::NotFound) => create_default_config_file(),
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            IniConfig::default()
        }
    }
}

/// Writes the configuration template at the preferred location.
fn create_default_config_file() -> IniConfig {
    let Some(config_path) = config_paths().into_iter().next() else {
        tracing::debug!("no config path available for creating template");
        return IniConfig::default();
    };

    match template::create_config_file(&config_path) {
        Ok(()) => {
            tracing::info!(path = %config_path.display(), "created default configuration file");
            IniConfig::default().with_source(config_path)
        }
        Err(err) => {
            tracing::debug!(
                error = %err,
                path = %config_path.display(),
                "failed to create default configuration file"
            );
            IniConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_config_paths_are_not_empty() {
        let paths = config_paths();
        assert!(!paths.is_empty());
        assert!(paths[0].ends_with(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_config_paths_have_no_duplicates() {
        let paths = config_paths();
        for (i, path) in paths.iter().enumerate() {
            assert!(!paths[i + 1..].contains(path), "duplicate path: {}", path.display());
        }
    }

    #[test]
    fn test_load_config_custom_missing() {
        let result = load_config(Some(Path::new("/nonexistent/wallselect/config.ini")));
        assert!(matches!(result, Err(ConfigError::Missing(_))));
    }

    #[test]
    fn test_load_config_custom_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.ini");
        fs::write(&path, "[Transition]\nstyle = smooth\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.get("Transition", "style", "random"), "smooth");
        assert_eq!(config.source_path(), Some(path.as_path()));
    }

    #[test]
    fn test_load_or_default_with_unreadable_custom_falls_back() {
        let config = load_or_default(Some(Path::new("/nonexistent/config.ini")));
        assert_eq!(config.get("Blur", "strength", "0x8"), "0x8");
        assert!(config.source_path().is_none());
    }

    #[test]
    fn test_load_or_default_with_malformed_custom_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.ini");
        fs::write(&path, "[Blur\nstrength = 0x2\n").unwrap();

        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Read(_))));
        let config = load_or_default(Some(&path));
        assert_eq!(config.get("Blur", "strength", "0x8"), "0x8");
    }

    #[test]
    fn test_config_error_messages() {
        assert!(ConfigError::NotFound.to_string().contains("No configuration file found"));
        let missing = ConfigError::Missing(PathBuf::from("/x/config.ini"));
        assert!(missing.to_string().contains("/x/config.ini"));
    }
}
