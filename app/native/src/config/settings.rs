//! Typed view over the configuration provider.

use std::path::{Path, PathBuf};

use super::ConfigProvider;
use crate::constants::{
    APP_NAME, CURRENT_BLURRED_FILE, CURRENT_WALLPAPER_FILE, GENERATORS_DIR_NAME,
    MANIFEST_FILE_NAME,
};
use crate::platform::path::{expand_and_resolve, expand_list};
use crate::wallpaper::processing::{BlurStrength, Resolution};
use crate::wallpaper::transition::{TransitionOverrides, TransitionStyle};

/// Default wallpaper directory.
const DEFAULT_WALLPAPER_DIR: &str = "~/Pictures/Wallpapers";

/// Generator used when the manifest yields nothing usable.
const DEFAULT_GENERATOR: &str = "matugen";

/// Default theme reload command.
const DEFAULT_RELOAD_COMMAND: &str = "hyprctl reload";

/// Blur output settings.
#[derive(Debug, Clone, PartialEq)]
pub struct BlurSettings {
    /// Whether image processing is available for this run.
    pub enabled: bool,
    /// Filter strength; a zero sigma skips the filter.
    pub strength: BlurStrength,
    /// Fixed output resolution.
    pub resolution: Resolution,
}

impl Default for BlurSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            strength: BlurStrength::default(),
            resolution: Resolution::default(),
        }
    }
}

/// Resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory random and resume selection read from.
    pub wallpaper_dir: PathBuf,
    /// Base directory of the artifact caches and the current-wallpaper pointer.
    pub cache_dir: PathBuf,
    /// Generator manifest location.
    pub manifest_path: PathBuf,
    /// Generator search directories, highest precedence first.
    pub generator_dirs: Vec<PathBuf>,
    /// Fallback generator name (not validated).
    pub default_generator: String,
    /// Configured transition style.
    pub transition: TransitionStyle,
    /// `swww` options pinned over the style's drawn values.
    pub transition_overrides: TransitionOverrides,
    /// Blur output settings.
    pub blur: BlurSettings,
    /// Shell-free command line run to reload the theme; empty disables it.
    pub reload_command: String,
    /// Whether to emit a desktop-bus change signal.
    pub notify_bus: bool,
    /// Configuration file handed to generator plugins.
    pub config_file: Option<PathBuf>,
}

impl Settings {
    /// Resolves every setting from `provider`, applying defaults.
    ///
    /// Relative paths are resolved against the directory of the
    /// configuration file, or the application config directory when the
    /// provider has no backing file.
    #[must_use]
    pub fn from_provider(provider: &dyn ConfigProvider) -> Self {
        let base_dir = provider
            .source_path()
            .and_then(Path::parent)
            .map_or_else(super::config_dir, Path::to_path_buf);

        let default_cache = dirs::cache_dir().map_or_else(
            || PathBuf::from(format!("/tmp/{APP_NAME}")),
            |cache| cache.join(APP_NAME),
        );

        let wallpaper_dir = expand_and_resolve(
            &provider.get("Paths", "wallpaper_dir", DEFAULT_WALLPAPER_DIR),
            &base_dir,
        );
        let cache_dir = non_empty_or(
            expand_and_resolve(&provider.get("Paths", "cache_dir", ""), &base_dir),
            default_cache,
        );
        let manifest_path = expand_and_resolve(
            &provider.get("Generators", "manifest", MANIFEST_FILE_NAME),
            &base_dir,
        );

        let mut generator_dirs = expand_list(&provider.get("Generators", "search_dirs", ""), &base_dir);
        generator_dirs.extend(default_generator_dirs());

        let default_generator = provider.get("Generators", "default", DEFAULT_GENERATOR).trim().to_string();
        let transition = TransitionStyle::parse_lossy(&provider.get("Transition", "style", "random"));
        let transition_overrides = TransitionOverrides {
            transition_type: optional_value(provider, "type"),
            step: optional_value(provider, "step"),
            duration: optional_value(provider, "duration"),
            fps: optional_value(provider, "fps"),
            angle: optional_value(provider, "angle"),
            position: optional_value(provider, "position"),
            resize: optional_value(provider, "resize"),
            filter: optional_value(provider, "filter"),
            fill_color: optional_value(provider, "fill_color"),
        };

        let blur = BlurSettings {
            enabled: parse_bool(&provider.get("Blur", "enabled", "true"), true),
            strength: parse_or_default(&provider.get("Blur", "strength", ""), "strength"),
            resolution: parse_or_default(&provider.get("Blur", "resolution", ""), "resolution"),
        };

        Self {
            wallpaper_dir,
            cache_dir,
            manifest_path,
            generator_dirs,
            default_generator,
            transition,
            transition_overrides,
            blur,
            reload_command: provider.get("Hooks", "reload_command", DEFAULT_RELOAD_COMMAND).trim().to_string(),
            notify_bus: parse_bool(&provider.get("Hooks", "notify_bus", "true"), true),
            config_file: provider.source_path().map(Path::to_path_buf),
        }
    }

    /// Location of the current-wallpaper pointer file.
    #[must_use]
    pub fn current_wallpaper_file(&self) -> PathBuf { self.cache_dir.join(CURRENT_WALLPAPER_FILE) }

    /// Well-known location of the blurred current wallpaper.
    #[must_use]
    pub fn current_blurred_file(&self) -> PathBuf { self.cache_dir.join(CURRENT_BLURRED_FILE) }
}

/// Built-in generator directories: next to the executable (project-local),
/// then the user's config directory (user-local).
fn default_generator_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(exe_dir) = std::env::current_exe().ok().as_deref().and_then(Path::parent) {
        dirs.push(exe_dir.join(GENERATORS_DIR_NAME));
    }
    dirs.push(super::config_dir().join(GENERATORS_DIR_NAME));

    dirs
}

fn non_empty_or(path: PathBuf, fallback: PathBuf) -> PathBuf {
    if path.as_os_str().is_empty() { fallback } else { path }
}

/// Parses an INI boolean; unknown values yield `default`.
fn parse_bool(value: &str, default: bool) -> bool {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => true,
        "false" | "no" | "off" | "0" => false,
        _ => default,
    }
}

fn parse_or_default<T>(value: &str, key: &str) -> T
where
    T: std::str::FromStr + Default,
    T::Err: std::fmt::Display,
{
    if value.trim().is_empty() {
        return T::default();
    }

    value.parse().unwrap_or_else(|err| {
        tracing::warn!(key, value, error = %err, "invalid blur setting, using default");
        T::default()
    })
}

/// A `[Transition]` key that is unset when empty or unparsable.
fn optional_value<T>(provider: &dyn ConfigProvider, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = provider.get("Transition", key, "");
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    value
        .parse()
        .map_err(|err| tracing::warn!(key, value, error = %err, "invalid transition setting, ignoring"))
        .ok()
}
