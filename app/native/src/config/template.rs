//! Configuration and manifest templates.
//!
//! Both files are written on first run so users have something to edit.

use std::fs;
use std::path::Path;

/// Generates the configuration template with every option commented out.
#[must_use]
pub fn generate_config_template() -> String {
    r##"# Wallselect Configuration File
# =============================
# INI format. Every option below is commented out and shows its default.
# Generator plugins read their own sections ([Matugen], [Pywal], ...) from
# this same file when they are invoked with --config.

[Paths]
# Directory containing wallpaper images (jpg, jpeg, png, webp)
# wallpaper_dir = ~/Pictures/Wallpapers
#
# Cache directory for color scheme markers and blurred wallpapers
# cache_dir = ~/.cache/wallselect

[Generators]
# Manifest listing generators as name:enabled:priority
# manifest = generators.conf
#
# Generator used when the manifest yields nothing usable
# default = matugen
#
# Extra colon-separated directories searched before the built-in ones
# search_dirs =

[Transition]
# One of: smooth, dramatic, minimal, dynamic, random
# style = random
#
# Pin individual swww options over the ones drawn from the style
# type = wipe
# step = 90
# duration = 1.5
# fps = 60
# angle = 45
# position = center
# resize = crop
# filter = Lanczos3
# fill_color = "#000000"

[Blur]
# Produce a blurred copy of the wallpaper (for lock screens, overlays, ...)
# enabled = true
#
# Blur strength as RADIUSxSIGMA; 0x0 disables the filter
# strength = 0x8
#
# Output resolution of the blurred image
# resolution = 1920x1080

[Hooks]
# Command run after the color scheme is generated (empty to disable)
# reload_command = hyprctl reload
#
# Emit a desktop-bus signal when the wallpaper changes
# notify_bus = true

# [Matugen]
# mode = dark
# type = scheme-tonal-spot
"##
    .to_string()
}

/// Generates the default generator manifest.
#[must_use]
pub fn generate_manifest_template() -> String {
    r"# Wallselect generator manifest
# Format: name:enabled:priority (lower priority runs first)
# Generators are looked up as <name>.py or <name>.sh in the generator directories.
matugen:true:1
pywal:true:2
hellwall:false:3
material:false:4
"
    .to_string()
}

/// Creates a configuration file with the template at the specified path.
///
/// Creates parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    write_template(path, &generate_config_template())
}

/// Creates the generator manifest at `path` unless it already exists.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn create_manifest_file(path: &Path) -> Result<(), std::io::Error> {
    if path.exists() {
        return Ok(());
    }
    write_template(path, &generate_manifest_template())
}

fn write_template(path: &Path, contents: &str) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}
