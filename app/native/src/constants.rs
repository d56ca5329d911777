//! Application-wide constants.

use std::time::Duration;

/// Application name, used for config, cache and log prefixes.
pub const APP_NAME: &str = "wallselect";

/// How long a color scheme generation stays valid (7 days).
pub const COLOR_CACHE_TTL: Duration = Duration::from_secs(604_800);

/// File name of the persisted current-wallpaper pointer.
pub const CURRENT_WALLPAPER_FILE: &str = "current_wallpaper";

/// File name of the blurred variant of the current wallpaper.
pub const CURRENT_BLURRED_FILE: &str = "current_blurred.jpg";

/// File name picked by resume mode when no pointer is usable.
pub const DEFAULT_WALLPAPER_NAME: &str = "default.png";

/// Generator manifest file name.
pub const MANIFEST_FILE_NAME: &str = "generators.conf";

/// Directory name generators are searched in.
pub const GENERATORS_DIR_NAME: &str = "generators";

/// Supported wallpaper file extensions (lowercase).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];
