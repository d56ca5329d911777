//! Wallpaper selection.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use rand::seq::IndexedRandom;
use thiserror::Error;

use super::pointer::CurrentWallpaper;
use super::processing::is_supported_image;
use crate::constants::DEFAULT_WALLPAPER_NAME;

/// Errors that prevent a wallpaper from being selected.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// The explicit path is not a regular file.
    #[error("wallpaper not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Explicit mode was requested without a path.
    #[error("no wallpaper path given")]
    MissingPath,
    /// The wallpaper directory holds no usable image.
    #[error("no wallpapers found in {}", .0.display())]
    NoWallpapers(PathBuf),
}

/// How the wallpaper is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// The last applied wallpaper, falling back to a default.
    Resume,
    /// The path given on the command line.
    Explicit,
    /// A uniform pick from the wallpaper directory.
    #[default]
    Random,
}

impl SelectionMode {
    /// Parses a mode name; unknown names select `Random`.
    #[must_use]
    pub fn parse_lossy(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "init" | "resume" => Self::Resume,
            "specific" | "explicit" => Self::Explicit,
            _ => Self::Random,
        }
    }
}

/// Resolves wallpapers from a directory and the current-wallpaper pointer.
///
/// The directory listing is read at most once per selector.
#[derive(Debug)]
pub struct WallpaperSelector {
    wallpaper_dir: PathBuf,
    pointer: CurrentWallpaper,
    listing: OnceLock<Vec<PathBuf>>,
}

impl WallpaperSelector {
    #[must_use]
    pub fn new(wallpaper_dir: impl Into<PathBuf>, pointer: CurrentWallpaper) -> Self {
        Self {
            wallpaper_dir: wallpaper_dir.into(),
            pointer,
            listing: OnceLock::new(),
        }
    }

    /// Selects a wallpaper for `mode`.
    ///
    /// `explicit` is only consulted in [`SelectionMode::Explicit`].
    ///
    /// # Errors
    ///
    /// Returns `SelectionError` if no wallpaper can be chosen.
    pub fn select(&self, mode: SelectionMode, explicit: Option<&Path>) -> Result<PathBuf, SelectionError> {
        match mode {
            SelectionMode::Resume => self.resume(),
            SelectionMode::Explicit => {
                let path = explicit.ok_or(SelectionError::MissingPath)?;
                if path.is_file() {
                    Ok(path.to_path_buf())
                } else {
                    Err(SelectionError::NotFound(path.to_path_buf()))
                }
            }
            SelectionMode::Random => self
                .listing()
                .choose(&mut rand::rng())
                .cloned()
                .ok_or_else(|| SelectionError::NoWallpapers(self.wallpaper_dir.clone())),
        }
    }

    /// Supported images in the wallpaper directory, in enumeration order.
    pub fn listing(&self) -> &[PathBuf] {
        self.listing.get_or_init(|| list_images_in_directory(&self.wallpaper_dir))
    }

    fn resume(&self) -> Result<PathBuf, SelectionError> {
        if let Some(current) = self.pointer.read() {
            if current.exists() {
                return Ok(current);
            }
            tracing::debug!(path = %current.display(), "previous wallpaper no longer exists");
        }

        let fallback = self.wallpaper_dir.join(DEFAULT_WALLPAPER_NAME);
        if fallback.is_file() {
            return Ok(fallback);
        }

        self.listing()
            .first()
            .cloned()
            .ok_or_else(|| SelectionError::NoWallpapers(self.wallpaper_dir.clone()))
    }
}

/// Lists all supported image files in a directory.
///
/// Order is whatever the filesystem enumerates; an unreadable directory
/// yields an empty list.
fn list_images_in_directory(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(path = %dir.display(), error = %err, "cannot read wallpaper directory");
            return Vec::new();
        }
    };

    let images: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_supported_image(path))
        .collect();

    tracing::debug!(path = %dir.display(), count = images.len(), "wallpaper directory listed");
    images
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    struct Fixture {
        _dir: TempDir,
        walls: PathBuf,
        pointer: CurrentWallpaper,
    }

    fn fixture(files: &[&str]) -> Fixture {
        let dir = TempDir::new().unwrap();
        let walls = dir.path().join("walls");
        fs::create_dir_all(&walls).unwrap();
        for file in files {
            fs::write(walls.join(file), b"img").unwrap();
        }
        let pointer = CurrentWallpaper::new(dir.path().join("cache/current_wallpaper"));
        Fixture { _dir: dir, walls, pointer }
    }

    impl Fixture {
        fn selector(&self) -> WallpaperSelector {
            WallpaperSelector::new(&self.walls, self.pointer.clone())
        }
    }

    // ========================================================================
    // Mode parsing
    // ========================================================================

    #[test]
    fn test_parse_mode_aliases() {
        assert_eq!(SelectionMode::parse_lossy("init"), SelectionMode::Resume);
        assert_eq!(SelectionMode::parse_lossy("resume"), SelectionMode::Resume);
        assert_eq!(SelectionMode::parse_lossy("specific"), SelectionMode::Explicit);
        assert_eq!(SelectionMode::parse_lossy("EXPLICIT"), SelectionMode::Explicit);
        assert_eq!(SelectionMode::parse_lossy("random"), SelectionMode::Random);
        assert_eq!(SelectionMode::parse_lossy("whatever"), SelectionMode::Random);
    }

    // ========================================================================
    // Listing
    // ========================================================================

    #[test]
    fn test_listing_filters_extensions_and_directories() {
        let fx = fixture(&["a.png", "b.JPG", "c.webp", "notes.txt", "d.jpeg"]);
        fs::create_dir_all(fx.walls.join("sub.png")).unwrap();

        let mut names: Vec<_> = fx
            .selector()
            .listing()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.png", "b.JPG", "c.webp", "d.jpeg"]);
    }

    #[test]
    fn test_listing_is_memoized() {
        let fx = fixture(&["a.png"]);
        let selector = fx.selector();
        assert_eq!(selector.listing().len(), 1);

        fs::write(fx.walls.join("b.png"), b"img").unwrap();
        assert_eq!(selector.listing().len(), 1);
    }

    #[test]
    fn test_missing_directory_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let selector = WallpaperSelector::new(
            dir.path().join("absent"),
            CurrentWallpaper::new(dir.path().join("current_wallpaper")),
        );
        assert!(selector.listing().is_empty());
    }

    // ========================================================================
    // Explicit
    // ========================================================================

    #[test]
    fn test_explicit_returns_path_verbatim() {
        let fx = fixture(&["a.png"]);
        let path = fx.walls.join("a.png");
        assert_eq!(fx.selector().select(SelectionMode::Explicit, Some(&path)).unwrap(), path);
    }

    #[test]
    fn test_explicit_accepts_unsupported_extension() {
        let fx = fixture(&["photo.tiff"]);
        let path = fx.walls.join("photo.tiff");
        assert_eq!(fx.selector().select(SelectionMode::Explicit, Some(&path)).unwrap(), path);
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let fx = fixture(&[]);
        let path = fx.walls.join("missing.png");
        let err = fx.selector().select(SelectionMode::Explicit, Some(&path)).unwrap_err();
        assert!(matches!(err, SelectionError::NotFound(ref p) if *p == path));
        assert!(err.to_string().starts_with("wallpaper not found"));
    }

    #[test]
    fn test_explicit_directory_fails() {
        let fx = fixture(&[]);
        let err = fx.selector().select(SelectionMode::Explicit, Some(&fx.walls)).unwrap_err();
        assert!(matches!(err, SelectionError::NotFound(_)));
    }

    #[test]
    fn test_explicit_without_path_fails() {
        let fx = fixture(&["a.png"]);
        let err = fx.selector().select(SelectionMode::Explicit, None).unwrap_err();
        assert!(matches!(err, SelectionError::MissingPath));
    }

    // ========================================================================
    // Random
    // ========================================================================

    #[test]
    fn test_random_picks_from_listing() {
        let fx = fixture(&["a.png", "b.png", "c.png"]);
        let selector = fx.selector();
        for _ in 0..20 {
            let chosen = selector.select(SelectionMode::Random, None).unwrap();
            assert!(selector.listing().contains(&chosen));
        }
    }

    #[test]
    fn test_random_empty_directory_fails() {
        let fx = fixture(&["readme.txt"]);
        let err = fx.selector().select(SelectionMode::Random, None).unwrap_err();
        assert!(matches!(err, SelectionError::NoWallpapers(_)));
    }

    // ========================================================================
    // Resume
    // ========================================================================

    #[test]
    fn test_resume_uses_pointer() {
        let fx = fixture(&["a.png", "b.png"]);
        let target = fx.walls.join("b.png");
        fx.pointer.write(&target).unwrap();

        let selector = fx.selector();
        assert_eq!(selector.select(SelectionMode::Resume, None).unwrap(), target);
        assert_eq!(selector.select(SelectionMode::Resume, None).unwrap(), target);
    }

    #[test]
    fn test_resume_stale_pointer_falls_back_to_default() {
        let fx = fixture(&["a.png", "default.png"]);
        fx.pointer.write(&fx.walls.join("gone.png")).unwrap();

        let chosen = fx.selector().select(SelectionMode::Resume, None).unwrap();
        assert_eq!(chosen, fx.walls.join("default.png"));
    }

    #[test]
    fn test_resume_without_default_uses_first_listing_entry() {
        let fx = fixture(&["only.jpg"]);
        let chosen = fx.selector().select(SelectionMode::Resume, None).unwrap();
        assert_eq!(chosen, fx.walls.join("only.jpg"));
    }

    #[test]
    fn test_resume_with_nothing_fails() {
        let fx = fixture(&[]);
        let err = fx.selector().select(SelectionMode::Resume, None).unwrap_err();
        assert!(matches!(err, SelectionError::NoWallpapers(_)));
    }
}
