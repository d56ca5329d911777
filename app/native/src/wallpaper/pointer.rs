//! The persisted current-wallpaper pointer.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A text file holding the absolute path of the last applied wallpaper.
///
/// Writes are unsynchronized; the last writer wins.
#[derive(Debug, Clone)]
pub struct CurrentWallpaper {
    file: PathBuf,
}

impl CurrentWallpaper {
    #[must_use]
    pub fn new(file: impl Into<PathBuf>) -> Self { Self { file: file.into() } }

    /// Reads the stored path; `None` if the file is missing or empty.
    #[must_use]
    pub fn read(&self) -> Option<PathBuf> {
        let contents = fs::read_to_string(&self.file).ok()?;
        let line = contents.lines().next()?.trim();
        (!line.is_empty()).then(|| PathBuf::from(line))
    }

    /// Stores `wallpaper` as an absolute path, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, wallpaper: &Path) -> io::Result<()> {
        let absolute = std::path::absolute(wallpaper)?;
        if let Some(parent) = self.file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.file, format!("{}\n", absolute.display()))
    }
}
