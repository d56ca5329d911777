//! On-disk artifact caches.
//!
//! Two independently addressed caches share one base directory:
//!
//! - `colors/` holds empty marker files named `<generator>_<sha256>.cache`.
//!   The generator writes its real output elsewhere; the marker only records
//!   *when* a generator last ran for a given wallpaper content. A marker is
//!   valid while younger than [`COLOR_CACHE_TTL`].
//! - `blurred/` holds blurred wallpapers keyed by the source basename. Entries
//!   never expire; two wallpapers with the same file name in different
//!   directories share one entry.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use sha2::{Digest, Sha256};

use crate::constants::COLOR_CACHE_TTL;

/// Color markers subdirectory.
const COLORS_DIR: &str = "colors";

/// Blurred images subdirectory.
const BLURRED_DIR: &str = "blurred";

/// Handle to the artifact caches under one base directory.
#[derive(Debug, Clone)]
pub struct ArtifactCache {
    base: PathBuf,
}

impl ArtifactCache {
    /// Creates a cache rooted at `base`.
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self { Self { base: base.into() } }

    /// Directory holding color markers.
    #[must_use]
    pub fn colors_dir(&self) -> PathBuf { self.base.join(COLORS_DIR) }

    /// Directory holding blurred images.
    #[must_use]
    pub fn blurred_dir(&self) -> PathBuf { self.base.join(BLURRED_DIR) }

    /// Creates both cache subdirectories.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    pub fn ensure_dirs(&self) -> io::Result<()> {
        fs::create_dir_all(self.colors_dir())?;
        fs::create_dir_all(self.blurred_dir())
    }

    /// Path of the marker for `(generator, hash)`.
    #[must_use]
    pub fn color_marker_path(&self, generator: &str, hash: &str) -> PathBuf {
        self.colors_dir().join(format!("{generator}_{hash}.cache"))
    }

    /// Returns true if `generator` ran for content `hash` within the TTL.
    #[must_use]
    pub fn is_color_cache_valid(&self, generator: &str, hash: &str) -> bool {
        self.is_color_cache_valid_at(generator, hash, SystemTime::now())
    }

    /// A marker whose age equals the TTL is stale. A marker dated in the
    /// future counts as fresh. Any stat failure yields `false`.
    fn is_color_cache_valid_at(&self, generator: &str, hash: &str, now: SystemTime) -> bool {
        let Ok(modified) =
            fs::metadata(self.color_marker_path(generator, hash)).and_then(|meta| meta.modified())
        else {
            return false;
        };

        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        age < COLOR_CACHE_TTL
    }

    /// Creates or touches the marker for `(generator, hash)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker cannot be written.
    pub fn mark_color_cache_fresh(&self, generator: &str, hash: &str) -> io::Result<()> {
        fs::create_dir_all(self.colors_dir())?;

        let marker = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.color_marker_path(generator, hash))?;
        marker.set_modified(SystemTime::now())
    }

    /// Returns the cached blurred image for `basename`, if any.
    #[must_use]
    pub fn get_cached_blur(&self, basename: &str) -> Option<PathBuf> {
        let path = self.blurred_dir().join(basename);
        path.is_file().then_some(path)
    }

    /// Stores blurred image bytes under `basename`, overwriting.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn store_blur(&self, basename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(self.blurred_dir())?;

        let path = self.blurred_dir().join(basename);
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Removes both caches.
    ///
    /// Returns the approximate number of bytes freed. A missing base
    /// directory frees nothing and is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be removed.
    pub fn clear(&self) -> io::Result<u64> {
        let mut freed = 0;

        for dir in [self.colors_dir(), self.blurred_dir()] {
            if !dir.exists() {
                continue;
            }
            freed += calculate_dir_size(&dir)?;
            fs::remove_dir_all(&dir)?;
        }

        Ok(freed)
    }
}

/// Hex SHA-256 digest of the file contents at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn content_hash(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Calculates the total size of a directory in bytes.
fn calculate_dir_size(path: &Path) -> io::Result<u64> {
    let mut total = 0u64;

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            total += calculate_dir_size(&path)?;
        } else {
            total += entry.metadata().map(|m| m.len()).unwrap_or(0);
        }
    }

    Ok(total)
}

/// Formats a byte count as a human-readable string.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Precision loss is acceptable for human-readable output
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn cache() -> (TempDir, ArtifactCache) {
        let dir = TempDir::new().unwrap();
        let cache = ArtifactCache::new(dir.path());
        (dir, cache)
    }

    // ========================================================================
    // Color cache
    // ========================================================================

    #[test]
    fn test_color_cache_missing_marker_is_invalid() {
        let (_dir, cache) = cache();
        assert!(!cache.is_color_cache_valid("matugen", "abc123"));
    }

    #[test]
    fn test_color_cache_valid_after_mark() {
        let (_dir, cache) = cache();
        cache.mark_color_cache_fresh("matugen", "abc123").unwrap();

        assert!(cache.is_color_cache_valid("matugen", "abc123"));
        assert!(cache.color_marker_path("matugen", "abc123").is_file());
    }

    #[test]
    fn test_color_cache_is_per_generator() {
        let (_dir, cache) = cache();
        cache.mark_color_cache_fresh("matugen", "abc123").unwrap();

        assert!(!cache.is_color_cache_valid("pywal", "abc123"));
        assert!(!cache.is_color_cache_valid("matugen", "def456"));
    }

    #[test]
    fn test_color_cache_expires_exactly_at_ttl() {
        let (_dir, cache) = cache();
        cache.mark_color_cache_fresh("pywal", "h").unwrap();

        let marked = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        File::options()
            .write(true)
            .open(cache.color_marker_path("pywal", "h"))
            .unwrap()
            .set_modified(marked)
            .unwrap();

        let one_second_left = marked + COLOR_CACHE_TTL - Duration::from_secs(1);
        assert!(cache.is_color_cache_valid_at("pywal", "h", one_second_left));
        assert!(!cache.is_color_cache_valid_at("pywal", "h", marked + COLOR_CACHE_TTL));
        assert!(!cache.is_color_cache_valid_at(
            "pywal",
            "h",
            marked + COLOR_CACHE_TTL + Duration::from_secs(1)
        ));
    }

    #[test]
    fn test_color_cache_future_marker_is_fresh() {
        let (_dir, cache) = cache();
        cache.mark_color_cache_fresh("pywal", "h").unwrap();

        let earlier = SystemTime::now() - Duration::from_secs(3600);
        assert!(cache.is_color_cache_valid_at("pywal", "h", earlier));
    }

    #[test]
    fn test_color_cache_old_marker_is_invalid() {
        let (_dir, cache) = cache();
        cache.mark_color_cache_fresh("pywal", "h").unwrap();

        let old = SystemTime::now() - COLOR_CACHE_TTL - Duration::from_secs(60);
        File::options()
            .write(true)
            .open(cache.color_marker_path("pywal", "h"))
            .unwrap()
            .set_modified(old)
            .unwrap();

        assert!(!cache.is_color_cache_valid("pywal", "h"));
    }

    #[test]
    fn test_mark_color_cache_fresh_refreshes_old_marker() {
        let (_dir, cache) = cache();
        cache.mark_color_cache_fresh("pywal", "h").unwrap();

        let old = SystemTime::now() - COLOR_CACHE_TTL * 2;
        File::options()
            .write(true)
            .open(cache.color_marker_path("pywal", "h"))
            .unwrap()
            .set_modified(old)
            .unwrap();
        assert!(!cache.is_color_cache_valid("pywal", "h"));

        cache.mark_color_cache_fresh("pywal", "h").unwrap();
        assert!(cache.is_color_cache_valid("pywal", "h"));
    }

    // ========================================================================
    // Content hash
    // ========================================================================

    #[test]
    fn test_content_hash_ignores_file_name() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("renamed.png");
        fs::write(&a, b"same pixels").unwrap();
        fs::write(&b, b"same pixels").unwrap();

        assert_eq!(content_hash(&a).unwrap(), content_hash(&b).unwrap());
    }

    #[test]
    fn test_content_hash_changes_with_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wall.png");
        fs::write(&path, b"before").unwrap();
        let before = content_hash(&path).unwrap();

        fs::write(&path, b"after").unwrap();
        assert_ne!(before, content_hash(&path).unwrap());
    }

    #[test]
    fn test_content_hash_is_sha256_hex() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.png");
        fs::write(&path, b"").unwrap();

        assert_eq!(
            content_hash(&path).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_content_hash_missing_file() {
        assert!(content_hash(Path::new("/nonexistent/wall.png")).is_err());
    }

    // ========================================================================
    // Blur cache
    // ========================================================================

    #[test]
    fn test_blur_cache_round_trip() {
        let (_dir, cache) = cache();
        let bytes = vec![0xff, 0xd8, 0xff, 0x00, 0x42];

        let stored = cache.store_blur("forest.jpg", &bytes).unwrap();
        let cached = cache.get_cached_blur("forest.jpg").unwrap();

        assert_eq!(stored, cached);
        assert_eq!(fs::read(cached).unwrap(), bytes);
    }

    #[test]
    fn test_blur_cache_miss() {
        let (_dir, cache) = cache();
        assert!(cache.get_cached_blur("never.png").is_none());
    }

    #[test]
    fn test_store_blur_overwrites() {
        let (_dir, cache) = cache();
        cache.store_blur("a.png", b"one").unwrap();
        cache.store_blur("a.png", b"two").unwrap();

        assert_eq!(fs::read(cache.get_cached_blur("a.png").unwrap()).unwrap(), b"two");
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    #[test]
    fn test_ensure_dirs_creates_subdirectories() {
        let (_dir, cache) = cache();
        cache.ensure_dirs().unwrap();

        assert!(cache.colors_dir().is_dir());
        assert!(cache.blurred_dir().is_dir());
    }

    #[test]
    fn test_clear_removes_both_caches() {
        let (_dir, cache) = cache();
        cache.mark_color_cache_fresh("g", "h").unwrap();
        cache.store_blur("a.png", &[0u8; 2048]).unwrap();

        let freed = cache.clear().unwrap();

        assert_eq!(freed, 2048);
        assert!(!cache.colors_dir().exists());
        assert!(cache.get_cached_blur("a.png").is_none());
    }

    #[test]
    fn test_clear_on_missing_dirs() {
        let (_dir, cache) = cache();
        assert_eq!(cache.clear().unwrap(), 0);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 bytes");
        assert_eq!(format_bytes(1023), "1023 bytes");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.00 MB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.00 GB");
    }
}
