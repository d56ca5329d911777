//! Two-phase execution.
//!
//! The fast phase selects and applies a wallpaper and returns as soon as the
//! desktop shows it. The background phase then derives the color scheme and
//! the blurred variant, and fires the notifier hooks. Every background step
//! is independent: a failure is logged and the next step still runs.

pub mod launcher;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

pub use launcher::{BackgroundHandle, Launcher};

use crate::cache::{ArtifactCache, content_hash};
use crate::config::Settings;
use crate::config::template::create_manifest_file;
use crate::error::WallselectError;
use crate::generators::{GeneratorInvoker, GeneratorRegistry};
use crate::wallpaper::processing::render_blurred;
use crate::wallpaper::{CurrentWallpaper, SelectionMode, SystemNotifier, WallpaperSelector};

/// What the user asked for.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub mode: SelectionMode,
    pub path: Option<PathBuf>,
    /// Generator to use instead of the preferred one.
    pub generator: Option<String>,
}

/// Input of the background phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundJob {
    pub wallpaper: PathBuf,
    pub generator: String,
}

/// Result of one background step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    CacheHit,
    Skipped(String),
    Failed(String),
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => f.write_str("done"),
            Self::CacheHit => f.write_str("cache hit"),
            Self::Skipped(reason) => write!(f, "skipped ({reason})"),
            Self::Failed(reason) => write!(f, "failed ({reason})"),
        }
    }
}

/// Outcomes of a background run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundReport {
    pub colors: StepOutcome,
    pub blur: StepOutcome,
    pub hooks: StepOutcome,
}

/// Owns every process-scoped component of one invocation.
pub struct Pipeline {
    settings: Settings,
    notifier: Arc<dyn SystemNotifier>,
    registry: GeneratorRegistry,
    selector: WallpaperSelector,
    pointer: CurrentWallpaper,
    cache: ArtifactCache,
    invoker: GeneratorInvoker,
}

impl Pipeline {
    #[must_use]
    pub fn new(settings: Settings, notifier: Arc<dyn SystemNotifier>) -> Self {
        let pointer = CurrentWallpaper::new(settings.current_wallpaper_file());

        Self {
            registry: GeneratorRegistry::new(&settings.manifest_path, settings.generator_dirs.clone()),
            selector: WallpaperSelector::new(&settings.wallpaper_dir, pointer.clone()),
            pointer,
            cache: ArtifactCache::new(&settings.cache_dir),
            invoker: GeneratorInvoker::new(settings.config_file.clone()),
            notifier,
            settings,
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings { &self.settings }

    #[must_use]
    pub const fn registry(&self) -> &GeneratorRegistry { &self.registry }

    #[must_use]
    pub const fn cache(&self) -> &ArtifactCache { &self.cache }

    /// Runs the fast phase, then hands the background phase to `launcher`.
    ///
    /// # Errors
    ///
    /// Returns an error if no wallpaper can be selected, the cache directories
    /// cannot be created, or the background phase cannot be launched.
    pub fn run(
        self: &Arc<Self>,
        request: &RunRequest,
        launcher: &Launcher,
    ) -> Result<BackgroundHandle, WallselectError> {
        let job = self.run_fast_phase(request)?;
        launcher.launch(Arc::clone(self), job)
    }

    /// Creates the cache directories and the default manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directories cannot be created.
    pub fn bootstrap(&self) -> Result<(), WallselectError> {
        self.cache.ensure_dirs()?;

        if let Err(err) = create_manifest_file(&self.settings.manifest_path) {
            tracing::debug!(
                error = %err,
                path = %self.settings.manifest_path.display(),
                "failed to create default manifest"
            );
        }

        Ok(())
    }

    /// Bootstraps, selects, applies, and persists the pointer.
    ///
    /// A failed apply is logged; the pointer is then left untouched but the
    /// returned job still drives the background phase.
    ///
    /// # Errors
    ///
    /// Returns an error if bootstrap or selection fails. Nothing has been
    /// applied in that case.
    pub fn run_fast_phase(&self, request: &RunRequest) -> Result<BackgroundJob, WallselectError> {
        let started = Instant::now();

        self.bootstrap()?;
        let wallpaper = self.selector.select(request.mode, request.path.as_deref())?;
        let generator = self.choose_generator(request.generator.as_deref());

        match self.notifier.set_wallpaper(&wallpaper, self.settings.transition) {
            Ok(()) => {
                if let Err(err) = self.pointer.write(&wallpaper) {
                    tracing::warn!(error = %err, "failed to persist current wallpaper");
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, wallpaper = %wallpaper.display(), "failed to apply wallpaper");
            }
        }

        tracing::info!(
            wallpaper = %wallpaper.display(),
            generator = %generator,
            transition = %self.settings.transition,
            elapsed_ms = started.elapsed().as_millis(),
            "wallpaper applied"
        );

        Ok(BackgroundJob { wallpaper, generator })
    }

    /// Requested name if non-empty, else the preferred usable generator,
    /// else the configured default.
    #[must_use]
    pub fn choose_generator(&self, requested: Option<&str>) -> String {
        if let Some(name) = requested.map(str::trim).filter(|name| !name.is_empty()) {
            return name.to_string();
        }

        self.registry.preferred().map_or_else(
            || self.settings.default_generator.clone(),
            |generator| generator.name.clone(),
        )
    }

    /// Runs colors, blur, and hooks in order. Never fails.
    pub fn run_background(&self, job: &BackgroundJob) -> BackgroundReport {
        let started = Instant::now();

        let report = BackgroundReport {
            colors: self.generate_colors(&job.wallpaper, &job.generator),
            blur: self.generate_blur(&job.wallpaper),
            hooks: self.run_hooks(&job.wallpaper),
        };

        tracing::info!(
            colors = %report.colors,
            blur = %report.blur,
            hooks = %report.hooks,
            elapsed_ms = started.elapsed().as_millis(),
            "background phase finished"
        );

        report
    }

    fn generate_colors(&self, wallpaper: &Path, generator_name: &str) -> StepOutcome {
        let hash = match content_hash(wallpaper) {
            Ok(hash) => hash,
            Err(err) => {
                tracing::warn!(error = %err, wallpaper = %wallpaper.display(), "failed to hash wallpaper");
                return StepOutcome::Failed(err.to_string());
            }
        };

        if self.cache.is_color_cache_valid(generator_name, &hash) {
            tracing::info!(generator = generator_name, "color scheme cache hit");
            return StepOutcome::CacheHit;
        }

        let result = self
            .registry
            .resolve(generator_name)
            .and_then(|generator| self.invoker.invoke(generator, wallpaper));

        match result {
            Ok(()) => {
                if let Err(err) = self.cache.mark_color_cache_fresh(generator_name, &hash) {
                    tracing::warn!(error = %err, "failed to record color scheme generation");
                }
                tracing::info!(generator = generator_name, "color scheme generated");
                StepOutcome::Done
            }
            Err(err) => {
                tracing::warn!(error = %err, "color scheme generation failed");
                StepOutcome::Failed(err.to_string())
            }
        }
    }

    fn generate_blur(&self, wallpaper: &Path) -> StepOutcome {
        let Some(basename) = wallpaper.file_name().and_then(|name| name.to_str()) else {
            return StepOutcome::Skipped("wallpaper has no file name".to_string());
        };
        let target = self.settings.current_blurred_file();

        if let Some(cached) = self.cache.get_cached_blur(basename) {
            return match fs::copy(&cached, &target) {
                Ok(_) => {
                    tracing::debug!(path = %cached.display(), "blurred wallpaper cache hit");
                    StepOutcome::CacheHit
                }
                Err(err) => {
                    tracing::warn!(error = %err, "failed to copy cached blurred wallpaper");
                    StepOutcome::Failed(err.to_string())
                }
            };
        }

        if !self.settings.blur.enabled {
            tracing::warn!("image processing unavailable, skipping blurred wallpaper");
            return StepOutcome::Skipped("image processing unavailable".to_string());
        }

        let blur = &self.settings.blur;
        let written = render_blurred(wallpaper, blur.strength, blur.resolution)
            .map_err(|err| err.to_string())
            .and_then(|bytes| {
                fs::write(&target, &bytes).map_err(|err| err.to_string())?;
                self.cache.store_blur(basename, &bytes).map_err(|err| err.to_string())
            });

        match written {
            Ok(path) => {
                tracing::info!(path = %path.display(), "blurred wallpaper generated");
                StepOutcome::Done
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to generate blurred wallpaper");
                StepOutcome::Failed(err)
            }
        }
    }

    fn run_hooks(&self, wallpaper: &Path) -> StepOutcome {
        let mut skipped = Vec::new();

        if let Err(err) = self.notifier.reload_theme() {
            tracing::debug!(error = %err, "theme reload skipped");
            skipped.push(err.to_string());
        }
        if let Err(err) = self.notifier.announce_change(wallpaper) {
            tracing::debug!(error = %err, "change notification skipped");
            skipped.push(err.to_string());
        }

        if skipped.is_empty() { StepOutcome::Done } else { StepOutcome::Skipped(skipped.join("; ")) }
    }
}
