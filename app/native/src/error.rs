//! Error types for Wallselect.
//!
//! Each component owns a narrow error enum; this module provides the
//! top-level error that reaches `main`, which exits with status 1.
//! Only selection failures and bootstrap I/O are ever surfaced here: every
//! background-phase failure is logged and swallowed by the pipeline.

use thiserror::Error;

use crate::config::ConfigError;
use crate::wallpaper::SelectionError;

/// Errors that terminate a Wallselect invocation.
#[derive(Debug, Error)]
pub enum WallselectError {
    /// No wallpaper could be selected.
    #[error(transparent)]
    Selection(#[from] SelectionError),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The background phase could not be launched.
    #[error("Failed to launch background phase: {0}")]
    Launch(String),
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
