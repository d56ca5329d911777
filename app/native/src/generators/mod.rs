//! Color scheme generator plugins.
//!
//! Generators are external executables (`<name>.py` or `<name>.sh`) listed in
//! a manifest with an enable flag and a priority. The [`registry`] decides
//! which of them are usable; the [`invoker`] runs one against a wallpaper.

pub mod invoker;
pub mod registry;

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

pub use invoker::GeneratorInvoker;
pub use registry::{GeneratorDescriptor, GeneratorRegistry};

/// Calling convention of a generator, derived from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    /// `<name>.py`: receives `--image <path>` and optionally `--config <path>`.
    Python,
    /// `<name>.sh`: receives the wallpaper path as its only argument.
    Shell,
}

impl GeneratorKind {
    /// Recognized kinds in resolution order.
    pub const ALL: [Self; 2] = [Self::Python, Self::Shell];

    /// File extension of this kind.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Python => "py",
            Self::Shell => "sh",
        }
    }
}

/// A generator that resolved to an executable file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedGenerator {
    /// Manifest name.
    pub name: String,
    /// Executable to run.
    pub executable: PathBuf,
    /// Calling convention.
    pub kind: GeneratorKind,
}

/// Errors raised while running a generator.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The generator is not in the usable set.
    #[error("Generator not found: {0}")]
    NotFound(String),
    /// The generator process could not be started.
    #[error("Failed to start generator {name}: {source}")]
    Spawn {
        /// Generator name.
        name: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The generator exited unsuccessfully.
    #[error("Generator {name} failed with {status}")]
    Failed {
        /// Generator name.
        name: String,
        /// Exit status description.
        status: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_resolution_order() {
        assert_eq!(GeneratorKind::ALL[0].extension(), "py");
        assert_eq!(GeneratorKind::ALL[1].extension(), "sh");
    }

    #[test]
    fn test_resolved_generator_serializes() {
        let generator = ResolvedGenerator {
            name: "pywal".to_string(),
            executable: PathBuf::from("/gen/pywal.py"),
            kind: GeneratorKind::Python,
        };
        let json = serde_json::to_string(&generator).unwrap();
        assert!(json.contains("\"kind\":\"python\""));
        assert!(json.contains("/gen/pywal.py"));
    }

    #[test]
    fn test_generator_error_display() {
        let err = GeneratorError::NotFound("hellwall".to_string());
        assert_eq!(err.to_string(), "Generator not found: hellwall");

        let err = GeneratorError::Failed {
            name: "pywal".to_string(),
            status: "exit status: 1".to_string(),
        };
        assert!(err.to_string().contains("pywal"));
        assert!(err.to_string().contains("exit status: 1"));
    }
}
