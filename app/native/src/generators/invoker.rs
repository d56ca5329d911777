//! Running generator plugins.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::{GeneratorError, GeneratorKind, ResolvedGenerator};

/// Runs generators with the argument contract of their kind.
#[derive(Debug, Clone, Default)]
pub struct GeneratorInvoker {
    config_file: Option<PathBuf>,
}

impl GeneratorInvoker {
    /// Creates an invoker that hands `config_file` to Python generators.
    #[must_use]
    pub const fn new(config_file: Option<PathBuf>) -> Self { Self { config_file } }

    /// Runs `generator` against `wallpaper` and waits for it.
    ///
    /// Output is captured and logged at debug level; only the exit status
    /// decides success.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::Spawn` if the process cannot be started and
    /// `GeneratorError::Failed` if it exits unsuccessfully.
    pub fn invoke(&self, generator: &ResolvedGenerator, wallpaper: &Path) -> Result<(), GeneratorError> {
        let args = arguments(generator.kind, wallpaper, self.config_file.as_deref());

        tracing::debug!(
            generator = %generator.name,
            executable = %generator.executable.display(),
            "running generator"
        );

        let output = Command::new(&generator.executable)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| GeneratorError::Spawn { name: generator.name.clone(), source })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            tracing::debug!(generator = %generator.name, stderr = %stderr.trim(), "generator output");
        }

        if output.status.success() {
            Ok(())
        } else {
            Err(GeneratorError::Failed {
                name: generator.name.clone(),
                status: output.status.to_string(),
            })
        }
    }
}

/// Command-line arguments for a generator of `kind`.
///
/// Python generators get `--image <wallpaper>` and, when a configuration file
/// is in use, `--config <path>`. Shell generators get the wallpaper path only.
#[must_use]
pub fn arguments(kind: GeneratorKind, wallpaper: &Path, config: Option<&Path>) -> Vec<OsString> {
    match kind {
        GeneratorKind::Python => {
            let mut args = vec![OsString::from("--image"), wallpaper.as_os_str().to_owned()];
            if let Some(config) = config {
                args.push(OsString::from("--config"));
                args.push(config.as_os_str().to_owned());
            }
            args
        }
        GeneratorKind::Shell => vec![wallpaper.as_os_str().to_owned()],
    }
}
