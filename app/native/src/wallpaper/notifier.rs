//! Desktop integration: applying wallpapers and announcing changes.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;

use super::transition::{SwwwOptions, TransitionOverrides, TransitionStyle};
use crate::config::Settings;
use crate::utils::command::resolve_binary;

/// Object path of the wallpaper-changed signal.
const BUS_OBJECT_PATH: &str = "/org/wallselect/Wallpaper";

/// Interface and member of the wallpaper-changed signal.
const BUS_SIGNAL: &str = "org.wallselect.Wallpaper.Changed";

/// Errors that can occur when talking to the desktop.
#[derive(Debug, Error)]
pub enum NotifierError {
    /// The required tool is not installed or the hook is disabled.
    #[error("{0} is not available")]
    Unavailable(String),
    /// The tool could not be started.
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    /// The tool exited unsuccessfully.
    #[error("{command} exited with {status}")]
    CommandFailed { command: String, status: String },
    /// The fallback wallpaper backend failed.
    #[error("failed to set wallpaper: {0}")]
    Backend(String),
}

/// Side effects on the running desktop session.
pub trait SystemNotifier: Send + Sync {
    /// Applies `wallpaper` with a transition drawn from `style`.
    ///
    /// # Errors
    ///
    /// Returns an error if no backend could apply the wallpaper.
    fn set_wallpaper(&self, wallpaper: &Path, style: TransitionStyle) -> Result<(), NotifierError>;

    /// Asks the compositor or theme consumers to reload.
    ///
    /// # Errors
    ///
    /// Returns an error if the reload hook is unavailable or fails.
    fn reload_theme(&self) -> Result<(), NotifierError>;

    /// Broadcasts that the wallpaper changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the signal could not be sent.
    fn announce_change(&self, wallpaper: &Path) -> Result<(), NotifierError>;
}

/// Notifier backed by `swww`, a reload command, and `dbus-send`.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    reload_command: String,
    notify_bus: bool,
    overrides: TransitionOverrides,
}

impl DesktopNotifier {
    #[must_use]
    pub fn new(reload_command: String, notify_bus: bool) -> Self {
        Self { reload_command, notify_bus, overrides: TransitionOverrides::default() }
    }

    /// Pins `swww` options over the ones drawn from the style.
    #[must_use]
    pub fn with_overrides(mut self, overrides: TransitionOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.reload_command.clone(), settings.notify_bus)
            .with_overrides(settings.transition_overrides.clone())
    }
}

impl SystemNotifier for DesktopNotifier {
    fn set_wallpaper(&self, wallpaper: &Path, style: TransitionStyle) -> Result<(), NotifierError> {
        match resolve_binary("swww") {
            Ok(swww) => {
                let options = self.overrides.apply(SwwwOptions::for_style(style, &mut rand::rng()));
                tracing::debug!(
                    transition = %options.transition_type,
                    step = options.step,
                    duration = options.duration,
                    "applying wallpaper with swww"
                );
                run_command(&swww, options.to_args(wallpaper))
            }
            Err(err) => {
                tracing::debug!(error = %err, "swww unavailable, using fallback backend");
                let path_str = wallpaper.display().to_string();
                wallpaper::set_from_path(&path_str).map_err(|e| NotifierError::Backend(e.to_string()))
            }
        }
    }

    fn reload_theme(&self) -> Result<(), NotifierError> {
        let mut parts = self.reload_command.split_whitespace();
        let Some(program) = parts.next() else {
            return Err(NotifierError::Unavailable("reload command".to_string()));
        };

        let binary = resolve_binary(program).map_err(|_| NotifierError::Unavailable(program.to_string()))?;
        run_command(&binary, parts)
    }

    fn announce_change(&self, wallpaper: &Path) -> Result<(), NotifierError> {
        if !self.notify_bus {
            return Err(NotifierError::Unavailable("desktop bus notification".to_string()));
        }

        let dbus_send =
            resolve_binary("dbus-send").map_err(|_| NotifierError::Unavailable("dbus-send".to_string()))?;
        let payload = format!("string:{}", wallpaper.display());
        run_command(
            &dbus_send,
            ["--session", "--type=signal", BUS_OBJECT_PATH, BUS_SIGNAL, payload.as_str()],
        )
    }
}

/// Runs `program` with `args` and waits for it to exit successfully.
fn run_command<I, S>(program: &Path, args: I) -> Result<(), NotifierError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let command = program.display().to_string();
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .status()
        .map_err(|source| NotifierError::Spawn { command: command.clone(), source })?;

    if status.success() {
        Ok(())
    } else {
        Err(NotifierError::CommandFailed { command, status: status.to_string() })
    }
}
