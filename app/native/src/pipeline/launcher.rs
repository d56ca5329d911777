//! Launching the background phase.
//!
//! Threads die with the process, so the default launcher re-executes the
//! binary as a detached child that runs only the background phase. The
//! in-process launcher runs it on a worker thread the caller joins.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread::JoinHandle;

use super::{BackgroundJob, BackgroundReport, Pipeline};
use crate::error::WallselectError;

/// Flag selecting the background phase in the re-executed child.
pub const BACKGROUND_FLAG: &str = "--background";

/// Flag carrying the generator name to the child.
pub const GENERATOR_NAME_FLAG: &str = "--generator-name";

/// How the background phase is started.
#[derive(Debug, Clone)]
pub enum Launcher {
    /// Re-execute the current binary; `extra_args` are appended verbatim.
    Detached { extra_args: Vec<OsString> },
    /// Run on a worker thread of this process.
    InProcess,
}

/// A launched background phase.
#[derive(Debug)]
pub enum BackgroundHandle {
    /// A child process nobody waits for.
    Detached { pid: u32 },
    /// A worker thread that must be joined before exit.
    Thread(JoinHandle<BackgroundReport>),
}

impl BackgroundHandle {
    /// Waits for an in-process run. Detached runs return `None` immediately.
    #[must_use]
    pub fn join(self) -> Option<BackgroundReport> {
        match self {
            Self::Detached { .. } => None,
            Self::Thread(handle) => match handle.join() {
                Ok(report) => Some(report),
                Err(_) => {
                    tracing::error!("background phase panicked");
                    None
                }
            },
        }
    }
}

impl Launcher {
    /// Starts the background phase for `job`.
    ///
    /// # Errors
    ///
    /// Returns `WallselectError::Launch` if the child process or the worker
    /// thread cannot be started.
    pub fn launch(&self, pipeline: Arc<Pipeline>, job: BackgroundJob) -> Result<BackgroundHandle, WallselectError> {
        match self {
            Self::Detached { extra_args } => {
                let config = pipeline.settings().config_file.clone();
                spawn_detached(&job, config.as_deref(), extra_args)
            }
            Self::InProcess => std::thread::Builder::new()
                .name("background".to_string())
                .spawn(move || pipeline.run_background(&job))
                .map(BackgroundHandle::Thread)
                .map_err(|err| WallselectError::Launch(err.to_string())),
        }
    }
}

/// Arguments that make the child run only the background phase.
#[must_use]
pub fn background_args(job: &BackgroundJob, config: Option<&Path>, extra_args: &[OsString]) -> Vec<OsString> {
    let mut args = vec![
        OsString::from(BACKGROUND_FLAG),
        job.wallpaper.as_os_str().to_owned(),
        OsString::from(GENERATOR_NAME_FLAG),
        OsString::from(&job.generator),
    ];
    if let Some(config) = config {
        args.push(OsString::from("--config"));
        args.push(config.as_os_str().to_owned());
    }
    args.extend(extra_args.iter().cloned());
    args
}

// The parent exits right after launching; the child is reparented.
#[allow(clippy::zombie_processes)]
fn spawn_detached(
    job: &BackgroundJob,
    config: Option<&Path>,
    extra_args: &[OsString],
) -> Result<BackgroundHandle, WallselectError> {
    let exe = std::env::current_exe().map_err(|err| WallselectError::Launch(err.to_string()))?;

    let mut command = Command::new(exe);
    command
        .args(background_args(job, config, extra_args))
        .stdin(Stdio::null())
        .stdout(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    let child = command.spawn().map_err(|err| WallselectError::Launch(err.to_string()))?;
    let pid = child.id();
    tracing::debug!(pid, "background phase detached");

    Ok(BackgroundHandle::Detached { pid })
}
