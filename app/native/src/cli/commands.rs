//! CLI definition using Clap.

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgAction, Args, CommandFactory, Parser};

use crate::cache::format_bytes;
use crate::config::{self, ConfigError, Settings};
use crate::error::WallselectError;
use crate::logging;
use crate::pipeline::{BackgroundJob, Launcher, Pipeline, RunRequest};
use crate::wallpaper::transition::{TRANSITION_TYPES, TransitionOverrides};
use crate::wallpaper::{DesktopNotifier, SelectionMode, TransitionStyle};

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wallselect - set a wallpaper, then derive a color scheme and a blurred copy.
///
/// Modes: `init` (or `resume`) restores the last wallpaper, `specific` (or
/// `explicit`) applies PATH, anything else picks a random wallpaper.
#[derive(Parser, Debug)]
#[command(name = "wallselect")]
#[command(author, version = APP_VERSION, about, long_about = None)]
pub struct Cli {
    /// Selection mode: init, random, or specific. `help` prints this message.
    #[arg(value_name = "MODE")]
    pub mode: Option<String>,

    /// Wallpaper to apply in specific mode.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Generator to use instead of the highest-priority one.
    #[arg(value_name = "GENERATOR")]
    pub generator: Option<String>,

    /// Transition style: smooth, dramatic, minimal, dynamic, or random.
    #[arg(long, value_name = "STYLE")]
    pub theme: Option<String>,

    #[command(flatten)]
    pub transition: TransitionArgs,

    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    #[arg(long, short, value_name = "PATH", env = "WALLSELECT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run the background phase in this process and wait for it.
    #[arg(long)]
    pub wait: bool,

    /// Print the usable generators as JSON and exit.
    #[arg(long)]
    pub list_generators: bool,

    /// Print the available transition types and exit.
    #[arg(long)]
    pub list_transitions: bool,

    /// Remove cached color markers and blurred wallpapers and exit.
    #[arg(long)]
    pub clear_cache: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Run only the background phase for this wallpaper.
    #[arg(long, hide = true, value_name = "WALLPAPER")]
    pub background: Option<PathBuf>,

    /// Generator used by the background phase.
    #[arg(long, hide = true, value_name = "NAME", requires = "background")]
    pub generator_name: Option<String>,
}

/// Individual `swww` options; each one wins over the style and the config.
#[derive(Args, Debug, Default)]
#[command(next_help_heading = "Transition options")]
pub struct TransitionArgs {
    /// Transition type (see --list-transitions).
    #[arg(long, value_name = "TYPE")]
    pub transition_type: Option<String>,

    /// Transition step size.
    #[arg(long, value_name = "0-255")]
    pub transition_step: Option<u8>,

    /// Transition duration in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub transition_duration: Option<f64>,

    /// Transition frames per second.
    #[arg(long, value_name = "FPS")]
    pub transition_fps: Option<u32>,

    /// Transition angle in degrees.
    #[arg(long, value_name = "DEGREES", value_parser = clap::value_parser!(u16).range(0..360))]
    pub transition_angle: Option<u16>,

    /// Transition position: a name such as `top-left`, or `X,Y`.
    #[arg(long, value_name = "POSITION")]
    pub transition_position: Option<String>,

    /// Scaling filter (Lanczos3, Mitchell, CatmullRom, Triangle, Gaussian, Nearest).
    #[arg(long, value_name = "FILTER")]
    pub filter: Option<String>,

    /// Resize mode: crop, fit, or no.
    #[arg(long, value_name = "MODE", conflicts_with = "no_resize")]
    pub resize: Option<String>,

    /// Do not resize the image; same as `--resize no`.
    #[arg(long)]
    pub no_resize: bool,

    /// Fill color for the padding around an unresized image.
    #[arg(long, value_name = "COLOR")]
    pub fill_color: Option<String>,
}

impl TransitionArgs {
    fn overrides(&self) -> TransitionOverrides {
        TransitionOverrides {
            transition_type: self.transition_type.clone(),
            step: self.transition_step,
            duration: self.transition_duration,
            fps: self.transition_fps,
            angle: self.transition_angle,
            position: self.transition_position.clone(),
            resize: if self.no_resize { Some("no".to_string()) } else { self.resize.clone() },
            filter: self.filter.clone(),
            fill_color: self.fill_color.clone(),
        }
    }
}

impl Cli {
    /// Execute the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file given with `--config` is
    /// missing, no wallpaper can be selected, or the background phase cannot
    /// be launched.
    pub fn execute(&self) -> Result<(), WallselectError> {
        logging::init_logging(self.verbose, self.quiet);

        if self.mode.as_deref().is_some_and(|mode| mode.eq_ignore_ascii_case("help")) {
            Self::command().print_help()?;
            return Ok(());
        }

        if self.list_transitions {
            print!("{}", transitions_listing());
            return Ok(());
        }

        let pipeline = Arc::new(self.build_pipeline()?);

        if self.clear_cache {
            let freed = pipeline.cache().clear()?;
            println!("Cache cleared ({} freed)", format_bytes(freed));
            return Ok(());
        }

        if self.list_generators {
            let json = serde_json::to_string_pretty(pipeline.registry().list_usable_generators())?;
            println!("{json}");
            return Ok(());
        }

        if let Some(wallpaper) = &self.background {
            let _span = tracing::info_span!("background", pid = std::process::id()).entered();
            let generator =
                self.generator_name.clone().unwrap_or_else(|| pipeline.choose_generator(None));
            pipeline.run_background(&BackgroundJob { wallpaper: wallpaper.clone(), generator });
            return Ok(());
        }

        let request = self.run_request();
        let launcher = if self.wait {
            Launcher::InProcess
        } else {
            Launcher::Detached { extra_args: self.forwarded_args() }
        };

        let handle = pipeline.run(&request, &launcher)?;
        if handle.join().is_none() && self.wait {
            return Err(WallselectError::Launch("background phase did not complete".to_string()));
        }

        Ok(())
    }

    fn run_request(&self) -> RunRequest {
        RunRequest {
            mode: SelectionMode::parse_lossy(self.mode.as_deref().unwrap_or_default()),
            path: self.path.clone(),
            generator: self.generator.clone(),
        }
    }

    fn build_pipeline(&self) -> Result<Pipeline, WallselectError> {
        if let Some(path) = &self.config
            && !path.is_file()
        {
            return Err(ConfigError::Missing(path.clone()).into());
        }

        let provider = config::load_or_default(self.config.as_deref());
        let mut settings = Settings::from_provider(&provider);
        if let Some(theme) = &self.theme {
            settings.transition = TransitionStyle::parse_lossy(theme);
        }
        settings.transition_overrides =
            std::mem::take(&mut settings.transition_overrides).merged_with(self.transition.overrides());

        let notifier = Arc::new(DesktopNotifier::from_settings(&settings));
        Ok(Pipeline::new(settings, notifier))
    }

    /// Logging flags the detached child should inherit.
    fn forwarded_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = (0..self.verbose).map(|_| OsString::from("-v")).collect();
        if self.quiet {
            args.push(OsString::from("-q"));
        }
        args
    }
}

/// Text printed by `--list-transitions`.
fn transitions_listing() -> String {
    let styles: Vec<_> = TransitionStyle::ALL.iter().map(|style| style.as_str()).collect();

    let mut out = format!("Transition styles: {}\n\nAvailable transition types:\n", styles.join(", "));
    for (index, transition) in TRANSITION_TYPES.iter().enumerate() {
        out.push_str(&format!("  {:2}. {transition}\n", index + 1));
    }
    out.push_str(&format!("\nTotal: {} transitions available\n", TRANSITION_TYPES.len()));
    out
}
