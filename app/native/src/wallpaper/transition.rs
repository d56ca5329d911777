//! Transition styles and `swww` option generation.
//!
//! A style picks the shape of the transition; the concrete values (type,
//! step, duration, position) are randomized within the style's ranges on
//! every change.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;

use rand::Rng;
use rand::seq::IndexedRandom;

/// Every transition type `--list-transitions` reports.
pub const TRANSITION_TYPES: &[&str] = &[
    "fade",
    "left",
    "right",
    "top",
    "bottom",
    "wipe",
    "wave",
    "grow",
    "center",
    "outer",
    "top-left",
    "top-right",
    "bottom-left",
    "bottom-right",
    "center-out",
    "outer-in",
    "spiral",
    "diamond",
    "hexagon",
];

const NAMED_POSITIONS: &[&str] = &[
    "center",
    "top",
    "left",
    "right",
    "bottom",
    "top-left",
    "top-right",
    "bottom-left",
    "bottom-right",
    "top-center",
    "bottom-center",
    "left-center",
    "right-center",
    "quarter-top-left",
    "quarter-top-right",
    "quarter-bottom-left",
    "quarter-bottom-right",
];

const THEMED_POSITIONS: &[&str] = &["center", "top-left", "top-right", "bottom-left", "bottom-right"];

// Repeated entries weight the random choice.
const RESIZE_MODES: &[&str] = &["crop", "crop", "crop", "fit", "no"];
const FILTERS: &[Option<&str>] = &[
    None,
    None,
    None,
    Some("Lanczos3"),
    Some("Mitchell"),
    Some("CatmullRom"),
    Some("Triangle"),
    Some("Gaussian"),
];
const FILL_COLORS: &[Option<&str>] = &[
    None,
    None,
    Some("#000000"),
    Some("#FFFFFF"),
    Some("#1a1a1a"),
    Some("#2d2d2d"),
    Some("#0f0f0f"),
    Some("#333333"),
    Some("#404040"),
];
const RANDOM_STEPS: &[u8] = &[200, 220, 240, 255, 120, 140, 160, 180, 60, 80, 100];
const RANDOM_DURATIONS: &[f64] = &[0.5, 0.8, 1.0, 1.2, 1.5, 2.0, 2.5, 3.0, 4.0, 5.0];
const CARDINAL_ANGLES: &[u16] = &[0, 45, 90, 135, 180, 225, 270, 315];

/// Named transition style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionStyle {
    /// Soft fades and grows.
    Smooth,
    /// Fast angled wipes.
    Dramatic,
    /// A plain one-second fade.
    Minimal,
    /// Directional slides.
    Dynamic,
    /// Everything randomized.
    #[default]
    Random,
}

impl TransitionStyle {
    /// All styles in display order.
    pub const ALL: [Self; 5] =
        [Self::Smooth, Self::Dramatic, Self::Minimal, Self::Dynamic, Self::Random];

    /// Parses a style name, coercing anything unrecognized to `Random`.
    #[must_use]
    pub fn parse_lossy(value: &str) -> Self {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(value))
            .unwrap_or_else(|| {
                if !value.is_empty() {
                    tracing::debug!(style = value, "unknown transition style, using random");
                }
                Self::Random
            })
    }

    /// Lower-case style name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Dramatic => "dramatic",
            Self::Minimal => "minimal",
            Self::Dynamic => "dynamic",
            Self::Random => "random",
        }
    }
}

impl fmt::Display for TransitionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Concrete options for one `swww img` call.
#[derive(Debug, Clone, PartialEq)]
pub struct SwwwOptions {
    pub transition_type: String,
    pub step: u8,
    pub duration: f64,
    pub fps: u32,
    pub angle: Option<u16>,
    pub position: Option<String>,
    pub resize: Option<String>,
    pub filter: Option<String>,
    pub fill_color: Option<String>,
}

/// User-pinned `swww` options; each set field replaces the drawn value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionOverrides {
    pub transition_type: Option<String>,
    pub step: Option<u8>,
    pub duration: Option<f64>,
    pub fps: Option<u32>,
    pub angle: Option<u16>,
    pub position: Option<String>,
    pub resize: Option<String>,
    pub filter: Option<String>,
    pub fill_color: Option<String>,
}

impl TransitionOverrides {
    /// Fields set in `other` win over fields set in `self`.
    #[must_use]
    pub fn merged_with(self, other: Self) -> Self {
        Self {
            transition_type: other.transition_type.or(self.transition_type),
            step: other.step.or(self.step),
            duration: other.duration.or(self.duration),
            fps: other.fps.or(self.fps),
            angle: other.angle.or(self.angle),
            position: other.position.or(self.position),
            resize: other.resize.or(self.resize),
            filter: other.filter.or(self.filter),
            fill_color: other.fill_color.or(self.fill_color),
        }
    }

    /// Replaces every field of `options` this set pins.
    #[must_use]
    pub fn apply(&self, mut options: SwwwOptions) -> SwwwOptions {
        if let Some(transition_type) = &self.transition_type {
            options.transition_type.clone_from(transition_type);
        }
        if let Some(step) = self.step {
            options.step = step;
        }
        if let Some(duration) = self.duration {
            options.duration = duration;
        }
        if let Some(fps) = self.fps {
            options.fps = fps;
        }
        if self.angle.is_some() {
            options.angle = self.angle;
        }
        if self.position.is_some() {
            options.position.clone_from(&self.position);
        }
        if self.resize.is_some() {
            options.resize.clone_from(&self.resize);
        }
        if self.filter.is_some() {
            options.filter.clone_from(&self.filter);
        }
        if self.fill_color.is_some() {
            options.fill_color.clone_from(&self.fill_color);
        }
        options
    }
}

impl SwwwOptions {
    /// Draws options for `style` from `rng`.
    pub fn for_style<R: Rng + ?Sized>(style: TransitionStyle, rng: &mut R) -> Self {
        let mut options = match style {
            TransitionStyle::Random => return Self::random(rng),
            TransitionStyle::Smooth => Self {
                transition_type: pick(rng, &["fade", "grow", "center"], "fade").to_string(),
                step: rng.random_range(180..=255),
                duration: round2(rng.random_range(1.5..=3.0)),
                fps: 60,
                ..Self::minimal()
            },
            TransitionStyle::Dramatic => Self {
                transition_type: pick(rng, &["wipe", "wave", "spiral"], "wipe").to_string(),
                step: rng.random_range(200..=255),
                duration: round2(rng.random_range(0.5..=1.5)),
                fps: 60,
                angle: Some(rng.random_range(0..360)),
                ..Self::minimal()
            },
            TransitionStyle::Minimal => Self::minimal(),
            TransitionStyle::Dynamic => Self {
                transition_type: pick(rng, &["left", "right", "top", "bottom"], "left").to_string(),
                step: rng.random_range(150..=220),
                duration: round2(rng.random_range(0.8..=2.0)),
                fps: 60,
                ..Self::minimal()
            },
        };

        options.resize = Some("crop".to_string());
        options.position = Some(pick(rng, THEMED_POSITIONS, "center").to_string());
        options
    }

    fn minimal() -> Self {
        Self {
            transition_type: "fade".to_string(),
            step: 255,
            duration: 1.0,
            fps: 30,
            angle: None,
            position: None,
            resize: None,
            filter: None,
            fill_color: None,
        }
    }

    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let transition_type = pick(rng, TRANSITION_TYPES, "fade").to_string();
        let angle = if matches!(transition_type.as_str(), "grow" | "center" | "outer") {
            CARDINAL_ANGLES.choose(rng).copied().unwrap_or(0)
        } else {
            rng.random_range(0..360)
        };

        Self {
            transition_type,
            step: RANDOM_STEPS.choose(rng).copied().unwrap_or(255),
            duration: RANDOM_DURATIONS.choose(rng).copied().unwrap_or(1.0),
            fps: 60,
            angle: Some(angle),
            position: Some(random_position(rng)),
            resize: Some(pick(rng, RESIZE_MODES, "crop").to_string()),
            filter: FILTERS.choose(rng).copied().flatten().map(str::to_string),
            fill_color: FILL_COLORS.choose(rng).copied().flatten().map(str::to_string),
        }
    }

    /// Arguments for `swww`, starting with the `img` subcommand.
    #[must_use]
    pub fn to_args(&self, image: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["img".into(), image.as_os_str().to_owned()];
        let mut push = |flag: &str, value: String| {
            args.push(flag.into());
            args.push(value.into());
        };

        if let Some(resize) = &self.resize {
            push("--resize", resize.clone());
        }
        if let Some(color) = &self.fill_color {
            push("--fill-color", color.clone());
        }
        if let Some(filter) = &self.filter {
            push("-f", filter.clone());
        }
        push("--transition-type", self.transition_type.clone());
        push("--transition-step", self.step.to_string());
        push("--transition-duration", format!("{:.2}", self.duration));
        push("--transition-fps", self.fps.to_string());
        if let Some(angle) = self.angle {
            push("--transition-angle", angle.to_string());
        }
        if let Some(position) = &self.position {
            push("--transition-pos", position.clone());
        }

        args
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, choices: &[&'static str], fallback: &'static str) -> &'static str {
    choices.choose(rng).copied().unwrap_or(fallback)
}

/// A named position, or explicit coordinates in one of three regions.
fn random_position<R: Rng + ?Sized>(rng: &mut R) -> String {
    let slots = NAMED_POSITIONS.len() + 3;
    match rng.random_range(0..slots) {
        n if n < NAMED_POSITIONS.len() => NAMED_POSITIONS[n].to_string(),
        n if n == NAMED_POSITIONS.len() => {
            format!("{},{}", rng.random_range(10..=90), rng.random_range(10..=90))
        }
        n if n == NAMED_POSITIONS.len() + 1 => {
            format!("{},{}", rng.random_range(0..=50), rng.random_range(0..=50))
        }
        _ => format!("{},{}", rng.random_range(50..=100), rng.random_range(50..=100)),
    }
}

fn round2(value: f64) -> f64 { (value * 100.0).round() / 100.0 }
