//! Wallselect - a wallpaper switcher with pluggable color scheme generators.
//!
//! Applying a wallpaper is the fast path: it returns as soon as the desktop
//! shows the new image. Deriving a color palette (through external generator
//! plugins) and a blurred variant happens afterwards in a background phase
//! whose failures are logged, never fatal.

pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod generators;
pub mod logging;
pub mod pipeline;
pub mod platform;
pub mod utils;
pub mod wallpaper;
