#![allow(clippy::multiple_crate_versions)]

//! Wallselect binary.
//!
//! Exits 0 once the wallpaper is applied and the background phase launched,
//! 1 when no wallpaper could be selected. Clap exits 2 on invalid arguments.

fn main() {
    if let Err(err) = wallselect_lib::cli::run() {
        eprintln!("wallselect: {err}");
        std::process::exit(1);
    }
}
