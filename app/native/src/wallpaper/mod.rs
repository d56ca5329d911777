//! Wallpaper selection, application, and image processing.

pub mod notifier;
pub mod pointer;
pub mod processing;
pub mod selector;
pub mod transition;

pub use notifier::{DesktopNotifier, NotifierError, SystemNotifier};
pub use pointer::CurrentWallpaper;
pub use selector::{SelectionError, SelectionMode, WallpaperSelector};
pub use transition::{TransitionOverrides, TransitionStyle};
