//! Platform helpers shared by the configuration and plugin layers.

pub mod path;
