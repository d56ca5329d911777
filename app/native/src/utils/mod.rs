//! Small process and filesystem helpers.

pub mod command;
