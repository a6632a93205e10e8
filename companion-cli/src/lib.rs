//! # companion-cli
//!
//! Argument parsing, store wiring, and the command implementations behind the `companion` binary.

pub mod app;
pub mod cli;
pub mod commands;

pub use app::App;
pub use cli::{Cli, Commands};
