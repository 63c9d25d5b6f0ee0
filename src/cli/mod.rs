//! Command-line interface components
//!
//! This module contains CLI-specific code: argument parsing and the run
//! handler that prints progress and statistics.

pub mod args;
pub mod commands;

pub use args::Cli;
pub use commands::{handle_run, render_statistics, run_with_config};
