//! Command-line interface definitions and handlers.

/// CLI argument parsing with clap.
pub mod args;

/// Subcommand implementations.
pub mod commands;

/// Exit status mapping for failed commands.
pub mod exit;

pub use args::{Args, Command, ModelsCommand};
pub use exit::exit_code;
