//! CLI module for the config change tracker
//!
//! Provides command-line interface for:
//! - serve: Load configuration, initialise logging and run the HTTP server
//! - check-config: Validate configuration and print the effective settings

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check_config, run, run_command, serve, Config, DEFAULT_CONFIG_PATH};
pub use errors::{CliError, CliErrorCode, CliResult};
