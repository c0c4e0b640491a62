//! CLI argument definitions using clap
//!
//! Commands:
//! - config-change-tracker serve [--config <path>] [--port <port>]
//! - config-change-tracker check-config [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Config Change Tracker - records configuration-change events over HTTP
#[derive(Parser, Debug)]
#[command(name = "config-change-tracker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file (defaults apply when omitted and
        /// ./config-change-tracker.json does not exist)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on, overriding the configuration file
        #[arg(long)]
        port: Option<u16>,
    },

    /// Load and validate configuration, then print the effective settings
    CheckConfig {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
