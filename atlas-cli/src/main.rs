//! # Atlas CLI Entry Point
//!
//! The main entry point for the atlas command-line tool, a client for the
//! Jira and Confluence REST APIs.

use anyhow::Result;
use clap::Parser;
use cli::handle_cli;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

mod cli;
mod clients;
mod config;

fn main() -> Result<()> {
  let cmd = cli::Cli::parse();

  // Set up tracing based on verbosity level
  let level = match cmd.verbose {
    0 => tracing::Level::WARN,  // Default: warnings and errors
    1 => tracing::Level::INFO,  // -v: info, warnings, and errors
    2 => tracing::Level::DEBUG, // -vv: debug, plus curl equivalents of every request
    _ => tracing::Level::TRACE, // -vvv or more: trace and everything else
  };

  // Logs go to stderr so command output stays pipeable
  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(EnvFilter::from_default_env().add_directive(level.into()))
    .init();

  debug!("Tracing initialized with level: {}", level);

  handle_cli(cmd)
}
