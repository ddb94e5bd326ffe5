//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for the atlas tool:
//! raw REST calls, Jira and Confluence commands, and credential and
//! configuration management.

mod api;
mod config;
mod confluence;
mod creds;
mod jira;

use anyhow::Result;
use atlas_core::ColorMode;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand};

/// Top-level CLI command for the atlas tool
#[derive(Parser)]
#[command(name = "atlas")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "A command-line client for the Atlassian REST APIs")]
#[command(
  long_about = "Atlas talks to Jira and Confluence over their REST APIs.\n\n\
        It can send raw API requests with Atlassian's header presets, view and\n\
        transition Jira issues, look up Confluence pages, and manage the\n\
        credentials and settings used for every request."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightBlue.on_default().bold().underline())
    .usage(AnsiColor::Blue.on_default().bold())
    .literal(AnsiColor::BrightBlue.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages, including a curl command per request\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    ignore_case = true,
    global = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  /// Base URL of the Atlassian instance (overrides the config file)
  #[arg(long, global = true, env = "ATLASSIAN_URL", value_name = "URL")]
  pub url: Option<String>,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for the atlas tool
#[derive(Subcommand)]
pub enum Commands {
  /// Send a raw REST request
  #[command(long_about = "Send a request to any REST endpoint of the instance.\n\n\
            The path is joined to the base URL unless --absolute is given. JSON\n\
            responses are pretty-printed; anything else is printed as text.")]
  Api(api::ApiArgs),

  /// Configuration management
  #[command(long_about = "Show and change the atlas configuration file.\n\n\
            The file stores the instance URL and the REST client settings\n\
            (timeouts, TLS verification, proxy, retry policy).")]
  #[command(arg_required_else_help = true)]
  Config(config::ConfigArgs),

  /// Confluence pages, spaces and search
  #[command(alias = "wiki")]
  #[command(arg_required_else_help = true)]
  Confluence(confluence::ConfluenceArgs),

  /// Credential management
  #[command(long_about = "Check and set up the credentials atlas sends to the instance.\n\n\
            Credentials are read from $ATLASSIAN_TOKEN (bearer token) or from\n\
            your .netrc file (basic auth).")]
  #[command(arg_required_else_help = true)]
  Creds(creds::CredsArgs),

  /// Jira issues, search, comments and transitions
  #[command(arg_required_else_help = true)]
  Jira(jira::JiraArgs),
}

pub fn handle_cli(cli: Cli) -> Result<()> {
  // Set global color override based on --colors argument
  cli.colors.apply();

  let url = cli.url.as_deref();
  match cli.command {
    Commands::Api(api) => api::handle_api_command(api, url),
    Commands::Config(config) => config::handle_config_command(config, url),
    Commands::Confluence(confluence) => confluence::handle_confluence_command(confluence, url),
    Commands::Creds(creds) => creds::handle_creds_command(creds, url),
    Commands::Jira(jira) => jira::handle_jira_command(jira, url),
  }
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["atlas", "jira", "view", "TEST-1", "-vv", "--url", "https://x.example.com"]).unwrap();
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.url.as_deref(), Some("https://x.example.com"));
    assert!(matches!(cli.command, Commands::Jira(_)));
  }
}
