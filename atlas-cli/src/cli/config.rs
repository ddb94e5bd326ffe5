//! # Config Command
//!
//! Show the configuration file, change the default instance URL, and print
//! where the file lives.

use anyhow::{Context, Result};
use atlas_core::get_config_dirs;
use atlas_core::output::{format_path, print_header, print_info, print_success};
use clap::{Args, Subcommand};

use crate::config::AtlasConfig;

/// Command for configuration management
#[derive(Args)]
pub struct ConfigArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: ConfigSubcommands,
}

/// Subcommands for the config command
#[derive(Subcommand)]
pub enum ConfigSubcommands {
  /// Show the effective configuration
  Show,

  /// Set the default instance URL
  #[command(long_about = "Store the default Atlassian instance URL in the config file.\n\n\
                   A missing scheme defaults to https://, e.g. company.atlassian.net.")]
  SetUrl {
    /// The instance URL
    #[arg(required = true, index = 1)]
    url: String,
  },

  /// Print the path of the config file
  Path,
}

/// Handle the config command
pub(crate) fn handle_config_command(config: ConfigArgs, url: Option<&str>) -> Result<()> {
  match config.subcommand {
    ConfigSubcommands::Show => handle_show_command(url),
    ConfigSubcommands::SetUrl { url } => handle_set_url_command(&url),
    ConfigSubcommands::Path => {
      println!("{}", get_config_dirs()?.config_path().display());
      Ok(())
    }
  }
}

fn handle_show_command(url: Option<&str>) -> Result<()> {
  let dirs = get_config_dirs()?;
  let config = AtlasConfig::load_from(&dirs)?;

  print_header("Configuration");
  let path = dirs.config_path();
  if path.exists() {
    println!("  File: {}", format_path(&path.display().to_string()));
  } else {
    println!("  File: {} (not created yet)", format_path(&path.display().to_string()));
  }
  if let Some(url) = url {
    print_info(&format!("--url / $ATLASSIAN_URL overrides the configured URL with {url}"));
  }

  println!();
  print!("{}", toml::to_string_pretty(&config).context("Failed to serialize configuration")?);
  Ok(())
}

fn handle_set_url_command(url: &str) -> Result<()> {
  let mut config = AtlasConfig::load()?;
  let url = config.set_url(url)?;
  config.save()?;
  print_success(&format!("Default instance set to {url}"));
  Ok(())
}
