//! # Credentials Command
//!
//! Derive-based implementation of the credentials command: checking what
//! atlas will authenticate with, and an interactive `.netrc` setup wizard.

use std::path::Path;

use anyhow::{Context, Result};
use atlas_confluence::create_confluence_client;
use atlas_core::creds::netrc::{get_netrc_path, has_insecure_permissions, normalize_host, write_netrc_entry};
use atlas_core::creds::{FALLBACK_MACHINE, find_credentials};
use atlas_core::output::{format_command, format_path, print_error, print_info, print_success, print_warning};
use atlas_core::url::{ENV_ATLASSIAN_TOKEN, ensure_url_scheme, resolve_token};
use atlas_jira::create_jira_client;
use clap::{Args, Subcommand};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password, Select};
use directories::BaseDirs;
use tokio::runtime::Runtime;

use crate::clients::resolve_url;
use crate::config::AtlasConfig;

/// Command for credential management
#[derive(Args)]
pub struct CredsArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: CredsSubcommands,
}

/// Subcommands for the creds command
#[derive(Subcommand)]
pub enum CredsSubcommands {
  /// Check if credentials are properly configured
  #[command(long_about = "Checks which credentials atlas will use for the configured instance.\n\n\
                      Reports whether $ATLASSIAN_TOKEN is set, whether your .netrc file\n\
                      exists with safe permissions, and whether it has an entry for the\n\
                      instance host or the atlassian.net fallback.")]
  Check,

  /// Set up credentials interactively
  #[command(long_about = "Interactive wizard to store Atlassian credentials in .netrc.\n\n\
                      The credentials are validated against the instance before they are\n\
                      written, and the instance URL can be saved to the config file.")]
  Setup,
}

/// Product used to validate credentials during setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Product {
  Jira,
  Confluence,
}

impl Product {
  const ALL: [Product; 2] = [Product::Jira, Product::Confluence];

  fn label(self) -> &'static str {
    match self {
      Self::Jira => "Jira",
      Self::Confluence => "Confluence",
    }
  }
}

/// Handle the creds command
pub(crate) fn handle_creds_command(creds: CredsArgs, url: Option<&str>) -> Result<()> {
  let base_dirs = BaseDirs::new().context("Failed to get $HOME directory")?;
  let home = base_dirs.home_dir();

  match creds.subcommand {
    CredsSubcommands::Check => handle_check_command(home, url),
    CredsSubcommands::Setup => handle_setup_command(home, url),
  }
}

/// The configured instance URL, if any
fn configured_url(url: Option<&str>) -> Option<String> {
  let config = AtlasConfig::load().ok()?;
  resolve_url(url, &config).ok()
}

fn handle_check_command(home: &Path, url: Option<&str>) -> Result<()> {
  if resolve_token().is_some() {
    print_success(&format!(
      "${ENV_ATLASSIAN_TOKEN} is set; requests use bearer token auth."
    ));
  } else {
    print_info(&format!(
      "${ENV_ATLASSIAN_TOKEN} is not set; requests use .netrc basic auth."
    ));
  }

  let netrc_path = get_netrc_path(home);
  if !netrc_path.exists() {
    print_error("No .netrc file found.");
    println!(
      "Create a .netrc file at {} or run {}.",
      format_path(&netrc_path.display().to_string()),
      format_command("atlas creds setup")
    );
    print_netrc_example();
    return Ok(());
  }

  if has_insecure_permissions(&netrc_path)? {
    print_warning("Your .netrc file has insecure permissions.");
    println!(
      "For security, change permissions to 600: {}",
      format_command(&format!("chmod 600 {}", netrc_path.display()))
    );
  } else {
    print_success(".netrc file has secure permissions.");
  }

  let host = match configured_url(url) {
    Some(url) => normalize_host(&url),
    None => {
      print_warning("No instance URL configured; checking the fallback machine only.");
      FALLBACK_MACHINE.to_string()
    }
  };

  match find_credentials(home, &host) {
    Ok(Some(creds)) => print_success(&format!("Credentials found for {host} (login {}).", creds.username)),
    Ok(None) => {
      print_warning(&format!("No credentials found for {host}."));
      println!("Add credentials for machine '{host}' or '{FALLBACK_MACHINE}' to your .netrc file.");
      print_netrc_example();
    }
    Err(e) => print_error(&format!("Error reading .netrc: {e}")),
  }

  Ok(())
}

fn print_netrc_example() {
  print_info("Example .netrc format:");
  println!("```");
  println!("machine {FALLBACK_MACHINE}");
  println!("  login your-email@example.com");
  println!("  password your-api-token");
  println!("```");
}

/// Try the credentials against the instance
fn validate_credentials(product: Product, url: &str, email: &str, token: &str) -> Result<bool> {
  let rt = Runtime::new()?;
  match product {
    Product::Jira => {
      let client = create_jira_client(url, email, token)?;
      rt.block_on(client.test_connection())
    }
    Product::Confluence => {
      let client = create_confluence_client(url, email, token)?;
      rt.block_on(client.test_connection())
    }
  }
}

fn handle_setup_command(home: &Path, url: Option<&str>) -> Result<()> {
  print_info("Welcome to the atlas credential setup wizard!");
  println!("• Credentials will be stored in ~/.netrc");
  println!("• File permissions will be set to 600");
  println!("• To create an API token, visit: https://id.atlassian.com/manage-profile/security/api-tokens");
  println!();

  let theme = ColorfulTheme::default();

  let mut url_prompt = Input::<String>::with_theme(&theme).with_prompt("Instance URL");
  if let Some(default) = configured_url(url) {
    url_prompt = url_prompt.default(default);
  }
  let instance_url = ensure_url_scheme(&url_prompt.interact_text()?)?;

  let email: String = Input::with_theme(&theme)
    .with_prompt("Email or username")
    .interact_text()?;
  let token = Password::with_theme(&theme)
    .with_prompt("API token or password")
    .interact()?;

  let labels: Vec<&str> = Product::ALL.iter().map(|p| p.label()).collect();
  let selection = Select::with_theme(&theme)
    .with_prompt("Validate against")
    .items(&labels)
    .default(0)
    .interact()?;
  let product = Product::ALL[selection];

  print_info(&format!("Validating {} credentials...", product.label()));
  let valid = match validate_credentials(product, &instance_url, &email, &token) {
    Ok(valid) => valid,
    Err(e) => {
      print_warning(&format!("Could not reach {instance_url}: {e}"));
      false
    }
  };

  if valid {
    print_success("Credentials are valid.");
  } else {
    print_warning("The instance rejected these credentials.");
    let save_anyway = Confirm::with_theme(&theme)
      .with_prompt("Save them anyway?")
      .default(false)
      .interact()?;
    if !save_anyway {
      print_info("Setup cancelled.");
      return Ok(());
    }
  }

  let netrc_path = get_netrc_path(home);
  let machine = normalize_host(&instance_url);
  write_netrc_entry(&netrc_path, &machine, &email, &token)?;
  print_success(&format!(
    "Saved credentials for {machine} to {}",
    format_path(&netrc_path.display().to_string())
  ));

  let save_url = Confirm::with_theme(&theme)
    .with_prompt(format!("Use {instance_url} as the default instance?"))
    .default(true)
    .interact()?;
  if save_url {
    let mut config = AtlasConfig::load()?;
    config.set_url(&instance_url)?;
    config.save()?;
    print_success("Saved the instance URL to the config file.");
  }

  Ok(())
}
