//! # Output Formatting
//!
//! Provides formatted output functions with colors, emojis, and consistent
//! styling for user-facing messages and terminal output.

use owo_colors::{OwoColorize, Style};
use owo_colors::Stream::{Stderr, Stdout};

/// Enum representing different color modes for output
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
  /// Enable colored output
  Yes,
  /// Enable colored output (alias for Yes)
  Always,
  /// Automatically detect if colors should be used based on terminal
  /// capabilities
  Auto,
  /// Disable colored output
  No,
  /// Disable colored output (alias for No)
  Never,
}

impl ColorMode {
  /// Apply the mode globally for every subsequent `owo-colors` call
  pub fn apply(self) {
    match self {
      Self::Yes | Self::Always => owo_colors::set_override(true),
      Self::No | Self::Never => owo_colors::set_override(false),
      Self::Auto => owo_colors::unset_override(),
    }
  }
}

/// Helper function to safely get an emoji or fallback to a default character
pub fn get_emoji_or_default(name: &str, default: &str) -> String {
  match emojis::get_by_shortcode(name) {
    Some(emoji) => emoji.to_string(),
    None => default.to_string(),
  }
}

/// Print a success message
pub fn print_success(message: &str) {
  let check = get_emoji_or_default("check_mark", "✓");
  println!("{} {}", check.if_supports_color(Stdout, |t| t.style(Style::new().green().bold())), message);
}

/// Print an error message
pub fn print_error(message: &str) {
  let cross = get_emoji_or_default("cross_mark", "✗");
  eprintln!("{} {}", cross.if_supports_color(Stderr, |t| t.style(Style::new().red().bold())), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
  let warning = get_emoji_or_default("warning", "⚠");
  println!("{} {}", warning.if_supports_color(Stdout, |t| t.style(Style::new().yellow().bold())), message);
}

/// Print an info message
pub fn print_info(message: &str) {
  let info = get_emoji_or_default("information", "ℹ");
  println!("{} {}", info.if_supports_color(Stdout, |t| t.style(Style::new().blue().bold())), message);
}

/// Print a section header
pub fn print_header(header: &str) {
  println!("\n{}", header.if_supports_color(Stdout, |t| t.style(Style::new().blue().bold())));
}

/// Format a filesystem path
pub fn format_path(path: &str) -> String {
  path.if_supports_color(Stdout, |t| t.bright_green()).to_string()
}

/// Format an issue key, page id or space key
pub fn format_key(key: &str) -> String {
  key.if_supports_color(Stdout, |t| t.style(Style::new().bright_cyan().bold())).to_string()
}

/// Format a command or command example
pub fn format_command(cmd: &str) -> String {
  cmd.if_supports_color(Stdout, |t| t.purple()).to_string()
}

/// Color a workflow status by its Jira status category key
pub fn format_status(name: &str, category_key: Option<&str>) -> String {
  match category_key {
    Some("done") => name.if_supports_color(Stdout, |t| t.green()).to_string(),
    Some("indeterminate") => name.if_supports_color(Stdout, |t| t.yellow()).to_string(),
    Some("new") => name.if_supports_color(Stdout, |t| t.blue()).to_string(),
    _ => name.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_get_emoji_or_default() {
    let result = get_emoji_or_default("check_mark", "✓");
    assert!(!result.is_empty());

    let result = get_emoji_or_default("nonexistent_emoji", "fallback");
    assert_eq!(result, "fallback");
  }

  #[test]
  fn test_format_functions_keep_text() {
    ColorMode::Never.apply();

    assert_eq!(format_path("/tmp/.netrc"), "/tmp/.netrc");
    assert_eq!(format_key("PROJ-1"), "PROJ-1");
    assert_eq!(format_command("chmod 600"), "chmod 600");
    assert_eq!(format_status("Done", Some("done")), "Done");
    assert_eq!(format_status("Whatever", None), "Whatever");

    ColorMode::Auto.apply();
  }
}
