//! # Atlas Core Library
//!
//! Shared building blocks for the atlas crates: configuration directories and
//! TOML persistence, `.netrc` credential lookup, Atlassian instance URL
//! resolution, and consistent terminal output.

pub mod config;
pub mod creds;
pub mod output;
pub mod url;

// Re-export main types
pub use config::{ConfigDirs, get_config_dirs};
pub use creds::Credentials;
pub use output::{ColorMode, print_error, print_info, print_success, print_warning};
