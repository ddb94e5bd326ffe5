//! # API Command
//!
//! Send arbitrary requests through the REST client, with the same URL
//! joining, header presets, retries and error extraction as every other
//! command.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use atlas_rest::headers::parse_header_line;
use atlas_rest::{FilePart, HeaderName, HeaderPreset, HeaderValue, Method, RequestOptions, RestResponse};
use clap::Args;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use crate::clients::create_rest_runtime_and_client;

/// Command for raw REST requests
#[derive(Args)]
pub struct ApiArgs {
  /// HTTP method (GET, POST, PUT, PATCH, DELETE, ...)
  #[arg(index = 1, value_parser = parse_method)]
  pub method: Method,

  /// Path relative to the instance URL, e.g. rest/api/2/myself
  #[arg(index = 2)]
  pub path: String,

  /// JSON request body
  #[arg(long, short = 'd', value_name = "JSON")]
  pub data: Option<String>,

  /// Query parameter, form-urlencoded (repeatable)
  #[arg(long = "param", short = 'p', value_name = "KEY=VALUE", value_parser = parse_key_value)]
  pub params: Vec<(String, String)>,

  /// Bare query token appended verbatim, e.g. `expand` (repeatable)
  #[arg(long = "flag", value_name = "FLAG")]
  pub flags: Vec<String>,

  /// Extra request header (repeatable)
  #[arg(long = "header", short = 'H', value_name = "NAME: VALUE", value_parser = parse_header_line)]
  pub headers: Vec<(HeaderName, HeaderValue)>,

  /// Header preset: default, experimental, form-token, no-check, safe-mode,
  /// experimental-general
  #[arg(long)]
  pub preset: Option<HeaderPreset>,

  /// Upload a file as multipart form field `file` (repeatable)
  #[arg(long, value_name = "PATH")]
  pub attach: Vec<PathBuf>,

  /// Text field sent with the multipart body, e.g. `comment=...` (repeatable)
  #[arg(long = "form", short = 'F', value_name = "KEY=VALUE", value_parser = parse_key_value)]
  pub form: Vec<(String, String)>,

  /// Treat PATH as a full URL instead of joining it to the instance URL
  #[arg(long)]
  pub absolute: bool,

  /// Append a trailing slash to the path
  #[arg(long)]
  pub trailing: bool,

  /// Print the response even when the status is an error
  #[arg(long)]
  pub raw: bool,
}

fn parse_method(value: &str) -> Result<Method, String> {
  Method::from_bytes(value.to_ascii_uppercase().as_bytes()).map_err(|e| e.to_string())
}

fn parse_key_value(value: &str) -> Result<(String, String), String> {
  value
    .split_once('=')
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .ok_or_else(|| format!("expected KEY=VALUE, got '{value}'"))
}

/// Turn the command line into request options
fn build_options(args: &ApiArgs) -> Result<RequestOptions> {
  let mut opts = RequestOptions::new()
    .trailing(args.trailing)
    .absolute(args.absolute)
    .advanced_mode(args.raw);

  if let Some(data) = &args.data {
    let value = serde_json::from_str(data).context("--data must be valid JSON")?;
    opts = opts.json(value);
  }

  for path in &args.attach {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_else(|| "upload".to_string());
    opts = opts.file(FilePart::new("file", &file_name, content));
  }
  for (key, value) in &args.form {
    opts = opts.form_field(key, value);
  }

  for (key, value) in &args.params {
    opts = opts.param(key, value);
  }
  for flag in &args.flags {
    opts = opts.flag(flag);
  }

  if args.preset.is_some() || !args.headers.is_empty() {
    let mut headers = args.preset.unwrap_or_default().headers();
    for (name, value) in &args.headers {
      headers.insert(name.clone(), value.clone());
    }
    opts = opts.headers(headers);
  }

  Ok(opts)
}

fn print_response(response: &RestResponse) -> Result<()> {
  if response.is_empty() {
    return Ok(());
  }
  match response.json() {
    Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
    Err(_) => println!("{}", response.text()),
  }
  Ok(())
}

/// Handle the api command
pub(crate) fn handle_api_command(args: ApiArgs, url: Option<&str>) -> Result<()> {
  let opts = build_options(&args)?;
  let (rt, client) = create_rest_runtime_and_client(url)?;

  let response = rt.block_on(client.request(args.method.clone(), &args.path, opts))?;

  if args.raw {
    let status = format!("HTTP {}", response.status());
    if response.status().is_success() {
      eprintln!("{}", status.if_supports_color(Stderr, |t| t.green()));
    } else {
      eprintln!("{}", status.if_supports_color(Stderr, |t| t.red()));
    }
  }

  print_response(&response)
}
