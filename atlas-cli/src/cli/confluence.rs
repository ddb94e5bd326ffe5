//! # Confluence Command
//!
//! Page lookup by ID or title, space details and CQL search.

use anyhow::Result;
use atlas_confluence::{ConfluenceClient, ConfluencePage};
use atlas_core::output::{format_key, print_header, print_info, print_warning};
use clap::{Args, Subcommand};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::clients;

/// Command for Confluence integration
#[derive(Args)]
pub struct ConfluenceArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: ConfluenceSubcommands,
}

/// Subcommands for the Confluence command
#[derive(Subcommand)]
pub enum ConfluenceSubcommands {
  /// Show a page by ID
  Page {
    /// The page ID
    #[arg(required = true, index = 1)]
    page_id: String,

    /// Print the storage-format body
    #[arg(long)]
    body: bool,
  },

  /// Find a page by space and title
  Find {
    /// The space key (e.g., DOCS)
    #[arg(required = true, index = 1)]
    space: String,

    /// The exact page title
    #[arg(required = true, index = 2)]
    title: String,
  },

  /// Show a space
  Space {
    /// The space key (e.g., DOCS)
    #[arg(required = true, index = 1)]
    key: String,
  },

  /// Search content with CQL
  #[command(long_about = "Run a CQL query and list the matching content.\n\n\
                   Example: atlas confluence search 'space = DOCS AND type = page'")]
  Search {
    /// The CQL query
    #[arg(required = true, index = 1)]
    cql: String,

    /// Index of the first result
    #[arg(long, default_value_t = 0)]
    start: u32,

    /// Maximum number of results
    #[arg(long, short = 'n')]
    limit: Option<u32>,
  },
}

#[derive(Tabled)]
struct ContentRow {
  #[tabled(rename = "ID")]
  id: String,
  #[tabled(rename = "Type")]
  content_type: String,
  #[tabled(rename = "Title")]
  title: String,
}

impl From<&ConfluencePage> for ContentRow {
  fn from(page: &ConfluencePage) -> Self {
    Self {
      id: page.id.clone(),
      content_type: page.content_type.clone(),
      title: page.title.clone(),
    }
  }
}

/// Handle the Confluence command
pub(crate) fn handle_confluence_command(confluence: ConfluenceArgs, url: Option<&str>) -> Result<()> {
  let (rt, client) = clients::create_confluence_runtime_and_client(url)?;

  match confluence.subcommand {
    ConfluenceSubcommands::Page { page_id, body } => {
      let expand = if body { "space,version,body.storage" } else { "space,version" };
      let page = rt.block_on(client.get_page_by_id(&page_id, Some(expand)))?;
      print_page(&client, &page, body);
    }
    ConfluenceSubcommands::Find { space, title } => match rt.block_on(client.get_page_by_title(&space, &title))? {
      Some(page) => print_page(&client, &page, false),
      None => print_warning(&format!("No page titled '{title}' in space {space}")),
    },
    ConfluenceSubcommands::Space { key } => {
      let space = rt.block_on(client.get_space(&key))?;
      print_header(&format!("Space {}", format_key(&space.key)));
      if let Some(name) = &space.name {
        println!("  Name: {name}");
      }
      if let Some(space_type) = &space.space_type {
        println!("  Type: {space_type}");
      }
      if let Some(id) = space.id {
        println!("  ID:   {id}");
      }
    }
    ConfluenceSubcommands::Search { cql, start, limit } => {
      let results = rt.block_on(client.cql(&cql, start, limit))?;
      if results.results.is_empty() {
        print_info("No content found");
        return Ok(());
      }
      let rows: Vec<ContentRow> = results.results.iter().map(ContentRow::from).collect();
      println!("{}", Table::new(rows).with(Style::sharp()));
      match results.total_size {
        Some(total) => println!("Showing {} of {total} results", results.size),
        None => println!("Showing {} results", results.size),
      }
    }
  }
  Ok(())
}

/// Absolute link to the page in the web UI, when the server sent one
fn page_link(client: &ConfluenceClient, page: &ConfluencePage) -> Option<String> {
  let webui = page.links.as_ref()?.webui.as_deref()?;
  let prefix = if client.rest().is_cloud() { "/wiki" } else { "" };
  Some(format!("{}{prefix}{webui}", client.base_url()))
}

fn print_page(client: &ConfluenceClient, page: &ConfluencePage, with_body: bool) {
  print_header(&page.title);
  println!("  ID:      {}", page.id);
  if let Some(space) = &page.space {
    println!("  Space:   {}", format_key(&space.key));
  }
  if let Some(version) = &page.version {
    println!("  Version: {}", version.number);
  }
  if let Some(link) = page_link(client, page) {
    println!("  Link:    {link}");
  }

  if with_body {
    match page.storage() {
      Some(storage) => println!("\n{storage}"),
      None => print_warning("The page has no storage body"),
    }
  }
}

#[cfg(test)]
mod tests {
  use atlas_confluence::create_confluence_client;
  use serde_json::json;

  use super::*;

  fn page() -> ConfluencePage {
    serde_json::from_value(json!({
        "id": "123",
        "type": "page",
        "title": "Release notes",
        "_links": {"webui": "/spaces/DOCS/pages/123"}
    }))
    .unwrap()
  }

  #[test]
  fn test_page_link_server() {
    let client = create_confluence_client("https://confluence.example.com", "u", "p").unwrap();
    assert_eq!(
      page_link(&client, &page()).as_deref(),
      Some("https://confluence.example.com/spaces/DOCS/pages/123")
    );
  }

  #[test]
  fn test_page_link_cloud() {
    let client = create_confluence_client("https://team.atlassian.net", "u", "p").unwrap();
    assert_eq!(
      page_link(&client, &page()).as_deref(),
      Some("https://team.atlassian.net/wiki/spaces/DOCS/pages/123")
    );
  }

  #[test]
  fn test_content_row() {
    let row = ContentRow::from(&page());
    assert_eq!(row.id, "123");
    assert_eq!(row.content_type, "page");
  }
}
