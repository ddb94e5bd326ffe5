//! # Confluence API Client
//!
//! Confluence REST API integration for pages, spaces and CQL search, layered
//! on the shared `atlas-rest` client. Cloud sites are addressed under
//! `/wiki`.

mod client;
pub mod consts;
mod endpoints;
pub mod models;

pub use client::{ConfluenceClient, create_confluence_client};
pub use models::{
  ConfluencePage, ConfluenceSpace, ContentLinks, ContentResults, ContentVersion, PageBody, StorageValue,
};
