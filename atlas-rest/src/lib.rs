//! # Atlassian REST Client
//!
//! Async HTTP plumbing shared by the Jira and Confluence wrappers:
//! authentication, header presets, URL and query composition, retry with
//! backoff, and extraction of Atlassian error messages.

pub mod auth;
pub mod client;
pub mod consts;
pub mod curl;
pub mod error;
pub mod headers;
pub mod request;
pub mod response;
pub mod retry;
pub mod settings;
pub mod status;

pub use auth::{Auth, OAuth2Token};
pub use client::{RestClient, RestClientBuilder};
pub use error::{AtlassianError, Result};
pub use headers::HeaderPreset;
pub use request::{Body, FilePart, RequestOptions};
pub use response::{Content, Field, RestResponse};
pub use settings::{ClientSettings, RetryPolicy};

pub use reqwest::Method;
pub use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
