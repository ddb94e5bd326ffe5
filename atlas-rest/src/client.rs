//! # Atlassian REST Client
//!
//! HTTP client shared by every product wrapper. It owns authentication,
//! header defaults, URL composition, retries and error extraction, and hands
//! back either raw buffered responses or decoded JSON.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Identity, Method, Proxy, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use atlas_core::url::ATLASSIAN_CLOUD_GATEWAY;

use crate::auth::Auth;
use crate::consts::{JSON_UTF8_CONTENT_TYPE, USER_AGENT};
use crate::curl::log_curl_debug;
use crate::error::{AtlassianError, Result};
use crate::headers::HeaderPreset;
use crate::request::{RequestOptions, append_query, url_joiner};
use crate::response::{Content, Field, RestResponse, extract_fields};
use crate::retry::RetryHandler;
use crate::settings::{ClientSettings, RetryPolicy};
use crate::status::error_message;

/// Represents a connection to one Atlassian instance
#[derive(Debug, Clone)]
pub struct RestClient {
  pub(crate) client: Client,
  pub(crate) base_url: String,
  pub(crate) auth: Auth,
  pub(crate) settings: ClientSettings,
  pub(crate) session_headers: HeaderMap,
}

/// Builder for [`RestClient`]
#[derive(Debug)]
pub struct RestClientBuilder {
  base_url: String,
  auth: Auth,
  settings: ClientSettings,
  client_cert: Option<(Vec<u8>, Vec<u8>)>,
  http_client: Option<Client>,
}

impl RestClientBuilder {
  pub fn auth(mut self, auth: Auth) -> Self {
    self.auth = auth;
    self
  }

  /// Replace every setting at once, e.g. with values loaded from a config file
  pub fn settings(mut self, settings: ClientSettings) -> Self {
    self.settings = settings;
    self
  }

  pub fn timeout(mut self, timeout: Duration) -> Self {
    self.settings.timeout_secs = timeout.as_secs_f64();
    self
  }

  pub fn api_root(mut self, api_root: &str) -> Self {
    self.settings.api_root = api_root.to_string();
    self
  }

  pub fn api_version(mut self, api_version: &str) -> Self {
    self.settings.api_version = api_version.to_string();
    self
  }

  pub fn verify_ssl(mut self, verify_ssl: bool) -> Self {
    self.settings.verify_ssl = verify_ssl;
    self
  }

  pub fn cloud(mut self, cloud: bool) -> Self {
    self.settings.cloud = cloud;
    self
  }

  pub fn proxy(mut self, proxy: &str) -> Self {
    self.settings.proxy = Some(proxy.to_string());
    self
  }

  pub fn retry(mut self, retry: RetryPolicy) -> Self {
    self.settings.retry = retry;
    self
  }

  pub fn advanced_mode(mut self, advanced_mode: bool) -> Self {
    self.settings.advanced_mode = advanced_mode;
    self
  }

  /// PEM encoded client certificate and PKCS#8 private key for mutual TLS
  pub fn client_cert(mut self, cert_pem: Vec<u8>, key_pem: Vec<u8>) -> Self {
    self.client_cert = Some((cert_pem, key_pem));
    self
  }

  /// Reuse an existing reqwest client.
  ///
  /// Proxy, certificate and TLS verification settings then belong to that
  /// client; the timeout is still applied per request.
  pub fn http_client(mut self, client: Client) -> Self {
    self.http_client = Some(client);
    self
  }

  pub fn build(self) -> Result<RestClient> {
    let base_url = self.base_url.trim().trim_end_matches('/').to_string();
    if base_url.is_empty() {
      return Err(AtlassianError::Config("base URL cannot be empty".to_string()));
    }

    let client = match self.http_client {
      Some(client) => client,
      None => {
        let mut builder = Client::builder()
          .user_agent(USER_AGENT)
          .timeout(self.settings.timeout())
          .danger_accept_invalid_certs(!self.settings.verify_ssl);

        if let Some(proxy) = &self.settings.proxy {
          builder = builder.proxy(Proxy::all(proxy)?);
        }
        if let Some((cert, key)) = &self.client_cert {
          builder = builder.identity(Identity::from_pkcs8_pem(cert, key)?);
        }
        builder.build()?
      }
    };

    let session_headers = self.auth.session_headers()?;
    debug!("Created REST client for {base_url} using {} auth", self.auth.scheme());

    Ok(RestClient {
      client,
      base_url,
      auth: self.auth,
      settings: self.settings,
      session_headers,
    })
  }
}

impl RestClient {
  /// Start building a client for the instance at `base_url`
  pub fn builder(base_url: &str) -> RestClientBuilder {
    RestClientBuilder {
      base_url: base_url.to_string(),
      auth: Auth::None,
      settings: ClientSettings::default(),
      client_cert: None,
      http_client: None,
    }
  }

  /// Create a client with default settings
  pub fn new(base_url: &str, auth: Auth) -> Result<Self> {
    Self::builder(base_url).auth(auth).build()
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub fn settings(&self) -> &ClientSettings {
    &self.settings
  }

  pub fn auth(&self) -> &Auth {
    &self.auth
  }

  pub fn is_cloud(&self) -> bool {
    self.settings.cloud
  }

  /// The underlying reqwest client
  pub fn http_client(&self) -> &Client {
    &self.client
  }

  /// Add or replace a header sent with every request
  pub fn update_header(&mut self, key: &str, value: &str) -> Result<()> {
    let name = HeaderName::from_bytes(key.as_bytes())?;
    let value = HeaderValue::from_str(value)?;
    self.session_headers.insert(name, value);
    Ok(())
  }

  /// `<api_root>/<api_version>/<resource>`, each part stripped of slashes.
  ///
  /// `None` selects the configured root or version; an empty string drops
  /// that segment.
  pub fn resource_url(&self, resource: &str, api_root: Option<&str>, api_version: Option<&str>) -> String {
    let api_root = api_root.unwrap_or(&self.settings.api_root);
    let api_version = api_version.unwrap_or(&self.settings.api_version);

    [api_root, api_version, resource]
      .iter()
      .map(|segment| segment.trim_matches('/'))
      .filter(|segment| !segment.is_empty())
      .collect::<Vec<_>>()
      .join("/")
  }

  /// Full URL for `path` with the query string from `opts`
  pub fn build_url(&self, path: &str, opts: &RequestOptions) -> String {
    let base = if opts.absolute { None } else { Some(self.base_url.as_str()) };
    let mut url = url_joiner(base, path, opts.trailing);
    append_query(&mut url, &opts.params, &opts.flags);
    url
  }

  /// Session headers overlaid with the request headers (defaulting to JSON)
  fn merged_headers(&self, opts: &RequestOptions) -> HeaderMap {
    let request_headers = opts.headers.clone().unwrap_or_else(|| HeaderPreset::Default.headers());

    let mut merged = self.session_headers.clone();
    for name in request_headers.keys() {
      merged.remove(name);
    }
    for (name, value) in &request_headers {
      merged.append(name.clone(), value.clone());
    }
    if opts.body.is_multipart() {
      // reqwest sets the multipart boundary itself
      merged.remove(CONTENT_TYPE);
    }
    merged
  }

  /// Send a request, retrying as the retry policy allows.
  ///
  /// Unless advanced mode is enabled on the client or in `opts`, 4xx and 5xx
  /// responses are turned into errors by [`RestClient::raise_for_status`].
  pub async fn request(&self, method: Method, path: &str, opts: RequestOptions) -> Result<RestResponse> {
    let url = self.build_url(path, &opts);
    let headers = self.merged_headers(&opts);
    let log_headers = opts.headers.clone().unwrap_or_else(|| HeaderPreset::Default.headers());
    let data = opts.body.debug_data();
    let timeout = self.settings.timeout();

    let mut retry = RetryHandler::new(&self.settings.retry);
    let response = loop {
      log_curl_debug(&method, &url, &log_headers, data.as_deref());

      let mut builder = self
        .client
        .request(method.clone(), &url)
        .headers(headers.clone())
        .timeout(timeout);
      if let Auth::Basic { username, password } = &self.auth {
        builder = builder.basic_auth(username, Some(password));
      }
      builder = opts.body.apply(builder)?;

      let response = builder.send().await?;
      let status = response.status();
      let response_headers = response.headers().clone();
      let final_url = response.url().to_string();
      let body = response.bytes().await?;

      if let Some(delay) = retry.next_delay(status, &response_headers) {
        warn!(
          "HTTP {} from {method} {path}, retry {} in {:.1}s",
          status.as_u16(),
          retry.retries(),
          delay.as_secs_f64()
        );
        tokio::time::sleep(delay).await;
        continue;
      }

      break RestResponse {
        method: method.clone(),
        url: final_url,
        status,
        headers: response_headers,
        body,
      };
    };

    debug!(
      "HTTP: {method} {path} -> {} {}",
      response.status.as_u16(),
      response.status.canonical_reason().unwrap_or_default()
    );
    debug!("HTTP: Response text -> {}", response.text());

    if !(self.settings.advanced_mode || opts.advanced_mode) {
      self.raise_for_status(&response)?;
    }
    Ok(response)
  }

  /// Fail on 4xx/5xx responses with the messages Atlassian put in the body.
  ///
  /// A 401 without the JSON error content type becomes
  /// [`AtlassianError::Unauthorized`].
  pub fn raise_for_status(&self, response: &RestResponse) -> Result<()> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED && response.content_type() != Some(JSON_UTF8_CONTENT_TYPE) {
      return Err(AtlassianError::Unauthorized {
        url: response.url().to_string(),
      });
    }

    if !(status.is_client_error() || status.is_server_error()) {
      return Ok(());
    }

    let body = match response.json() {
      Ok(body) => Some(body),
      Err(e) => {
        error!("Could not decode error body from {}: {e}", response.url());
        None
      }
    };
    let gateway = self.base_url == ATLASSIAN_CLOUD_GATEWAY;

    Err(AtlassianError::Http {
      status: status.as_u16(),
      url: response.url().to_string(),
      message: error_message(body.as_ref(), gateway, status, response.url()),
    })
  }

  /// GET `path` and decode the body: nothing, JSON, or text if it is not JSON
  pub async fn get(&self, path: &str, opts: RequestOptions) -> Result<Content> {
    let response = self.request(Method::GET, path, opts).await?;
    if response.is_empty() {
      return Ok(Content::Empty);
    }
    match response.json() {
      Ok(value) => Ok(Content::Json(value)),
      Err(e) => {
        error!("Response from {} is not JSON: {e}", response.url());
        Ok(Content::Text(response.text()))
      }
    }
  }

  /// GET `path` and return the raw body, e.g. for attachments and exports
  pub async fn get_bytes(&self, path: &str, opts: RequestOptions) -> Result<bytes::Bytes> {
    Ok(self.request(Method::GET, path, opts).await?.into_bytes())
  }

  /// GET `path` and deserialize the JSON body into `T`
  pub async fn get_json<T: DeserializeOwned>(&self, path: &str, opts: RequestOptions) -> Result<T> {
    self.send_json(Method::GET, path, opts).await
  }

  /// Send any request and deserialize the JSON body into `T`
  pub async fn send_json<T: DeserializeOwned>(&self, method: Method, path: &str, opts: RequestOptions) -> Result<T> {
    self.request(method, path, opts).await?.json_as()
  }

  /// GET `path` and follow `fields` into the JSON body.
  ///
  /// Non-JSON bodies are treated as `null`.
  pub async fn get_response_content(&self, path: &str, opts: RequestOptions, fields: &[Field]) -> Result<Value> {
    let content = self.get(path, opts).await?;
    Ok(extract_fields(content.into_json().unwrap_or(Value::Null), fields))
  }

  pub async fn post(&self, path: &str, opts: RequestOptions) -> Result<Option<Value>> {
    let response = self.request(Method::POST, path, opts).await?;
    Ok(Self::json_or_none(&response))
  }

  pub async fn put(&self, path: &str, opts: RequestOptions) -> Result<Option<Value>> {
    let response = self.request(Method::PUT, path, opts).await?;
    Ok(Self::json_or_none(&response))
  }

  /// Partial modification of a resource
  pub async fn patch(&self, path: &str, opts: RequestOptions) -> Result<Option<Value>> {
    let response = self.request(Method::PATCH, path, opts).await?;
    Ok(Self::json_or_none(&response))
  }

  /// Many Atlassian resources answer a DELETE with an empty body, hence `None`
  pub async fn delete(&self, path: &str, opts: RequestOptions) -> Result<Option<Value>> {
    let response = self.request(Method::DELETE, path, opts).await?;
    Ok(Self::json_or_none(&response))
  }

  fn json_or_none(response: &RestResponse) -> Option<Value> {
    match response.json() {
      Ok(value) => Some(value),
      Err(_) => {
        debug!("Received response with no JSON content");
        None
      }
    }
  }
}
