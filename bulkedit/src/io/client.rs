//! Resource client abstraction and the Omeka S REST implementation.
//!
//! The [`ResourceClient`] trait decouples selection and batch execution from
//! HTTP. Implementors provide single-page reads and single-resource patches;
//! pagination, child lookup and distinct-value scans are built on top. Tests
//! use an in-memory client that records patches without any network access.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::core::resource::{Resource, ResourceKind};
use crate::io::config::ApiConfig;
use crate::io::values::distinct_values;

pub const ITEMS: &str = "items";
pub const MEDIA: &str = "media";
pub const ITEM_SETS: &str = "item_sets";
pub const RESOURCE_CLASSES: &str = "resource_classes";
pub const PROPERTIES: &str = "properties";
pub const VALUES: &str = "values";

/// Query parameters for a collection request.
pub type Params<'a> = [(&'a str, String)];

/// Errors raised by a [`ResourceClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{endpoint} returned HTTP {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("invalid response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },

    #[error("unknown property term '{0}'")]
    UnknownProperty(String),
}

/// Read and write access to the remote repository.
pub trait ResourceClient {
    /// Fetch one 1-based page of `endpoint`. An empty page ends a collection.
    fn fetch_page(
        &self,
        endpoint: &str,
        params: &Params<'_>,
        page: u32,
    ) -> Result<Vec<Resource>, ClientError>;

    /// Replace the representation of one resource with `body`.
    fn patch(&self, kind: ResourceKind, id: u64, body: &Resource) -> Result<(), ClientError>;

    /// Fetch every page of `endpoint` until an empty page is returned.
    fn fetch_collection(
        &self,
        endpoint: &str,
        params: &Params<'_>,
    ) -> Result<Vec<Resource>, ClientError> {
        let mut out = Vec::new();
        let mut page = 1;
        loop {
            let block = self.fetch_page(endpoint, params, page)?;
            if block.is_empty() {
                break;
            }
            out.extend(block);
            page += 1;
        }
        debug!(endpoint, pages = page - 1, count = out.len(), "collection fetched");
        Ok(out)
    }

    /// Media attached to the item `parent_id`.
    fn fetch_children(&self, parent_id: u64) -> Result<Vec<Resource>, ClientError> {
        self.fetch_collection(MEDIA, &[("item_id", parent_id.to_string())])
    }

    /// At most `limit` distinct values of `term`, sorted.
    fn fetch_distinct_values(&self, term: &str, limit: usize) -> Result<Vec<String>, ClientError> {
        distinct_values(self, term, limit)
    }
}

/// Blocking client for the Omeka S JSON API.
///
/// Authentication is sent as `key_identity` / `key_credential` query
/// parameters on every request.
pub struct OmekaClient {
    http: Client,
    base: String,
    key_identity: String,
    key_credential: String,
}

impl OmekaClient {
    pub fn new(api: &ApiConfig) -> Result<Self, ClientError> {
        if api.url.trim().is_empty() {
            return Err(ClientError::Config("api.url must be set".to_string()));
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base: normalize_base_url(&api.url),
            key_identity: api.key_identity.clone(),
            key_credential: api.key_credential.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn auth(&self) -> [(&str, &str); 2] {
        [
            ("key_identity", self.key_identity.as_str()),
            ("key_credential", self.key_credential.as_str()),
        ]
    }
}

impl ResourceClient for OmekaClient {
    #[instrument(skip(self, params))]
    fn fetch_page(
        &self,
        endpoint: &str,
        params: &Params<'_>,
        page: u32,
    ) -> Result<Vec<Resource>, ClientError> {
        let response = self
            .http
            .get(format!("{}/{}", self.base, endpoint))
            .query(&self.auth())
            .query(params)
            .query(&[("page", page)])
            .send()?;
        let body = success_body(endpoint, response)?;
        serde_json::from_str(&body).map_err(|source| ClientError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    #[instrument(skip(self, body))]
    fn patch(&self, kind: ResourceKind, id: u64, body: &Resource) -> Result<(), ClientError> {
        let endpoint = format!("{}/{}", kind.endpoint(), id);
        let response = self
            .http
            .patch(format!("{}/{}", self.base, endpoint))
            .query(&self.auth())
            .json(body)
            .send()?;
        success_body(&endpoint, response)?;
        info!(endpoint = %endpoint, "resource patched");
        Ok(())
    }
}

fn success_body(endpoint: &str, response: Response) -> Result<String, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let message = error_message(response.text());
        warn!(endpoint, status = status.as_u16(), "request failed");
        return Err(ClientError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.text()?)
}

/// Body of an error reply, or a note saying why it could not be read.
fn error_message<E: std::fmt::Display>(body: Result<String, E>) -> String {
    body.unwrap_or_else(|err| format!("<unreadable body: {err}>"))
}

/// Ensure the base URL ends in `/api`, without a trailing slash.
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.ends_with("/api") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/api")
    }
}
