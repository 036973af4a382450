//! Test-only helpers: resource fixtures and an in-memory client.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use serde_json::{Value, json};

use crate::core::resource::{Resource, ResourceKind};
use crate::io::client::{ClientError, Params, ResourceClient};

/// Parse a JSON object into a resource.
pub fn resource(value: Value) -> Resource {
    serde_json::from_value(value).expect("fixture must be a JSON object")
}

/// Item with an id and a single untagged title.
pub fn titled(id: u64, title: &str) -> Resource {
    resource(json!({
        "o:id": id,
        "@type": ["o:Item"],
        "dcterms:title": [{"@value": title}],
    }))
}

/// Item with an id, a resource class and a title.
pub fn classed_item(id: u64, class_id: u64, title: &str) -> Resource {
    resource(json!({
        "o:id": id,
        "@type": ["o:Item"],
        "o:resource_class": {"o:id": class_id},
        "dcterms:title": [{"@value": title}],
    }))
}

/// Media resource identified by the `@type` list.
pub fn media(id: u64) -> Resource {
    resource(json!({
        "o:id": id,
        "@type": ["o:Media"],
    }))
}

/// A patch captured by [`FakeClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPatch {
    pub kind: ResourceKind,
    pub id: u64,
    pub body: Resource,
}

/// In-memory [`ResourceClient`].
///
/// Collections are keyed by endpoint plus query parameters; unknown keys
/// return empty pages. Every page request and patch is recorded.
#[derive(Default)]
pub struct FakeClient {
    pages: HashMap<String, Vec<Vec<Resource>>>,
    failing_endpoints: HashSet<String>,
    failing_ids: HashSet<u64>,
    requested: RefCell<Vec<(String, u32)>>,
    patches: RefCell<Vec<RecordedPatch>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `pages` (page 1, page 2, ...) for `endpoint` with `params`.
    pub fn with_pages(
        mut self,
        endpoint: &str,
        params: &[(&str, &str)],
        pages: Vec<Vec<Resource>>,
    ) -> Self {
        let owned: Vec<(&str, String)> = params
            .iter()
            .map(|(key, value)| (*key, value.to_string()))
            .collect();
        self.pages.insert(collection_key(endpoint, &owned), pages);
        self
    }

    /// Serve `resources` as a single page.
    pub fn with_collection(
        self,
        endpoint: &str,
        params: &[(&str, &str)],
        resources: Vec<Resource>,
    ) -> Self {
        self.with_pages(endpoint, params, vec![resources])
    }

    /// Answer every page request for `endpoint` with HTTP 500.
    pub fn failing_endpoint(mut self, endpoint: &str) -> Self {
        self.failing_endpoints.insert(endpoint.to_string());
        self
    }

    /// Answer patches of resource `id` with HTTP 500.
    pub fn failing_id(mut self, id: u64) -> Self {
        self.failing_ids.insert(id);
        self
    }

    /// Page numbers requested for `endpoint`, in call order.
    pub fn pages_requested(&self, endpoint: &str) -> Vec<u32> {
        self.requested
            .borrow()
            .iter()
            .filter(|(requested, _)| requested == endpoint)
            .map(|(_, page)| *page)
            .collect()
    }

    pub fn patches(&self) -> Vec<RecordedPatch> {
        self.patches.borrow().clone()
    }
}

impl ResourceClient for FakeClient {
    fn fetch_page(
        &self,
        endpoint: &str,
        params: &Params<'_>,
        page: u32,
    ) -> Result<Vec<Resource>, ClientError> {
        self.requested
            .borrow_mut()
            .push((endpoint.to_string(), page));
        if self.failing_endpoints.contains(endpoint) {
            return Err(server_error(endpoint));
        }
        let index = (page as usize).saturating_sub(1);
        Ok(self
            .pages
            .get(&collection_key(endpoint, params))
            .and_then(|pages| pages.get(index))
            .cloned()
            .unwrap_or_default())
    }

    fn patch(&self, kind: ResourceKind, id: u64, body: &Resource) -> Result<(), ClientError> {
        if self.failing_ids.contains(&id) {
            return Err(server_error(&format!("{}/{}", kind.endpoint(), id)));
        }
        self.patches.borrow_mut().push(RecordedPatch {
            kind,
            id,
            body: body.clone(),
        });
        Ok(())
    }
}

fn server_error(endpoint: &str) -> ClientError {
    ClientError::Status {
        endpoint: endpoint.to_string(),
        status: 500,
        message: "simulated failure".to_string(),
    }
}

fn collection_key(endpoint: &str, params: &Params<'_>) -> String {
    let mut pairs: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    pairs.sort();
    format!("{endpoint}?{}", pairs.join("&"))
}
