//! Distinct-value lookup for a property term, used for autocompletion.

use std::collections::BTreeSet;

use tracing::{debug, instrument, warn};

use crate::core::resource::Resource;
use crate::io::client::{ClientError, ITEMS, PROPERTIES, ResourceClient, VALUES};

/// Default cap on distinct values returned for one term.
pub const DEFAULT_VALUE_LIMIT: usize = 5_000;

/// Return at most `limit` distinct values of `term`, sorted.
///
/// Tries the `values` listing first. When the remote rejects it with an HTTP
/// status error, scans `items` filtered by the term page by page instead,
/// stopping at the first empty page or once `limit` values have been seen
/// or `limit` items scanned.
#[instrument(skip(client))]
pub fn distinct_values<C: ResourceClient + ?Sized>(
    client: &C,
    term: &str,
    limit: usize,
) -> Result<Vec<String>, ClientError> {
    let property_id = lookup_property_id(client, term)?;

    let mut values = BTreeSet::new();
    match client.fetch_collection(VALUES, &[("property", property_id.to_string())]) {
        Ok(listing) => {
            values.extend(listing.iter().map(|value| value_text(value).to_string()));
        }
        Err(ClientError::Status { status, .. }) => {
            warn!(term, status, "values listing unavailable, scanning items");
            scan_items(client, term, limit, &mut values)?;
        }
        Err(err) => return Err(err),
    }

    debug!(term, count = values.len(), "distinct values collected");
    Ok(values.into_iter().take(limit).collect())
}

fn lookup_property_id<C: ResourceClient + ?Sized>(
    client: &C,
    term: &str,
) -> Result<u64, ClientError> {
    client
        .fetch_collection(PROPERTIES, &[("term", term.to_string())])?
        .first()
        .and_then(Resource::id)
        .ok_or_else(|| ClientError::UnknownProperty(term.to_string()))
}

fn scan_items<C: ResourceClient + ?Sized>(
    client: &C,
    term: &str,
    limit: usize,
    values: &mut BTreeSet<String>,
) -> Result<(), ClientError> {
    let params = [("property[0][property]", term.to_string())];
    let mut page = 1;
    let mut scanned = 0;
    while values.len() < limit && scanned < limit {
        let block = client.fetch_page(ITEMS, &params, page)?;
        if block.is_empty() {
            break;
        }
        for item in &block {
            scanned += 1;
            for entry in item.entries(term).unwrap_or_default() {
                values.insert(entry.display_text().into_owned());
            }
        }
        page += 1;
    }
    Ok(())
}

/// Text of a row from the `values` listing: `@value`, else `o:label`.
fn value_text(value: &Resource) -> &str {
    match value.str_field("@value") {
        Some(text) if !text.is_empty() => text,
        _ => value.str_field("o:label").unwrap_or(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeClient, resource};
    use serde_json::json;

    fn with_property(client: FakeClient, id: u64) -> FakeClient {
        client.with_collection(
            PROPERTIES,
            &[("term", "dcterms:title")],
            vec![resource(json!({"o:id": id, "o:term": "dcterms:title"}))],
        )
    }

    #[test]
    fn listing_values_are_unique_and_sorted() {
        let client = with_property(FakeClient::new(), 111).with_collection(
            VALUES,
            &[("property", "111")],
            vec![
                resource(json!({"@value": "A"})),
                resource(json!({"o:label": "B"})),
                resource(json!({"@value": "A"})),
            ],
        );
        let values = distinct_values(&client, "dcterms:title", 10).expect("values");
        assert_eq!(values, vec!["A", "B"]);
    }

    #[test]
    fn status_error_falls_back_to_item_scan() {
        let client = with_property(FakeClient::new(), 222)
            .failing_endpoint(VALUES)
            .with_pages(
                ITEMS,
                &[("property[0][property]", "dcterms:title")],
                vec![vec![
                    resource(json!({"dcterms:title": [{"@value": "X"}]})),
                    resource(json!({"dcterms:title": [{"o:label": "Y"}]})),
                ]],
            );

        let values = distinct_values(&client, "dcterms:title", 10).expect("values");
        assert_eq!(values, vec!["X", "Y"]);
        assert_eq!(client.pages_requested(ITEMS), vec![1, 2]);
    }

    #[test]
    fn output_is_truncated_to_limit() {
        let client = with_property(FakeClient::new(), 1).with_collection(
            VALUES,
            &[("property", "1")],
            vec![
                resource(json!({"@value": "c"})),
                resource(json!({"@value": "a"})),
                resource(json!({"@value": "b"})),
            ],
        );
        assert_eq!(
            distinct_values(&client, "dcterms:title", 2).expect("values"),
            vec!["a", "b"]
        );
    }

    #[test]
    fn unknown_term_is_an_error() {
        let err = distinct_values(&FakeClient::new(), "dcterms:nope", 10).unwrap_err();
        assert!(matches!(err, ClientError::UnknownProperty(term) if term == "dcterms:nope"));
    }
}
