//! Resolve selection criteria into the concrete resources of a batch.

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::core::error::TransformError;
use crate::core::filter::{dedupe_by_id, filter_base};
use crate::core::resource::Resource;
use crate::core::types::SelectionCriteria;
use crate::io::client::{ITEMS, ResourceClient};

/// Items of every selected set, filtered by class and title.
///
/// Sets are fetched in criteria order and concatenated; an item that belongs
/// to two sets appears twice.
#[instrument(skip_all, fields(sets = criteria.set_ids().len()))]
pub fn resolve_base<C: ResourceClient + ?Sized>(
    criteria: &SelectionCriteria,
    client: &C,
) -> Result<Vec<Resource>> {
    let mut items = Vec::new();
    for &set_id in criteria.set_ids() {
        let block = client
            .fetch_collection(ITEMS, &[("item_set_id", set_id.to_string())])
            .with_context(|| format!("fetch items of item set {set_id}"))?;
        debug!(set_id, count = block.len(), "item set fetched");
        items.extend(block);
    }
    let fetched = items.len();
    let kept = filter_base(items, criteria);
    info!(fetched, kept = kept.len(), "base selection resolved");
    Ok(kept)
}

/// Base selection followed, when requested, by the unique media of every
/// selected item.
///
/// The result lists parents in selection order, then children in first-seen
/// order.
#[instrument(skip_all, fields(expand = criteria.expand_to_children()))]
pub fn resolve_all<C: ResourceClient + ?Sized>(
    criteria: &SelectionCriteria,
    client: &C,
) -> Result<Vec<Resource>> {
    let mut resources = resolve_base(criteria, client)?;
    if !criteria.expand_to_children() {
        return Ok(resources);
    }

    let mut children = Vec::new();
    for parent in &resources {
        let parent_id = parent.id().ok_or(TransformError::MissingId)?;
        let block = client
            .fetch_children(parent_id)
            .with_context(|| format!("fetch media of item {parent_id}"))?;
        children.extend(block);
    }
    let children = dedupe_by_id(children).context("de-duplicate media")?;
    info!(media = children.len(), "media expansion resolved");
    resources.extend(children);
    Ok(resources)
}
