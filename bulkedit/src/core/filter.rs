//! Deterministic filters used by resource selection.

use std::collections::HashSet;

use crate::core::error::TransformError;
use crate::core::resource::Resource;
use crate::core::types::SelectionCriteria;

/// Apply the class filter and title exclusion from `criteria`, in that order.
pub fn filter_base(resources: Vec<Resource>, criteria: &SelectionCriteria) -> Vec<Resource> {
    let mut kept = resources;
    if let Some(class_id) = criteria.class_id() {
        kept.retain(|resource| resource.class_id() == Some(class_id));
    }
    if !criteria.excluded_titles().is_empty() {
        kept.retain(|resource| !criteria.is_excluded(resource.title()));
    }
    kept
}

/// Drop resources whose id was already seen. First occurrence wins and the
/// input order is preserved.
pub fn dedupe_by_id(resources: Vec<Resource>) -> Result<Vec<Resource>, TransformError> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(resources.len());
    for resource in resources {
        let id = resource.id().ok_or(TransformError::MissingId)?;
        if seen.insert(id) {
            unique.push(resource);
        }
    }
    Ok(unique)
}
