//! Error types for core logic.

use thiserror::Error;

/// A rule could not be applied to a resource's representation.
///
/// These indicate a rule/resource mismatch, not a transient fault, and abort
/// the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("term '{term}' does not hold a value list, cannot {action}")]
    NotAValueList { term: String, action: &'static str },

    #[error("resource has no numeric 'o:id'")]
    MissingId,
}

/// Selection criteria that cannot describe any target set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    #[error("at least one item set id is required")]
    NoSets,
}
