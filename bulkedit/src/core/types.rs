//! Shared types for the batch mutation engine.
//!
//! These types are the contracts between the selector, the patch computer and
//! the executor. They are built once per run and passed explicitly; nothing in
//! the core holds them between runs.

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::error::CriteriaError;
use crate::core::resource::{ResourceKind, TermValue};

/// Edit action named by a rule. Parsed case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    Add,
    Replace,
    Remove,
    /// Any other action name. Applying it leaves the resource unchanged.
    Unrecognized(String),
}

impl Action {
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Action::Unrecognized(_))
    }
}

impl From<&str> for Action {
    fn from(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "add" => Action::Add,
            "replace" => Action::Replace,
            "remove" => Action::Remove,
            _ => Action::Unrecognized(name.to_string()),
        }
    }
}

impl From<String> for Action {
    fn from(name: String) -> Self {
        Action::from(name.as_str())
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.to_string()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Add => f.write_str("add"),
            Action::Replace => f.write_str("replace"),
            Action::Remove => f.write_str("remove"),
            Action::Unrecognized(name) => f.write_str(name),
        }
    }
}

/// One add/replace/remove row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRule {
    pub action: Action,
    /// Property term whose value list is edited (e.g. `dcterms:title`).
    pub term: String,
    /// Literal to insert, overwrite with, or match for removal.
    #[serde(default)]
    pub value: String,
    /// Language code; empty means none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl EditRule {
    pub fn new(
        action: impl Into<Action>,
        term: impl Into<String>,
        value: impl Into<String>,
        language: Option<&str>,
    ) -> Self {
        Self {
            action: action.into(),
            term: term.into(),
            value: value.into(),
            language: language.map(str::to_string),
        }
    }

    /// Language with empty strings treated as absent.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref().filter(|lang| !lang.is_empty())
    }
}

/// Which resources a batch targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionCriteria {
    set_ids: Vec<u64>,
    class_id: Option<u64>,
    excluded_titles: BTreeSet<String>,
    expand_to_children: bool,
}

impl SelectionCriteria {
    /// Build criteria, normalizing excluded titles and de-duplicating set ids
    /// (first occurrence keeps its position). Blank exclusions are ignored.
    pub fn new<I, S>(
        set_ids: impl IntoIterator<Item = u64>,
        class_id: Option<u64>,
        excluded_titles: I,
        expand_to_children: bool,
    ) -> Result<Self, CriteriaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ids = Vec::new();
        for id in set_ids {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        if ids.is_empty() {
            return Err(CriteriaError::NoSets);
        }
        let excluded_titles = excluded_titles
            .into_iter()
            .map(|title| normalize_title(title.as_ref()))
            .filter(|title| !title.is_empty())
            .collect();
        Ok(Self {
            set_ids: ids,
            class_id,
            excluded_titles,
            expand_to_children,
        })
    }

    pub fn set_ids(&self) -> &[u64] {
        &self.set_ids
    }

    pub fn class_id(&self) -> Option<u64> {
        self.class_id
    }

    pub fn excluded_titles(&self) -> &BTreeSet<String> {
        &self.excluded_titles
    }

    pub fn expand_to_children(&self) -> bool {
        self.expand_to_children
    }

    pub fn is_excluded(&self, title: &str) -> bool {
        self.excluded_titles.contains(&normalize_title(title))
    }
}

/// Trim and lowercase a title for exclusion matching.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Whether a batch only computes changes or also writes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Preview,
    Commit,
}

/// Field-level delta between two resource representations.
pub type FieldDiff = IndexMap<String, TermValue>;

/// A resource that changed (preview) or was written (commit).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChangeRecord {
    Preview {
        id: u64,
        kind: ResourceKind,
        title: String,
        diff: FieldDiff,
    },
    Committed {
        id: u64,
    },
}

impl ChangeRecord {
    pub fn id(&self) -> u64 {
        match self {
            ChangeRecord::Preview { id, .. } | ChangeRecord::Committed { id } => *id,
        }
    }
}

/// A resource whose write failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub id: u64,
    pub message: String,
}

/// Outcome of a batch run.
///
/// Both lists empty means the rules were a no-op against the selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub changed: Vec<ChangeRecord>,
    pub failed: Vec<FailureRecord>,
}

impl BatchReport {
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty() && self.failed.is_empty()
    }
}
