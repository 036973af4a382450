//! Recipe files: which resources to touch and the rules to apply.
//!
//! ```toml
//! item_sets = [12, 34]
//! resource_class = 10
//! exclude_titles = ["Introduction", "Sommaire"]
//! include_media = true
//!
//! [[rules]]
//! action = "add"
//! term = "dcterms:creator"
//! value = "Jane Doe"
//! language = "en"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::types::{EditRule, SelectionCriteria};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
    /// Item sets whose items form the initial target pool.
    pub item_sets: Vec<u64>,
    /// Keep only items of this resource class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_class: Option<u64>,
    /// Titles to skip, compared trimmed and case-insensitively.
    #[serde(default)]
    pub exclude_titles: Vec<String>,
    /// Also edit every medium attached to the kept items.
    #[serde(default)]
    pub include_media: bool,
    #[serde(default)]
    pub rules: Vec<EditRule>,
}

impl Recipe {
    pub fn validate(&self) -> Result<()> {
        if self.item_sets.is_empty() {
            return Err(anyhow!("item_sets must list at least one item set"));
        }
        for (idx, rule) in self.rules.iter().enumerate() {
            if rule.term.trim().is_empty() {
                return Err(anyhow!("rules[{idx}].term must not be empty"));
            }
        }
        Ok(())
    }

    pub fn criteria(&self) -> Result<SelectionCriteria> {
        SelectionCriteria::new(
            self.item_sets.iter().copied(),
            self.resource_class,
            &self.exclude_titles,
            self.include_media,
        )
        .context("build selection criteria")
    }

    /// Rules whose action name is not add, replace or remove.
    pub fn unrecognized_rules(&self) -> impl Iterator<Item = (usize, &EditRule)> {
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| !rule.action.is_recognized())
    }
}

/// Load and validate a recipe file.
pub fn load_recipe(path: &Path) -> Result<Recipe> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read recipe {}", path.display()))?;
    let recipe: Recipe =
        toml::from_str(&contents).with_context(|| format!("parse recipe {}", path.display()))?;
    recipe
        .validate()
        .with_context(|| format!("invalid recipe {}", path.display()))?;
    Ok(recipe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Action;

    const SAMPLE: &str = r#"
item_sets = [12, 34]
resource_class = 10
exclude_titles = ["Introduction", " Sommaire "]
include_media = true

[[rules]]
action = "Add"
term = "dcterms:creator"
value = "Jane Doe"
language = "en"

[[rules]]
action = "retitle"
term = "dcterms:title"
"#;

    fn write_recipe(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("recipe.toml");
        fs::write(&path, contents).expect("write recipe");
        (temp, path)
    }

    #[test]
    fn load_parses_rules_and_criteria() {
        let (_temp, path) = write_recipe(SAMPLE);
        let recipe = load_recipe(&path).expect("load");
        assert_eq!(recipe.rules[0].action, Action::Add);
        assert_eq!(recipe.rules[0].language(), Some("en"));
        assert_eq!(recipe.rules[1].value, "");

        let criteria = recipe.criteria().expect("criteria");
        assert_eq!(criteria.set_ids(), &[12, 34]);
        assert_eq!(criteria.class_id(), Some(10));
        assert!(criteria.is_excluded("sommaire"));
        assert!(criteria.expand_to_children());
    }

    #[test]
    fn unrecognized_rules_are_listed() {
        let (_temp, path) = write_recipe(SAMPLE);
        let recipe = load_recipe(&path).expect("load");
        let unknown: Vec<usize> = recipe.unrecognized_rules().map(|(idx, _)| idx).collect();
        assert_eq!(unknown, vec![1]);
    }

    #[test]
    fn empty_item_sets_are_rejected() {
        let (_temp, path) = write_recipe("item_sets = []\n");
        let err = load_recipe(&path).unwrap_err();
        assert!(format!("{err:#}").contains("item_sets"));
    }

    #[test]
    fn blank_rule_term_is_rejected() {
        let (_temp, path) =
            write_recipe("item_sets = [1]\n[[rules]]\naction = \"add\"\nterm = \" \"\n");
        let err = load_recipe(&path).unwrap_err();
        assert!(format!("{err:#}").contains("rules[0].term"));
    }
}
