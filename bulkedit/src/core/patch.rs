//! Pure patch computation: apply edit rules and diff the result.

use crate::core::error::TransformError;
use crate::core::resource::{Resource, TermValue, ValueEntry};
use crate::core::types::{Action, EditRule, FieldDiff};

/// Terms of `candidate` whose value differs from `base`.
///
/// Terms missing from `base` are reported; terms only in `base` are not. The
/// delta follows `candidate`'s term order.
pub fn diff(base: &Resource, candidate: &Resource) -> FieldDiff {
    candidate
        .terms()
        .filter(|(term, value)| base.get(term) != Some(*value))
        .map(|(term, value)| (term.clone(), value.clone()))
        .collect()
}

/// Apply `rules` in order to a copy of `resource`.
///
/// Later rules see the effect of earlier ones. Unrecognized actions are
/// skipped. The input is never modified.
pub fn apply_rules(resource: &Resource, rules: &[EditRule]) -> Result<Resource, TransformError> {
    let mut updated = resource.clone();
    for rule in rules {
        apply_rule(&mut updated, rule)?;
    }
    Ok(updated)
}

fn apply_rule(resource: &mut Resource, rule: &EditRule) -> Result<(), TransformError> {
    let language = rule.language().map(str::to_string);
    match &rule.action {
        Action::Add => {
            let entries = entries_mut(resource, &rule.term, "add")?;
            entries.push(ValueEntry::literal(rule.value.clone(), language));
        }
        Action::Replace => {
            resource.insert(
                rule.term.clone(),
                TermValue::Entries(vec![ValueEntry::literal(rule.value.clone(), language)]),
            );
        }
        Action::Remove => {
            let entries = entries_mut(resource, &rule.term, "remove")?;
            entries.retain(|entry| keeps_on_remove(entry, &rule.value, language.as_deref()));
        }
        Action::Unrecognized(_) => {}
    }
    Ok(())
}

/// Keep an entry unless its literal matches and, when a language is given,
/// its language matches too.
fn keeps_on_remove(entry: &ValueEntry, value: &str, language: Option<&str>) -> bool {
    entry.literal_str() != Some(value)
        || language.is_some_and(|lang| entry.language.as_deref() != Some(lang))
}

/// Value list for `term`, created empty when the term is absent.
fn entries_mut<'a>(
    resource: &'a mut Resource,
    term: &str,
    action: &'static str,
) -> Result<&'a mut Vec<ValueEntry>, TransformError> {
    if !resource.contains(term) {
        resource.insert(term, TermValue::Entries(Vec::new()));
    }
    match resource.get_mut(term) {
        Some(TermValue::Entries(entries)) => Ok(entries),
        _ => Err(TransformError::NotAValueList {
            term: term.to_string(),
            action,
        }),
    }
}
