//! In-memory representation of a remote resource.
//!
//! A resource is an ordered mapping from field term to value. Most terms hold
//! a list of value entries (`{"@value": ..., "@language": ...}`), while a few
//! privileged terms (`o:id`, `o:resource_class`, `@type`, ...) hold scalars or
//! nested objects. [`TermValue`] keeps both shapes without committing to a
//! fixed schema, and the typed accessors below are the only places that look
//! inside the non-entry shapes.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ID_TERM: &str = "o:id";
pub const TITLE_TERM: &str = "dcterms:title";
pub const CLASS_TERM: &str = "o:resource_class";
pub const LEGACY_TYPE_TERM: &str = "o:type";
pub const TYPE_LIST_TERM: &str = "@type";

/// Suffix of `@type` entries that mark a child (media) resource.
pub const MEDIA_TYPE_SUFFIX: &str = "Media";

/// One value attached to a term.
///
/// `@value` is kept as raw JSON: most data types store a string, numeric
/// types (`numeric:integer`, ...) store a number. Fields other than the
/// literal and language (`type`, `property_id`, `o:label`, `@id`, ...) are
/// carried in `extra` so a fetched entry is written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueEntry {
    #[serde(rename = "@value", default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<Value>,
    #[serde(
        rename = "@language",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub language: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ValueEntry {
    pub fn literal(value: impl Into<String>, language: Option<String>) -> Self {
        Self {
            literal: Some(Value::String(value.into())),
            language,
            extra: Map::new(),
        }
    }

    /// The literal when it is a string.
    pub fn literal_str(&self) -> Option<&str> {
        self.literal.as_ref().and_then(Value::as_str)
    }

    /// Display text: the literal when non-empty, else `o:label`, else empty.
    /// Non-string literals are rendered as JSON (`3`, `true`).
    pub fn display_text(&self) -> Cow<'_, str> {
        match &self.literal {
            Some(Value::String(literal)) if !literal.is_empty() => Cow::Borrowed(literal),
            Some(Value::String(_) | Value::Null) | None => Cow::Borrowed(
                self.extra
                    .get("o:label")
                    .and_then(Value::as_str)
                    .unwrap_or(""),
            ),
            Some(other) => Cow::Owned(other.to_string()),
        }
    }
}

/// Value stored under a single term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TermValue {
    /// A list of value entries (the shape edit rules operate on).
    Entries(Vec<ValueEntry>),
    /// Any other JSON shape: identity, type, class reference, link lists.
    Other(Value),
}

impl TermValue {
    pub fn as_entries(&self) -> Option<&[ValueEntry]> {
        match self {
            TermValue::Entries(entries) => Some(entries),
            TermValue::Other(_) => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            TermValue::Entries(_) => None,
            TermValue::Other(value) => Some(value),
        }
    }
}

/// Whether a resource is a top-level item or a child media resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Item,
    Media,
}

impl ResourceKind {
    /// Collection name of the write endpoint for this kind.
    pub fn endpoint(self) -> &'static str {
        match self {
            ResourceKind::Item => "items",
            ResourceKind::Media => "media",
        }
    }
}

/// A resource fetched from the remote repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(IndexMap<String, TermValue>);

impl Resource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, term: &str) -> Option<&TermValue> {
        self.0.get(term)
    }

    pub fn get_mut(&mut self, term: &str) -> Option<&mut TermValue> {
        self.0.get_mut(term)
    }

    pub fn insert(&mut self, term: impl Into<String>, value: TermValue) -> Option<TermValue> {
        self.0.insert(term.into(), value)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.0.contains_key(term)
    }

    pub fn terms(&self) -> impl Iterator<Item = (&String, &TermValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value entries for `term`, or `None` when absent or not entry-shaped.
    pub fn entries(&self, term: &str) -> Option<&[ValueEntry]> {
        self.get(term).and_then(TermValue::as_entries)
    }

    /// Scalar string stored directly under `term` (e.g. `o:term`, `@value`).
    pub fn str_field(&self, term: &str) -> Option<&str> {
        self.get(term)
            .and_then(TermValue::as_json)
            .and_then(Value::as_str)
    }

    /// Identity assigned by the remote system.
    pub fn id(&self) -> Option<u64> {
        self.get(ID_TERM)
            .and_then(TermValue::as_json)
            .and_then(Value::as_u64)
    }

    /// First title literal, or an empty string.
    pub fn title(&self) -> &str {
        self.entries(TITLE_TERM)
            .and_then(|entries| entries.first())
            .and_then(ValueEntry::literal_str)
            .unwrap_or("")
    }

    /// Id of the referenced resource class, if any.
    pub fn class_id(&self) -> Option<u64> {
        let class = match self.get(CLASS_TERM)? {
            TermValue::Other(value) => value,
            TermValue::Entries(_) => return None,
        };
        class.get(ID_TERM).and_then(Value::as_u64)
    }

    /// Classify the resource as item or media.
    ///
    /// The legacy `o:type` wins whenever the term is present, whatever its
    /// value; otherwise any `@type`
    /// entry ending in `Media` marks a media resource.
    pub fn kind(&self) -> ResourceKind {
        if self.contains(LEGACY_TYPE_TERM) {
            return if self.str_field(LEGACY_TYPE_TERM) == Some("media") {
                ResourceKind::Media
            } else {
                ResourceKind::Item
            };
        }
        let is_media = self
            .get(TYPE_LIST_TERM)
            .and_then(TermValue::as_json)
            .and_then(Value::as_array)
            .is_some_and(|types| {
                types
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|name| name.ends_with(MEDIA_TYPE_SUFFIX))
            });
        if is_media {
            ResourceKind::Media
        } else {
            ResourceKind::Item
        }
    }
}

impl FromIterator<(String, TermValue)> for Resource {
    fn from_iter<I: IntoIterator<Item = (String, TermValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Resource {
        serde_json::from_value(value).expect("resource json")
    }

    #[test]
    fn parses_entry_lists_and_other_shapes() {
        let resource = parse(json!({
            "o:id": 7,
            "@type": ["o:Item", "dctype:Text"],
            "o:resource_class": {"o:id": 10, "@id": "https://demo/api/resource_classes/10"},
            "dcterms:title": [{"type": "literal", "property_id": 1, "@value": "Foo", "@language": null}],
            "dcterms:subject": [],
        }));

        assert_eq!(resource.id(), Some(7));
        assert_eq!(resource.title(), "Foo");
        assert_eq!(resource.class_id(), Some(10));
        assert!(matches!(resource.get("@type"), Some(TermValue::Other(_))));
        assert_eq!(resource.entries("dcterms:subject"), Some(&[][..]));
        let entry = &resource.entries("dcterms:title").expect("title")[0];
        assert_eq!(entry.language, None);
        assert_eq!(entry.extra.get("property_id"), Some(&json!(1)));
    }

    #[test]
    fn write_back_preserves_extra_fields() {
        let raw = json!({
            "o:id": 3,
            "dcterms:title": [{"type": "literal", "property_id": 1, "@value": "Foo", "@language": "en"}],
        });
        let resource = parse(raw.clone());
        assert_eq!(serde_json::to_value(&resource).expect("serialize"), raw);
    }

    #[test]
    fn title_defaults_to_empty() {
        assert_eq!(parse(json!({"o:id": 1})).title(), "");
        assert_eq!(parse(json!({"dcterms:title": []})).title(), "");
    }

    #[test]
    fn null_class_reference_has_no_class_id() {
        assert_eq!(parse(json!({"o:resource_class": null})).class_id(), None);
    }

    #[test]
    fn kind_prefers_legacy_type_field() {
        let legacy = parse(json!({"o:type": "items", "@type": ["o:Media"]}));
        assert_eq!(legacy.kind(), ResourceKind::Item);
        let legacy_media = parse(json!({"o:type": "media"}));
        assert_eq!(legacy_media.kind(), ResourceKind::Media);
    }

    #[test]
    fn kind_falls_back_to_type_list_suffix() {
        assert_eq!(parse(json!({"@type": ["o:Media"]})).kind(), ResourceKind::Media);
        assert_eq!(
            parse(json!({"@type": ["o:Item", "dctype:Text"]})).kind(),
            ResourceKind::Item
        );
        assert_eq!(parse(json!({"o:id": 1})).kind(), ResourceKind::Item);
    }

    #[test]
    fn display_text_falls_back_to_label() {
        let entry: ValueEntry =
            serde_json::from_value(json!({"o:label": "Y"})).expect("entry json");
        assert_eq!(entry.display_text(), "Y");
        assert_eq!(ValueEntry::literal("X", None).display_text(), "X");
    }

    #[test]
    fn legacy_type_present_but_null_means_item() {
        let resource = parse(json!({"o:type": null, "@type": ["o:Media"]}));
        assert_eq!(resource.kind(), ResourceKind::Item);
    }

    #[test]
    fn numeric_literal_keeps_value_list_shape() {
        let resource = parse(json!({
            "o:id": 1,
            "schema:position": [{"type": "numeric:integer", "@value": 3}],
        }));
        let entries = resource.entries("schema:position").expect("value list");
        assert_eq!(entries[0].literal, Some(json!(3)));
        assert_eq!(entries[0].literal_str(), None);
        assert_eq!(entries[0].display_text(), "3");
        assert_eq!(
            serde_json::to_value(&resource).expect("serialize")["schema:position"],
            json!([{"type": "numeric:integer", "@value": 3}])
        );
    }
}
