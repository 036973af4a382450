//! End-to-end batch runs against an in-memory client.
//!
//! These tests drive `run_batch` through selection, rule application and
//! writes, checking the report contents and the recorded patch bodies.

use serde_json::json;

use bulkedit::batch::run_batch;
use bulkedit::core::resource::ResourceKind;
use bulkedit::core::types::{ChangeRecord, EditRule, Mode, SelectionCriteria};
use bulkedit::io::client::{ITEMS, MEDIA};
use bulkedit::test_support::{FakeClient, resource};

/// Two item sets sharing nothing, one excluded title, two items pointing at
/// the same medium.
fn site() -> FakeClient {
    FakeClient::new()
        .with_pages(
            ITEMS,
            &[("item_set_id", "1")],
            vec![
                vec![resource(json!({
                    "o:id": 1,
                    "@type": ["o:Item"],
                    "o:resource_class": {"o:id": 10},
                    "dcterms:title": [{"type": "literal", "@value": "Chapter one", "@language": "en"}],
                    "dcterms:creator": [{"type": "literal", "@value": "Anon"}],
                }))],
                vec![resource(json!({
                    "o:id": 2,
                    "@type": ["o:Item"],
                    "o:resource_class": {"o:id": 10},
                    "dcterms:title": [{"type": "literal", "@value": " Introduction "}],
                }))],
            ],
        )
        .with_collection(
            ITEMS,
            &[("item_set_id", "2")],
            vec![
                resource(json!({
                    "o:id": 3,
                    "o:type": "items",
                    "o:resource_class": {"o:id": 10},
                    "dcterms:title": [{"@value": "Chapter two"}],
                    "dcterms:creator": [{"@value": "Anon"}, {"@value": "Jane Doe"}],
                })),
                resource(json!({
                    "o:id": 4,
                    "o:resource_class": {"o:id": 20},
                    "dcterms:title": [{"@value": "Map"}],
                })),
            ],
        )
        .with_collection(
            MEDIA,
            &[("item_id", "1")],
            vec![resource(json!({"o:id": 99, "@type": ["o:Media"], "dcterms:title": [{"@value": "scan"}]}))],
        )
        .with_collection(
            MEDIA,
            &[("item_id", "3")],
            vec![resource(json!({"o:id": 99, "@type": ["o:Media"], "dcterms:title": [{"@value": "scan"}]}))],
        )
}

fn criteria() -> SelectionCriteria {
    SelectionCriteria::new([1, 2], Some(10), ["introduction"], true).expect("criteria")
}

fn rules() -> Vec<EditRule> {
    vec![
        EditRule::new("remove", "dcterms:creator", "Anon", None),
        EditRule::new("add", "dcterms:creator", "Jane Doe", None),
    ]
}

#[test]
fn preview_lists_every_change_with_its_diff() {
    let client = site();
    let report = run_batch(&client, &criteria(), &rules(), Mode::Preview).expect("run");

    let ids: Vec<u64> = report.changed.iter().map(ChangeRecord::id).collect();
    assert_eq!(ids, vec![1, 3, 99]);
    assert!(report.failed.is_empty());
    assert!(client.patches().is_empty());

    let json = serde_json::to_value(&report).expect("json");
    assert_eq!(
        json["changed"][0],
        json!({
            "id": 1,
            "kind": "item",
            "title": "Chapter one",
            "diff": {"dcterms:creator": [{"@value": "Jane Doe"}]},
        })
    );
    assert_eq!(json["changed"][2]["kind"], json!("media"));
    assert_eq!(json["failed"], json!([]));
}

#[test]
fn commit_writes_full_representations_and_isolates_failures() {
    let client = site().failing_id(3);
    let report = run_batch(&client, &criteria(), &rules(), Mode::Commit).expect("run");

    assert_eq!(
        report.changed,
        vec![
            ChangeRecord::Committed { id: 1 },
            ChangeRecord::Committed { id: 99 },
        ]
    );
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].id, 3);

    let patches = client.patches();
    assert_eq!(patches[0].kind, ResourceKind::Item);
    assert_eq!(
        serde_json::to_value(&patches[0].body).expect("json"),
        json!({
            "o:id": 1,
            "@type": ["o:Item"],
            "o:resource_class": {"o:id": 10},
            "dcterms:title": [{"type": "literal", "@value": "Chapter one", "@language": "en"}],
            "dcterms:creator": [{"@value": "Jane Doe"}],
        })
    );
    assert_eq!(patches[1].kind, ResourceKind::Media);
    assert_eq!(patches[1].id, 99);
}

#[test]
fn second_commit_of_replace_rules_is_a_noop() {
    let client = FakeClient::new().with_collection(
        ITEMS,
        &[("item_set_id", "1")],
        vec![resource(json!({"o:id": 1, "dcterms:rights": [{"@value": "CC-BY"}]}))],
    );
    let criteria =
        SelectionCriteria::new([1], None, Vec::<String>::new(), false).expect("criteria");
    let rules = [EditRule::new("replace", "dcterms:rights", "CC-BY", None)];

    let report = run_batch(&client, &criteria, &rules, Mode::Commit).expect("run");
    assert!(report.is_noop());
}
