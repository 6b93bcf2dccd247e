//! Reverse indexes from embedded sub-entities back to their records.
//!
//! Records carry their related entities inline, e.g. a visual novel lists its
//! developers:
//!
//! ```json
//! {"id": 1, "title": "A", "developers": [{"id": 10, "name": "Dev"}]}
//! ```
//!
//! [`extract_entities`] inverts that relation: one [`SubEntity`] per distinct
//! developer id, each listing every record that referenced it.
//!
//! ## Tolerance
//!
//! Source data is heterogeneous. A record whose entity field is missing or
//! not an array contributes nothing, and array elements that are not objects
//! are skipped. Neither case is an error.

use crate::naming::{compare_ids, id_string};
use crate::types::{ItemRef, Record, SubEntity, field};
use serde_json::Value;
use std::collections::HashMap;

/// Build one [`SubEntity`] per distinct `id_key` found under `entity_key`.
///
/// - Identity is the stringified id; the first `name` seen wins.
/// - Every (record, element) pair appends one [`ItemRef`], so a record that
///   lists the same entity twice appears twice.
/// - The result is sorted by id via [`compare_ids`].
pub fn extract_entities<F>(
    items: &[Record],
    entity_key: &str,
    id_key: &str,
    link_fn: F,
) -> Vec<SubEntity>
where
    F: Fn(&Record) -> String,
{
    let mut by_id: HashMap<String, SubEntity> = HashMap::new();

    for record in items {
        let Some(entities) = record.get(entity_key).and_then(Value::as_array) else {
            if record.contains_key(entity_key) {
                tracing::debug!(
                    record = %id_string(field(record, "id")),
                    key = entity_key,
                    "skipping non-array entity field"
                );
            }
            continue;
        };

        for entity in entities.iter().filter_map(Value::as_object) {
            let id = id_string(field(entity, id_key));
            let sub = by_id.entry(id.clone()).or_insert_with(|| SubEntity {
                id,
                name: field(entity, "name").clone(),
                items: Vec::new(),
            });
            sub.items.push(ItemRef {
                id: field(record, "id").clone(),
                title: field(record, "title").clone(),
                image: field(record, "image").clone(),
                link: link_fn(record),
            });
        }
    }

    let mut entities: Vec<SubEntity> = by_id.into_values().collect();
    entities.sort_by(|a, b| compare_ids(&a.id, &b.id));
    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::records;
    use serde_json::json;

    fn post_link(record: &Record) -> String {
        format!("vn/posts/{}.json", id_string(field(record, "id")))
    }

    #[test]
    fn empty_input() {
        assert!(extract_entities(&[], "developers", "id", post_link).is_empty());
    }

    #[test]
    fn groups_records_by_entity() {
        let data = records(json!([
            {"id": 1, "title": "A", "image": "a.jpg", "developers": [{"id": 10, "name": "Dev"}]},
            {"id": 2, "title": "B", "developers": [{"id": 10, "name": "Dev"}, {"id": 11, "name": "Other"}]},
        ]));
        let devs = extract_entities(&data, "developers", "id", post_link);

        assert_eq!(devs.len(), 2);
        assert_eq!(devs[0].id, "10");
        assert_eq!(devs[0].items.len(), 2);
        assert_eq!(
            devs[0].items[0],
            ItemRef {
                id: json!(1),
                title: json!("A"),
                image: json!("a.jpg"),
                link: "vn/posts/1.json".into(),
            }
        );
        assert_eq!(devs[0].items[1].image, Value::Null);
        assert_eq!(devs[1].id, "11");
        assert_eq!(devs[1].items.len(), 1);
        assert_eq!(devs[1].items[0].link, "vn/posts/2.json");
    }

    #[test]
    fn first_name_wins() {
        let data = records(json!([
            {"id": 1, "title": "A", "developers": [{"id": "5", "name": "First"}]},
            {"id": 2, "title": "B", "developers": [{"id": "5", "name": "Second"}]},
        ]));
        let devs = extract_entities(&data, "developers", "id", post_link);
        assert_eq!(devs.len(), 1);
        assert_eq!(devs[0].name, json!("First"));
        assert_eq!(devs[0].items.len(), 2);
    }

    #[test]
    fn numeric_and_string_ids_dedup_together() {
        let data = records(json!([
            {"id": 1, "developers": [{"id": 5, "name": "N"}]},
            {"id": 2, "developers": [{"id": "5", "name": "S"}]},
        ]));
        let devs = extract_entities(&data, "developers", "id", post_link);
        assert_eq!(devs.len(), 1);
        assert_eq!(devs[0].name, json!("N"));
    }

    #[test]
    fn duplicate_reference_in_one_record_is_kept() {
        let data = records(json!([
            {"id": 1, "developers": [{"id": 5, "name": "D"}, {"id": 5, "name": "D"}]},
        ]));
        let devs = extract_entities(&data, "developers", "id", post_link);
        assert_eq!(devs[0].items.len(), 2);
    }

    #[test]
    fn malformed_shapes_are_skipped() {
        let data = records(json!([
            {"id": 1, "developers": "not an array"},
            {"id": 2},
            {"id": 3, "developers": [42, null, "x", {"id": 7, "name": "Ok"}]},
            {"id": 4, "developers": null},
        ]));
        let devs = extract_entities(&data, "developers", "id", post_link);
        assert_eq!(devs.len(), 1);
        assert_eq!(devs[0].id, "7");
        assert_eq!(devs[0].items[0].id, json!(3));
    }

    #[test]
    fn missing_entity_id_groups_under_null() {
        let data = records(json!([
            {"id": 1, "developers": [{"name": "Anon"}]},
        ]));
        let devs = extract_entities(&data, "developers", "id", post_link);
        assert_eq!(devs[0].id, "null");
    }

    #[test]
    fn output_sorted_numerically() {
        let data = records(json!([
            {"id": 1, "developers": [{"id": 10}, {"id": 9}, {"id": "p1"}, {"id": 100}]},
        ]));
        let ids: Vec<String> = extract_entities(&data, "developers", "id", post_link)
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["9", "10", "100", "p1"]);
    }

    #[test]
    fn custom_keys() {
        let data = records(json!([
            {"id": 1, "publishers": [{"pid": "x", "name": "Pub"}]},
        ]));
        let pubs = extract_entities(&data, "publishers", "pid", |r| {
            format!("custom/{}", id_string(field(r, "id")))
        });
        assert_eq!(pubs[0].id, "x");
        assert_eq!(pubs[0].items[0].link, "custom/1");
    }
}
