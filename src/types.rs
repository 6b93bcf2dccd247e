//! Shared types used across the fetch, extract, and generate stages.

use serde::Serialize;
use serde_json::{Map, Value};

/// One source item, kept as an open JSON object so unknown fields survive.
pub type Record = Map<String, Value>;

/// Read a field from a record, treating a missing key as `null`.
pub fn field<'a>(record: &'a Record, key: &str) -> &'a Value {
    record.get(key).unwrap_or(&Value::Null)
}

/// Reference from a derived entity back to a record that mentions it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRef {
    pub id: Value,
    pub title: Value,
    pub image: Value,
    pub link: String,
}

/// A deduplicated entity derived by inverting records' embedded references
/// (e.g. a developer built from every visual novel that lists it).
#[derive(Debug, Clone, PartialEq)]
pub struct SubEntity {
    /// Stringified id, unique within a run.
    pub id: String,
    /// Name from the first reference encountered.
    pub name: Value,
    /// Every referencing record, in first-seen order.
    pub items: Vec<ItemRef>,
}

/// Navigation metadata embedded in every listing page.
///
/// Missing links serialize as `null`, never as absent keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub next_page: Option<String>,
    pub previous_page: Option<String>,
}
