//! Shared test utilities for the vn-api-gen test suite.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let data = records(json!([{"id": 1, "title": "A"}]));
//! let tmp = TempDir::new().unwrap();
//! // ... generate into tmp ...
//! let index = read_json(tmp.path(), "vn/posts/index.json");
//! assert_eq!(index["pagination"]["totalPages"], 1);
//! ```

use serde_json::Value;
use std::path::Path;
use walkdir::WalkDir;

use crate::types::Record;

// =========================================================================
// Record construction
// =========================================================================

/// Convert a JSON array literal into records. Panics on non-object elements.
pub fn records(value: Value) -> Vec<Record> {
    let Value::Array(items) = value else {
        panic!("records() expects a JSON array, got {value}");
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => map,
            other => panic!("records() expects objects, got {other}"),
        })
        .collect()
}

/// `n` records with ids `1..=n`, each referencing one of three developers.
pub fn numbered_records(n: usize) -> Vec<Record> {
    let items: Vec<Value> = (1..=n)
        .map(|i| {
            let dev = 100 + (i % 3);
            serde_json::json!({
                "id": i,
                "title": format!("Title {i}"),
                "image": format!("https://img.example/{i}.jpg"),
                "description": format!("Description of title {i}"),
                "aliases": [format!("Alias {i}")],
                "developers": [{"id": dev, "name": format!("Developer {dev}")}],
            })
        })
        .collect();
    records(Value::Array(items))
}

// =========================================================================
// Output inspection — panics with a clear message on miss
// =========================================================================

/// Parse a generated file. Panics if it is missing or not JSON.
pub fn read_json(root: &Path, relative: &str) -> Value {
    let path = root.join(relative);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("could not read {}: {e}", path.display()));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("{} is not valid JSON: {e}", path.display()))
}

/// All files under `root`, as sorted root-relative `/`-separated paths.
///
/// A missing `root` yields an empty list.
pub fn list_files(root: &Path) -> Vec<String> {
    if !root.exists() {
        return Vec::new();
    }
    let mut out: Vec<String> = WalkDir::new(root)
        .into_iter()
        .map(|entry| entry.unwrap_or_else(|e| panic!("walking {}: {e}", root.display())))
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .unwrap_or_else(|e| panic!("{} outside root: {e}", entry.path().display()))
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    out.sort();
    out
}
