//! Centralized path and link naming for the generated API tree.
//!
//! Every collection follows the same file layout under its base path:
//!
//! ```text
//! vn/posts/
//! ├── 1.json             # detail file, one per item, named by stringified id
//! ├── 2.json
//! ├── index.json         # page 1 of the listing
//! └── page/
//!     ├── 2.json         # pages 2..N
//!     └── 3.json
//! ```
//!
//! Page 1 is never materialized under `page/`. Links embedded in generated
//! files are the same root-relative strings used to name the files, so every
//! cross-reference goes through [`detail_path`] or [`page_path`].
//!
//! ## Id Stringification
//!
//! Source ids may be JSON strings or numbers. [`id_string`] turns any value
//! into the text used for dedup keys and file names:
//! - `"v17"` → `v17` (no quotes)
//! - `17` → `17`
//! - `null` or a missing field → `null`

use serde_json::Value;
use std::cmp::Ordering;

/// Stringify a JSON value for use as an identity or file stem.
pub fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Root-relative path of an item's detail file: `<base>/<id>.json`.
pub fn detail_path(base_path: &str, id: &str) -> String {
    format!("{}/{}.json", base_path, id)
}

/// Root-relative path of a listing page.
///
/// Page 1 lives at `<base>/index.json`; every later page at
/// `<base>/page/<n>.json`.
pub fn page_path(base_path: &str, page_number: usize) -> String {
    if page_number == 1 {
        format!("{}/index.json", base_path)
    } else {
        format!("{}/page/{}.json", base_path, page_number)
    }
}

/// Total order over stringified ids.
///
/// Ids that both parse as unsigned integers compare numerically (`9` < `10`).
/// Numeric ids sort before non-numeric ones; non-numeric ids compare as text.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
