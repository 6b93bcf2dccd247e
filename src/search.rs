//! Prefix-sharded search index over record titles and descriptions.
//!
//! Clients look a word up by fetching the shard for its first few letters:
//!
//! ```text
//! vn/posts/search-index/
//! ├── ev.json     {"ever17": [1], "evening": [4, 9]}
//! └── re.json     {"remember11": [2]}
//! ```
//!
//! Tokenizing lowercases the text, drops everything outside `[a-z0-9]` and
//! whitespace, splits on whitespace, and keeps words at least
//! `min_word_len` characters long. A word shorter than the prefix length
//! has no shard and is skipped.

use crate::config::SearchConfig;
use crate::naming::id_string;
use crate::types::{Record, field};
use crate::writer::{JsonWriter, WriteError};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Shard prefix → word → record ids (first-seen order, deduplicated).
pub type SearchIndex = BTreeMap<String, BTreeMap<String, Vec<Value>>>;

/// Split text into lowercase alphanumeric words.
pub fn tokenize(text: &str, min_word_len: usize) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    cleaned
        .split_whitespace()
        .filter(|w| w.len() >= min_word_len)
        .map(str::to_string)
        .collect()
}

/// Build the sharded index for `records`.
///
/// Records without an `id` are skipped.
pub fn build_index(records: &[Record], config: &SearchConfig) -> SearchIndex {
    let mut index = SearchIndex::new();
    // (word, stringified id) pairs already indexed.
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for record in records {
        let id = field(record, "id");
        if id.is_null() {
            tracing::debug!("skipping record without id in search index");
            continue;
        }

        let mut words = BTreeSet::new();
        for key in ["title", "description"] {
            if let Some(text) = field(record, key).as_str() {
                words.extend(tokenize(text, config.min_word_len));
            }
        }

        let key = id_string(id);
        for word in words {
            let Some(prefix) = word.get(..config.prefix_len) else {
                continue;
            };
            if !seen.insert((word.clone(), key.clone())) {
                continue;
            }
            index
                .entry(prefix.to_string())
                .or_default()
                .entry(word)
                .or_default()
                .push(id.clone());
        }
    }

    index
}

/// Write one shard file per prefix under `<base_path>/search-index/`.
///
/// Returns the relative paths written, in sorted prefix order.
pub fn write_index(
    writer: &mut JsonWriter,
    index: &SearchIndex,
    base_path: &str,
) -> Result<Vec<String>, WriteError> {
    let mut written = Vec::with_capacity(index.len());
    for (prefix, words) in index {
        let path = format!("{}/search-index/{}.json", base_path, prefix);
        writer.write(&path, words)?;
        written.push(path);
    }
    Ok(written)
}
