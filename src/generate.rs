//! Paginated collection generation.
//!
//! A *collection* is an ordered list of items written under one base path.
//! [`generate_collection`] emits every file of a collection in two passes:
//!
//! 1. **Detail files**: one `<base>/<key>.json` per item, in input order.
//! 2. **Listing pages**: the items split by [`paginate`], page 1 at
//!    `<base>/index.json` and page n at `<base>/page/<n>.json`.
//!
//! What goes *into* each file is decided by the caller through two mappers,
//! so the same engine serves primary records and derived entities alike.
//! The page mapper receives the page slice plus ready-built [`Pagination`]
//! (which carries the page number and page count).
//!
//! ## Failure
//!
//! Generation is fail-fast and non-transactional: the first write error
//! aborts the collection and is returned as-is. Files written before the
//! failure stay on disk and remain counted by the writer.

use crate::naming::{detail_path, id_string, page_path};
use crate::paginate::{PaginationError, build_links, paginate};
use crate::types::{Pagination, Record, SubEntity, field};
use crate::writer::{JsonWriter, WriteError};
use serde::Serialize;
use std::num::NonZeroUsize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Write error: {0}")]
    Write(#[from] WriteError),
    #[error("Pagination error: {0}")]
    Pagination(#[from] PaginationError),
}

/// Anything that can be written as a detail file needs a stable file key.
pub trait Keyed {
    /// Stringified identity used for the detail file name.
    fn key(&self) -> String;
}

impl Keyed for Record {
    fn key(&self) -> String {
        id_string(field(self, "id"))
    }
}

impl Keyed for SubEntity {
    fn key(&self) -> String {
        self.id.clone()
    }
}

/// Relative paths written for one collection, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionReport {
    pub base_path: String,
    pub item_files: Vec<String>,
    pub page_files: Vec<String>,
}

impl CollectionReport {
    pub fn file_count(&self) -> usize {
        self.item_files.len() + self.page_files.len()
    }
}

/// Write detail files and listing pages for `items` under `base_path`.
///
/// Mappers borrow from `items`, so projections can hold references into the
/// source records instead of cloning them.
pub fn generate_collection<'a, T, I, P, IO, PO>(
    writer: &mut JsonWriter,
    items: &'a [T],
    page_size: NonZeroUsize,
    base_path: &str,
    item_mapper: I,
    page_mapper: P,
) -> Result<CollectionReport, GenerateError>
where
    T: Keyed,
    I: Fn(&'a T) -> IO,
    IO: Serialize,
    P: Fn(&'a [T], Pagination) -> PO,
    PO: Serialize,
{
    let mut report = CollectionReport {
        base_path: base_path.to_string(),
        ..Default::default()
    };

    for item in items {
        let path = detail_path(base_path, &item.key());
        writer.write(&path, &item_mapper(item))?;
        report.item_files.push(path);
    }

    let pages = paginate(items, page_size);
    let total_pages = pages.len();
    for (idx, page) in pages.into_iter().enumerate() {
        let page_number = idx + 1;
        let pagination = build_links(page_number, total_pages, base_path)?;
        let path = page_path(base_path, page_number);
        writer.write(&path, &page_mapper(page, pagination))?;
        report.page_files.push(path);
    }

    tracing::debug!(
        base_path,
        items = report.item_files.len(),
        pages = report.page_files.len(),
        "collection generated"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{list_files, numbered_records, read_json, records};
    use serde_json::{Value, json};
    use std::fs;
    use tempfile::TempDir;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn run(
        writer: &mut JsonWriter,
        items: &[Record],
        page_size: usize,
    ) -> Result<CollectionReport, GenerateError> {
        generate_collection(
            writer,
            items,
            size(page_size),
            "things",
            |r: &Record| json!({"id": r["id"]}),
            |page: &[Record], pagination| {
                json!({
                    "ids": page.iter().map(|r| r["id"].clone()).collect::<Vec<_>>(),
                    "pagination": pagination,
                })
            },
        )
    }

    #[test]
    fn empty_collection_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let mut writer = JsonWriter::new(tmp.path());
        let report = run(&mut writer, &[], 10).unwrap();
        assert_eq!(report.file_count(), 0);
        assert_eq!(writer.files_written(), 0);
        assert!(list_files(tmp.path()).is_empty());
    }

    #[test]
    fn writes_detail_and_index_files() {
        let tmp = TempDir::new().unwrap();
        let mut writer = JsonWriter::new(tmp.path());
        let report = run(&mut writer, &numbered_records(3), 10).unwrap();

        assert_eq!(
            report.item_files,
            vec!["things/1.json", "things/2.json", "things/3.json"]
        );
        assert_eq!(report.page_files, vec!["things/index.json"]);
        assert_eq!(writer.files_written(), 4);
        assert_eq!(read_json(tmp.path(), "things/2.json"), json!({"id": 2}));
    }

    #[test]
    fn pages_after_first_go_under_page_dir() {
        let tmp = TempDir::new().unwrap();
        let mut writer = JsonWriter::new(tmp.path());
        let report = run(&mut writer, &numbered_records(25), 10).unwrap();

        assert_eq!(
            report.page_files,
            vec!["things/index.json", "things/page/2.json", "things/page/3.json"]
        );
        assert!(!tmp.path().join("things/page/1.json").exists());
        assert_eq!(writer.files_written(), 28);
    }

    #[test]
    fn page_contents_and_links() {
        let tmp = TempDir::new().unwrap();
        let mut writer = JsonWriter::new(tmp.path());
        run(&mut writer, &numbered_records(25), 10).unwrap();

        let first = read_json(tmp.path(), "things/index.json");
        assert_eq!(first["ids"].as_array().unwrap().len(), 10);
        assert_eq!(
            first["pagination"],
            json!({"currentPage": 1, "totalPages": 3, "nextPage": "things/page/2.json", "previousPage": null})
        );

        let second = read_json(tmp.path(), "things/page/2.json");
        assert_eq!(second["ids"][0], json!(11));
        assert_eq!(second["pagination"]["previousPage"], json!("index.json"));

        let third = read_json(tmp.path(), "things/page/3.json");
        assert_eq!(third["ids"], json!([21, 22, 23, 24, 25]));
        assert_eq!(third["pagination"]["nextPage"], Value::Null);
        assert_eq!(
            third["pagination"]["previousPage"],
            json!("things/page/2.json")
        );
    }

    #[test]
    fn pages_reconstruct_input_order() {
        let tmp = TempDir::new().unwrap();
        let mut writer = JsonWriter::new(tmp.path());
        let data = numbered_records(23);
        let report = run(&mut writer, &data, 4).unwrap();

        let mut seen = Vec::new();
        for page in &report.page_files {
            let json = read_json(tmp.path(), page);
            seen.extend(json["ids"].as_array().unwrap().iter().cloned());
        }
        let expected: Vec<Value> = data.iter().map(|r| r["id"].clone()).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn counter_accumulates_across_collections() {
        let tmp = TempDir::new().unwrap();
        let mut writer = JsonWriter::new(tmp.path());
        run(&mut writer, &numbered_records(2), 10).unwrap();
        generate_collection(
            &mut writer,
            &numbered_records(1),
            size(10),
            "other",
            |r: &Record| r.clone(),
            |_: &[Record], p| p,
        )
        .unwrap();
        assert_eq!(writer.files_written(), 5);
    }

    #[test]
    fn string_ids_name_detail_files() {
        let tmp = TempDir::new().unwrap();
        let mut writer = JsonWriter::new(tmp.path());
        let data = records(json!([{"id": "v17"}, {"id": "v3"}]));
        let report = run(&mut writer, &data, 10).unwrap();
        assert_eq!(report.item_files, vec!["things/v17.json", "things/v3.json"]);
    }

    #[test]
    fn write_failure_aborts_and_keeps_partial_output() {
        let tmp = TempDir::new().unwrap();
        let mut writer = JsonWriter::new(tmp.path());
        // Second record's id escapes the output root.
        let data = records(json!([{"id": 1}, {"id": "../x"}, {"id": 3}]));
        let err = run(&mut writer, &data, 10).unwrap_err();

        assert!(matches!(err, GenerateError::Write(WriteError::UnsafePath(_))));
        assert_eq!(writer.files_written(), 1);
        assert!(tmp.path().join("things/1.json").exists());
        assert!(!tmp.path().join("things/3.json").exists());
        assert!(!tmp.path().join("things/index.json").exists());
    }

    #[test]
    fn io_failure_propagates() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("things"), "blocker").unwrap();
        let mut writer = JsonWriter::new(tmp.path());
        let err = run(&mut writer, &numbered_records(1), 10).unwrap_err();
        assert!(matches!(err, GenerateError::Write(WriteError::Io { .. })));
    }

    #[test]
    fn sub_entities_keyed_by_id() {
        let tmp = TempDir::new().unwrap();
        let mut writer = JsonWriter::new(tmp.path());
        let devs = vec![SubEntity {
            id: "10".into(),
            name: json!("Dev"),
            items: vec![],
        }];
        let report = generate_collection(
            &mut writer,
            &devs,
            size(10),
            "devs",
            |d: &SubEntity| json!({"name": d.name}),
            |_: &[SubEntity], p| p,
        )
        .unwrap();
        assert_eq!(report.item_files, vec!["devs/10.json"]);
    }
}
