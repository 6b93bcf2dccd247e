//! Top-level build: dataset → posts → developers → search index.
//!
//! ```text
//! fetch        source      →  Vec<Record>
//! posts        records     →  vn/posts/{<id>,index,page/<n>}.json
//! developers   records     →  extract → vn/developers/{<id>,index,page/<n>}.json
//! search       records     →  vn/posts/search-index/<prefix>.json   (optional)
//! ```
//!
//! The projections written for each collection live here. Post detail files
//! link to developers and developer detail files link back to posts; both
//! directions go through [`naming::detail_path`](crate::naming::detail_path)
//! so the links agree with the file names even though they are built by
//! separate passes.
//!
//! Passes run strictly in order on one [`JsonWriter`], which keeps the run's
//! file count. Callers get progress through a `FnMut(BuildEvent)` hook.

use crate::config::{ApiConfig, ConfigError};
use crate::extract::extract_entities;
use crate::fetch::{FetchError, fetch_records};
use crate::generate::{CollectionReport, GenerateError, generate_collection};
use crate::naming::{detail_path, id_string};
use crate::paginate::page_count;
use crate::search::{build_index, write_index};
use crate::types::{ItemRef, Pagination, Record, SubEntity, field};
use crate::writer::{JsonWriter, WriteError};
use serde::Serialize;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use thiserror::Error;

pub const POSTS_BASE: &str = "vn/posts";
pub const DEVELOPERS_BASE: &str = "vn/developers";

/// Record field holding embedded developer references.
const DEVELOPERS_KEY: &str = "developers";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("Error generating {collection} files: {source}")]
    Generate {
        collection: &'static str,
        #[source]
        source: GenerateError,
    },
    #[error("Error writing search index: {0}")]
    Search(#[from] WriteError),
}

// ============================================================================
// Projections
// ============================================================================

/// Link to a post's detail file.
pub fn post_link(record: &Record) -> String {
    detail_path(POSTS_BASE, &id_string(field(record, "id")))
}

/// Link to a developer's detail file.
pub fn developer_link(id: &str) -> String {
    detail_path(DEVELOPERS_BASE, id)
}

#[derive(Debug, Serialize)]
pub struct DeveloperRef<'a> {
    pub name: &'a Value,
    pub id: &'a Value,
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct PostDetail<'a> {
    pub id: &'a Value,
    pub title: &'a Value,
    pub developers: Vec<DeveloperRef<'a>>,
    pub aliases: &'a Value,
    pub description: &'a Value,
    pub image: &'a Value,
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct PostSummary<'a> {
    pub id: &'a Value,
    pub title: &'a Value,
    pub image: &'a Value,
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct PostsPage<'a> {
    pub posts: Vec<PostSummary<'a>>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct DeveloperDetail<'a> {
    pub name: &'a Value,
    pub id: &'a str,
    pub posts: &'a [ItemRef],
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct DeveloperSummary<'a> {
    pub name: &'a Value,
    pub id: &'a str,
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct DevelopersPage<'a> {
    pub developers: Vec<DeveloperSummary<'a>>,
    pub pagination: Pagination,
}

/// Resolve a post's embedded developer references.
///
/// A missing or non-array field yields an empty list; non-object elements
/// are skipped, matching what [`extract_entities`] counts.
pub fn post_developers(record: &Record) -> Vec<DeveloperRef<'_>> {
    field(record, DEVELOPERS_KEY)
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .map(|dev| {
            let id = field(dev, "id");
            DeveloperRef {
                name: field(dev, "name"),
                id,
                link: developer_link(&id_string(id)),
            }
        })
        .collect()
}

pub fn post_detail(record: &Record) -> PostDetail<'_> {
    PostDetail {
        id: field(record, "id"),
        title: field(record, "title"),
        developers: post_developers(record),
        aliases: field(record, "aliases"),
        description: field(record, "description"),
        image: field(record, "image"),
        link: post_link(record),
    }
}

pub fn posts_page(page: &[Record], pagination: Pagination) -> PostsPage<'_> {
    PostsPage {
        posts: page
            .iter()
            .map(|record| PostSummary {
                id: field(record, "id"),
                title: field(record, "title"),
                image: field(record, "image"),
                link: post_link(record),
            })
            .collect(),
        pagination,
    }
}

pub fn developer_detail(dev: &SubEntity) -> DeveloperDetail<'_> {
    DeveloperDetail {
        name: &dev.name,
        id: &dev.id,
        posts: &dev.items,
        link: developer_link(&dev.id),
    }
}

pub fn developers_page(page: &[SubEntity], pagination: Pagination) -> DevelopersPage<'_> {
    DevelopersPage {
        developers: page
            .iter()
            .map(|dev| DeveloperSummary {
                name: &dev.name,
                id: &dev.id,
                link: developer_link(&dev.id),
            })
            .collect(),
        pagination,
    }
}

/// Invert the records' developer references into developer entities.
pub fn extract_developers(records: &[Record]) -> Vec<SubEntity> {
    extract_entities(records, DEVELOPERS_KEY, "id", post_link)
}

// ============================================================================
// Build
// ============================================================================

/// Progress reported while building.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    Fetched { records: usize },
    EmptySource,
    CollectionGenerated(CollectionReport),
    SearchIndexWritten { files: Vec<String> },
}

/// Result of a completed build.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub records: usize,
    pub developers: usize,
    pub files_written: usize,
    pub digest: String,
    pub elapsed: Duration,
}

/// What a build over `records` would write, without touching disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePlan {
    pub posts: usize,
    pub post_pages: usize,
    pub developers: usize,
    pub developer_pages: usize,
}

impl SitePlan {
    pub fn total_files(&self) -> usize {
        self.posts + self.post_pages + self.developers + self.developer_pages
    }
}

pub fn plan_site(records: &[Record], page_size: NonZeroUsize) -> SitePlan {
    let developers = extract_developers(records).len();
    SitePlan {
        posts: records.len(),
        post_pages: page_count(records.len(), page_size),
        developers,
        developer_pages: page_count(developers, page_size),
    }
}

/// Fetch the configured source and write the whole tree.
pub fn run_build<F>(
    config: &ApiConfig,
    writer: &mut JsonWriter,
    mut on_event: F,
) -> Result<BuildSummary, BuildError>
where
    F: FnMut(BuildEvent),
{
    let started = Instant::now();
    let records = fetch_records(&config.source.url, config.timeout())?;
    on_event(BuildEvent::Fetched {
        records: records.len(),
    });
    let mut summary = generate_site(&records, config, writer, on_event)?;
    summary.elapsed = started.elapsed();
    Ok(summary)
}

/// Write posts, developers, and (if enabled) the search index for `records`.
///
/// An empty record set writes nothing and is not an error.
pub fn generate_site<F>(
    records: &[Record],
    config: &ApiConfig,
    writer: &mut JsonWriter,
    mut on_event: F,
) -> Result<BuildSummary, BuildError>
where
    F: FnMut(BuildEvent),
{
    let started = Instant::now();
    let page_size = config.page_size()?;

    if records.is_empty() {
        tracing::warn!("no data found in source, skipping generation");
        on_event(BuildEvent::EmptySource);
        return Ok(BuildSummary {
            records: 0,
            developers: 0,
            files_written: writer.files_written(),
            digest: writer.digest(),
            elapsed: started.elapsed(),
        });
    }

    tracing::info!(records = records.len(), "generating posts");
    let posts = generate_collection(
        writer,
        records,
        page_size,
        POSTS_BASE,
        post_detail,
        posts_page,
    )
    .map_err(|source| BuildError::Generate {
        collection: "post",
        source,
    })?;
    on_event(BuildEvent::CollectionGenerated(posts));

    let developers = extract_developers(records);
    tracing::info!(developers = developers.len(), "generating developers");
    let dev_report = generate_collection(
        writer,
        &developers,
        page_size,
        DEVELOPERS_BASE,
        developer_detail,
        developers_page,
    )
    .map_err(|source| BuildError::Generate {
        collection: "developer",
        source,
    })?;
    on_event(BuildEvent::CollectionGenerated(dev_report));

    if config.search.enabled {
        tracing::info!("generating search index");
        let index = build_index(records, &config.search);
        let files = write_index(writer, &index, POSTS_BASE)?;
        on_event(BuildEvent::SearchIndexWritten { files });
    }

    Ok(BuildSummary {
        records: records.len(),
        developers: developers.len(),
        files_written: writer.files_written(),
        digest: writer.digest(),
        elapsed: started.elapsed(),
    })
}
