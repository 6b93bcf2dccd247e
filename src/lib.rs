//! # vn-api-gen
//!
//! Turns a flat JSON dataset of visual novels into a static, paginated JSON
//! API. The output is plain files that any static host can serve read-only:
//! no server, no database, no runtime.
//!
//! # Architecture: Fetch, Then Sequential Passes
//!
//! ```text
//! 1. Fetch       source URL/path  →  Vec<Record>
//! 2. Posts       records          →  vn/posts/…        (detail + listing pages)
//! 3. Developers  records          →  vn/developers/…   (reverse index + pages)
//! 4. Search      records          →  vn/posts/search-index/…   (optional)
//! ```
//!
//! Every pass writes through one [`writer::JsonWriter`], which owns the run's
//! file counter and output digest. Passes run one after another with no
//! parallel writes, so the same input always produces the same tree.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`pipeline`] | Orchestrates the passes and defines the post/developer projections |
//! | [`generate`] | Reusable collection engine: detail files plus paginated listings |
//! | [`paginate`] | Page splitting and `nextPage`/`previousPage` links |
//! | [`extract`] | Reverse index from embedded sub-entities back to records |
//! | [`search`] | Prefix-sharded word index over titles and descriptions |
//! | [`fetch`] | Loads the dataset from HTTP(S) or a local file |
//! | [`writer`] | Indented JSON file output, file counter, output digest |
//! | [`naming`] | File and link naming conventions, id stringification and ordering |
//! | [`config`] | `vn-api.toml` loading, merging over defaults, validation |
//! | [`types`] | Shared types (`Record`, `SubEntity`, `Pagination`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Records Stay Schemaless
//!
//! Source records are `serde_json::Map`s rather than structs. The dataset is
//! heterogeneous, and projections pass field values through untouched
//! (a missing field becomes `null`), so no schema needs to be kept in sync.
//!
//! ## Sorted Derived Entities
//!
//! Developers are emitted sorted by id (numeric ids numerically) so pages of
//! the developer listing are stable across runs.
//!
//! ## Lenient Data, Strict I/O
//!
//! Malformed optional structure in a record (a `developers` field that is not
//! an array, a non-object element) is skipped. Fetch and write failures abort
//! the run; files already written are left in place.

pub mod config;
pub mod extract;
pub mod fetch;
pub mod generate;
pub mod naming;
pub mod output;
pub mod paginate;
pub mod pipeline;
pub mod search;
pub mod types;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_helpers;
