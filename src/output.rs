//! CLI output formatting for the build.
//!
//! # Sampled File Lines
//!
//! A real dataset produces thousands of files, so each category (detail
//! files, listing pages, search shards) echoes only its first few paths and
//! then goes quiet. The run always ends with the total count, even when it
//! stopped on an error.
//!
//! ```text
//! Fetched 1523 records
//! vn/posts (1523 items, 153 pages)
//!     Generated item file: public/vn/posts/1.json
//!     Generated item file: public/vn/posts/2.json
//!     Generated item file: public/vn/posts/3.json
//!     Generated paginated file: public/vn/posts/index.json
//!     Generated paginated file: public/vn/posts/page/2.json
//!     Generated paginated file: public/vn/posts/page/3.json
//! vn/developers (402 items, 41 pages)
//!     ...
//! File generation time: 1.84s
//! Output digest: 6f1c...
//! Generated 2119 files in total.
//! ```
//!
//! # Architecture
//!
//! Each `format_*` function returns `Vec<String>` (or `String`) for
//! testability and has a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::pipeline::{BuildEvent, BuildSummary, SitePlan};
use std::path::Path;
use std::time::Duration;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Up to `limit` lines of `"{label}: {root}/{path}"`.
fn sample_lines(label: &str, root: &Path, paths: &[String], limit: usize) -> Vec<String> {
    paths
        .iter()
        .take(limit)
        .map(|p| format!("{}{}: {}", indent(1), label, root.join(p).display()))
        .collect()
}

/// Human-friendly duration: milliseconds under a second, else seconds.
pub fn format_elapsed(elapsed: Duration) -> String {
    if elapsed < Duration::from_secs(1) {
        format!("{}ms", elapsed.as_millis())
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    }
}

/// Final line of every run, successful or not.
pub fn format_total(files_written: usize) -> String {
    format!("Generated {} files in total.", files_written)
}

/// Format one progress event. `sample` caps the file lines per category.
pub fn format_build_event(event: &BuildEvent, root: &Path, sample: usize) -> Vec<String> {
    match event {
        BuildEvent::Fetched { records } => vec![format!("Fetched {} records", records)],
        BuildEvent::EmptySource => vec!["Warning: No data found. Exiting.".to_string()],
        BuildEvent::CollectionGenerated(report) => {
            let mut lines = vec![format!(
                "{} ({} items, {} pages)",
                report.base_path,
                report.item_files.len(),
                report.page_files.len()
            )];
            lines.extend(sample_lines(
                "Generated item file",
                root,
                &report.item_files,
                sample,
            ));
            lines.extend(sample_lines(
                "Generated paginated file",
                root,
                &report.page_files,
                sample,
            ));
            lines
        }
        BuildEvent::SearchIndexWritten { files } => {
            let mut lines = vec![format!("Search index ({} shards)", files.len())];
            lines.extend(sample_lines(
                "Generated search index file",
                root,
                files,
                sample,
            ));
            lines
        }
    }
}

/// Print one progress event to stdout.
pub fn print_build_event(event: &BuildEvent, root: &Path, sample: usize) {
    for line in format_build_event(event, root, sample) {
        println!("{}", line);
    }
}

/// Format the closing summary of a successful build.
pub fn format_summary(summary: &BuildSummary) -> Vec<String> {
    vec![
        format!("File generation time: {}", format_elapsed(summary.elapsed)),
        format!("Output digest: {}", summary.digest),
        format_total(summary.files_written),
    ]
}

/// Print the closing summary to stdout.
pub fn print_summary(summary: &BuildSummary) {
    for line in format_summary(summary) {
        println!("{}", line);
    }
}

/// Format a dry-run plan for the `check` command.
pub fn format_plan(plan: &SitePlan, page_size: usize) -> Vec<String> {
    vec![
        format!(
            "Posts: {} ({} pages of {})",
            plan.posts, plan.post_pages, page_size
        ),
        format!(
            "Developers: {} ({} pages of {})",
            plan.developers, plan.developer_pages, page_size
        ),
        format!("Would generate {} files", plan.total_files()),
    ]
}

/// Print a dry-run plan to stdout.
pub fn print_plan(plan: &SitePlan, page_size: usize) {
    for line in format_plan(plan, page_size) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
