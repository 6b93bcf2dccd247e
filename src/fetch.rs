//! Source dataset loading.
//!
//! The dataset is one JSON array of objects. It is loaded in a single
//! request; there is no paging or streaming on the source side.
//!
//! A source beginning with `http://` or `https://` is fetched with a blocking
//! GET. Anything else is treated as a local file path, which keeps offline
//! builds and tests off the network.
//!
//! Every failure here is fatal for the run: transport errors, non-success
//! status codes, unreadable bodies, malformed JSON, and bodies that are not
//! an array of objects.

use crate::types::Record;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to fetch data. Status code: {0}")]
    Status(u16),
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Fetched data is not an array of objects")]
    NotArray,
}

/// Whether `source` names a remote URL rather than a local file.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Load the dataset from a URL or local path.
pub fn fetch_records(source: &str, timeout: Duration) -> Result<Vec<Record>, FetchError> {
    let body = if is_remote(source) {
        fetch_remote(source, timeout)?
    } else {
        std::fs::read_to_string(source).map_err(|source_err| FetchError::Io {
            path: PathBuf::from(source),
            source: source_err,
        })?
    };
    let records = parse_records(&body)?;
    tracing::info!(source, records = records.len(), "loaded dataset");
    Ok(records)
}

fn fetch_remote(url: &str, timeout: Duration) -> Result<String, FetchError> {
    tracing::info!(url, ?timeout, "fetching dataset");
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    Ok(response.text()?)
}

/// Parse a response body into records.
///
/// The body must be a JSON array whose elements are all objects.
pub fn parse_records(body: &str) -> Result<Vec<Record>, FetchError> {
    let Value::Array(items) = serde_json::from_str::<Value>(body)? else {
        return Err(FetchError::NotArray);
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(map),
            _ => Err(FetchError::NotArray),
        })
        .collect()
}
