//! JSON file output and the run-wide file counter.
//!
//! [`JsonWriter`] is the only component that touches the output directory.
//! Paths handed to it are root-relative with `/` separators, exactly as they
//! appear in generated links. Each write:
//!
//! 1. Serializes the value as 2-space indented JSON (no trailing newline).
//! 2. Creates parent directories as needed.
//! 3. Overwrites any existing file at the path.
//! 4. Bumps the file counter and folds the path and bytes into a SHA-256
//!    digest of the whole run.
//!
//! The counter and digest live on the writer, so one writer threaded through
//! every generation pass is the single accumulator for a build. The digest
//! depends only on the sequence of (path, bytes) pairs, so two runs over the
//! same input report the same digest.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Refusing to write outside the output directory: {0}")]
    UnsafePath(String),
}

/// Writes JSON files beneath an output root and counts them.
#[derive(Debug)]
pub struct JsonWriter {
    root: PathBuf,
    files_written: usize,
    hasher: Sha256,
}

impl JsonWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files_written: 0,
            hasher: Sha256::new(),
        }
    }

    /// Output root all relative paths resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of files written so far, across every pass.
    pub fn files_written(&self) -> usize {
        self.files_written
    }

    /// Hex SHA-256 over every (path, bytes) pair written so far, in order.
    pub fn digest(&self) -> String {
        format!("{:x}", self.hasher.clone().finalize())
    }

    /// Serialize `value` to `<root>/<relative>` and return the full path.
    pub fn write<T: Serialize + ?Sized>(
        &mut self,
        relative: &str,
        value: &T,
    ) -> Result<PathBuf, WriteError> {
        let target = self.resolve(relative)?;
        let json = serde_json::to_string_pretty(value)?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| WriteError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&target, json.as_bytes()).map_err(|source| WriteError::Io {
            path: target.clone(),
            source,
        })?;

        self.hasher.update(relative.as_bytes());
        self.hasher.update(b"\0");
        self.hasher.update((json.len() as u64).to_le_bytes());
        self.hasher.update(json.as_bytes());
        self.files_written += 1;

        tracing::debug!(path = %target.display(), bytes = json.len(), "wrote file");
        Ok(target)
    }

    /// Join a relative path onto the root, rejecting anything that could
    /// escape it (absolute paths or `..` segments from odd ids).
    fn resolve(&self, relative: &str) -> Result<PathBuf, WriteError> {
        let rel = Path::new(relative);
        let safe = !relative.is_empty()
            && rel
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !safe {
            return Err(WriteError::UnsafePath(relative.to_string()));
        }
        Ok(self.root.join(rel))
    }
}
