//! Generator configuration module.
//!
//! Handles loading, validating, and merging `vn-api.toml`. Stock defaults
//! reproduce the stock build (remote dataset, `public/` output, ten items per
//! page); a config file only needs the keys it wants to change, and CLI flags
//! override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [source]
//! url = "https://raw.githubusercontent.com/YuushaExa/testapi/refs/heads/main/merged.json"
//! timeout_secs = 30         # Deadline for the dataset request
//!
//! [output]
//! dir = "public"            # Output root for the generated tree
//! page_size = 10            # Items per listing page
//! sample_lines = 3          # Generated-file lines echoed per category
//!
//! [search]
//! enabled = false           # Write vn/posts/search-index/<prefix>.json shards
//! prefix_len = 2            # Characters per shard prefix
//! min_word_len = 2          # Shorter words are not indexed
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Default dataset location.
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/YuushaExa/testapi/refs/heads/main/merged.json";

/// Generator configuration loaded from `vn-api.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Where the dataset comes from.
    pub source: SourceConfig,
    /// Where and how the tree is written.
    pub output: OutputConfig,
    /// Optional search index.
    pub search: SearchConfig,
}

impl ApiConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.url.trim().is_empty() {
            return Err(ConfigError::Validation("source.url must not be empty".into()));
        }
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "source.timeout_secs must be positive".into(),
            ));
        }
        if self.output.dir.trim().is_empty() {
            return Err(ConfigError::Validation("output.dir must not be empty".into()));
        }
        if self.output.page_size == 0 {
            return Err(ConfigError::Validation(
                "output.page_size must be positive".into(),
            ));
        }
        if self.search.prefix_len == 0 {
            return Err(ConfigError::Validation(
                "search.prefix_len must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Page size as a non-zero count. Fails only if [`validate`](Self::validate) would.
    pub fn page_size(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.output.page_size)
            .ok_or_else(|| ConfigError::Validation("output.page_size must be positive".into()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_secs)
    }
}

/// Dataset source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// HTTP(S) URL or local path of the JSON array.
    pub url: String,
    /// Request deadline in seconds.
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Output tree settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Output root directory.
    pub dir: String,
    /// Items per listing page.
    pub page_size: usize,
    /// Generated-file paths echoed per category before going quiet.
    pub sample_lines: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "public".to_string(),
            page_size: 10,
            sample_lines: 3,
        }
    }
}

/// Search index settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub enabled: bool,
    /// Characters of each word used as its shard name.
    pub prefix_len: usize,
    /// Words shorter than this are not indexed.
    pub min_word_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            prefix_len: 2,
            min_word_len: 2,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ApiConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value and deserialize, without validating.
pub fn merge_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ApiConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    Ok(merged.try_into()?)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ApiConfig, ConfigError> {
    let config = merge_config(base, overlay)?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults if it is absent.
pub fn load_config(path: &Path) -> Result<ApiConfig, ConfigError> {
    load_config_with(path, &ConfigOverrides::default())
}

/// Settings that replace whatever the config file says (CLI flags).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub source: Option<String>,
    pub output_dir: Option<String>,
    pub page_size: Option<usize>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut ApiConfig) {
        if let Some(source) = &self.source {
            config.source.url = source.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if let Some(page_size) = self.page_size {
            config.output.page_size = page_size;
        }
    }
}

/// Load config from `path`, apply `overrides`, then validate the result once.
///
/// An invalid file value that an override replaces is never an error.
pub fn load_config_with(
    path: &Path,
    overrides: &ConfigOverrides,
) -> Result<ApiConfig, ConfigError> {
    let overlay = load_raw_config(path)?;
    let mut config = merge_config(stock_defaults_value(), overlay)?;
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `vn-api.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# vn-api-gen Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Source dataset
# ---------------------------------------------------------------------------
[source]
# A JSON array of objects. http(s) URLs are fetched; anything else is read
# as a local file path.
url = "https://raw.githubusercontent.com/YuushaExa/testapi/refs/heads/main/merged.json"

# Deadline for the dataset request, in seconds.
timeout_secs = 30

# ---------------------------------------------------------------------------
# Output tree
# ---------------------------------------------------------------------------
[output]
# Root directory for vn/posts/ and vn/developers/.
dir = "public"

# Items per listing page (index.json, page/<n>.json).
page_size = 10

# How many generated-file paths to echo per category.
sample_lines = 3

# ---------------------------------------------------------------------------
# Search index
# ---------------------------------------------------------------------------
[search]
# Write vn/posts/search-index/<prefix>.json shards mapping words to post ids.
enabled = false

# Characters of each word used as its shard name.
prefix_len = 2

# Words shorter than this are not indexed.
min_word_len = 2
"##
}
