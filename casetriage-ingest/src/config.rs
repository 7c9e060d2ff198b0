//! Ingestion configuration for casetriage-ingest
//!
//! Defaults reproduce the behaviour expected of case exports. The `[ingest]`
//! table of the TOML file overrides individual keys.

use casetriage_common::config::TomlConfig;
use casetriage_common::time::DAY_FIRST_FORMAT;
use tracing::debug;

/// Fallback encodings tried in order when the detector's guess fails
pub const DEFAULT_FALLBACK_ENCODINGS: &[&str] =
    &["utf-8-sig", "windows-1256", "iso-8859-6", "cp1256", "utf-8"];

/// Cell values treated as missing, in addition to empty cells
pub const DEFAULT_NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Batch size from which classification fans out across threads
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 2048;

/// Ingestion settings
#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    /// chrono format for `Case Start Date` and `Last Note Date`
    pub date_format: String,
    /// Encoding labels tried after the detector's guess
    pub fallback_encodings: Vec<String>,
    /// Cell values normalized to empty
    pub na_tokens: Vec<String>,
    /// Separator for joined assignee/category lists
    pub join_delimiter: String,
    /// Minimum batch size for parallel classification
    pub parallel_threshold: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            date_format: DAY_FIRST_FORMAT.to_string(),
            fallback_encodings: DEFAULT_FALLBACK_ENCODINGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            na_tokens: DEFAULT_NA_TOKENS.iter().map(|s| s.to_string()).collect(),
            join_delimiter: ", ".to_string(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl IngestConfig {
    /// Overlay the `[ingest]` table of a TOML config onto the defaults
    pub fn from_toml(config: &TomlConfig) -> Self {
        let section = &config.ingest;
        let mut resolved = Self::default();

        if let Some(format) = &section.date_format {
            resolved.date_format = format.clone();
        }
        if let Some(encodings) = &section.fallback_encodings {
            resolved.fallback_encodings = encodings.clone();
        }
        if let Some(tokens) = &section.na_tokens {
            resolved.na_tokens = tokens.clone();
        }
        if let Some(delimiter) = &section.join_delimiter {
            resolved.join_delimiter = delimiter.clone();
        }
        if let Some(threshold) = section.parallel_threshold {
            resolved.parallel_threshold = threshold;
        }

        debug!(
            date_format = %resolved.date_format,
            fallbacks = resolved.fallback_encodings.len(),
            na_tokens = resolved.na_tokens.len(),
            parallel_threshold = resolved.parallel_threshold,
            "Resolved ingest configuration"
        );

        resolved
    }

    /// Whether a raw cell counts as missing
    pub fn is_missing(&self, value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty() || self.na_tokens.iter().any(|t| t == trimmed)
    }
}
