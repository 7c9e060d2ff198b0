//! Non-fatal ingestion findings
//!
//! Warnings describe data that was skipped or repaired. They never stop a
//! batch; fatal conditions are `IngestError`s instead.

use serde::Serialize;

/// Warning raised while turning text into rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IngestWarning {
    /// A recognized column is absent; features that depend on it are disabled
    MissingColumn { column: String },
    /// A row was dropped because its case start date did not parse
    MalformedRow { line: u64, reason: String },
    /// The detector's guess failed and a fallback encoding was used
    EncodingFallback { guessed: String, used: String },
}

impl IngestWarning {
    /// Short machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            IngestWarning::MissingColumn { .. } => "MISSING_COLUMN",
            IngestWarning::MalformedRow { .. } => "MALFORMED_ROW",
            IngestWarning::EncodingFallback { .. } => "ENCODING_FALLBACK",
        }
    }
}

/// Counters and warnings gathered during one ingestion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Data rows read after the header
    pub rows_read: usize,
    /// Rows dropped for an unparseable case start date
    pub rows_dropped: usize,
    /// Findings in the order they were raised
    pub warnings: Vec<IngestWarning>,
}

impl IngestReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows that made it into the batch
    pub fn rows_kept(&self) -> usize {
        self.rows_read - self.rows_dropped
    }

    /// Count warnings with the given code
    pub fn count_by_code(&self, code: &str) -> usize {
        self.warnings.iter().filter(|w| w.code() == code).count()
    }
}
