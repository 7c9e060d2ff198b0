//! Error types for casetriage-ingest
//!
//! Ingestion either yields a complete batch or one of these errors. A
//! partially decoded or partially typed table is never surfaced.

use thiserror::Error;

/// Ingestion error type
#[derive(Debug, Error)]
pub enum IngestError {
    /// No candidate encoding decoded the byte buffer
    #[error("No encoding could decode the input (tried: {})", attempted.join(", "))]
    EncodingExhausted { attempted: Vec<String> },

    /// The file source had nothing to offer
    #[error("No input file selected")]
    NoSource,

    /// The file source failed while reading
    #[error("Source error: {0}")]
    Source(String),

    /// Delimited-text reader failure (e.g. unreadable header row)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl IngestError {
    /// Short machine-readable code for reports
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::EncodingExhausted { .. } => "ENCODING_EXHAUSTED",
            IngestError::NoSource => "NO_SOURCE",
            IngestError::Source(_) => "SOURCE_ERROR",
            IngestError::Csv(_) => "CSV_ERROR",
        }
    }
}

/// Result type for ingestion operations
pub type IngestResult<T> = Result<T, IngestError>;
