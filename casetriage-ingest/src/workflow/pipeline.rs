//! Pipeline orchestrator
//!
//! bytes → EncodingResolver → TabularIngestor → CaseRow → classify → CaseRecord
//!
//! # Error Handling
//! - Encoding exhaustion and unreadable headers fail the whole batch
//! - Bad rows are dropped and reported, never surfaced half-typed
//! - Classification cannot fail
//!
//! # Example
//! ```rust,ignore
//! let pipeline = Pipeline::new(IngestConfig::default());
//! let batch = pipeline.ingest(&bytes)?;
//! ```

use crate::config::IngestConfig;
use crate::error::{IngestError, IngestResult};
use crate::models::{CaseRecord, CaseRow, IngestReport, IngestWarning};
use crate::services::encoding_resolver::EncodingResolver;
use crate::services::file_source::{FileSource, SourceRequest};
use crate::services::ingest_cache::content_hash;
use crate::services::tabular_ingestor::TabularIngestor;
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// Result of one successful ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedBatch {
    /// Annotated records in input row order
    pub records: Vec<CaseRecord>,
    pub report: IngestReport,
    /// Encoding that decoded the input
    pub encoding: &'static str,
    /// Detector guess, when there was one
    pub guessed: Option<&'static str>,
    /// SHA-256 hex of the raw input
    pub content_hash: String,
}

impl IngestedBatch {
    /// True when nothing usable was ingested
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Ingestion pipeline
pub struct Pipeline {
    config: IngestConfig,
    resolver: EncodingResolver,
    ingestor: TabularIngestor,
}

impl Pipeline {
    /// Create pipeline with configuration
    pub fn new(config: IngestConfig) -> Self {
        let resolver = EncodingResolver::with_fallbacks(&config.fallback_encodings);
        let ingestor = TabularIngestor::new(config.clone());
        Self {
            config,
            resolver,
            ingestor,
        }
    }

    /// Replace the encoding resolver
    pub fn with_resolver(mut self, resolver: EncodingResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Ingest a raw byte buffer
    pub fn ingest(&self, bytes: &[u8]) -> IngestResult<IngestedBatch> {
        let content_hash = content_hash(bytes);
        info!(bytes = bytes.len(), hash = %content_hash, "Pipeline ingesting buffer");

        let decoded = self.resolver.resolve(bytes)?;
        debug!(encoding = decoded.encoding, chars = decoded.text.len(), "Decoded input");

        let parsed = self.ingestor.parse(&decoded.text)?;
        let mut report = parsed.report;

        if decoded.used_fallback {
            let guessed = decoded.guessed.unwrap_or("none");
            warn!(guessed, used = decoded.encoding, "Decoded with fallback encoding");
            report.warnings.insert(
                0,
                IngestWarning::EncodingFallback {
                    guessed: guessed.to_string(),
                    used: decoded.encoding.to_string(),
                },
            );
        }

        let records = self.classify_rows(parsed.rows);
        let pending = records.iter().filter(|r| r.is_pending()).count();

        info!(
            records = records.len(),
            pending,
            kept = report.rows_kept(),
            dropped = report.rows_dropped,
            encoding = decoded.encoding,
            "Pipeline complete"
        );

        Ok(IngestedBatch {
            records,
            report,
            encoding: decoded.encoding,
            guessed: decoded.guessed,
            content_hash,
        })
    }

    /// Fetch bytes from a source and ingest them
    ///
    /// A source with nothing to offer is `NoSource`.
    pub fn ingest_from(
        &self,
        source: &dyn FileSource,
        request: &SourceRequest,
    ) -> IngestResult<IngestedBatch> {
        let file = source.fetch(request)?.ok_or(IngestError::NoSource)?;
        info!(name = %file.name, "Ingesting from source");
        self.ingest(&file.bytes)
    }

    /// Annotate rows with their triage status, preserving row order
    pub fn classify_rows(&self, rows: Vec<CaseRow>) -> Vec<CaseRecord> {
        if rows.len() >= self.config.parallel_threshold {
            debug!(rows = rows.len(), "Classifying in parallel");
            rows.into_par_iter().map(CaseRecord::annotate).collect()
        } else {
            rows.into_iter().map(CaseRecord::annotate).collect()
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(IngestConfig::default())
    }
}
