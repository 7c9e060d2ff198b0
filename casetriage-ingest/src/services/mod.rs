//! Ingestion services
//!
//! Leaves first: bytes are decoded, parsed into rows, classified and
//! optionally grouped by reference.

pub mod encoding_resolver;
pub mod file_source;
pub mod ingest_cache;
pub mod note_classifier;
pub mod reference_aggregator;
pub mod tabular_ingestor;

pub use encoding_resolver::{
    repair_double_encoded, Candidate, CharsetDetector, ChardetngDetector, DecodedText,
    EncodingResolver,
};
pub use file_source::{
    DefaultLocationSource, FileSource, MemorySource, PathSource, SourceFile, SourceRequest,
};
pub use ingest_cache::{content_hash, IngestCache};
pub use note_classifier::{classify, first_match, rules, NoteRule, PrefixCheck, RuleMatch};
pub use reference_aggregator::{
    cases_for_reference, summarize, Grouping, ReferenceAggregator, StatusFilter,
};
pub use tabular_ingestor::{ColumnMap, ParsedTable, TabularIngestor};
