//! Batch ingestion workflow
//!
//! One run turns a byte buffer into an annotated, immutable batch:
//! decode, parse, classify. Grouping is left to the caller.

pub mod pipeline;

pub use pipeline::{IngestedBatch, Pipeline};
