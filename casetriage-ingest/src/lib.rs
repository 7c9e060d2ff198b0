//! casetriage-ingest library interface
//!
//! Turns case-export bytes of unknown encoding into classified case records
//! and per-reference groups.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod workflow;

pub use crate::config::IngestConfig;
pub use crate::error::{IngestError, IngestResult};
pub use crate::models::{
    CaseRecord, CaseRow, IngestReport, IngestWarning, ReferenceGroup, ReferenceKind,
    TriageStatus, TriageSummary,
};
pub use crate::workflow::{IngestedBatch, Pipeline};
