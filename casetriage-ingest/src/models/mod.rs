//! Data models for casetriage-ingest

pub mod case_record;
pub mod ingest_report;
pub mod reference_group;

pub use case_record::{CaseRecord, CaseRow, ReferenceKind, TriageStatus};
pub use ingest_report::{IngestReport, IngestWarning};
pub use reference_group::{ReferenceGroup, TriageSummary};
