//! Case records and their triage status

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

/// Ticket category a reference number belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ReferenceKind {
    /// Service request (numbers prefixed 14/15)
    #[serde(rename = "SR")]
    ServiceRequest,
    /// Incident (numbers prefixed 21/22, or any ticket number)
    Incident,
}

impl ReferenceKind {
    /// Label used in status strings
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::ServiceRequest => "SR",
            ReferenceKind::Incident => "Incident",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Triage status extracted from a case note
///
/// Reference numbers are kept as their literal digit strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TriageStatus {
    NotTriaged,
    PendingSr(String),
    PendingIncident(String),
}

impl TriageStatus {
    /// Build a pending status for the given kind
    pub fn pending(kind: ReferenceKind, number: impl Into<String>) -> Self {
        match kind {
            ReferenceKind::ServiceRequest => TriageStatus::PendingSr(number.into()),
            ReferenceKind::Incident => TriageStatus::PendingIncident(number.into()),
        }
    }

    /// Reference number, empty when not triaged
    pub fn reference_number(&self) -> &str {
        match self {
            TriageStatus::NotTriaged => "",
            TriageStatus::PendingSr(n) | TriageStatus::PendingIncident(n) => n,
        }
    }

    /// Reference kind, `None` when not triaged
    pub fn kind(&self) -> Option<ReferenceKind> {
        match self {
            TriageStatus::NotTriaged => None,
            TriageStatus::PendingSr(_) => Some(ReferenceKind::ServiceRequest),
            TriageStatus::PendingIncident(_) => Some(ReferenceKind::Incident),
        }
    }

    pub fn is_pending(&self) -> bool {
        !matches!(self, TriageStatus::NotTriaged)
    }

    /// Human-readable label: `Not Triaged`, `Pending SR <n>` or `Pending Incident <n>`
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TriageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriageStatus::NotTriaged => f.write_str("Not Triaged"),
            TriageStatus::PendingSr(n) => write!(f, "Pending SR {}", n),
            TriageStatus::PendingIncident(n) => write!(f, "Pending Incident {}", n),
        }
    }
}

impl Serialize for TriageStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One typed row of a case export, before classification
///
/// Every text field is normalized: missing values are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseRow {
    pub case_id: String,
    pub current_user_id: String,
    pub case_start_date: NaiveDate,
    pub last_note_date: Option<NaiveDate>,
    pub sub_category: String,
    pub last_note: String,
}

/// A case row annotated with its triage status
///
/// Status and reference number are derived from `last_note` when the record
/// is built and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseRecord {
    #[serde(flatten)]
    case: CaseRow,
    status: TriageStatus,
    reference_number: String,
}

impl CaseRecord {
    /// Classify a row's note and attach the result
    pub fn annotate(case: CaseRow) -> Self {
        let status = crate::services::note_classifier::classify(case.last_note.as_str());
        let reference_number = status.reference_number().to_string();
        Self {
            case,
            status,
            reference_number,
        }
    }

    /// The typed row the status was derived from
    pub fn case(&self) -> &CaseRow {
        &self.case
    }

    pub fn status(&self) -> &TriageStatus {
        &self.status
    }

    /// Extracted reference number, empty when not triaged
    pub fn reference_number(&self) -> &str {
        &self.reference_number
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }
}
