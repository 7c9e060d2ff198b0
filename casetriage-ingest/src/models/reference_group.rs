//! Per-reference summaries built from classified records

use super::case_record::ReferenceKind;
use chrono::NaiveDate;
use serde::Serialize;

/// Cases sharing one extracted reference number
///
/// Recomputed from records on demand; never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceGroup {
    /// Reference number shared by every case in the group
    pub reference_number: String,
    /// Set when grouping by kind as well as number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ReferenceKind>,
    /// Number of cases linked to the reference
    pub case_count: usize,
    /// Distinct assignees, sorted and joined
    pub assignees: String,
    /// Earliest case start date in the group
    pub first_case_date: NaiveDate,
    /// Distinct sub-categories, sorted and joined
    pub categories: String,
}

/// Counts of triaged and untriaged cases in a record set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TriageSummary {
    pub total: usize,
    pub pending: usize,
    pub not_triaged: usize,
}
