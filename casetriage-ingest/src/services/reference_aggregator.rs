//! Grouping of classified cases by extracted reference
//!
//! Aggregation is a pure reduction: count, date minimum and set union are
//! associative and commutative, so large batches fold in parallel (rayon) and
//! merge per key. Output order never depends on input order.

use crate::config::IngestConfig;
use crate::models::{CaseRecord, ReferenceGroup, ReferenceKind, TriageSummary};
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Grouping key selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grouping {
    /// Reference number only
    #[default]
    Number,
    /// Reference kind and number
    KindAndNumber,
}

/// Status selection over a record set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    NotTriaged,
    Pending,
}

impl StatusFilter {
    pub fn matches(&self, record: &CaseRecord) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::NotTriaged => !record.is_pending(),
            StatusFilter::Pending => record.is_pending(),
        }
    }

    /// Records passing the filter, in input order
    pub fn apply<'a>(&self, records: &'a [CaseRecord]) -> Vec<&'a CaseRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

type GroupKey = (String, Option<ReferenceKind>);

#[derive(Debug, Clone)]
struct GroupAccumulator {
    case_count: usize,
    assignees: BTreeSet<String>,
    first_case_date: NaiveDate,
    categories: BTreeSet<String>,
}

impl GroupAccumulator {
    fn from_record(record: &CaseRecord) -> Self {
        let mut acc = Self {
            case_count: 0,
            assignees: BTreeSet::new(),
            first_case_date: record.case().case_start_date,
            categories: BTreeSet::new(),
        };
        acc.add(record);
        acc
    }

    fn add(&mut self, record: &CaseRecord) {
        self.case_count += 1;
        self.first_case_date = self.first_case_date.min(record.case().case_start_date);
        if !record.case().current_user_id.is_empty() {
            self.assignees.insert(record.case().current_user_id.clone());
        }
        if !record.case().sub_category.is_empty() {
            self.categories.insert(record.case().sub_category.clone());
        }
    }

    fn merge(&mut self, other: GroupAccumulator) {
        self.case_count += other.case_count;
        self.first_case_date = self.first_case_date.min(other.first_case_date);
        self.assignees.extend(other.assignees);
        self.categories.extend(other.categories);
    }
}

type GroupMap = BTreeMap<GroupKey, GroupAccumulator>;

fn fold_record(mut map: GroupMap, record: &CaseRecord, grouping: Grouping) -> GroupMap {
    if record.reference_number().is_empty() {
        return map;
    }

    let kind = match grouping {
        Grouping::Number => None,
        Grouping::KindAndNumber => record.status().kind(),
    };
    let key = (record.reference_number().to_string(), kind);

    match map.get_mut(&key) {
        Some(acc) => acc.add(record),
        None => {
            map.insert(key, GroupAccumulator::from_record(record));
        }
    }
    map
}

fn merge_maps(mut left: GroupMap, right: GroupMap) -> GroupMap {
    for (key, acc) in right {
        match left.get_mut(&key) {
            Some(existing) => existing.merge(acc),
            None => {
                left.insert(key, acc);
            }
        }
    }
    left
}

/// Reference aggregator
pub struct ReferenceAggregator {
    delimiter: String,
    parallel_threshold: usize,
}

impl ReferenceAggregator {
    pub fn new(config: &IngestConfig) -> Self {
        Self {
            delimiter: config.join_delimiter.clone(),
            parallel_threshold: config.parallel_threshold,
        }
    }

    /// Group pending records by reference number
    pub fn aggregate(&self, records: &[CaseRecord]) -> Vec<ReferenceGroup> {
        self.aggregate_by(records, Grouping::Number)
    }

    /// Group pending records by the selected key
    ///
    /// Records without a reference number are skipped. Groups are ordered by
    /// descending case count, then ascending reference number (then kind).
    pub fn aggregate_by(&self, records: &[CaseRecord], grouping: Grouping) -> Vec<ReferenceGroup> {
        let map = if records.len() >= self.parallel_threshold {
            records
                .par_iter()
                .fold(GroupMap::new, |map, record| fold_record(map, record, grouping))
                .reduce(GroupMap::new, merge_maps)
        } else {
            records
                .iter()
                .fold(GroupMap::new(), |map, record| fold_record(map, record, grouping))
        };

        let mut groups: Vec<ReferenceGroup> = map
            .into_iter()
            .map(|((reference_number, kind), acc)| ReferenceGroup {
                reference_number,
                kind,
                case_count: acc.case_count,
                assignees: join(&acc.assignees, &self.delimiter),
                first_case_date: acc.first_case_date,
                categories: join(&acc.categories, &self.delimiter),
            })
            .collect();

        groups.sort_by(|a, b| {
            b.case_count
                .cmp(&a.case_count)
                .then_with(|| a.reference_number.cmp(&b.reference_number))
                .then_with(|| a.kind.cmp(&b.kind))
        });

        debug!(groups = groups.len(), records = records.len(), "Aggregated references");
        groups
    }
}

impl Default for ReferenceAggregator {
    fn default() -> Self {
        Self::new(&IngestConfig::default())
    }
}

fn join(values: &BTreeSet<String>, delimiter: &str) -> String {
    values.iter().map(String::as_str).collect::<Vec<_>>().join(delimiter)
}

/// Total, pending and not-triaged counts
pub fn summarize(records: &[CaseRecord]) -> TriageSummary {
    let pending = records.iter().filter(|r| r.is_pending()).count();
    TriageSummary {
        total: records.len(),
        pending,
        not_triaged: records.len() - pending,
    }
}

/// Records linked to one reference number, newest start date first
pub fn cases_for_reference<'a>(records: &'a [CaseRecord], reference: &str) -> Vec<&'a CaseRecord> {
    let mut cases: Vec<&CaseRecord> = records
        .iter()
        .filter(|r| !reference.is_empty() && r.reference_number() == reference)
        .collect();
    cases.sort_by(|a, b| b.case().case_start_date.cmp(&a.case().case_start_date));
    cases
}
