//! Delimited text to typed case rows
//!
//! Reads a header row, locates the recognized columns by name and turns each
//! data row into a [`CaseRow`]:
//! - Absent columns disable what depends on them; they never fail the parse
//! - Dates use the configured day-first format; non-matching values are missing
//! - Rows without a valid `Case Start Date` are dropped and counted
//! - Missing values (empty cells and NA markers) become empty strings
//! - The note column gets the double-encoding repair; no other column does

use super::encoding_resolver::repair_double_encoded;
use crate::config::IngestConfig;
use crate::error::IngestResult;
use crate::models::{CaseRow, IngestReport, IngestWarning};
use casetriage_common::time::parse_date;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

pub const CASE_ID: &str = "Case Id";
pub const CURRENT_USER_ID: &str = "Current User Id";
pub const CASE_START_DATE: &str = "Case Start Date";
pub const LAST_NOTE_DATE: &str = "Last Note Date";
pub const SUB_CATEGORY: &str = "Sub Category";
pub const LAST_NOTE: &str = "Last Note";

/// Recognized column names, in report order
pub const RECOGNIZED_COLUMNS: &[&str] = &[
    CASE_ID,
    CURRENT_USER_ID,
    CASE_START_DATE,
    LAST_NOTE_DATE,
    SUB_CATEGORY,
    LAST_NOTE,
];

/// Positions of recognized columns in the header row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub case_id: Option<usize>,
    pub current_user_id: Option<usize>,
    pub case_start_date: Option<usize>,
    pub last_note_date: Option<usize>,
    pub sub_category: Option<usize>,
    pub last_note: Option<usize>,
}

impl ColumnMap {
    /// Locate recognized columns; the first occurrence of a name wins
    pub fn from_headers(headers: &StringRecord) -> Self {
        let position = |name: &str| headers.iter().position(|h| clean_header(h) == name);
        Self {
            case_id: position(CASE_ID),
            current_user_id: position(CURRENT_USER_ID),
            case_start_date: position(CASE_START_DATE),
            last_note_date: position(LAST_NOTE_DATE),
            sub_category: position(SUB_CATEGORY),
            last_note: position(LAST_NOTE),
        }
    }

    /// Recognized columns absent from the header
    pub fn missing(&self) -> Vec<&'static str> {
        let slots = [
            self.case_id,
            self.current_user_id,
            self.case_start_date,
            self.last_note_date,
            self.sub_category,
            self.last_note,
        ];
        RECOGNIZED_COLUMNS
            .iter()
            .zip(slots)
            .filter(|(_, slot)| slot.is_none())
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Header cells may carry a stray byte-order mark or padding
fn clean_header(header: &str) -> &str {
    header.trim_start_matches('\u{feff}').trim()
}

/// Rows and findings from one parse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    pub rows: Vec<CaseRow>,
    pub columns: ColumnMap,
    pub report: IngestReport,
}

/// Tabular ingestor
pub struct TabularIngestor {
    config: IngestConfig,
}

impl TabularIngestor {
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    /// Parse decoded text into case rows
    ///
    /// Only an unreadable header is an error. Empty input yields an empty table.
    pub fn parse(&self, text: &str) -> IngestResult<ParsedTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let columns = ColumnMap::from_headers(&headers);
        let mut report = IngestReport::new();

        for column in columns.missing() {
            warn!(column, "Recognized column absent from input");
            report.warnings.push(IngestWarning::MissingColumn {
                column: column.to_string(),
            });
        }

        let mut rows = Vec::new();

        for result in reader.records() {
            report.rows_read += 1;

            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or(0);
                    warn!(line, error = %e, "Unreadable row dropped");
                    report.rows_dropped += 1;
                    report.warnings.push(IngestWarning::MalformedRow {
                        line,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let Some(start_idx) = columns.case_start_date else {
                // Column absence is already reported once
                report.rows_dropped += 1;
                continue;
            };

            let raw_start = record.get(start_idx).unwrap_or("");
            let Some(case_start_date) = self.date(raw_start) else {
                debug!(line, value = raw_start, "Case start date did not parse");
                report.rows_dropped += 1;
                report.warnings.push(IngestWarning::MalformedRow {
                    line,
                    reason: format!("unparseable {} '{}'", CASE_START_DATE, raw_start),
                });
                continue;
            };

            let last_note_date = columns
                .last_note_date
                .and_then(|idx| record.get(idx))
                .and_then(|value| self.date(value));

            let last_note = self.text(&record, columns.last_note);
            let last_note = repair_double_encoded(&last_note);

            rows.push(CaseRow {
                case_id: self.text(&record, columns.case_id),
                current_user_id: self.text(&record, columns.current_user_id),
                case_start_date,
                last_note_date,
                sub_category: self.text(&record, columns.sub_category),
                last_note,
            });
        }

        if report.rows_dropped > 0 {
            warn!(
                dropped = report.rows_dropped,
                read = report.rows_read,
                "Rows dropped for invalid case start date"
            );
        }

        info!(
            rows = rows.len(),
            read = report.rows_read,
            dropped = report.rows_dropped,
            "Parsed case table"
        );

        Ok(ParsedTable {
            rows,
            columns,
            report,
        })
    }

    /// Normalized text cell; missing columns and NA markers give ""
    fn text(&self, record: &StringRecord, idx: Option<usize>) -> String {
        match idx.and_then(|i| record.get(i)) {
            Some(value) if !self.config.is_missing(value) => value.to_string(),
            _ => String::new(),
        }
    }

    fn date(&self, value: &str) -> Option<NaiveDate> {
        if self.config.is_missing(value) {
            return None;
        }
        parse_date(value, &self.config.date_format)
    }
}

impl Default for TabularIngestor {
    fn default() -> Self {
        Self::new(IngestConfig::default())
    }
}
