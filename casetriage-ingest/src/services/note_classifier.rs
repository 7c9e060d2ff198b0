//! Case note classification
//!
//! Extracts a service-request or incident reference from a free-text case
//! note (English or Arabic). Classification is a pure function of the note:
//! the note is lower-cased and scanned against an ordered rule table, and the
//! first accepted match wins.
//!
//! | # | Rule            | Kind     | Accepted prefixes |
//! |---|-----------------|----------|-------------------|
//! | 1 | SR keyword      | SR       | 14, 15            |
//! | 2 | Incident keyword| Incident | 21, 22            |
//! | 3 | Bare number     | SR       | 14, 15 (pattern)  |
//! | 4 | Bare number     | Incident | 21, 22 (pattern)  |
//! | 5 | Ticket keyword  | Incident | any               |
//!
//! Every match of a rule is tried in scan order before moving to the next
//! rule. Numbers keep their literal digits.

use crate::models::{ReferenceKind, TriageStatus};
use once_cell::sync::Lazy;
use regex::Regex;

/// Prefix requirement applied to a rule's captured number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixCheck {
    /// Every match is accepted
    Any,
    /// Number must start with one of these digit strings
    OneOf(&'static [&'static str]),
}

impl PrefixCheck {
    pub fn accepts(&self, number: &str) -> bool {
        match self {
            PrefixCheck::Any => true,
            PrefixCheck::OneOf(prefixes) => prefixes.iter().any(|p| number.starts_with(p)),
        }
    }
}

/// SR numbers start with 14 or 15
pub const SR_PREFIXES: &[&str] = &["14", "15"];

/// Incident numbers start with 21 or 22
pub const INCIDENT_PREFIXES: &[&str] = &["21", "22"];

/// One entry of the ordered rule table
#[derive(Debug)]
pub struct NoteRule {
    pub name: &'static str,
    /// Applied to the lower-cased note; capture group 1 is the number
    pub pattern: Regex,
    pub kind: ReferenceKind,
    pub prefix: PrefixCheck,
}

/// A rule hit that passed its prefix check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    /// Position of the rule in [`rules`]
    pub rule_index: usize,
    pub rule_name: &'static str,
    pub kind: ReferenceKind,
    pub number: String,
}

fn rule(name: &'static str, pattern: &str, kind: ReferenceKind, prefix: PrefixCheck) -> NoteRule {
    NoteRule {
        name,
        // Patterns are constants; a failure here is a programming error
        pattern: Regex::new(pattern).expect("note rule pattern must compile"),
        kind,
        prefix,
    }
}

static RULES: Lazy<Vec<NoteRule>> = Lazy::new(|| {
    vec![
        rule(
            "sr_keyword",
            r"(?:sr|service request|اس ار|طلب خدمة)\s*[:#]?\s*(\d{4,5})",
            ReferenceKind::ServiceRequest,
            PrefixCheck::OneOf(SR_PREFIXES),
        ),
        rule(
            "incident_keyword",
            r"(?:inc|incident|انسدنت|حالة)\s*[:#]?\s*(\d{4,5})",
            ReferenceKind::Incident,
            PrefixCheck::OneOf(INCIDENT_PREFIXES),
        ),
        rule(
            "bare_sr_number",
            r"\b(1[45]\d{2,3})\b",
            ReferenceKind::ServiceRequest,
            PrefixCheck::Any,
        ),
        rule(
            "bare_incident_number",
            r"\b(2[12]\d{2,3})\b",
            ReferenceKind::Incident,
            PrefixCheck::Any,
        ),
        rule(
            "ticket_keyword",
            r"(?:tkt|ticket|تيكت)\s*[_:]?\s*(\d{4,5})",
            ReferenceKind::Incident,
            PrefixCheck::Any,
        ),
    ]
});

/// The ordered rule table
pub fn rules() -> &'static [NoteRule] {
    &RULES
}

/// First accepted rule match for a note, if any
pub fn first_match<'a>(note: impl Into<Option<&'a str>>) -> Option<RuleMatch> {
    let note = note.into()?;
    if note.trim().is_empty() {
        return None;
    }

    let lowered = note.to_lowercase();

    for (rule_index, rule) in rules().iter().enumerate() {
        for caps in rule.pattern.captures_iter(&lowered) {
            let Some(number) = caps.get(1) else { continue };
            let number = number.as_str();
            if rule.prefix.accepts(number) {
                return Some(RuleMatch {
                    rule_index,
                    rule_name: rule.name,
                    kind: rule.kind,
                    number: number.to_string(),
                });
            }
        }
    }

    None
}

/// Classify a case note
///
/// Total and deterministic: empty, whitespace-only or absent notes and notes
/// without an accepted match are `NotTriaged`.
pub fn classify<'a>(note: impl Into<Option<&'a str>>) -> TriageStatus {
    match first_match(note) {
        Some(hit) => TriageStatus::pending(hit.kind, hit.number),
        None => TriageStatus::NotTriaged,
    }
}
