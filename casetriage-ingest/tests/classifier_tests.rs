//! Note Classifier Tests
//! Test File: classifier_tests.rs
//! Covers rule precedence, prefix checks and bilingual keywords

use casetriage_ingest::models::{ReferenceKind, TriageStatus};
use casetriage_ingest::services::note_classifier::{classify, first_match, rules, PrefixCheck};

fn sr(n: &str) -> TriageStatus {
    TriageStatus::pending(ReferenceKind::ServiceRequest, n)
}

fn incident(n: &str) -> TriageStatus {
    TriageStatus::pending(ReferenceKind::Incident, n)
}

/// TC-CL-001: Empty and absent notes
#[test]
fn tc_cl_001_empty_and_absent_notes_are_not_triaged() {
    assert_eq!(classify(""), TriageStatus::NotTriaged);
    assert_eq!(classify(None), TriageStatus::NotTriaged);
}

/// TC-CL-002: Documented classification examples
#[test]
fn tc_cl_002_documented_examples() {
    assert_eq!(classify("SR 14321 opened yesterday"), sr("14321"));
    assert_eq!(classify("SR 19321"), TriageStatus::NotTriaged);
    assert_eq!(classify("incident 21987 escalated"), incident("21987"));
    assert_eq!(classify("Tkt_21905 raised"), incident("21905"));
}

/// TC-CL-003: Case insensitivity
#[test]
fn tc_cl_003_upper_case_gives_same_status() {
    let notes = [
        "sr 14321 opened",
        "Service Request #15777",
        "incident: 22001",
        "ticket 40404",
        "customer called, no reference",
        "waiting on 21555",
        "Tkt_21905 raised",
    ];

    for note in notes {
        // When: the same note is classified in both cases
        let lower = classify(note);
        let upper = classify(note.to_uppercase().as_str());

        // Then: the status is identical
        assert_eq!(lower, upper, "case changed the result for {note:?}");
    }
}

/// TC-CL-004: Determinism
#[test]
fn tc_cl_004_repeated_classification_is_stable() {
    let note = "اس ار 15123 و انسدنت 21456";
    let first = classify(note);
    for _ in 0..10 {
        assert_eq!(classify(note), first);
    }
}

/// TC-CL-005: Rule order beats position in the note
#[test]
fn tc_cl_005_rule_order_beats_position() {
    // Given: an incident keyword appears before an SR keyword
    let note = "incident 21987 raised, later sr 14321";

    // When/Then: the SR keyword rule runs first and wins
    assert_eq!(classify(note), sr("14321"));

    let matched = first_match(note).unwrap();
    assert_eq!(matched.rule_index, 0);
    assert_eq!(matched.rule_name, "sr_keyword");
}

/// TC-CL-006: Rejected keyword match falls through to later rules
#[test]
fn tc_cl_006_rejected_sr_falls_through_to_incident() {
    // Given: the SR number has a bad prefix, the incident number is valid
    let note = "sr 19321 closed, incident 22050 open";

    // Then: rule 2 picks up the incident
    assert_eq!(classify(note), incident("22050"));
}

/// TC-CL-007: Every keyword match is scanned
#[test]
fn tc_cl_007_later_keyword_match_is_accepted() {
    assert_eq!(classify("sr 19000 then sr 15000"), sr("15000"));
    assert_eq!(classify("incident 30000, incident 21000"), incident("21000"));
}

/// TC-CL-008: Incident keyword prefix check
#[test]
fn tc_cl_008_incident_keyword_requires_prefix() {
    assert_eq!(classify("incident 31987"), TriageStatus::NotTriaged);
    // Ticket keyword has no prefix check
    assert_eq!(classify("ticket 31987"), incident("31987"));
}

/// TC-CL-009: Bare numbers
#[test]
fn tc_cl_009_bare_numbers_infer_kind_from_prefix() {
    assert_eq!(classify("waiting on 14555"), sr("14555"));
    assert_eq!(classify("waiting on 1555"), sr("1555"));
    assert_eq!(classify("linked to 22001"), incident("22001"));
    assert_eq!(classify("linked to 2100"), incident("2100"));
    assert_eq!(classify("phone 0501234567"), TriageStatus::NotTriaged);
    assert_eq!(classify("order 31234"), TriageStatus::NotTriaged);
}

/// TC-CL-010: Arabic keywords
#[test]
fn tc_cl_010_arabic_keywords() {
    assert_eq!(classify("تم فتح طلب خدمة 14777"), sr("14777"));
    assert_eq!(classify("انسدنت 21456 مفتوح"), incident("21456"));
    assert_eq!(classify("تيكت 30001"), incident("30001"));
}

/// TC-CL-011: Digit strings are kept literally
#[test]
fn tc_cl_011_reference_keeps_leading_zeros() {
    let status = classify("ticket 00123");
    assert_eq!(status.reference_number(), "00123");
    assert_eq!(status.label(), "Pending Incident 00123");
}

/// TC-CL-012: Rule table shape
#[test]
fn tc_cl_012_rule_table_order_and_prefixes() {
    let table = rules();
    let names: Vec<&str> = table.iter().map(|r| r.name).collect();
    assert_eq!(
        names,
        [
            "sr_keyword",
            "incident_keyword",
            "bare_sr_number",
            "bare_incident_number",
            "ticket_keyword"
        ]
    );

    assert_eq!(table[4].kind, ReferenceKind::Incident);
    assert_eq!(table[4].prefix, PrefixCheck::Any);
    assert!(table[0].prefix.accepts("14001"));
    assert!(!table[0].prefix.accepts("21001"));
    assert!(table[1].prefix.accepts("22001"));
}

/// TC-CL-013: Reference non-empty iff pending
#[test]
fn tc_cl_013_reference_present_iff_pending() {
    let notes = ["", "hello", "SR 14321", "sr 19321", "tkt 1234", "21000", "اس ار 15123"];
    for note in notes {
        let status = classify(note);
        assert_eq!(
            status.is_pending(),
            !status.reference_number().is_empty(),
            "inconsistent status for {note:?}"
        );
    }
}
