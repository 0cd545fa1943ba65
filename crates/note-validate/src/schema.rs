//! Completeness validation of the assembled record.
//!
//! Checks never fail the parse; each missing expected structure becomes a
//! human-readable warning string. The `CRITICAL:` prefix is reserved for
//! the single case where both assessment and plan content are entirely
//! absent - a note that says nothing about what is wrong or what happens
//! next is unusable downstream.

use note_model::{ParsedNote, SectionId};

/// Prefix marking the one warning severe enough to dominate the confidence
/// score.
pub const CRITICAL_PREFIX: &str = "CRITICAL:";

/// Validates the completeness of a parsed note.
pub fn validate(note: &ParsedNote) -> Vec<String> {
    let mut warnings = Vec::new();

    let has_assessment = has_content(note, SectionId::Assessment);
    let has_plan = has_content(note, SectionId::Plan);

    match (has_assessment, has_plan) {
        (false, false) => warnings.push(format!(
            "{CRITICAL_PREFIX} no assessment or plan content found in note"
        )),
        (false, true) => warnings.push("No assessment section detected".to_string()),
        (true, false) => warnings.push("No plan section detected".to_string()),
        (true, true) => {}
    }

    if note.vitals.is_empty() {
        warnings.push("No vital signs extracted".to_string());
    }
    if note.labs.is_empty() {
        warnings.push("No laboratory values extracted".to_string());
    }
    if note.medications.is_empty() {
        warnings.push("No medications documented".to_string());
    }
    if note.allergies.is_none() {
        warnings.push("No allergy documentation found".to_string());
    }
    if note.diagnoses.is_empty() {
        warnings.push("No diagnoses identified".to_string());
    }
    if note.demographics.age.is_none() {
        warnings.push("Patient age not identified".to_string());
    }

    if !warnings.is_empty() {
        tracing::debug!(count = warnings.len(), "completeness warnings raised");
    }
    warnings
}

fn has_content(note: &ParsedNote, section: SectionId) -> bool {
    note.sections
        .get(&section)
        .is_some_and(|body| !body.trim().is_empty())
}
