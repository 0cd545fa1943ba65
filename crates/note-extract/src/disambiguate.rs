//! Diagnosis disambiguation.
//!
//! Consumes the raw diagnosis candidates plus the extracted context and
//! vitals, and produces a filtered, confidence-ranked list:
//!
//! 1. Acute supersedes chronic, scoped to the same clinical entity: a
//!    "chronic X" is removed only when a temporal cue marks X itself as
//!    acute/new/sudden. An acute cue for an unrelated entity leaves chronic
//!    diagnoses alone.
//! 2. Diagnoses covered by a negated phrase are dropped.
//! 3. Confidence starts at 1.0 and is discounted when a reassuring
//!    narrative ("stable", "improved") contradicts the measured vitals.
//! 4. Causality pairs whose effect matches the diagnosis contribute their
//!    cause as supporting evidence.

use std::cmp::Ordering;

use tracing::debug;

use note_model::{ClinicalContext, DisambiguatedDiagnosis, Vitals};

use crate::util::entity_matches;

/// Heart rate band consistent with a "stable" description.
const HR_RANGE: std::ops::RangeInclusive<u32> = 50..=120;

/// Systolic pressure below this contradicts any reassuring narrative.
const SYSTOLIC_FLOOR: u32 = 90;

/// Confidence after a stable/improved claim contradicted by heart rate.
const TACHYCARDIA_DISCOUNT: f64 = 0.7;

/// Confidence after the same claim with hypotension on top.
const HYPOTENSION_DISCOUNT: f64 = 0.6;

/// Filters and ranks diagnosis candidates. Output is sorted descending by
/// confidence; ties keep extraction order.
pub fn disambiguate(
    diagnoses: &[String],
    context: &ClinicalContext,
    vitals: &Vitals,
) -> Vec<DisambiguatedDiagnosis> {
    let acute_entities: Vec<&str> = context
        .temporal
        .iter()
        .filter(|cue| cue.is_acute())
        .map(|cue| cue.entity.as_str())
        .collect();

    let mut ranked = Vec::new();

    for diagnosis in diagnoses {
        // Acute supersedes chronic for the same entity. A diagnosis whose
        // own text carries an acute marker ("acute on chronic heart
        // failure") survives.
        let dx_lower = diagnosis.to_lowercase();
        let carries_acute = ["acute", "new", "sudden"]
            .iter()
            .any(|marker| dx_lower.contains(marker));
        if dx_lower.contains("chronic")
            && !carries_acute
            && acute_entities
                .iter()
                .any(|entity| entity_matches(entity, diagnosis))
        {
            debug!(diagnosis = %diagnosis, "chronic diagnosis superseded by acute marker");
            continue;
        }

        // Negated phrases remove the diagnosis outright.
        let negated = context.negations.iter().any(|phrase| {
            let phrase = phrase.to_lowercase();
            let dx = diagnosis.to_lowercase();
            phrase.contains(&dx) || dx.contains(&phrase)
        });
        if negated {
            debug!(diagnosis = %diagnosis, "diagnosis dropped by negation");
            continue;
        }

        let mut entry = DisambiguatedDiagnosis::new(diagnosis.clone());

        // Narrative optimism penalized against contradicting vitals.
        let reassuring = context
            .severity
            .iter()
            .find(|cue| cue.is_reassuring() && entity_matches(&cue.entity, diagnosis));
        if let Some(cue) = reassuring {
            if let Some(hr) = vitals.hr
                && !HR_RANGE.contains(&hr)
            {
                entry.confidence = TACHYCARDIA_DISCOUNT;
                entry.warnings.push(format!(
                    "{diagnosis} described as {} but heart rate {hr} is outside {}-{}",
                    cue.level,
                    HR_RANGE.start(),
                    HR_RANGE.end()
                ));
            }
            if let Some(systolic) = vitals.systolic()
                && systolic < SYSTOLIC_FLOOR
            {
                entry.confidence = entry.confidence.min(HYPOTENSION_DISCOUNT);
                entry.warnings.push(format!(
                    "{diagnosis} described as {} but systolic pressure {systolic} is below {SYSTOLIC_FLOOR}",
                    cue.level
                ));
            }
        }

        for link in &context.causality {
            if entity_matches(&link.effect, diagnosis) {
                entry.supporting_evidence.push(link.cause.clone());
            }
        }

        ranked.push(entry);
    }

    ranked.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    ranked
}
