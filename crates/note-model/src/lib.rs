//! Data model for structured clinical note records.
//!
//! Every type produced by the parsing pipeline lives here so that the
//! segmentation, extraction, and validation crates share one vocabulary and
//! downstream collaborators (template renderer, safety validator, plan
//! generator) can consume the record as JSON.

pub mod context;
pub mod error;
pub mod labs;
pub mod note;
pub mod section;
pub mod source;
pub mod vitals;

pub use context::{
    CausalLink, ClinicalContext, DisambiguatedDiagnosis, SeverityCue, TemporalCue, TemporalKind,
};
pub use error::{NoteError, Result};
pub use labs::{LabAnalyte, LabValue};
pub use note::{AllergyRecord, Demographics, Gender, ParseResult, ParsedNote};
pub use section::{SectionId, SectionMap};
pub use source::TextSource;
pub use vitals::{Measurement, Vitals, VitalsSource};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_result_round_trips_through_json() {
        let mut note = ParsedNote::default();
        note.sections
            .insert(SectionId::Assessment, "1. Chest pain".to_string());
        note.vitals.bp = Some("145/90".to_string());
        note.labs
            .insert(LabAnalyte::Troponin, LabValue::new(0.04));
        note.diagnoses.push("Chest pain".to_string());
        note.allergies = Some(AllergyRecord::NoKnownAllergies);

        let result = ParseResult {
            raw_sections: note.sections.clone(),
            data: note,
            warnings: vec!["No plan section detected".to_string()],
            confidence: 0.9,
        };

        let json = serde_json::to_string(&result).expect("serialize parse result");
        let round: ParseResult = serde_json::from_str(&json).expect("deserialize parse result");
        assert_eq!(round, result);
    }
}
