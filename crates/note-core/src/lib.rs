//! Clinical note parsing core.
//!
//! Converts free-form, inconsistently formatted clinical encounter notes
//! (ED notes, hospital-medicine progress notes, cardiology consults) into a
//! structured, typed record of clinical facts: vitals, labs, medications,
//! allergies, diagnoses, demographics, dates, and the contextual qualifiers
//! used to rank diagnoses.
//!
//! The crate is an in-process library boundary only. Downstream
//! collaborators (template rendering, safety validation, plan generation)
//! consume the [`ParseResult`] and must treat every field as optional.
//!
//! ```
//! use note_core::parse;
//!
//! let result = parse("BP 145/90\nHR 88 bpm\n\nAssessment:\n1. Chest pain\n\nPlan:\n- serial troponins");
//! assert_eq!(result.data.vitals.bp.as_deref(), Some("145/90"));
//! assert!(result.confidence > 0.0);
//! ```

pub mod parser;

pub use parser::{Parser, parse};

pub use note_model::{
    AllergyRecord, CausalLink, ClinicalContext, Demographics, DisambiguatedDiagnosis, Gender,
    LabAnalyte, LabValue, Measurement, NoteError, ParseResult, ParsedNote, SectionId, SectionMap,
    SeverityCue, TemporalCue, TemporalKind, TextSource, Vitals, VitalsSource,
};
pub use note_segment::{HeaderLexicon, MAX_INPUT_LEN, Normalized, Segmenter, normalize};
pub use note_validate::{CRITICAL_PREFIX, validate};
