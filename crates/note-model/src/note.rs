//! The root structured record produced by a parse.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::context::{ClinicalContext, DisambiguatedDiagnosis};
use crate::labs::{LabAnalyte, LabValue};
use crate::section::SectionMap;
use crate::vitals::Vitals;

/// Patient gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// Patient demographics. All fields optional; absence means "not documented".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub mrn: Option<String>,
    /// Date of birth, ISO-8601 when it could be normalized.
    pub dob: Option<String>,
}

impl Demographics {
    pub fn is_empty(&self) -> bool {
        self.age.is_none() && self.gender.is_none() && self.mrn.is_none() && self.dob.is_none()
    }
}

/// Documented allergy status.
///
/// Distinguishes "explicitly none" from "not documented": a note with no
/// allergy evidence at all yields no `AllergyRecord`, while an explicit
/// "NKDA" yields `NoKnownAllergies`. A `Listed` record is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllergyRecord {
    NoKnownAllergies,
    Listed(Vec<String>),
}

impl AllergyRecord {
    /// Allergen strings for display; the NKDA sentinel renders as itself.
    pub fn entries(&self) -> Vec<String> {
        match self {
            Self::NoKnownAllergies => vec!["NKDA".to_string()],
            Self::Listed(items) => items.clone(),
        }
    }
}

/// The structured record of clinical facts extracted from one note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedNote {
    /// Canonical section bodies, plus the reserved full-text entry.
    pub sections: SectionMap,
    pub vitals: Vitals,
    pub labs: BTreeMap<LabAnalyte, LabValue>,
    /// Free-text medication strings as documented.
    pub medications: Vec<String>,
    /// `None` when the note documents nothing about allergies.
    pub allergies: Option<AllergyRecord>,
    /// Deduplicated diagnosis list (case-insensitive, first spelling wins).
    pub diagnoses: Vec<String>,
    /// Diagnoses after context-driven filtering and confidence ranking,
    /// sorted descending by confidence.
    pub ranked_diagnoses: Vec<DisambiguatedDiagnosis>,
    pub demographics: Demographics,
    /// ISO-8601 dates found anywhere in the text, in order of first
    /// appearance.
    pub dates: Vec<String>,
    /// Context cues used to qualify the diagnoses.
    pub context: ClinicalContext,
}

/// Outcome of parsing one note: the structured record, accumulated warnings,
/// a completeness score, and the raw section map for debugging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub data: ParsedNote,
    pub warnings: Vec<String>,
    /// Completeness/consistency score, clamped to [0, 1].
    pub confidence: f64,
    /// The section map exactly as segmentation produced it.
    pub raw_sections: SectionMap,
}
