//! Clinical context cues and disambiguated diagnoses.
//!
//! Context cues are evidence, not facts: they qualify extracted diagnoses
//! and are never presented standalone to downstream consumers.

use serde::{Deserialize, Serialize};

/// Whether a temporal cue describes when something began or how long it has
/// been present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalKind {
    Onset,
    Duration,
}

/// A temporal qualifier attached to a clinical entity, e.g.
/// `{"chest pain", "acute", Onset}` or `{"cough", "for 3 days", Duration}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalCue {
    pub entity: String,
    pub modifier: String,
    pub kind: TemporalKind,
}

impl TemporalCue {
    /// True when the modifier marks an acute or new presentation.
    pub fn is_acute(&self) -> bool {
        let modifier = self.modifier.to_lowercase();
        ["acute", "new", "sudden"]
            .iter()
            .any(|marker| modifier.contains(marker))
    }
}

/// A severity qualifier attached to a clinical entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityCue {
    pub entity: String,
    /// Severity descriptor as written: mild, moderate, severe, stable,
    /// improved, worsening, ...
    pub level: String,
}

impl SeverityCue {
    /// True when the level claims a reassuring course (stable or improved).
    pub fn is_reassuring(&self) -> bool {
        let level = self.level.to_lowercase();
        ["stable", "improved", "improving", "resolved"]
            .iter()
            .any(|marker| level.contains(marker))
    }
}

/// A cause/effect pair, e.g. "dyspnea due to heart failure".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalLink {
    pub cause: String,
    pub effect: String,
}

/// Context cues scanned from the whole note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicalContext {
    pub temporal: Vec<TemporalCue>,
    pub severity: Vec<SeverityCue>,
    pub causality: Vec<CausalLink>,
    /// Phrases the note explicitly negates ("denies chest pain" -> "chest pain").
    pub negations: Vec<String>,
}

impl ClinicalContext {
    pub fn is_empty(&self) -> bool {
        self.temporal.is_empty()
            && self.severity.is_empty()
            && self.causality.is_empty()
            && self.negations.is_empty()
    }
}

/// A diagnosis candidate after filtering and confidence ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisambiguatedDiagnosis {
    pub diagnosis: String,
    /// Starts at 1.0 and is discounted when the narrative contradicts the
    /// measured vitals. Always within [0, 1].
    pub confidence: f64,
    /// Causes linked to this diagnosis through causality cues.
    pub supporting_evidence: Vec<String>,
    /// Human-readable inconsistency notes.
    pub warnings: Vec<String>,
}

impl DisambiguatedDiagnosis {
    pub fn new(diagnosis: impl Into<String>) -> Self {
        Self {
            diagnosis: diagnosis.into(),
            confidence: 1.0,
            supporting_evidence: Vec::new(),
            warnings: Vec::new(),
        }
    }
}
