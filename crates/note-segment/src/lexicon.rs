//! Canonical header vocabulary and fuzzy alias matching.
//!
//! Real EHR exports spell the same heading a dozen ways ("PMH", "Past
//! Medical Hx", "PAST MEDICAL HISTORY:"). The lexicon maps any observed
//! header spelling onto a canonical [`SectionId`] using exact alias lookup
//! first and a normalized edit-distance ratio as the tolerant fallback.
//!
//! The lexicon is an explicit, injectable value: build it once at startup
//! (optionally extended from an external alias table) and share it
//! immutably. There is no process-global cache.

use std::collections::BTreeMap;

use rapidfuzz::distance::indel;
use tracing::warn;

use note_model::{NoteError, Result, SectionId};

/// A scored lexicon match for one header spelling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderMatch {
    pub section: SectionId,
    /// Similarity in [0, 1]; exact alias hits score 1.0.
    pub score: f64,
}

/// Alias table mapping canonical sections to their known header spellings.
#[derive(Debug, Clone)]
pub struct HeaderLexicon {
    aliases: BTreeMap<SectionId, Vec<String>>,
}

impl HeaderLexicon {
    /// The built-in alias vocabulary covering the common note formats
    /// (ED notes, hospital-medicine progress notes, cardiology consults).
    pub fn builtin() -> Self {
        let table: &[(SectionId, &[&str])] = &[
            (
                SectionId::ChiefComplaint,
                &["chief complaint", "cc", "reason for visit", "presenting complaint"],
            ),
            (SectionId::Subjective, &["subjective"]),
            (
                SectionId::Hpi,
                &[
                    "hpi",
                    "history of present illness",
                    "history of presenting illness",
                    "interval history",
                ],
            ),
            (
                SectionId::Pmh,
                &["pmh", "past medical history", "medical history", "pmhx", "past medical hx"],
            ),
            (
                SectionId::Psh,
                &["psh", "past surgical history", "surgical history", "pshx"],
            ),
            (SectionId::FamilyHistory, &["family history", "fh", "fhx", "family hx"]),
            (
                SectionId::SocialHistory,
                &["social history", "shx", "social hx"],
            ),
            (
                SectionId::Medications,
                &[
                    "medications",
                    "meds",
                    "current medications",
                    "home medications",
                    "medication list",
                    "outpatient medications",
                ],
            ),
            (
                SectionId::Allergies,
                &["allergies", "allergy", "drug allergies", "medication allergies"],
            ),
            (SectionId::ReviewOfSystems, &["review of systems", "ros"]),
            (SectionId::Vitals, &["vitals", "vital signs", "vs"]),
            (
                SectionId::Objective,
                &["objective", "physical exam", "physical examination", "exam", "pe"],
            ),
            (
                SectionId::Diagnostics,
                &["diagnostics", "diagnostic studies", "imaging", "studies"],
            ),
            (
                SectionId::Labs,
                &[
                    "labs",
                    "lab results",
                    "laboratory results",
                    "laboratory data",
                    "laboratory",
                ],
            ),
            (
                SectionId::Assessment,
                &["assessment", "impression", "assessment and plan", "clinical impression"],
            ),
            (SectionId::Plan, &["plan", "treatment plan", "recommendations"]),
            (SectionId::Disposition, &["disposition", "dispo"]),
        ];

        let mut aliases = BTreeMap::new();
        for (section, spellings) in table {
            aliases.insert(
                *section,
                spellings.iter().map(|s| normalize_header(s)).collect(),
            );
        }
        Self { aliases }
    }

    /// Adds alias spellings for one section.
    pub fn with_aliases<I, S>(mut self, section: SectionId, spellings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self.aliases.entry(section).or_default();
        for spelling in spellings {
            let normalized = normalize_header(spelling.as_ref());
            if !normalized.is_empty() && !entry.contains(&normalized) {
                entry.push(normalized);
            }
        }
        self
    }

    /// Extends the builtin vocabulary from a JSON alias table of the form
    /// `{"labs": ["chemistries", "bmp"], ...}`, keyed by section name.
    ///
    /// Unknown section names are skipped with a warning; a malformed
    /// document is an error.
    pub fn from_json(json: &str) -> Result<Self> {
        let table: BTreeMap<String, Vec<String>> =
            serde_json::from_str(json).map_err(|e| NoteError::Lexicon(e.to_string()))?;

        let mut lexicon = Self::builtin();
        for (name, spellings) in table {
            match SectionId::from_name(&name) {
                Some(section) => {
                    lexicon = lexicon.with_aliases(section, spellings);
                }
                None => {
                    warn!(section = %name, "unknown section in alias table, skipping");
                }
            }
        }
        Ok(lexicon)
    }

    /// Alias spellings registered for a section.
    pub fn aliases(&self, section: SectionId) -> &[String] {
        self.aliases
            .get(&section)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Scores a header spelling against every canonical section and returns
    /// the best match.
    ///
    /// Exact alias equality scores 1.0; otherwise the score is the maximum
    /// normalized indel similarity over the section's aliases (the
    /// difflib-style ratio, which keeps the 0.6 acceptance threshold
    /// meaningful on short header strings).
    pub fn best_match(&self, header: &str) -> Option<HeaderMatch> {
        let normalized = normalize_header(header);
        if normalized.is_empty() {
            return None;
        }

        let mut best: Option<HeaderMatch> = None;
        for (section, spellings) in &self.aliases {
            for alias in spellings {
                let score = if alias == &normalized {
                    1.0
                } else {
                    indel::normalized_similarity(alias.chars(), normalized.chars())
                };
                if best.map(|b| score > b.score).unwrap_or(true) {
                    best = Some(HeaderMatch {
                        section: *section,
                        score,
                    });
                }
            }
        }
        best
    }
}

impl Default for HeaderLexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Normalizes a header spelling for comparison: lowercases, replaces
/// separators with spaces, drops trailing punctuation, collapses runs of
/// whitespace.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_end_matches([':', '-', '.', '#', '*'])
        .to_lowercase()
        .replace(['_', '-', '/', '\\', '&'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_alias_scores_one() {
        let lexicon = HeaderLexicon::builtin();
        let m = lexicon.best_match("HPI").expect("match");
        assert_eq!(m.section, SectionId::Hpi);
        assert!((m.score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_trailing_separator_stripped() {
        let lexicon = HeaderLexicon::builtin();
        let m = lexicon.best_match("Past Medical History:").expect("match");
        assert_eq!(m.section, SectionId::Pmh);
        assert!((m.score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fuzzy_misspelling() {
        let lexicon = HeaderLexicon::builtin();
        let m = lexicon.best_match("Medicatons").expect("match");
        assert_eq!(m.section, SectionId::Medications);
        assert!(m.score >= 0.6);
    }

    #[test]
    fn test_custom_alias() {
        let lexicon =
            HeaderLexicon::builtin().with_aliases(SectionId::Labs, ["chemistries"]);
        let m = lexicon.best_match("Chemistries:").expect("match");
        assert_eq!(m.section, SectionId::Labs);
        assert!((m.score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_json_extension() {
        let lexicon =
            HeaderLexicon::from_json(r#"{"labs": ["bmp"], "not_a_section": ["x"]}"#)
                .expect("valid table");
        let m = lexicon.best_match("BMP").expect("match");
        assert_eq!(m.section, SectionId::Labs);
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(HeaderLexicon::from_json("not json").is_err());
    }
}

