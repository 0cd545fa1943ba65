//! The parsing pipeline.
//!
//! Strictly sequential and single-pass: normalize, segment, extract,
//! qualify, disambiguate, validate, score. No stage calls back into an
//! earlier one, and nothing here performs I/O. The only two conditions
//! that short-circuit are empty input and the input length cap; everything
//! else fails soft into warnings.

use tracing::debug;

use note_extract::{
    AllergiesExtractor, ContextExtractor, DatesExtractor, DemographicsExtractor,
    DiagnosesExtractor, LabsExtractor, MedicationsExtractor, VitalsExtractor, disambiguate,
};
use note_model::{ParseResult, ParsedNote, TextSource};
use note_segment::{HeaderLexicon, Segmenter, normalize};
use note_validate::{score, validate};

/// Warning attached to the empty-input short circuit.
const EMPTY_INPUT_WARNING: &str = "Empty input: nothing to parse";

/// Clinical note parser.
///
/// Construction compiles every pattern table once; the parser is immutable
/// afterwards and safe to share across calls. Parsing itself allocates a
/// fresh record per call and keeps no state.
#[derive(Debug)]
pub struct Parser {
    segmenter: Segmenter,
    vitals: VitalsExtractor,
    labs: LabsExtractor,
    medications: MedicationsExtractor,
    allergies: AllergiesExtractor,
    diagnoses: DiagnosesExtractor,
    demographics: DemographicsExtractor,
    dates: DatesExtractor,
    context: ContextExtractor,
}

impl Parser {
    /// Parser with the built-in header vocabulary.
    pub fn new() -> Self {
        Self::with_lexicon(HeaderLexicon::builtin())
    }

    /// Parser with an injected header vocabulary, for callers that extend
    /// the alias table from configuration.
    pub fn with_lexicon(lexicon: HeaderLexicon) -> Self {
        Self {
            segmenter: Segmenter::new(lexicon),
            vitals: VitalsExtractor::new(),
            labs: LabsExtractor::new(),
            medications: MedicationsExtractor::new(),
            allergies: AllergiesExtractor::new(),
            diagnoses: DiagnosesExtractor::new(),
            demographics: DemographicsExtractor::new(),
            dates: DatesExtractor::new(),
            context: ContextExtractor::new(),
        }
    }

    /// Parses raw note text into a structured record.
    ///
    /// Never fails: malformed text degrades into missing fields and
    /// warnings, not errors.
    pub fn parse(&self, text: &str) -> ParseResult {
        if text.trim().is_empty() {
            return ParseResult {
                data: ParsedNote::default(),
                warnings: vec![EMPTY_INPUT_WARNING.to_string()],
                confidence: 0.0,
                raw_sections: note_model::SectionMap::new(),
            };
        }

        let mut pipeline_warnings = Vec::new();

        let normalized = normalize(text);
        if normalized.truncated {
            pipeline_warnings.push(format!(
                "Input truncated from {} to {} characters",
                normalized.original_len,
                note_segment::MAX_INPUT_LEN
            ));
        }

        let sections = self.segmenter.segment(&normalized.text);
        debug!(sections = sections.len(), "segmentation complete");

        let source = TextSource::sectioned(&sections);
        let full_text = normalized.text.as_str();

        let vitals = self.vitals.extract(&source);
        let labs = self.labs.extract(&source);
        let medications = self.medications.extract(&source);
        let allergies = self.allergies.extract(full_text);
        let diagnoses = self.diagnoses.extract(&source);
        let demographics = self.demographics.extract(full_text);
        let dates = self.dates.extract(full_text);
        let context = self.context.extract(full_text);

        let ranked_diagnoses = disambiguate(&diagnoses, &context, &vitals);

        let note = ParsedNote {
            sections: sections.clone(),
            vitals,
            labs,
            medications,
            allergies,
            diagnoses,
            ranked_diagnoses,
            demographics,
            dates,
            context,
        };

        let mut warnings = pipeline_warnings;
        warnings.extend(validate(&note));
        let confidence = score(&warnings);

        ParseResult {
            data: note,
            warnings,
            confidence,
            raw_sections: sections,
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot convenience over [`Parser::parse`].
pub fn parse(text: &str) -> ParseResult {
    Parser::new().parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_short_circuit() {
        let result = parse("");
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.data.sections.is_empty());
        assert!(result.data.diagnoses.is_empty());
    }

    #[test]
    fn test_whitespace_only_input() {
        let result = parse("   \n\n  ");
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_raw_sections_mirror_data_sections() {
        let result = parse("Assessment:\n1. Pneumonia\n\nPlan:\n- antibiotics");
        assert_eq!(result.raw_sections, result.data.sections);
    }
}
