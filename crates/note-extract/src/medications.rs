//! Medication list extraction.
//!
//! Medication sections arrive as semicolon runs, comma runs, bullet lists,
//! or one-per-line dumps. The extractor strips the section label, splits on
//! every delimiter shape, and keeps whatever is left as free-text
//! medication strings; it does not attempt dose parsing.

use regex::Regex;

use note_model::{SectionId, TextSource};

use crate::util::{MAX_MATCHES, compile};

#[derive(Debug)]
pub struct MedicationsExtractor {
    leading_label: Regex,
    sentinel: Regex,
}

impl MedicationsExtractor {
    pub fn new() -> Self {
        Self {
            leading_label: compile(
                r"(?i)^\s*(?:current medications|home medications|outpatient medications|medication list|medications?|meds)\s*[:\-]?\s*",
            ),
            sentinel: compile(r"(?i)^(?:none|nkda|nil|n/a|no known)$"),
        }
    }

    /// Extracts medication strings. On a segmented note this reads the
    /// medications section; a note without one documents no medications.
    pub fn extract(&self, source: &TextSource) -> Vec<String> {
        let text = match *source {
            TextSource::Raw { text } => text,
            TextSource::Sectioned { .. } => {
                source.section(SectionId::Medications).unwrap_or_default()
            }
        };
        self.parse_block(text)
    }

    /// Splits one medication block into entries.
    pub fn parse_block(&self, text: &str) -> Vec<String> {
        let text = self.leading_label.replace(text, "");

        let mut medications = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            for token in line.split([';', ',']).flat_map(|t| t.split(" - ")) {
                let entry = token
                    .trim()
                    .trim_start_matches(['-', '*', '•', '·'])
                    .trim()
                    .trim_end_matches(['.', ';'])
                    .trim();
                if entry.chars().count() < 2 || self.sentinel.is_match(entry) {
                    continue;
                }
                medications.push(entry.to_string());
                if medications.len() >= MAX_MATCHES {
                    return medications;
                }
            }
        }
        medications
    }
}

impl Default for MedicationsExtractor {
    fn default() -> Self {
        Self::new()
    }
}
