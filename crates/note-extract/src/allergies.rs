//! Allergy extraction.
//!
//! The output distinguishes three states: an explicit "no known allergies"
//! sentinel, a non-empty list of allergens, or nothing at all when the note
//! simply never documents allergies. The extractor searches the whole
//! document for an allergy header (including the longer clinical phrasing
//! "review of patient's allergies indicates"), captures the block up to the
//! next recognizable section, and only then decides which of the three
//! states applies.

use regex::Regex;

use note_model::AllergyRecord;

use crate::util::{MAX_MATCHES, compile};

#[derive(Debug)]
pub struct AllergiesExtractor {
    header: Regex,
    nkda: Regex,
    explicit_nkda: Regex,
    next_section: Regex,
}

impl AllergiesExtractor {
    pub fn new() -> Self {
        Self {
            // Line-anchored, so a note whose text simply begins with the
            // label (a section body handed over directly) matches too.
            header: compile(
                r"(?im)^[^\S\n]*(?:review of (?:the )?patient'?s allergies indicates|drug allergies|medication allergies|allerg(?:ies|y)(?: list)?)[^\S\n]*[:\-]?[^\S\n]*(?P<rest>[^\n]*)$",
            ),
            nkda: compile(
                r"(?i)\b(?:no known (?:drug |medication )?allergies|nkda|none known|none)\b",
            ),
            explicit_nkda: compile(r"(?i)\b(?:no known (?:drug |medication )?allergies|nkda)\b"),
            // A short labelled line ends the block.
            next_section: compile(r"^\s*[A-Z][A-Za-z /&']{0,48}:"),
        }
    }

    /// Extracts the allergy record, or `None` when the text carries no
    /// allergy evidence at all.
    pub fn extract(&self, text: &str) -> Option<AllergyRecord> {
        if let Some(caps) = self.header.captures(text) {
            let whole = caps.get(0)?;
            let mut block = caps
                .name("rest")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            // Capture continuation lines until the next recognizable section.
            for line in text[whole.end()..].lines().skip(1).take(32) {
                if line.trim().is_empty() || self.next_section.is_match(line) {
                    break;
                }
                block.push('\n');
                block.push_str(line);
            }
            return self.parse_block(&block);
        }

        // A bare NKDA phrase still counts as explicit documentation. The
        // looser "none" spellings only apply inside an allergy block.
        if self.explicit_nkda.is_match(text) {
            return Some(AllergyRecord::NoKnownAllergies);
        }
        None
    }

    /// Parses one allergy block into a record.
    fn parse_block(&self, block: &str) -> Option<AllergyRecord> {
        let block = block.trim();
        if block.is_empty() {
            return None;
        }
        if self.nkda.is_match(block) {
            return Some(AllergyRecord::NoKnownAllergies);
        }

        let mut allergens = Vec::new();
        for line in block.lines() {
            let line = line.trim().trim_start_matches(['-', '*', '•', '·']).trim();
            if line.is_empty() {
                continue;
            }
            for token in line.split([',', ';']) {
                // Trailing reaction descriptions after a dash are dropped:
                // "Penicillin - rash" documents the allergen, not the rash.
                let allergen = token
                    .split(" - ")
                    .next()
                    .unwrap_or_default()
                    .split(" – ")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .trim_end_matches('.')
                    .trim();
                if allergen.chars().count() < 2 {
                    continue;
                }
                allergens.push(allergen.to_string());
                if allergens.len() >= MAX_MATCHES {
                    break;
                }
            }
        }

        if allergens.is_empty() {
            None
        } else {
            Some(AllergyRecord::Listed(allergens))
        }
    }
}

impl Default for AllergiesExtractor {
    fn default() -> Self {
        Self::new()
    }
}
