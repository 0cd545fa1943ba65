//! Diagnosis candidate extraction.
//!
//! Four complementary passes feed one deduplicated list:
//!
//! (a) a "Problems Addressed:" block of `Diagnosis: severity` lines;
//! (b) numbered list items, usually out of the assessment;
//! (c) bullet list items, but only when (a) and (b) produced nothing;
//! (d) a keyword table mapping spelling variants onto canonical names,
//!     which always runs and adds whatever is not already present.
//!
//! The keyword pass is negation-aware: "denies chest pain" must not leave a
//! chest pain candidate behind. Deduplication is case-insensitive and the
//! first spelling wins.

use regex::Regex;

use note_model::{SectionId, TextSource};

use crate::util::{MAX_MATCHES, compile, dedup_case_insensitive};

/// Spelling variants mapped onto canonical diagnosis names.
const KEYWORD_TABLE: &[(&str, &str)] = &[
    (
        r"(?i)\b(?:chf|congestive heart failure|heart failure|hfref|hfpef|systolic heart failure|diastolic heart failure)\b",
        "Heart failure",
    ),
    (r"(?i)\b(?:afib|a-?fib|atrial fibrillation)\b", "Atrial fibrillation"),
    (
        r"(?i)\b(?:copd|chronic obstructive pulmonary disease)\b",
        "COPD",
    ),
    (
        r"(?i)\b(?:htn|hypertension|hypertensive (?:urgency|emergency))\b",
        "Hypertension",
    ),
    (
        r"(?i)\b(?:diabetes(?: mellitus)?|t2dm|t1dm|dm2|iddm|niddm)\b",
        "Diabetes mellitus",
    ),
    (
        r"(?i)\b(?:ckd|chronic kidney disease|chronic renal insufficiency)\b",
        "Chronic kidney disease",
    ),
    (r"(?i)\b(?:pneumonia|pna)\b", "Pneumonia"),
    (
        r"(?i)\b(?:acs|acute coronary syndrome|nstemi|stemi)\b",
        "Acute coronary syndrome",
    ),
    (r"(?i)\bchest pain\b", "Chest pain"),
    (
        r"(?i)\b(?:uti|urinary tract infection|cystitis)\b",
        "Urinary tract infection",
    ),
    (
        r"(?i)\b(?:gi bleed(?:ing)?|gastrointestinal bleed(?:ing)?)\b",
        "Gastrointestinal bleeding",
    ),
    (r"(?i)\b(?:cva|stroke|cerebrovascular accident)\b", "Stroke"),
    (r"(?i)\bpulmonary embolism\b", "Pulmonary embolism"),
    (r"(?i)\b(?:hld|hyperlipidemia|dyslipidemia)\b", "Hyperlipidemia"),
    (r"(?i)\banemia\b", "Anemia"),
    (r"(?i)\b(?:sepsis|septic shock)\b", "Sepsis"),
];

#[derive(Debug)]
pub struct DiagnosesExtractor {
    problems_header: Regex,
    problem_line: Regex,
    numbered_item: Regex,
    bullet_item: Regex,
    parenthetical: Regex,
    due_to: Regex,
    dash_qualifier: Regex,
    negation_tail: Regex,
    keywords: Vec<(Regex, &'static str)>,
}

impl DiagnosesExtractor {
    pub fn new() -> Self {
        Self {
            problems_header: compile(r"(?im)^\s*problems? addressed\s*:?\s*$"),
            problem_line: compile(r"^\s*(?P<dx>[^:\n]{2,60}?)\s*:\s*(?P<sev>\S.*)$"),
            numbered_item: compile(r"(?m)^\s*\d{1,2}[.)]\s+(?P<item>\S.{1,79})$"),
            bullet_item: compile(r"(?m)^\s*[-*•]\s+(?P<item>\S.{1,79})$"),
            parenthetical: compile(r"\s*\([^)\n]{0,60}\)"),
            due_to: compile(r"(?i)\s+(?:due to|secondary to)\b.*$"),
            dash_qualifier: compile(r"\s+[-–—]\s+.*$"),
            // Negation cue anywhere earlier in the same clause.
            negation_tail: compile(
                r"(?i)\b(?:denies|denied|no|not|without|negative for|no evidence of|free of)\b[^.;:\n]*$",
            ),
            keywords: KEYWORD_TABLE
                .iter()
                .map(|(pattern, canonical)| (compile(pattern), *canonical))
                .collect(),
        }
    }

    /// Extracts the merged, deduplicated diagnosis candidate list.
    pub fn extract(&self, source: &TextSource) -> Vec<String> {
        let full_text = source.full_text();
        let list_text = source.preferred(&[SectionId::Assessment]);

        let mut diagnoses = Vec::new();
        self.problems_block(full_text, &mut diagnoses);
        self.numbered_items(list_text, &mut diagnoses);
        if diagnoses.is_empty() {
            self.bullet_items(list_text, &mut diagnoses);
        }
        self.keyword_pass(full_text, &mut diagnoses);

        dedup_case_insensitive(diagnoses)
    }

    /// Pass (a): `Diagnosis: severity` lines under "Problems Addressed:".
    fn problems_block(&self, text: &str, out: &mut Vec<String>) {
        let Some(header) = self.problems_header.find(text) else {
            return;
        };

        for line in text[header.end()..].lines().skip(1).take(32) {
            if line.trim().is_empty() {
                break;
            }
            let Some(caps) = self.problem_line.captures(line) else {
                break;
            };
            let dx = self.clean(caps.name("dx").map(|m| m.as_str()).unwrap_or_default());
            if dx.chars().count() >= 3 {
                out.push(dx);
            }
            if out.len() >= MAX_MATCHES {
                return;
            }
        }
    }

    /// Pass (b): numbered list items.
    fn numbered_items(&self, text: &str, out: &mut Vec<String>) {
        for caps in self.numbered_item.captures_iter(text).take(MAX_MATCHES) {
            let item = caps.name("item").map(|m| m.as_str()).unwrap_or_default();
            let dx = self.clean(item);
            if dx.chars().count() >= 3 {
                out.push(dx);
            }
        }
    }

    /// Pass (c): bullet list items, excluding lines that are themselves
    /// section labels.
    fn bullet_items(&self, text: &str, out: &mut Vec<String>) {
        for caps in self.bullet_item.captures_iter(text).take(MAX_MATCHES) {
            let item = caps.name("item").map(|m| m.as_str()).unwrap_or_default();
            if item.trim_end().ends_with(':') {
                continue;
            }
            let dx = self.clean(item);
            if dx.chars().count() >= 3 {
                out.push(dx);
            }
        }
    }

    /// Pass (d): keyword table over the whole text, skipping negated spans,
    /// adding only canonical names not already present.
    fn keyword_pass(&self, text: &str, out: &mut Vec<String>) {
        for (pattern, canonical) in &self.keywords {
            if out.iter().any(|d| d.eq_ignore_ascii_case(canonical)) {
                continue;
            }
            let affirmed = pattern
                .find_iter(text)
                .take(MAX_MATCHES)
                .any(|m| !self.is_negated(text, m.start()));
            if affirmed {
                out.push((*canonical).to_string());
            }
        }
    }

    /// Whether the clause leading up to `position` negates what follows.
    fn is_negated(&self, text: &str, position: usize) -> bool {
        let line_start = text[..position]
            .rfind('\n')
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let window_start = position.saturating_sub(48).max(line_start);
        // Clamp to a char boundary; the window size is a heuristic anyway.
        let mut start = window_start;
        while start < position && !text.is_char_boundary(start) {
            start += 1;
        }
        self.negation_tail.is_match(&text[start..position])
    }

    /// Strips parentheticals, "due to ..." tails, trailing dash qualifiers,
    /// and terminal punctuation.
    fn clean(&self, raw: &str) -> String {
        let cleaned = self.parenthetical.replace_all(raw, "");
        let cleaned = self.dash_qualifier.replace(&cleaned, "");
        let cleaned = self.due_to.replace(&cleaned, "");
        cleaned
            .trim()
            .trim_end_matches(['.', ',', ';'])
            .trim()
            .to_string()
    }
}

impl Default for DiagnosesExtractor {
    fn default() -> Self {
        Self::new()
    }
}
