//! Laboratory value extraction.
//!
//! EHR exports render lab trends as multi-date columns, oldest to newest,
//! left to right. For every recognized analyte the extractor anchors on the
//! line starting with one of its aliases and takes the **rightmost** number
//! on that line as the most recent value. Thousand separators (BNP is the
//! usual offender) are accepted and stripped.

use std::collections::BTreeMap;

use regex::Regex;

use note_model::{LabAnalyte, LabValue, SectionId, TextSource};

use crate::util::compile;

/// Sections searched before falling back to the whole note.
const PREFERRED_SECTIONS: [SectionId; 2] = [SectionId::Labs, SectionId::Diagnostics];

#[derive(Debug)]
pub struct LabsExtractor {
    line_patterns: Vec<(LabAnalyte, Regex)>,
    number: Regex,
    flag: Regex,
}

impl LabsExtractor {
    pub fn new() -> Self {
        let line_patterns = LabAnalyte::ALL
            .into_iter()
            .map(|analyte| {
                let alternation = analyte
                    .aliases()
                    .iter()
                    .map(|alias| regex::escape(alias))
                    .collect::<Vec<_>>()
                    .join("|");
                let pattern = format!(r"(?im)^\s*(?:{alternation})\b\s*[:\-]?(?P<rest>.*)$");
                (analyte, compile(&pattern))
            })
            .collect();

        Self {
            line_patterns,
            // Comma-grouped alternative first so "1,234" is one token, not
            // "1" and "234".
            number: compile(r"\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?"),
            flag: compile(r"\((?:HH|LL|H|L)\)|\b(?:HH|LL|H|L)\b|(?i:\bcrit(?:ical)?\b)"),
        }
    }

    /// Extracts every recognized analyte found in the text.
    pub fn extract(&self, source: &TextSource) -> BTreeMap<LabAnalyte, LabValue> {
        let text = source.preferred(&PREFERRED_SECTIONS);
        let mut labs = BTreeMap::new();

        for (analyte, pattern) in &self.line_patterns {
            let Some(caps) = pattern.captures(text) else {
                continue;
            };
            let rest = caps.name("rest").map(|m| m.as_str()).unwrap_or_default();

            // Rightmost number on the line is the most recent value.
            let Some(raw) = self.number.find_iter(rest).last() else {
                continue;
            };
            let Ok(value) = raw.as_str().replace(',', "").parse::<f64>() else {
                continue;
            };

            let flag = self
                .flag
                .find_iter(rest)
                .last()
                .map(|m| m.as_str().trim_matches(['(', ')']).to_uppercase());

            labs.insert(*analyte, LabValue { value, flag });
        }
        labs
    }
}

impl Default for LabsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> BTreeMap<LabAnalyte, LabValue> {
        LabsExtractor::new().extract(&TextSource::raw(text))
    }

    #[test]
    fn test_rightmost_value_is_most_recent() {
        let labs = extract("WBC 7.04 6.77 6.99");
        assert_eq!(labs.get(&LabAnalyte::Wbc).map(|v| v.value), Some(6.99));
    }

    #[test]
    fn test_single_value_lines() {
        let labs = extract("Glucose: 110\nCreatinine 1.4\nTroponin <0.01");
        assert_eq!(labs.get(&LabAnalyte::Glucose).map(|v| v.value), Some(110.0));
        assert_eq!(
            labs.get(&LabAnalyte::Creatinine).map(|v| v.value),
            Some(1.4)
        );
        assert_eq!(
            labs.get(&LabAnalyte::Troponin).map(|v| v.value),
            Some(0.01)
        );
    }

    #[test]
    fn test_bnp_thousand_separator() {
        let labs = extract("BNP 1,234");
        assert_eq!(labs.get(&LabAnalyte::Bnp).map(|v| v.value), Some(1234.0));

        let labs = extract("NT-proBNP: 12,450");
        assert_eq!(labs.get(&LabAnalyte::Bnp).map(|v| v.value), Some(12450.0));
    }

    #[test]
    fn test_alias_anchoring_at_line_start() {
        // "cr" must not fire inside "CRP" and mid-line mentions are not
        // result lines.
        let labs = extract("CRP 5.2\nDiscussed creatinine trend with team");
        assert!(labs.get(&LabAnalyte::Creatinine).is_none());

        let labs = extract("Cr 1.2");
        assert_eq!(
            labs.get(&LabAnalyte::Creatinine).map(|v| v.value),
            Some(1.2)
        );
    }

    #[test]
    fn test_abnormal_flag_captured() {
        let labs = extract("Glucose 350 (H)\nHgb 7.2 L");
        let glucose = labs.get(&LabAnalyte::Glucose).expect("glucose");
        assert_eq!(glucose.value, 350.0);
        assert_eq!(glucose.flag.as_deref(), Some("H"));

        let hgb = labs.get(&LabAnalyte::Hemoglobin).expect("hgb");
        assert_eq!(hgb.flag.as_deref(), Some("L"));
    }

    #[test]
    fn test_empty_text() {
        assert!(extract("").is_empty());
    }
}
