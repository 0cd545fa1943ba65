//! Sub-segmenter for fully templated consult notes.
//!
//! Cardiology consults exported from templated EHR forms carry a richer,
//! more rigid heading vocabulary than free-form notes. This segmenter
//! recognizes that superset of headings, pulls line-items out of the
//! "Previous Diagnostic Studies" block against a fixed table of study-name
//! patterns, and splits "Review/Management" into its documented sub-blocks
//! by applying the same header-prefix splitting recursively.

use std::collections::BTreeMap;

use regex::Regex;

use note_model::SectionId;

use crate::lexicon::normalize_header;

/// A recognized line-item from the "Previous Diagnostic Studies" block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticStudy {
    /// Canonical study name from the pattern table.
    pub study: String,
    /// The source line as written.
    pub detail: String,
}

/// A segmented templated consult.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsultNote {
    /// Heading -> body, keyed by the canonical consult heading.
    pub sections: BTreeMap<String, String>,
    /// Line-items recognized under "Previous Diagnostic Studies".
    pub studies: Vec<DiagnosticStudy>,
    /// Sub-blocks of "Review/Management".
    pub review: BTreeMap<String, String>,
}

/// Consult heading vocabulary: canonical heading plus accepted spellings.
const CONSULT_HEADINGS: &[(&str, &[&str])] = &[
    (
        "Reason for Consult",
        &["reason for consult", "reason for consultation", "consult reason"],
    ),
    ("HPI", &["hpi", "history of present illness"]),
    ("Past Medical History", &["past medical history", "pmh"]),
    ("Medications", &["medications", "current medications", "meds"]),
    ("Allergies", &["allergies", "allergy"]),
    ("Social History", &["social history"]),
    ("Vital Signs", &["vital signs", "vitals"]),
    (
        "Previous Diagnostic Studies",
        &[
            "previous diagnostic studies",
            "prior diagnostic studies",
            "previous studies",
            "prior studies",
        ],
    ),
    (
        "Review/Management",
        &["review management", "review and management", "review of management"],
    ),
    (
        "Impression/Plan",
        &[
            "impression plan",
            "impression and plan",
            "impression",
            "assessment plan",
            "assessment and plan",
        ],
    ),
];

/// Sub-blocks documented inside "Review/Management".
const REVIEW_HEADINGS: &[(&str, &[&str])] = &[
    ("Laboratory Results", &["laboratory results", "labs", "lab results"]),
    ("Radiology", &["radiology", "imaging"]),
    ("Cardiology Results", &["cardiology results", "cardiology"]),
    ("Cardiac Monitor", &["cardiac monitor", "telemetry"]),
    ("EKG", &["ekg", "ecg", "electrocardiogram"]),
    ("Condition", &["condition"]),
];

/// Segmenter for templated consult notes.
#[derive(Debug)]
pub struct ConsultSegmenter {
    study_patterns: Vec<(&'static str, Regex)>,
}

impl ConsultSegmenter {
    pub fn new() -> Self {
        let table: &[(&str, &str)] = &[
            ("Echocardiogram", r"(?i)\b(?:echo(?:cardiogram)?|TTE|TEE)\b"),
            (
                "Stress test",
                r"(?i)\b(?:stress test|treadmill|nuclear stress|MIBI|dobutamine stress)\b",
            ),
            (
                "Cardiac catheterization",
                r"(?i)\b(?:cath(?:eterization)?|coronary angiogra(?:m|phy)|LHC)\b",
            ),
            ("CABG", r"(?i)\b(?:CABG|coronary artery bypass|bypass graft)\b"),
            (
                "Carotid ultrasound",
                r"(?i)\bcarotid (?:ultrasound|doppler|duplex)\b",
            ),
            ("Holter monitor", r"(?i)\b(?:holter|event monitor)\b"),
            ("EKG", r"(?i)\b(?:EKG|ECG|electrocardiogram)\b"),
            ("Pacemaker/ICD", r"(?i)\b(?:pacemaker|ICD|defibrillator)\b"),
        ];
        let study_patterns = table
            .iter()
            .map(|(name, pattern)| (*name, compile(pattern)))
            .collect();
        Self { study_patterns }
    }

    /// Whether the text looks like a templated consult. The "Reason for
    /// Consult" heading is the marker: free-form notes never carry it.
    pub fn applies(&self, text: &str) -> bool {
        text.lines()
            .any(|line| matches_heading(line, &["reason for consult", "reason for consultation"]))
    }

    /// Segments a templated consult note.
    pub fn segment(&self, text: &str) -> ConsultNote {
        let sections = split_by_headings(text, CONSULT_HEADINGS);

        let studies = sections
            .get("Previous Diagnostic Studies")
            .map(|body| self.extract_studies(body))
            .unwrap_or_default();

        let review = sections
            .get("Review/Management")
            .map(|body| split_by_headings(body, REVIEW_HEADINGS))
            .unwrap_or_default();

        ConsultNote {
            sections,
            studies,
            review,
        }
    }

    /// Matches each line of the studies block against the study-name table.
    fn extract_studies(&self, body: &str) -> Vec<DiagnosticStudy> {
        let mut studies = Vec::new();
        for line in body.lines() {
            let line = line.trim().trim_start_matches(['-', '*', '•']).trim();
            if line.is_empty() {
                continue;
            }
            for (name, pattern) in &self.study_patterns {
                if pattern.is_match(line) {
                    studies.push(DiagnosticStudy {
                        study: (*name).to_string(),
                        detail: line.to_string(),
                    });
                    break;
                }
            }
        }
        studies
    }
}

impl Default for ConsultSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a canonical consult heading onto the standard section vocabulary,
/// for merging a consult segmentation into a [`note_model::SectionMap`].
pub fn canonical_mapping(heading: &str) -> Option<SectionId> {
    match heading {
        "Reason for Consult" => Some(SectionId::ChiefComplaint),
        "HPI" => Some(SectionId::Hpi),
        "Past Medical History" => Some(SectionId::Pmh),
        "Medications" => Some(SectionId::Medications),
        "Allergies" => Some(SectionId::Allergies),
        "Social History" => Some(SectionId::SocialHistory),
        "Vital Signs" => Some(SectionId::Vitals),
        "Previous Diagnostic Studies" => Some(SectionId::Diagnostics),
        "Review/Management" => Some(SectionId::Objective),
        "Impression/Plan" => Some(SectionId::Assessment),
        _ => None,
    }
}

/// Maps a "Review/Management" sub-block heading onto the standard vocabulary.
pub fn review_mapping(heading: &str) -> Option<SectionId> {
    match heading {
        "Laboratory Results" => Some(SectionId::Labs),
        "Radiology" | "Cardiology Results" | "EKG" => Some(SectionId::Diagnostics),
        _ => None,
    }
}

/// Splits text into heading -> body by scanning for heading-prefixed lines.
///
/// A line opens a block when its text (or its prefix before a colon)
/// normalizes to one of the accepted spellings. Content after the colon on
/// the heading line becomes the first body line. Text before the first
/// heading is dropped here; the caller decides what to do with it.
fn split_by_headings(
    text: &str,
    headings: &[(&'static str, &[&'static str])],
) -> BTreeMap<String, String> {
    let mut blocks: BTreeMap<String, String> = BTreeMap::new();
    let mut current: Option<(&str, Vec<&str>)> = None;

    for line in text.lines() {
        let mut opened = None;
        for (canonical, spellings) in headings {
            if let Some(rest) = heading_line(line, spellings) {
                opened = Some((*canonical, rest));
                break;
            }
        }

        match opened {
            Some((canonical, rest)) => {
                flush(&mut blocks, current.take());
                let mut body = Vec::new();
                if !rest.is_empty() {
                    body.push(rest);
                }
                current = Some((canonical, body));
            }
            None => {
                if let Some((_, body)) = current.as_mut() {
                    body.push(line);
                }
            }
        }
    }
    flush(&mut blocks, current.take());
    blocks
}

fn flush(blocks: &mut BTreeMap<String, String>, current: Option<(&str, Vec<&str>)>) {
    if let Some((heading, body)) = current {
        let text = body.join("\n").trim().to_string();
        match blocks.get_mut(heading) {
            Some(existing) if !text.is_empty() => {
                existing.push('\n');
                existing.push_str(&text);
            }
            Some(_) => {}
            None => {
                blocks.insert(heading.to_string(), text);
            }
        }
    }
}

/// Returns the remainder after the heading when `line` opens one of the
/// given spellings, either as the whole line or as a `Heading: rest` prefix.
fn heading_line<'a>(line: &'a str, spellings: &[&str]) -> Option<&'a str> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some((label, rest)) = trimmed.split_once(':') {
        let normalized = normalize_header(label);
        if spellings.contains(&normalized.as_str()) {
            return Some(rest.trim());
        }
    }

    let normalized = normalize_header(trimmed);
    if spellings.contains(&normalized.as_str()) {
        return Some("");
    }
    None
}

fn matches_heading(line: &str, spellings: &[&str]) -> bool {
    heading_line(line, spellings).is_some()
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern compiles")
}
