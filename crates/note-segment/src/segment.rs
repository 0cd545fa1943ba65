//! Three-tier section segmentation.
//!
//! Clinical notes arrive with no schema and no reliable delimiters, so
//! segmentation is a fallback cascade:
//!
//! 1. **Header-first** - line-by-line scan for header-shaped lines mapped
//!    onto the canonical vocabulary through the lexicon.
//! 2. **Signal-word scoring** - unheaded paragraph blocks are assigned to
//!    the section whose domain keywords dominate the block.
//! 3. **Layout heuristics** - bullet density, dosage tokens, vital-shaped
//!    tokens, and diagnostic-reasoning keywords classify what is left.
//!
//! Earlier tiers always win: later tiers only fill sections that are still
//! missing, never overwrite. Fully templated consults are recognized up
//! front and seeded through the specialized sub-segmenter.

use std::collections::BTreeSet;

use regex::Regex;
use tracing::debug;

use note_model::{SectionId, SectionMap};

use crate::consult::{ConsultSegmenter, canonical_mapping, review_mapping};
use crate::lexicon::HeaderLexicon;

/// Minimum fuzzy score for a header spelling to map onto a canonical section.
pub const MIN_HEADER_SCORE: f64 = 0.6;

/// Header candidate lines are short; anything longer is narrative.
const MAX_HEADER_LEN: usize = 50;

/// A signal-word assignment needs at least this many keyword hits.
const MIN_SIGNAL_HITS: usize = 2;

/// Domain keywords that indicate which section an unheaded paragraph
/// belongs to.
const SIGNAL_WORDS: &[(SectionId, &[&str])] = &[
    (
        SectionId::Objective,
        &[
            "edema", "murmur", "auscultation", "tenderness", "distress", "breath sounds",
            "rales", "rhonchi", "alert and oriented", "no acute distress",
        ],
    ),
    (
        SectionId::Plan,
        &[
            "recommend", "continue", "follow up", "discharge", "titrate", "monitor",
            "consult", "repeat", "start",
        ],
    ),
    (
        SectionId::Assessment,
        &[
            "impression", "consistent with", "likely", "differential", "rule out", "suspect",
        ],
    ),
    (
        SectionId::Hpi,
        &[
            "presents with", "reports", "complains of", "denies", "states", "woke up",
            "onset",
        ],
    ),
    (
        SectionId::Pmh,
        &["history of", "diagnosed with", "status post"],
    ),
];

/// Keywords whose presence marks a paragraph as diagnostic reasoning.
const REASONING_WORDS: &[&str] = &["impression", "consistent with"];

/// Section segmenter. Holds the injected lexicon and the compiled layout
/// patterns; cheap to share immutably across parses.
#[derive(Debug)]
pub struct Segmenter {
    lexicon: HeaderLexicon,
    consult: ConsultSegmenter,
    bp_token: Regex,
    vital_abbrev: Regex,
    dosage_token: Regex,
}

impl Segmenter {
    pub fn new(lexicon: HeaderLexicon) -> Self {
        Self {
            lexicon,
            consult: ConsultSegmenter::new(),
            bp_token: compile(r"\b\d{2,3}/\d{2,3}\b"),
            vital_abbrev: compile(r"(?i)\b(?:BP|HR|RR|SpO2|O2 sat|Temp)\b"),
            dosage_token: compile(
                r"(?i)\b(?:\d+(?:\.\d+)?\s*(?:mg|mcg|g|mL|units?|tabs?)|daily|BID|TID|QID|PRN|qhs|q\d+h)\b",
            ),
        }
    }

    pub fn lexicon(&self) -> &HeaderLexicon {
        &self.lexicon
    }

    /// Segments normalized note text into canonical sections.
    ///
    /// The returned map always carries the reserved [`SectionId::FullText`]
    /// entry holding the input text.
    pub fn segment(&self, text: &str) -> SectionMap {
        let mut sections = SectionMap::new();

        if text.trim().is_empty() {
            sections.insert(SectionId::FullText, String::new());
            return sections;
        }

        if self.consult.applies(text) {
            self.seed_from_consult(text, &mut sections);
        }

        // Sections seeded by the consult sub-segmenter are frozen: the
        // generic header scan must not append to them again.
        let frozen: BTreeSet<SectionId> = sections.keys().copied().collect();
        let unassigned = self.header_first(text, &mut sections, &frozen);
        let found = recognized_count(&sections);
        debug!(found, tier = 1, "header-first segmentation");

        // Tier 1 text that fell under no recognized header goes to the
        // subjective bucket; but when header-first found nothing at all,
        // the later tiers get to classify the paragraphs first.
        let blocks: Vec<String> = if found == 0 {
            paragraphs(text)
        } else {
            unassigned
        };

        let leftovers = self.signal_word_fill(&blocks, &mut sections);
        let leftovers = self.layout_fill(&leftovers, &mut sections);

        if found == 0 && !leftovers.is_empty() {
            let body = leftovers.join("\n\n");
            append_section(&mut sections, SectionId::Subjective, &body);
        }

        sections.insert(SectionId::FullText, text.to_string());
        sections
    }

    /// Seeds the map from the templated-consult sub-segmenter.
    fn seed_from_consult(&self, text: &str, sections: &mut SectionMap) {
        let consult = self.consult.segment(text);
        debug!(
            headings = consult.sections.len(),
            studies = consult.studies.len(),
            "templated consult recognized"
        );

        for (heading, body) in &consult.sections {
            if body.is_empty() {
                continue;
            }
            if let Some(section) = canonical_mapping(heading) {
                append_section(sections, section, body);
            }
        }
        for (heading, body) in &consult.review {
            if body.is_empty() {
                continue;
            }
            if let Some(section) = review_mapping(heading)
                && !sections.contains_key(&section)
            {
                append_section(sections, section, body);
            }
        }
    }

    /// Tier 1: line-by-line header scan. Recognized sections accumulate
    /// into `sections`; blocks under unrecognized header-shaped lines are
    /// returned for the later tiers. Text preceding any recognized header
    /// is assigned to the subjective bucket.
    fn header_first(
        &self,
        text: &str,
        sections: &mut SectionMap,
        frozen: &BTreeSet<SectionId>,
    ) -> Vec<String> {
        enum Bucket {
            Preamble,
            Section(SectionId),
            Unknown,
        }

        let mut unassigned = Vec::new();
        let mut bucket = Bucket::Preamble;
        let mut body: Vec<&str> = Vec::new();
        let mut saw_header = false;

        let mut flush =
            |bucket: &Bucket, body: &mut Vec<&str>, sections: &mut SectionMap, unassigned: &mut Vec<String>| {
                let text = body.join("\n").trim().to_string();
                body.clear();
                if text.is_empty() {
                    return;
                }
                match bucket {
                    Bucket::Preamble if !frozen.contains(&SectionId::Subjective) => {
                        append_section(sections, SectionId::Subjective, &text);
                    }
                    Bucket::Section(id) if !frozen.contains(id) => {
                        append_section(sections, *id, &text);
                    }
                    Bucket::Unknown => unassigned.push(text),
                    _ => {}
                }
            };

        for line in text.lines() {
            match self.classify_header(line) {
                HeaderLine::Recognized(section, rest) => {
                    flush(&bucket, &mut body, sections, &mut unassigned);
                    saw_header = true;
                    bucket = Bucket::Section(section);
                    if !rest.is_empty() {
                        body.push(rest);
                    }
                }
                HeaderLine::Unrecognized => {
                    flush(&bucket, &mut body, sections, &mut unassigned);
                    bucket = Bucket::Unknown;
                    // Keep the unknown heading with its block so the later
                    // tiers see the full paragraph.
                    body.push(line);
                }
                HeaderLine::Content => body.push(line),
            }
        }
        flush(&bucket, &mut body, sections, &mut unassigned);

        // A preamble with no headers anywhere is not subjective evidence;
        // segment() re-routes it through the later tiers instead.
        if !saw_header {
            sections.remove(&SectionId::Subjective);
        }
        unassigned
    }

    /// Classifies one line as a recognized header, an unrecognized but
    /// header-shaped line, or ordinary content.
    fn classify_header<'a>(&self, line: &'a str) -> HeaderLine<'a> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return HeaderLine::Content;
        }

        // `Label: rest` - the label may map onto the vocabulary even when
        // the whole line is long.
        if let Some((label, rest)) = trimmed.split_once(':') {
            let label = label.trim();
            if !label.is_empty()
                && label.chars().count() < MAX_HEADER_LEN
                && !label.chars().any(|c| c.is_ascii_digit())
                && let Some(section) = self.lookup_header(label)
            {
                return HeaderLine::Recognized(section, rest.trim());
            }
            if !label.is_empty()
                && trimmed.ends_with(':')
                && trimmed.chars().count() < MAX_HEADER_LEN
            {
                return HeaderLine::Unrecognized;
            }
        }

        if trimmed.chars().count() >= MAX_HEADER_LEN {
            return HeaderLine::Content;
        }

        // Bare short forms: ALL-CAPS or Title Case lines without a colon.
        if is_all_caps(trimmed) || is_title_case(trimmed) {
            if let Some(section) = self.lookup_header(trimmed) {
                return HeaderLine::Recognized(section, "");
            }
            if is_all_caps(trimmed) {
                return HeaderLine::Unrecognized;
            }
        }

        HeaderLine::Content
    }

    /// Maps a header spelling onto a canonical section. Very short labels
    /// must hit an alias exactly; similarity ratios on a handful of
    /// characters are noise.
    fn lookup_header(&self, label: &str) -> Option<SectionId> {
        let m = self.lexicon.best_match(label)?;
        let threshold = if label.chars().count() <= 4 {
            1.0
        } else {
            MIN_HEADER_SCORE
        };
        (m.score >= threshold).then_some(m.section)
    }

    /// Tier 2: assigns unheaded blocks by signal-word counting. Returns the
    /// blocks it could not place.
    fn signal_word_fill(&self, blocks: &[String], sections: &mut SectionMap) -> Vec<String> {
        let mut leftovers = Vec::new();

        for block in blocks {
            let lowered = block.to_lowercase();
            let mut best: Option<(SectionId, usize)> = None;

            for (section, words) in SIGNAL_WORDS {
                let hits: usize = words.iter().map(|w| lowered.matches(w).count()).sum();
                if hits >= MIN_SIGNAL_HITS && best.map(|(_, b)| hits > b).unwrap_or(true) {
                    best = Some((*section, hits));
                }
            }

            match best {
                Some((section, hits)) if !sections.contains_key(&section) => {
                    debug!(section = %section, hits, tier = 2, "signal-word assignment");
                    append_section(sections, section, block);
                }
                _ => leftovers.push(block.clone()),
            }
        }
        leftovers
    }

    /// Tier 3: layout heuristics for whatever is still unplaced. Returns
    /// the blocks no heuristic claimed.
    fn layout_fill(&self, blocks: &[String], sections: &mut SectionMap) -> Vec<String> {
        let mut leftovers = Vec::new();

        for block in blocks {
            let target = self.layout_target(block);
            match target {
                Some(section) if !sections.contains_key(&section) => {
                    debug!(section = %section, tier = 3, "layout assignment");
                    append_section(sections, section, block);
                }
                _ => leftovers.push(block.clone()),
            }
        }
        leftovers
    }

    fn layout_target(&self, block: &str) -> Option<SectionId> {
        let lines: Vec<&str> = block.lines().filter(|l| !l.trim().is_empty()).collect();
        if lines.is_empty() {
            return None;
        }

        let bullets = lines
            .iter()
            .filter(|l| l.trim_start().starts_with(['-', '*', '•', '·']))
            .count();
        let bullet_dense = lines.len() >= 2 && bullets * 2 >= lines.len();

        if bullet_dense {
            if self.dosage_token.is_match(block) {
                return Some(SectionId::Medications);
            }
            return Some(SectionId::Plan);
        }

        if self.bp_token.is_match(block) || self.vital_abbrev.is_match(block) {
            return Some(SectionId::Objective);
        }

        let lowered = block.to_lowercase();
        if REASONING_WORDS.iter().any(|w| lowered.contains(w)) {
            return Some(SectionId::Assessment);
        }
        None
    }
}

enum HeaderLine<'a> {
    Recognized(SectionId, &'a str),
    Unrecognized,
    Content,
}

/// Number of sections found so far, not counting the default subjective
/// bucket or the reserved full-text entry.
fn recognized_count(sections: &SectionMap) -> usize {
    sections
        .keys()
        .filter(|id| !matches!(id, SectionId::Subjective | SectionId::FullText))
        .count()
}

/// Appends body text to a section, joining repeated occurrences with a
/// blank line.
fn append_section(sections: &mut SectionMap, section: SectionId, body: &str) {
    let body = body.trim();
    if body.is_empty() {
        return;
    }
    sections
        .entry(section)
        .and_modify(|existing| {
            existing.push_str("\n\n");
            existing.push_str(body);
        })
        .or_insert_with(|| body.to_string());
}

/// Paragraph blocks split on blank lines.
fn paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn is_all_caps(line: &str) -> bool {
    if line.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    let alpha: Vec<char> = line.chars().filter(|c| c.is_alphabetic()).collect();
    alpha.len() >= 2 && alpha.iter().all(|c| c.is_uppercase())
}

fn is_title_case(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() || words.len() > 5 {
        return false;
    }
    if line.chars().any(|c| c.is_ascii_digit()) || line.ends_with('.') {
        return false;
    }
    words.iter().all(|word| {
        word.chars().next().map(char::is_uppercase).unwrap_or(false)
            || matches!(*word, "of" | "and" | "for" | "the")
    })
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern compiles")
}
