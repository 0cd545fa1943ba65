//! Vital sign extraction.
//!
//! EHR exports render vitals in a handful of recurring layouts. The
//! recognizers run in priority order - min/max range table, tabular
//! header+row, vertical label list - and the first layout that yields
//! anything wins and stamps the record's source tag. Inline free-text
//! scanning is the last resort and only fills fields the structured
//! layouts left unset, so a tabular value always beats a narrative mention
//! of the same vital.

use regex::Regex;
use tracing::debug;

use note_model::{Measurement, SectionId, TextSource, Vitals, VitalsSource};

use crate::util::compile;

/// Plausible systolic range for accepting a bare `NNN/NNN` token as a blood
/// pressure; anything else is more likely a date or a ratio.
const SYSTOLIC_RANGE: std::ops::RangeInclusive<u32> = 60..=250;

/// Sections searched for structured vitals layouts before falling back to
/// the whole note.
const PREFERRED_SECTIONS: [SectionId; 2] = [SectionId::Vitals, SectionId::Objective];

#[derive(Debug)]
pub struct VitalsExtractor {
    range_header: Regex,
    range_line: Regex,
    tabular_header: Regex,
    bp_token: Regex,
    vertical_line: Regex,
    alert_marker: Regex,
    inline_bp: Regex,
    bare_bp: Regex,
    inline_hr: Regex,
    inline_rr: Regex,
    inline_temp: Regex,
    inline_spo2: Regex,
    room_air_spo2: Regex,
    inline_weight: Regex,
    inline_height: Regex,
    number: Regex,
}

impl VitalsExtractor {
    pub fn new() -> Self {
        Self {
            range_header: compile(r"(?i)vital\s+signs?\b.*\bmin\b.*\bmax\b"),
            range_line: compile(
                r"(?i)^\s*(?P<name>blood pressure|bp|heart rate|hr|pulse|respiratory rate|resp|rr|temperature|temp|spo2|o2 sat)\s*:?\s+min:?\s*(?P<min>\S+)\s+max:?\s*(?P<max>\S+)\s+(?P<last>\S+)\s*$",
            ),
            tabular_header: compile(r"(?i)^\s*bp\s+pulse\s+resp\w*\s+temp\w*\s+spo2\s*$"),
            bp_token: compile(r"\b(\d{2,3})\s*/\s*(\d{2,3})\b"),
            vertical_line: compile(
                r"(?i)^\s*(?P<label>blood pressure|bp|heart rate|hr|pulse ox|pulse|respiratory rate|resp|rr|temperature|temp|spo2|o2 sat(?:uration)?|sat|weight|wt|height|ht)\s*[:=]\s*(?:\(!\)|!)?\s*(?P<value>.+)$",
            ),
            alert_marker: compile(r"\(!\)|!"),
            inline_bp: compile(r"(?i)(?:blood pressure|\bbp\b)\D{0,20}?(\d{2,3})\s*/\s*(\d{2,3})"),
            bare_bp: compile(r"\b(\d{2,3})/(\d{2,3})\b"),
            inline_hr: compile(r"(?i)\b(?:heart rate|hr|pulse)\b\D{0,15}?(\d{1,3})\b"),
            inline_rr: compile(r"(?i)\b(?:respiratory rate|resp|rr)\b\D{0,15}?(\d{1,2})\b"),
            inline_temp: compile(r"(?i)\btemp(?:erature)?\b\D{0,15}?(\d{2,3}(?:\.\d+)?)\s*°?\s*f?\b"),
            inline_spo2: compile(r"(?i)\b(?:spo2|o2 sat(?:uration)?|oxygen saturation|pulse ox)\b\D{0,15}?(\d{2,3})\s*%?"),
            room_air_spo2: compile(r"(?i)\b(\d{2,3})\s*%\s*on\s+(?:room air|ra|\d+\s*l)"),
            inline_weight: compile(r"(?i)\b(?:weight|wt)\b\D{0,10}?(\d{2,3}(?:\.\d+)?)\s*(kg|kgs|lbs?|pounds)\b"),
            inline_height: compile(r"(?i)\b(?:height|ht)\b\D{0,10}?(\d{2,3}(?:\.\d+)?)\s*(cm|in|inches)\b"),
            number: compile(r"\d{1,3}(?:\.\d+)?"),
        }
    }

    /// Extracts vitals. Structured layouts are searched in the vitals or
    /// objective section body when one exists; inline scanning always runs
    /// over the whole note, filling only what is still unset.
    pub fn extract(&self, source: &TextSource) -> Vitals {
        let structured_text = source.preferred(&PREFERRED_SECTIONS);

        let mut vitals = self.range_table(structured_text);
        if vitals.is_empty() {
            vitals = self.tabular(structured_text);
        }
        if vitals.is_empty() {
            vitals = self.vertical_list(structured_text);
        }
        if let Some(layout) = vitals.source {
            debug!(?layout, "structured vitals layout matched");
        }

        self.inline_fill(source.full_text(), &mut vitals);
        vitals
    }

    /// Min/max range table: a `vital signs ... min ... max` header followed
    /// by `Name  Min: v  Max: v  last` lines. The trailing column is the
    /// most recent value and is the one extracted.
    fn range_table(&self, text: &str) -> Vitals {
        let mut vitals = Vitals::default();

        let Some(header) = self.range_header.find(text) else {
            return vitals;
        };

        for line in text[header.end()..].lines().take(16) {
            let Some(caps) = self.range_line.captures(line) else {
                continue;
            };
            let name = caps.name("name").map(|m| m.as_str()).unwrap_or_default();
            let last = caps.name("last").map(|m| m.as_str()).unwrap_or_default();
            self.assign(&mut vitals, name, last);
        }

        if !vitals.is_empty() {
            vitals.source = Some(VitalsSource::RangeTable);
        }
        vitals
    }

    /// Tabular layout: `BP Pulse Resp Temp SpO2` header row immediately
    /// followed by a positional data row. An inline alert marker in the row
    /// is stripped before splitting.
    fn tabular(&self, text: &str) -> Vitals {
        let mut vitals = Vitals::default();
        let mut lines = text.lines();

        let found = lines.by_ref().any(|line| self.tabular_header.is_match(line));
        if !found {
            return vitals;
        }
        let Some(row) = lines.find(|line| !line.trim().is_empty()) else {
            return vitals;
        };

        let cleaned = self.alert_marker.replace_all(row, " ");
        let fields: Vec<&str> = cleaned.split_whitespace().collect();
        if fields.len() < 5 {
            return vitals;
        }

        if let Some(caps) = self.bp_token.captures(fields[0]) {
            vitals.bp = Some(format!("{}/{}", &caps[1], &caps[2]));
        }
        vitals.hr = parse_int(fields[1]);
        vitals.rr = parse_int(fields[2]);
        vitals.temp = parse_temp(fields[3]);
        vitals.spo2 = parse_int(fields[4]);

        if !vitals.is_empty() {
            vitals.source = Some(VitalsSource::Tabular);
        }
        vitals
    }

    /// Vertical list layout: one `Label: value` line per vital, tolerant of
    /// an alert marker immediately after the colon.
    fn vertical_list(&self, text: &str) -> Vitals {
        let mut vitals = Vitals::default();

        for line in text.lines().take(64) {
            let Some(caps) = self.vertical_line.captures(line) else {
                continue;
            };
            let label = caps.name("label").map(|m| m.as_str()).unwrap_or_default();
            let value = caps.name("value").map(|m| m.as_str()).unwrap_or_default();
            self.assign(&mut vitals, label, value);
        }

        if !vitals.is_empty() {
            vitals.source = Some(VitalsSource::VerticalList);
        }
        vitals
    }

    /// Last-resort scan of the whole text for vital-shaped tokens near
    /// vital keywords. Only touches fields no structured layout filled.
    fn inline_fill(&self, text: &str, vitals: &mut Vitals) {
        let structured = vitals.source.is_some();
        let before = vitals.is_empty();

        if vitals.bp.is_none() {
            if let Some(caps) = self.inline_bp.captures(text) {
                vitals.bp = Some(format!("{}/{}", &caps[1], &caps[2]));
            } else if let Some(caps) = self.bare_bp.captures(text) {
                // A bare NNN/NNN is only believable as a blood pressure when
                // the first number is in systolic range.
                let systolic: u32 = caps[1].parse().unwrap_or(0);
                if SYSTOLIC_RANGE.contains(&systolic) {
                    vitals.bp = Some(format!("{}/{}", &caps[1], &caps[2]));
                }
            }
        }
        if vitals.hr.is_none()
            && let Some(caps) = self.inline_hr.captures(text)
        {
            vitals.hr = caps[1].parse().ok();
        }
        if vitals.rr.is_none()
            && let Some(caps) = self.inline_rr.captures(text)
        {
            vitals.rr = caps[1].parse().ok();
        }
        if vitals.temp.is_none()
            && let Some(caps) = self.inline_temp.captures(text)
        {
            vitals.temp = caps[1].parse().ok();
        }
        if vitals.spo2.is_none() {
            let spo2 = self
                .inline_spo2
                .captures(text)
                .or_else(|| self.room_air_spo2.captures(text));
            if let Some(caps) = spo2 {
                vitals.spo2 = caps[1].parse().ok();
            }
        }
        if vitals.weight.is_none()
            && let Some(caps) = self.inline_weight.captures(text)
        {
            vitals.weight = Some(Measurement {
                value: caps[1].parse().unwrap_or_default(),
                unit: caps[2].to_lowercase(),
            });
        }
        if vitals.height.is_none()
            && let Some(caps) = self.inline_height.captures(text)
        {
            vitals.height = Some(Measurement {
                value: caps[1].parse().unwrap_or_default(),
                unit: caps[2].to_lowercase(),
            });
        }

        if !structured && before && !vitals.is_empty() {
            vitals.source = Some(VitalsSource::Inline);
        }
    }

    /// Assigns a label/value pair from a structured layout onto the record.
    fn assign(&self, vitals: &mut Vitals, label: &str, value: &str) {
        let label = label.to_lowercase();
        match label.as_str() {
            "bp" | "blood pressure" => {
                if let Some(caps) = self.bp_token.captures(value) {
                    vitals.bp = Some(format!("{}/{}", &caps[1], &caps[2]));
                }
            }
            "hr" | "heart rate" | "pulse" => {
                vitals.hr = self.first_number(value).and_then(|n| n.parse().ok());
            }
            "rr" | "resp" | "respiratory rate" => {
                vitals.rr = self.first_number(value).and_then(|n| n.parse().ok());
            }
            "temp" | "temperature" => {
                vitals.temp = self.first_number(value).and_then(|n| n.parse().ok());
            }
            "spo2" | "o2 sat" | "o2 saturation" | "sat" | "pulse ox" => {
                vitals.spo2 = self.first_number(value).and_then(|n| n.parse().ok());
            }
            "weight" | "wt" => {
                vitals.weight = self.measurement(value);
            }
            "height" | "ht" => {
                vitals.height = self.measurement(value);
            }
            _ => {}
        }
    }

    fn first_number<'a>(&self, value: &'a str) -> Option<&'a str> {
        self.number.find(value).map(|m| m.as_str())
    }

    fn measurement(&self, value: &str) -> Option<Measurement> {
        let number = self.first_number(value)?;
        let unit = value[value.find(number)? + number.len()..]
            .trim()
            .split_whitespace()
            .next()
            .unwrap_or("")
            .trim_matches([',', '.', ';'])
            .to_lowercase();
        Some(Measurement {
            value: number.parse().ok()?,
            unit,
        })
    }
}

impl Default for VitalsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_int(field: &str) -> Option<u32> {
    let digits: String = field.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn parse_temp(field: &str) -> Option<f64> {
    field
        .trim_end_matches(['F', 'f', '°'])
        .trim()
        .parse()
        .ok()
}
