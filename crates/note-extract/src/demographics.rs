//! Demographics extraction: age, gender, MRN, DOB.
//!
//! Gender detection is a strict priority chain - explicit words, then the
//! single-letter-next-to-age shorthand ("80 yo M"), then the trailing-slash
//! shorthand ("M/") - where each later rule only applies if no earlier rule
//! matched.

use regex::Regex;

use note_model::{Demographics, Gender};

use crate::dates::DatesExtractor;
use crate::util::compile;

/// Ages outside this range are treated as extraction noise.
const AGE_RANGE: std::ops::RangeInclusive<u32> = 1..=120;

#[derive(Debug)]
pub struct DemographicsExtractor {
    age_patterns: Vec<Regex>,
    explicit_gender: Regex,
    adjacent_gender: Regex,
    slash_gender: Regex,
    mrn: Regex,
    dob: Regex,
    dates: DatesExtractor,
}

impl DemographicsExtractor {
    pub fn new() -> Self {
        Self {
            age_patterns: vec![
                compile(r"(?i)\b(\d{1,3})[- ](?:year|yr)s?[- ]old\b"),
                compile(r"(?i)\b(\d{1,3})\s*(?:yo|y/o|y\.o\.)(?:\b|\s|$)"),
                compile(r"(?i)\bage\s*[:\s]\s*(\d{1,3})\b"),
                // Bulleted short-hand: "- 67 F" / "* 80M"
                compile(r"(?m)^\s*[-*•]\s*(\d{1,3})\s*(?:yo\b|y/o\b|[MF]\b)"),
            ],
            explicit_gender: compile(r"(?i)\b(male|female|man|woman|gentleman|lady)\b"),
            // The leading guard keeps decimals like "98.6F" from reading as
            // an age-sex shorthand.
            adjacent_gender: compile(
                r"(?i)(?:^|[^.\d])(\d{1,3})\s*(?:yo|y/o|y\.o\.|year old|yr old)?\s*(m|f)\b",
            ),
            slash_gender: compile(r"\b([MF])\s*/"),
            mrn: compile(r"(?i)\bmrn\s*[:#]?\s*([A-Za-z0-9-]{4,12})\b"),
            dob: compile(r"(?i)\b(?:dob|date of birth)\s*[:\s]\s*(\S+)"),
            dates: DatesExtractor::new(),
        }
    }

    pub fn extract(&self, text: &str) -> Demographics {
        Demographics {
            age: self.age(text),
            gender: self.gender(text),
            mrn: self
                .mrn
                .captures(text)
                .map(|caps| caps[1].to_string()),
            dob: self.dob(text),
        }
    }

    /// First unambiguous age match, trying the most explicit spellings
    /// first.
    fn age(&self, text: &str) -> Option<u32> {
        for pattern in &self.age_patterns {
            for caps in pattern.captures_iter(text).take(32) {
                if let Ok(age) = caps[1].parse::<u32>()
                    && AGE_RANGE.contains(&age)
                {
                    return Some(age);
                }
            }
        }
        None
    }

    fn gender(&self, text: &str) -> Option<Gender> {
        if let Some(caps) = self.explicit_gender.captures(text) {
            return Some(match caps[1].to_lowercase().as_str() {
                "female" | "woman" | "lady" => Gender::Female,
                _ => Gender::Male,
            });
        }
        if let Some(caps) = self.adjacent_gender.captures(text) {
            return Some(letter_gender(&caps[2]));
        }
        if let Some(caps) = self.slash_gender.captures(text) {
            return Some(letter_gender(&caps[1]));
        }
        None
    }

    fn dob(&self, text: &str) -> Option<String> {
        let caps = self.dob.captures(text)?;
        let token = caps[1].trim_matches([',', ';', '.']).to_string();
        Some(self.dates.normalize_token(&token).unwrap_or(token))
    }
}

impl Default for DemographicsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn letter_gender(letter: &str) -> Gender {
    if letter.eq_ignore_ascii_case("f") {
        Gender::Female
    } else {
        Gender::Male
    }
}
