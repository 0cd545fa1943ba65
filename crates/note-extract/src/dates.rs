//! Liberal date scanning.
//!
//! Collects calendar-like tokens anywhere in the text and normalizes them
//! to ISO-8601. Malformed or impossible tokens (month 13, February 30) are
//! silently skipped; the calendar check rides on `chrono`.

use chrono::NaiveDate;
use regex::Regex;

use crate::util::compile;

/// Upper bound on date tokens consumed from one note.
const MAX_DATE_MATCHES: usize = 1_000;

/// Two-digit years at or above this are read as 19xx, below as 20xx.
const TWO_DIGIT_YEAR_PIVOT: u32 = 50;

#[derive(Debug, Clone, Copy)]
enum FieldOrder {
    YearMonthDay,
    MonthDayYear,
    MonthNameDayYear,
    DayMonthNameYear,
}

#[derive(Debug)]
pub struct DatesExtractor {
    patterns: Vec<(Regex, FieldOrder)>,
}

impl DatesExtractor {
    pub fn new() -> Self {
        const MONTHS: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:t|tember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

        let patterns = vec![
            (
                compile(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b"),
                FieldOrder::YearMonthDay,
            ),
            (
                compile(r"\b(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})\b"),
                FieldOrder::MonthDayYear,
            ),
            (
                compile(r"\b(\d{1,2})-(\d{1,2})-(\d{4})\b"),
                FieldOrder::MonthDayYear,
            ),
            (
                compile(&format!(
                    r"(?i)\b({MONTHS})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})\b"
                )),
                FieldOrder::MonthNameDayYear,
            ),
            (
                compile(&format!(r"(?i)\b(\d{{1,2}})\s+({MONTHS})\.?,?\s+(\d{{4}})\b")),
                FieldOrder::DayMonthNameYear,
            ),
        ];
        Self { patterns }
    }

    /// All normalized dates in order of first appearance, deduplicated.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut found: Vec<(usize, String)> = Vec::new();

        for (pattern, order) in &self.patterns {
            for caps in pattern.captures_iter(text).take(MAX_DATE_MATCHES) {
                let position = caps.get(0).map(|m| m.start()).unwrap_or_default();
                if let Some(iso) = normalize_captures(&caps, *order) {
                    found.push((position, iso));
                }
            }
        }

        found.sort_by_key(|(position, _)| *position);
        let mut seen = std::collections::BTreeSet::new();
        found
            .into_iter()
            .filter_map(|(_, iso)| seen.insert(iso.clone()).then_some(iso))
            .collect()
    }

    /// Normalizes a single date-like token, for callers holding one value
    /// (a DOB field, for example) rather than scanning a document.
    pub fn normalize_token(&self, token: &str) -> Option<String> {
        for (pattern, order) in &self.patterns {
            if let Some(caps) = pattern.captures(token) {
                return normalize_captures(&caps, *order);
            }
        }
        None
    }
}

impl Default for DatesExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_captures(caps: &regex::Captures<'_>, order: FieldOrder) -> Option<String> {
    let field = |idx: usize| caps.get(idx).map(|m| m.as_str()).unwrap_or_default();

    let (year, month, day) = match order {
        FieldOrder::YearMonthDay => (
            field(1).parse().ok()?,
            field(2).parse().ok()?,
            field(3).parse().ok()?,
        ),
        FieldOrder::MonthDayYear => {
            let year_raw = field(3);
            let year: u32 = year_raw.parse().ok()?;
            let year = if year_raw.len() == 2 {
                if year >= TWO_DIGIT_YEAR_PIVOT {
                    1900 + year
                } else {
                    2000 + year
                }
            } else {
                year
            };
            (year as i32, field(1).parse().ok()?, field(2).parse().ok()?)
        }
        FieldOrder::MonthNameDayYear => (
            field(3).parse().ok()?,
            month_number(field(1))?,
            field(2).parse().ok()?,
        ),
        FieldOrder::DayMonthNameYear => (
            field(3).parse().ok()?,
            month_number(field(2))?,
            field(1).parse().ok()?,
        ),
    };

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(date.format("%Y-%m-%d").to_string())
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.to_lowercase().chars().take(3).collect();
    let number = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Vec<String> {
        DatesExtractor::new().extract(text)
    }

    #[test]
    fn test_slash_dates() {
        assert_eq!(extract("Seen on 3/5/2023 and again 12/31/23."), vec![
            "2023-03-05",
            "2023-12-31"
        ]);
    }

    #[test]
    fn test_iso_passthrough() {
        assert_eq!(extract("Echo 2022-11-02 showed EF 40%."), vec!["2022-11-02"]);
    }

    #[test]
    fn test_month_name_forms() {
        assert_eq!(
            extract("Admitted January 5, 2023; discharged 9 Feb 2023."),
            vec!["2023-01-05", "2023-02-09"]
        );
    }

    #[test]
    fn test_invalid_dates_skipped() {
        assert!(extract("Reviewed 13/45/2023 and 2/30/2023.").is_empty());
    }

    #[test]
    fn test_two_digit_year_pivot() {
        assert_eq!(extract("DOB 4/12/58"), vec!["1958-04-12"]);
        assert_eq!(extract("Cath 4/12/08"), vec!["2008-04-12"]);
    }

    #[test]
    fn test_order_and_dedup() {
        assert_eq!(
            extract("3/5/2023 follow-up from 2023-03-05 visit, next 4/1/2023"),
            vec!["2023-03-05", "2023-04-01"]
        );
    }

    #[test]
    fn test_normalize_token() {
        let extractor = DatesExtractor::new();
        assert_eq!(
            extractor.normalize_token("11/02/1948").as_deref(),
            Some("1948-11-02")
        );
        assert_eq!(extractor.normalize_token("not a date"), None);
    }
}
