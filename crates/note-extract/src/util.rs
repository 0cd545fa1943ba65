//! Shared helpers for the extractors.

use regex::Regex;

/// Hard ceiling on matches consumed from any single scanning loop, so
/// repetitive or adversarial text cannot turn a scan into unbounded work.
pub const MAX_MATCHES: usize = 500;

/// Compiles a pattern known at build time.
pub fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern compiles")
}

/// Case-insensitive dedup preserving first occurrence and first spelling.
pub fn dedup_case_insensitive(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::BTreeSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(item.to_lowercase()) {
            out.push(item);
        }
    }
    out
}

/// Lowercased alphanumeric tokens of a phrase, with connective stopwords
/// removed. Used for entity-to-diagnosis matching.
pub fn significant_tokens(phrase: &str) -> Vec<String> {
    const STOPWORDS: &[&str] = &[
        "the", "a", "an", "of", "and", "or", "with", "on", "in", "to", "his", "her",
        "chronic", "acute",
    ];
    phrase
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 2 && !STOPWORDS.contains(t))
        .map(ToOwned::to_owned)
        .collect()
}

/// True when two phrases share at least one significant token.
pub fn entity_matches(entity: &str, diagnosis: &str) -> bool {
    let entity_tokens = significant_tokens(entity);
    if entity_tokens.is_empty() {
        return false;
    }
    let dx_tokens = significant_tokens(diagnosis);
    entity_tokens.iter().any(|t| dx_tokens.contains(t))
}

/// Trims connective tails left behind by greedy entity captures, e.g.
/// "chest pain and" -> "chest pain".
pub fn trim_entity(raw: &str) -> String {
    const TAILS: &[&str] = &["and", "or", "with", "the", "a", "an", "of", "on", "in", "is"];
    let mut entity = raw.trim().trim_matches(['-', '/', ',', '.']).trim();
    loop {
        let Some((head, tail)) = entity.rsplit_once(' ') else {
            break;
        };
        if TAILS.contains(&tail.to_lowercase().as_str()) {
            entity = head.trim_end();
        } else {
            break;
        }
    }
    entity.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_spelling() {
        let items = vec![
            "Heart failure".to_string(),
            "HEART FAILURE".to_string(),
            "Pneumonia".to_string(),
        ];
        assert_eq!(
            dedup_case_insensitive(items),
            vec!["Heart failure".to_string(), "Pneumonia".to_string()]
        );
    }

    #[test]
    fn test_entity_matching_ignores_qualifiers() {
        assert!(entity_matches("heart failure", "Chronic systolic heart failure"));
        assert!(entity_matches("pain", "Chest pain"));
        assert!(!entity_matches("heart failure", "Pneumonia"));
    }

    #[test]
    fn test_trim_entity_tails() {
        assert_eq!(trim_entity("chest pain and "), "chest pain");
        assert_eq!(trim_entity("dyspnea on"), "dyspnea");
        assert_eq!(trim_entity("edema"), "edema");
    }
}
