//! Clinical context extraction: temporal, severity, causality, negation.
//!
//! These cues qualify diagnosis candidates downstream; they are never facts
//! on their own. Entity captures are deliberately bounded - a cue whose
//! entity would run past ~40 characters is narrative, not a qualifier.

use regex::Regex;

use note_model::{CausalLink, ClinicalContext, SeverityCue, TemporalCue, TemporalKind};

use crate::util::{MAX_MATCHES, compile, trim_entity};

#[derive(Debug)]
pub struct ContextExtractor {
    onset_modifier_first: Regex,
    onset_started: Regex,
    onset_since: Regex,
    duration_for: Regex,
    duration_times: Regex,
    severity_level_first: Regex,
    severity_entity_first: Regex,
    causality: Regex,
    negation: Regex,
}

impl ContextExtractor {
    pub fn new() -> Self {
        Self {
            onset_modifier_first: compile(
                r"(?i)\b(acute|new[ -]onset|sudden[ -]onset|sudden|new)\s+([a-z][a-z /-]{2,38})",
            ),
            onset_started: compile(
                r"(?i)\b([a-z][a-z /-]{2,38}?)\s+(?:started|began)\s+((?:\d+|a|an|several)\s+\w+\s+ago)",
            ),
            onset_since: compile(
                r"(?i)\b([a-z][a-z /-]{2,38}?)\s+since\s+(yesterday|last\s+\w+|this\s+morning|admission)",
            ),
            duration_for: compile(
                r"(?i)\b([a-z][a-z /-]{2,38}?)\s+(?:for|over)\s+(?:the\s+(?:past|last)\s+)?(\d+\s+(?:hour|day|week|month|year)s?)",
            ),
            duration_times: compile(r"(?i)\b([a-z][a-z /-]{2,38}?)\s+x\s*(\d+\s*(?:hours?|days?|weeks?|months?))"),
            severity_level_first: compile(
                r"(?i)\b(mild|moderate|severe|critical|worsening|improving|improved|stable|resolved)\s+([a-z][a-z /-]{2,38})",
            ),
            severity_entity_first: compile(
                r"(?i)\b([a-z][a-z /-]{2,38}?)\s+(?:is|remains|appears)\s+(stable|improved|improving|worsening|severe|resolved)\b",
            ),
            causality: compile(
                r"(?i)\b([a-z][a-z /-]{2,38}?)\s+(?:due to|secondary to|caused by|attributed to|in the setting of)\s+([a-z][a-z /-]{2,38})",
            ),
            negation: compile(
                r"(?i)\b(?:denies|denied|no evidence of|negative for|without|no)\s+([a-z][a-z /,-]{2,48})",
            ),
        }
    }

    pub fn extract(&self, text: &str) -> ClinicalContext {
        let mut context = ClinicalContext::default();

        for caps in self
            .onset_modifier_first
            .captures_iter(text)
            .take(MAX_MATCHES)
        {
            context.temporal.push(TemporalCue {
                entity: trim_entity(&caps[2]),
                modifier: caps[1].to_lowercase(),
                kind: TemporalKind::Onset,
            });
        }
        for caps in self.onset_started.captures_iter(text).take(MAX_MATCHES) {
            context.temporal.push(TemporalCue {
                entity: trim_entity(&caps[1]),
                modifier: format!("started {}", caps[2].to_lowercase()),
                kind: TemporalKind::Onset,
            });
        }
        for caps in self.onset_since.captures_iter(text).take(MAX_MATCHES) {
            context.temporal.push(TemporalCue {
                entity: trim_entity(&caps[1]),
                modifier: format!("since {}", caps[2].to_lowercase()),
                kind: TemporalKind::Onset,
            });
        }
        for caps in self.duration_for.captures_iter(text).take(MAX_MATCHES) {
            context.temporal.push(TemporalCue {
                entity: trim_entity(&caps[1]),
                modifier: format!("for {}", caps[2].to_lowercase()),
                kind: TemporalKind::Duration,
            });
        }
        for caps in self.duration_times.captures_iter(text).take(MAX_MATCHES) {
            context.temporal.push(TemporalCue {
                entity: trim_entity(&caps[1]),
                modifier: format!("x {}", caps[2].to_lowercase()),
                kind: TemporalKind::Duration,
            });
        }

        for caps in self
            .severity_level_first
            .captures_iter(text)
            .take(MAX_MATCHES)
        {
            context.severity.push(SeverityCue {
                entity: trim_entity(&caps[2]),
                level: caps[1].to_lowercase(),
            });
        }
        for caps in self
            .severity_entity_first
            .captures_iter(text)
            .take(MAX_MATCHES)
        {
            context.severity.push(SeverityCue {
                entity: trim_entity(&caps[1]),
                level: caps[2].to_lowercase(),
            });
        }

        for caps in self.causality.captures_iter(text).take(MAX_MATCHES) {
            context.causality.push(CausalLink {
                effect: trim_entity(&caps[1]),
                cause: trim_entity(&caps[2]),
            });
        }

        for caps in self.negation.captures_iter(text).take(MAX_MATCHES) {
            let phrase = trim_entity(&caps[1]);
            if !phrase.is_empty() {
                context.negations.push(phrase);
            }
        }

        context
    }
}

impl Default for ContextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> ClinicalContext {
        ContextExtractor::new().extract(text)
    }

    #[test]
    fn test_acute_onset_cue() {
        let context = extract("Presenting with acute shortness of breath.");
        let cue = &context.temporal[0];
        assert_eq!(cue.modifier, "acute");
        assert_eq!(cue.kind, TemporalKind::Onset);
        assert!(cue.entity.starts_with("shortness of breath"));
        assert!(cue.is_acute());
    }

    #[test]
    fn test_started_ago_cue() {
        let context = extract("Chest pain started 3 days ago.");
        let cue = &context.temporal[0];
        assert_eq!(cue.entity, "Chest pain");
        assert_eq!(cue.modifier, "started 3 days ago");
    }

    #[test]
    fn test_duration_cue() {
        let context = extract("Productive cough for 2 weeks.");
        let cue = &context.temporal[0];
        assert_eq!(cue.kind, TemporalKind::Duration);
        assert_eq!(cue.modifier, "for 2 weeks");
    }

    #[test]
    fn test_severity_both_orders() {
        let context = extract("Severe aortic stenosis. Heart failure is stable.");
        assert!(
            context
                .severity
                .iter()
                .any(|cue| cue.level == "severe" && cue.entity.contains("aortic stenosis"))
        );
        assert!(
            context
                .severity
                .iter()
                .any(|cue| cue.level == "stable" && cue.entity.contains("Heart failure"))
        );
    }

    #[test]
    fn test_causality_pair() {
        let context = extract("Dyspnea due to heart failure.");
        let link = &context.causality[0];
        assert_eq!(link.effect, "Dyspnea");
        assert_eq!(link.cause, "heart failure");
    }

    #[test]
    fn test_negations() {
        let context = extract("Denies chest pain. No fever or chills.");
        assert!(context.negations.iter().any(|n| n.contains("chest pain")));
        assert!(context.negations.iter().any(|n| n.contains("fever")));
    }

    #[test]
    fn test_empty_text() {
        assert!(extract("").is_empty());
    }
}
