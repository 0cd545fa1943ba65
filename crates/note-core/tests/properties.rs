//! Property tests for the pipeline invariants.
//!
//! The parser must never panic on arbitrary text, confidence is always
//! clamped to [0, 1], and normalization/segmentation are idempotent.

use std::sync::LazyLock;

use proptest::prelude::*;

use note_core::{HeaderLexicon, Parser, Segmenter, normalize};

static PARSER: LazyLock<Parser> = LazyLock::new(Parser::new);
static SEGMENTER: LazyLock<Segmenter> =
    LazyLock::new(|| Segmenter::new(HeaderLexicon::builtin()));

proptest! {
    #[test]
    fn parse_never_panics_and_confidence_is_clamped(text in "[ -~\n]{0,400}") {
        let result = PARSER.parse(&text);
        prop_assert!((0.0..=1.0).contains(&result.confidence));
    }

    #[test]
    fn parse_handles_arbitrary_unicode(text in "\\PC{0,200}") {
        let result = PARSER.parse(&text);
        prop_assert!((0.0..=1.0).contains(&result.confidence));
    }

    #[test]
    fn normalization_is_idempotent(text in "[ -~\n\t]{0,400}") {
        let once = normalize(&text);
        let twice = normalize(&once.text);
        prop_assert_eq!(&once.text, &twice.text);
    }

    #[test]
    fn segmentation_is_idempotent_over_normalization(text in "[ -~\n]{0,400}") {
        let once = SEGMENTER.segment(&normalize(&text).text);
        let twice = SEGMENTER.segment(&normalize(&normalize(&text).text).text);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn diagnoses_are_deduplicated_case_insensitively(text in "[ -~\n]{0,400}") {
        let result = PARSER.parse(&text);
        let mut seen = std::collections::BTreeSet::new();
        for diagnosis in &result.data.diagnoses {
            prop_assert!(seen.insert(diagnosis.to_lowercase()));
        }
    }
}
