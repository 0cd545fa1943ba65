//! Whitespace normalization for raw note text.
//!
//! This is the first consumer of pasted EHR text, so it has to absorb
//! trailing-space artifacts, runs of blank lines, and pathological input
//! sizes without ever failing. Single blank lines are preserved: they are
//! the segmenter's main evidence for paragraph breaks.

/// Maximum accepted input length in characters. Longer input is truncated,
/// not rejected.
pub const MAX_INPUT_LEN: usize = 200_000;

/// Outcome of normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    /// Whether the input exceeded [`MAX_INPUT_LEN`] and was truncated.
    pub truncated: bool,
    /// Character count of the original input.
    pub original_len: usize,
}

/// Normalizes raw note text.
///
/// Right-trims every line, collapses three or more consecutive newlines to
/// exactly two, and trims leading/trailing whitespace of the whole document.
/// Never fails; empty input yields empty output.
///
/// Idempotent: normalizing already-normalized text is a no-op.
pub fn normalize(text: &str) -> Normalized {
    let original_len = text.chars().count();
    let truncated = original_len > MAX_INPUT_LEN;

    let capped: &str = if truncated {
        tracing::warn!(
            original_len,
            max = MAX_INPUT_LEN,
            "input exceeds length cap, truncating"
        );
        let end = text
            .char_indices()
            .nth(MAX_INPUT_LEN)
            .map(|(idx, _)| idx)
            .unwrap_or(text.len());
        &text[..end]
    } else {
        text
    };

    let mut lines: Vec<&str> = Vec::new();
    let mut blank_run = 0usize;

    for line in capped.split('\n') {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            // At most one blank line survives between paragraphs.
            if blank_run == 1 {
                lines.push("");
            }
        } else {
            blank_run = 0;
            lines.push(line);
        }
    }

    Normalized {
        text: lines.join("\n").trim().to_string(),
        truncated,
        original_len,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let result = normalize("");
        assert_eq!(result.text, "");
        assert!(!result.truncated);
        assert_eq!(result.original_len, 0);
    }

    #[test]
    fn test_trailing_spaces_trimmed() {
        let result = normalize("HPI:   \nChest pain.  ");
        assert_eq!(result.text, "HPI:\nChest pain.");
    }

    #[test]
    fn test_blank_line_runs_collapsed() {
        let result = normalize("A\n\n\n\n\nB");
        assert_eq!(result.text, "A\n\nB");
    }

    #[test]
    fn test_single_blank_line_preserved() {
        let result = normalize("A\n\nB");
        assert_eq!(result.text, "A\n\nB");
    }

    #[test]
    fn test_idempotent() {
        let messy = "  HPI:  \n\n\n\nChest pain for 2 days.   \n\n\nPlan: \n- aspirin  \n";
        let once = normalize(messy);
        let twice = normalize(&once.text);
        assert_eq!(once.text, twice.text);
        assert!(!twice.truncated);
    }

    #[test]
    fn test_truncation_at_cap() {
        let oversized = "x".repeat(MAX_INPUT_LEN + 100_000);
        let result = normalize(&oversized);
        assert!(result.truncated);
        assert_eq!(result.original_len, MAX_INPUT_LEN + 100_000);
        assert_eq!(result.text.chars().count(), MAX_INPUT_LEN);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let oversized = "é".repeat(MAX_INPUT_LEN + 5);
        let result = normalize(&oversized);
        assert!(result.truncated);
        assert_eq!(result.text.chars().count(), MAX_INPUT_LEN);
    }
}
