//! Confidence scoring.
//!
//! The scorer is the single aggregator of every failure signal accumulated
//! during a parse: each ordinary warning subtracts a fixed weight, each
//! critical warning subtracts a larger one, and the result is clamped to
//! [0, 1] - never negative, never above 1.

use crate::schema::CRITICAL_PREFIX;

/// Weight subtracted per missing expected structure.
pub const MISSING_WEIGHT: f64 = 0.1;

/// Weight subtracted per critical warning.
pub const CRITICAL_WEIGHT: f64 = 0.3;

/// Converts accumulated warnings into a confidence score in [0, 1].
pub fn score(warnings: &[String]) -> f64 {
    let penalty: f64 = warnings
        .iter()
        .map(|warning| {
            if warning.starts_with(CRITICAL_PREFIX) {
                CRITICAL_WEIGHT
            } else {
                MISSING_WEIGHT
            }
        })
        .sum();

    (1.0 - penalty).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_warnings_full_confidence() {
        assert!((score(&[]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_weight_per_warning() {
        let warnings = vec![
            "No vital signs extracted".to_string(),
            "No medications documented".to_string(),
        ];
        assert!((score(&warnings) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_critical_weighs_more() {
        let warnings = vec![format!("{CRITICAL_PREFIX} no assessment or plan content")];
        assert!((score(&warnings) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_clamped_at_zero() {
        let warnings: Vec<String> = (0..20).map(|i| format!("warning {i}")).collect();
        assert_eq!(score(&warnings), 0.0);
    }
}
