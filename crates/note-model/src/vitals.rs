//! Vital sign records.

use serde::{Deserialize, Serialize};

/// Which extraction strategy produced a vitals record.
///
/// Structured layouts are more trustworthy than inline narrative matches;
/// when a note carries both, consumers must prefer the structured source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalsSource {
    /// A `Min: ... Max: ...` range table with a trailing most-recent column.
    RangeTable,
    /// A `BP Pulse Resp Temp SpO2` header row followed by a data row.
    Tabular,
    /// One `Label: value` line per vital.
    VerticalList,
    /// Vital-shaped tokens found in free-text narrative.
    Inline,
}

/// A measured value with its unit, e.g. weight in kg or height in cm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: String,
}

/// Sparse vital sign record. Every field is optional; absent fields simply
/// were not documented in the source note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    /// Blood pressure as `"systolic/diastolic"`.
    pub bp: Option<String>,
    /// Heart rate, beats per minute.
    pub hr: Option<u32>,
    /// Respiratory rate, breaths per minute.
    pub rr: Option<u32>,
    /// Temperature in degrees Fahrenheit.
    pub temp: Option<f64>,
    /// Oxygen saturation, percent.
    pub spo2: Option<u32>,
    pub weight: Option<Measurement>,
    pub height: Option<Measurement>,
    /// Strategy that produced the structured fields, if any matched.
    pub source: Option<VitalsSource>,
}

impl Vitals {
    /// True when no vital sign field was extracted.
    pub fn is_empty(&self) -> bool {
        self.bp.is_none()
            && self.hr.is_none()
            && self.rr.is_none()
            && self.temp.is_none()
            && self.spo2.is_none()
            && self.weight.is_none()
            && self.height.is_none()
    }

    /// Systolic blood pressure, parsed out of the `bp` field.
    pub fn systolic(&self) -> Option<u32> {
        let bp = self.bp.as_ref()?;
        let (systolic, _) = bp.split_once('/')?;
        systolic.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_by_default() {
        assert!(Vitals::default().is_empty());
    }

    #[test]
    fn test_systolic_parsing() {
        let vitals = Vitals {
            bp: Some("145/90".to_string()),
            ..Vitals::default()
        };
        assert_eq!(vitals.systolic(), Some(145));
        assert!(!vitals.is_empty());
    }

    #[test]
    fn test_systolic_malformed() {
        let vitals = Vitals {
            bp: Some("145".to_string()),
            ..Vitals::default()
        };
        assert_eq!(vitals.systolic(), None);
    }
}
