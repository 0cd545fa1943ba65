//! Laboratory analytes and values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed set of laboratory analytes the extractor recognizes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LabAnalyte {
    Glucose,
    Hemoglobin,
    Creatinine,
    Wbc,
    Bun,
    /// BNP or NT-proBNP; both map onto the same analyte.
    Bnp,
    Troponin,
    Lactate,
    Amylase,
    Lipase,
}

impl LabAnalyte {
    /// All recognized analytes.
    pub const ALL: [LabAnalyte; 10] = [
        LabAnalyte::Glucose,
        LabAnalyte::Hemoglobin,
        LabAnalyte::Creatinine,
        LabAnalyte::Wbc,
        LabAnalyte::Bun,
        LabAnalyte::Bnp,
        LabAnalyte::Troponin,
        LabAnalyte::Lactate,
        LabAnalyte::Amylase,
        LabAnalyte::Lipase,
    ];

    /// Canonical display name.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Self::Glucose => "Glucose",
            Self::Hemoglobin => "Hemoglobin",
            Self::Creatinine => "Creatinine",
            Self::Wbc => "WBC",
            Self::Bun => "BUN",
            Self::Bnp => "BNP",
            Self::Troponin => "Troponin",
            Self::Lactate => "Lactate",
            Self::Amylase => "Amylase",
            Self::Lipase => "Lipase",
        }
    }

    /// Spellings accepted at the start of a result line, longest first so
    /// that alternation in a pattern never matches a prefix of a longer
    /// alias.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Glucose => &["blood glucose", "glucose", "glu"],
            Self::Hemoglobin => &["hemoglobin", "hgb", "hb"],
            Self::Creatinine => &["creatinine", "creat", "cr"],
            Self::Wbc => &["white blood cell count", "white blood cells", "white count", "wbc"],
            Self::Bun => &["blood urea nitrogen", "bun"],
            Self::Bnp => &["nt-probnp", "nt probnp", "pro-bnp", "probnp", "bnp"],
            Self::Troponin => &["troponin i", "troponin t", "troponin", "trop"],
            Self::Lactate => &["lactic acid", "lactate"],
            Self::Amylase => &["amylase"],
            Self::Lipase => &["lipase"],
        }
    }
}

impl fmt::Display for LabAnalyte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// A numeric lab result with an optional abnormal flag (`H`, `L`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabValue {
    pub value: f64,
    pub flag: Option<String>,
}

impl LabValue {
    pub fn new(value: f64) -> Self {
        Self { value, flag: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_longest_first() {
        for analyte in LabAnalyte::ALL {
            let aliases = analyte.aliases();
            for pair in aliases.windows(2) {
                assert!(
                    pair[0].len() >= pair[1].len(),
                    "{}: alias '{}' should come after '{}'",
                    analyte,
                    pair[0],
                    pair[1]
                );
            }
        }
    }
}
