//! Canonical note sections.
//!
//! Every recognized header spelling in a source note is mapped onto one of
//! these canonical sections. The variant order defines the display order of
//! a segmented note, which is why `SectionId` derives `Ord` and section maps
//! are `BTreeMap`s.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A canonical clinical note section.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    ChiefComplaint,
    /// Default bucket for narrative text preceding any recognized header.
    Subjective,
    Hpi,
    Pmh,
    Psh,
    FamilyHistory,
    SocialHistory,
    Medications,
    Allergies,
    ReviewOfSystems,
    Vitals,
    Objective,
    Diagnostics,
    Labs,
    Assessment,
    Plan,
    Disposition,
    /// Reserved entry holding the full normalized text of the note.
    FullText,
}

impl SectionId {
    /// All canonical sections, in display order.
    pub const ALL: [SectionId; 18] = [
        SectionId::ChiefComplaint,
        SectionId::Subjective,
        SectionId::Hpi,
        SectionId::Pmh,
        SectionId::Psh,
        SectionId::FamilyHistory,
        SectionId::SocialHistory,
        SectionId::Medications,
        SectionId::Allergies,
        SectionId::ReviewOfSystems,
        SectionId::Vitals,
        SectionId::Objective,
        SectionId::Diagnostics,
        SectionId::Labs,
        SectionId::Assessment,
        SectionId::Plan,
        SectionId::Disposition,
        SectionId::FullText,
    ];

    /// Stable machine-readable name, also used as the key when a section map
    /// is serialized.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChiefComplaint => "chief_complaint",
            Self::Subjective => "subjective",
            Self::Hpi => "hpi",
            Self::Pmh => "pmh",
            Self::Psh => "psh",
            Self::FamilyHistory => "family_history",
            Self::SocialHistory => "social_history",
            Self::Medications => "medications",
            Self::Allergies => "allergies",
            Self::ReviewOfSystems => "review_of_systems",
            Self::Vitals => "vitals",
            Self::Objective => "objective",
            Self::Diagnostics => "diagnostics",
            Self::Labs => "labs",
            Self::Assessment => "assessment",
            Self::Plan => "plan",
            Self::Disposition => "disposition",
            Self::FullText => "full_text",
        }
    }

    /// Resolves a machine-readable name back to a section.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|section| section.name() == normalized)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered mapping of canonical section to its trimmed body text.
pub type SectionMap = BTreeMap<SectionId, String>;
