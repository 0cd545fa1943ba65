//! Extractor input: raw text or a pre-segmented note.
//!
//! Extractors accept either the full note text or the section map produced
//! by segmentation. The tagged union makes that contract explicit instead of
//! inspecting the shape of the argument at runtime.

use crate::section::{SectionId, SectionMap};

/// Input text for an extractor.
#[derive(Debug, Clone, Copy)]
pub enum TextSource<'a> {
    /// Un-segmented note text.
    Raw { text: &'a str },
    /// A segmented note; extractors pick the section bodies they prefer.
    Sectioned { sections: &'a SectionMap },
}

impl<'a> TextSource<'a> {
    pub fn raw(text: &'a str) -> Self {
        Self::Raw { text }
    }

    pub fn sectioned(sections: &'a SectionMap) -> Self {
        Self::Sectioned { sections }
    }

    /// The whole note text: the raw input, or the reserved full-text entry
    /// of a section map.
    pub fn full_text(&self) -> &'a str {
        match self {
            Self::Raw { text } => text,
            Self::Sectioned { sections } => sections
                .get(&SectionId::FullText)
                .map(String::as_str)
                .unwrap_or_default(),
        }
    }

    /// Body of a specific section, when segmented and present.
    pub fn section(&self, id: SectionId) -> Option<&'a str> {
        match self {
            Self::Raw { .. } => None,
            Self::Sectioned { sections } => sections.get(&id).map(String::as_str),
        }
    }

    /// The first present section body out of `preferred`, falling back to
    /// the full text when none is present or the source is raw.
    pub fn preferred(&self, preferred: &[SectionId]) -> &'a str {
        preferred
            .iter()
            .find_map(|id| self.section(*id))
            .unwrap_or_else(|| self.full_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_full_text() {
        let source = TextSource::raw("BP 120/80");
        assert_eq!(source.full_text(), "BP 120/80");
        assert_eq!(source.section(SectionId::Vitals), None);
        assert_eq!(source.preferred(&[SectionId::Vitals]), "BP 120/80");
    }

    #[test]
    fn test_sectioned_preference() {
        let mut sections = SectionMap::new();
        sections.insert(SectionId::Vitals, "BP: 120/80".to_string());
        sections.insert(SectionId::FullText, "everything".to_string());

        let source = TextSource::sectioned(&sections);
        assert_eq!(source.preferred(&[SectionId::Vitals]), "BP: 120/80");
        assert_eq!(
            source.preferred(&[SectionId::Objective, SectionId::Vitals]),
            "BP: 120/80"
        );
        assert_eq!(source.preferred(&[SectionId::Labs]), "everything");
    }
}
