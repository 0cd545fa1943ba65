//! Extractor behavior over pre-segmented sources.
//!
//! The extractors accept either raw text or a section map; these tests pin
//! the section-preference contract of each extractor.

use note_extract::{
    DiagnosesExtractor, LabsExtractor, MedicationsExtractor, VitalsExtractor,
};
use note_model::{LabAnalyte, SectionId, SectionMap, TextSource, VitalsSource};

fn sections(entries: &[(SectionId, &str)]) -> SectionMap {
    let mut map = SectionMap::new();
    for (id, body) in entries {
        map.insert(*id, (*body).to_string());
    }
    map
}

#[test]
fn test_vitals_prefers_vitals_section_over_full_text() {
    let map = sections(&[
        (SectionId::Vitals, "BP: 132/78\nHR: 92"),
        (
            SectionId::FullText,
            "BP 130/80 noted at home.\n\nVitals:\nBP: 132/78\nHR: 92",
        ),
    ]);
    let vitals = VitalsExtractor::new().extract(&TextSource::sectioned(&map));

    assert_eq!(vitals.bp.as_deref(), Some("132/78"));
    assert_eq!(vitals.source, Some(VitalsSource::VerticalList));
}

#[test]
fn test_vitals_inline_falls_back_to_full_text_for_gaps() {
    let map = sections(&[
        (SectionId::Vitals, "BP: 132/78"),
        (
            SectionId::FullText,
            "Satting 94% on room air.\n\nVitals:\nBP: 132/78",
        ),
    ]);
    let vitals = VitalsExtractor::new().extract(&TextSource::sectioned(&map));

    assert_eq!(vitals.bp.as_deref(), Some("132/78"));
    assert_eq!(vitals.spo2, Some(94));
}

#[test]
fn test_labs_reads_labs_section() {
    let map = sections(&[
        (SectionId::Labs, "Troponin 0.02 0.09 0.31"),
        (SectionId::FullText, "irrelevant"),
    ]);
    let labs = LabsExtractor::new().extract(&TextSource::sectioned(&map));

    assert_eq!(
        labs.get(&LabAnalyte::Troponin).map(|v| v.value),
        Some(0.31)
    );
}

#[test]
fn test_medications_require_their_section_when_segmented() {
    let map = sections(&[(
        SectionId::FullText,
        "taking aspirin and lisinopril at home",
    )]);
    let meds = MedicationsExtractor::new().extract(&TextSource::sectioned(&map));
    assert!(meds.is_empty());

    let map = sections(&[
        (SectionId::Medications, "- aspirin 81 mg\n- lisinopril 10 mg"),
        (SectionId::FullText, "irrelevant"),
    ]);
    let meds = MedicationsExtractor::new().extract(&TextSource::sectioned(&map));
    assert_eq!(meds, vec!["aspirin 81 mg", "lisinopril 10 mg"]);
}

#[test]
fn test_diagnoses_numbered_pass_scoped_to_assessment() {
    let map = sections(&[
        (SectionId::Assessment, "1. Pneumonia\n2. Sepsis"),
        (SectionId::Plan, "1. ceftriaxone\n2. blood cultures"),
        (
            SectionId::FullText,
            "Assessment:\n1. Pneumonia\n2. Sepsis\n\nPlan:\n1. ceftriaxone\n2. blood cultures",
        ),
    ]);
    let diagnoses = DiagnosesExtractor::new().extract(&TextSource::sectioned(&map));

    assert!(diagnoses.contains(&"Pneumonia".to_string()));
    assert!(diagnoses.contains(&"Sepsis".to_string()));
    assert!(!diagnoses.contains(&"ceftriaxone".to_string()));
}

#[test]
fn test_problems_addressed_block_found_in_full_text() {
    let map = sections(&[(
        SectionId::FullText,
        "Problems Addressed:\nHeart failure exacerbation: severe\nHyponatremia: mild",
    )]);
    let diagnoses = DiagnosesExtractor::new().extract(&TextSource::sectioned(&map));

    assert!(diagnoses.contains(&"Heart failure exacerbation".to_string()));
    assert!(diagnoses.contains(&"Hyponatremia".to_string()));
}
