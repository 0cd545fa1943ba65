//! End-to-end pipeline tests over realistic note shapes.

use note_core::{AllergyRecord, LabAnalyte, Parser, SectionId, VitalsSource, parse};

#[test]
fn test_ed_note_end_to_end() {
    let text = "BP 145/90\nHR 88 bpm\nTemp 98.6F\n\nAssessment:\n1. Chest pain - rule out ACS\n\nPlan:\n- Serial troponins q6h";
    let result = parse(text);

    assert_eq!(result.data.vitals.bp.as_deref(), Some("145/90"));
    assert_eq!(result.data.vitals.hr, Some(88));
    assert_eq!(result.data.vitals.temp, Some(98.6));

    assert!(
        result
            .data
            .diagnoses
            .iter()
            .any(|d| d.to_lowercase().contains("chest pain"))
    );

    let plan = result
        .data
        .sections
        .get(&SectionId::Plan)
        .expect("plan section");
    assert!(plan.contains("troponins"));

    assert!(result.confidence > 0.5, "confidence {}", result.confidence);
}

#[test]
fn test_empty_input_returns_empty_record() {
    let result = parse("");
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.data.sections.is_empty());
    assert!(result.data.vitals.is_empty());
    assert!(result.data.labs.is_empty());
}

#[test]
fn test_oversized_input_truncated_with_warning() {
    let oversized = "x".repeat(300_000);
    let result = parse(&oversized);

    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.contains("truncated") && w.contains("300000"))
    );
    let full_text = result
        .data
        .sections
        .get(&SectionId::FullText)
        .expect("full text");
    assert_eq!(full_text.chars().count(), note_core::MAX_INPUT_LEN);
}

#[test]
fn test_structured_vitals_beat_inline_mention() {
    let text = "Vitals:\nBP: 132/78\nHR: 92\n\nHPI:\nBP 130/80 at home last week.\n\nAssessment:\n1. Hypertension\n\nPlan:\n- continue lisinopril";
    let result = parse(text);

    assert_eq!(result.data.vitals.bp.as_deref(), Some("132/78"));
    assert_eq!(result.data.vitals.source, Some(VitalsSource::VerticalList));
}

#[test]
fn test_lab_trend_takes_rightmost() {
    let text = "Labs:\nWBC 7.04 6.77 6.99\nBNP 1,234\n\nAssessment:\n1. Heart failure\n\nPlan:\n- diuresis";
    let result = parse(text);

    assert_eq!(
        result.data.labs.get(&LabAnalyte::Wbc).map(|v| v.value),
        Some(6.99)
    );
    assert_eq!(
        result.data.labs.get(&LabAnalyte::Bnp).map(|v| v.value),
        Some(1234.0)
    );
}

#[test]
fn test_diagnosis_variants_collapse_to_one_canonical() {
    let text = "HPI:\nKnown CHF, presenting with dyspnea. History of congestive heart failure.\n\nPlan:\n- diuresis";
    let result = parse(text);

    let heart_failure: Vec<&String> = result
        .data
        .diagnoses
        .iter()
        .filter(|d| d.eq_ignore_ascii_case("heart failure"))
        .collect();
    assert_eq!(heart_failure.len(), 1);
}

#[test]
fn test_negated_symptom_not_a_diagnosis() {
    let text = "HPI:\nDenies chest pain. Reports palpitations.\n\nAssessment:\n1. Atrial fibrillation\n\nPlan:\n- rate control";
    let result = parse(text);

    assert!(
        !result
            .data
            .diagnoses
            .iter()
            .any(|d| d.eq_ignore_ascii_case("chest pain"))
    );
    assert!(
        !result
            .data
            .ranked_diagnoses
            .iter()
            .any(|d| d.diagnosis.to_lowercase().contains("chest pain"))
    );
}

#[test]
fn test_allergy_sentinel_exclusivity() {
    let with_nkda = parse("Allergies: NKDA\n\nAssessment:\n1. Pneumonia\n\nPlan:\n- antibiotics");
    assert_eq!(
        with_nkda.data.allergies,
        Some(AllergyRecord::NoKnownAllergies)
    );

    let undocumented = parse("Assessment:\n1. Pneumonia\n\nPlan:\n- antibiotics");
    assert_eq!(undocumented.data.allergies, None);
}

#[test]
fn test_missing_assessment_and_plan_is_critical() {
    let result = parse("HPI:\n67 yo M with cough for 3 days.");
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.starts_with(note_core::CRITICAL_PREFIX))
    );
    assert!(result.confidence < 0.5);
}

#[test]
fn test_hospital_progress_note() {
    let text = "Progress Note\n\n72 year old female, hospital day 3.\n\nMedications:\n- furosemide 40 mg IV BID\n- metoprolol 25 mg PO BID\n\nAllergies: Penicillin - rash\n\nLabs:\nCreatinine 1.1 1.3 1.4\nBNP 2,100\n\nVitals:\nBP: 118/72\nHR: 84\nSpO2: 94\n\nAssessment:\n1. Acute on chronic heart failure - improving\n2. CKD\n\nPlan:\n- continue IV diuresis\n- daily weights";
    let result = parse(text);

    assert_eq!(result.data.demographics.age, Some(72));
    assert_eq!(
        result.data.demographics.gender,
        Some(note_core::Gender::Female)
    );
    assert_eq!(result.data.medications.len(), 2);
    assert_eq!(
        result.data.allergies,
        Some(AllergyRecord::Listed(vec!["Penicillin".to_string()]))
    );
    assert_eq!(
        result.data.labs.get(&LabAnalyte::Creatinine).map(|v| v.value),
        Some(1.4)
    );
    assert_eq!(result.data.vitals.bp.as_deref(), Some("118/72"));
    assert!(result.data.diagnoses.iter().any(|d| d.contains("CKD")));
    assert!(result.confidence > 0.7, "confidence {}", result.confidence);
}

#[test]
fn test_parser_reuse_is_deterministic() {
    let parser = Parser::new();
    let text = "Assessment:\n1. Sepsis\n\nPlan:\n- broad spectrum antibiotics";
    let first = parser.parse(text);
    let second = parser.parse(text);
    assert_eq!(first, second);
}

#[test]
fn test_result_serializes_for_downstream_consumers() {
    let result = parse("Allergies: NKDA\n\nAssessment:\n1. Pneumonia\n\nPlan:\n- antibiotics");
    let json = serde_json::to_string(&result).expect("serialize");
    let round: note_core::ParseResult = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(round, result);
}
