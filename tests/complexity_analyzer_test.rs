// ABOUTME: Tests for the patient complexity score and strategy recommendation
// ABOUTME: Covers factor exclusivity, glycemic precedence, score bounds and thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use nutriplan_server::{
    intelligence::{ComplexityAnalyzer, ComplexityConfig},
    models::{DeficitLevel, DietType, GenerationStrategy, PatientProfile, Sex},
};

mod common;

fn patient(weight_kg: f64, height_cm: f64, age: u32) -> PatientProfile {
    PatientProfile {
        name: "Paciente Teste".to_owned(),
        sex: Sex::Female,
        age,
        weight_kg,
        height_cm,
        hba1c: None,
        fasting_glucose: None,
        waist_cm: None,
        diet_type: DietType::Balanced,
        deficit_level: DeficitLevel::Moderate,
    }
}

fn factor_names(analyzer: &ComplexityAnalyzer, patient: &PatientProfile) -> Vec<String> {
    analyzer
        .analyze(patient)
        .factors
        .into_iter()
        .map(|f| f.name)
        .collect()
}

#[test]
fn test_reference_patient_scores_one() {
    let score = ComplexityAnalyzer::default().analyze(&common::reference_patient());
    assert_eq!(score.score, 1);
    assert_eq!(score.recommendation, GenerationStrategy::LocalOnly);
    assert_eq!(score.factors.len(), 1);
    assert!(score.factors[0].description.contains("HbA1c elevada"));
    assert!(score.patient_summary.contains("Maria Aparecida Silva"));
}

#[test]
fn test_complex_patient_scores_six() {
    let score = ComplexityAnalyzer::default().analyze(&common::complex_patient());
    assert_eq!(score.score, 6);
    assert_eq!(score.recommendation, GenerationStrategy::ExternalMinimal);
}

#[test]
fn test_only_one_bmi_factor_applies() {
    let analyzer = ComplexityAnalyzer::default();
    // BMI ~45: severe only, never severe plus moderate
    let names = factor_names(&analyzer, &patient(130.0, 170.0, 50));
    assert_eq!(names, vec!["severe_obesity".to_owned()]);

    let names = factor_names(&analyzer, &patient(105.0, 170.0, 50));
    assert_eq!(names, vec!["moderate_obesity".to_owned()]);

    let names = factor_names(&analyzer, &patient(45.0, 170.0, 50));
    assert_eq!(names, vec!["underweight".to_owned()]);

    assert!(factor_names(&analyzer, &patient(65.0, 170.0, 50)).is_empty());
}

#[test]
fn test_glucose_ignored_when_hba1c_present() {
    let analyzer = ComplexityAnalyzer::default();
    let mut p = patient(65.0, 170.0, 50);
    p.hba1c = Some(7.0);
    p.fasting_glucose = Some(350.0);
    assert_eq!(analyzer.analyze(&p).score, 0);

    p.hba1c = None;
    let score = analyzer.analyze(&p);
    assert_eq!(score.score, 2);
    assert_eq!(score.factors[0].name, "glucose_very_high");

    p.fasting_glucose = Some(250.0);
    assert_eq!(analyzer.analyze(&p).score, 1);
}

#[test]
fn test_hba1c_boundaries_are_exclusive() {
    let analyzer = ComplexityAnalyzer::default();
    let mut p = patient(65.0, 170.0, 50);
    p.hba1c = Some(8.0);
    assert_eq!(analyzer.analyze(&p).score, 0);
    p.hba1c = Some(8.1);
    assert_eq!(analyzer.analyze(&p).score, 1);
    p.hba1c = Some(10.0);
    assert_eq!(analyzer.analyze(&p).score, 1);
    p.hba1c = Some(10.1);
    assert_eq!(analyzer.analyze(&p).score, 2);
}

#[test]
fn test_age_factor_at_both_ends() {
    let analyzer = ComplexityAnalyzer::default();
    assert_eq!(analyzer.analyze(&patient(65.0, 170.0, 29)).score, 1);
    assert_eq!(analyzer.analyze(&patient(65.0, 170.0, 30)).score, 0);
    assert_eq!(analyzer.analyze(&patient(65.0, 170.0, 75)).score, 0);
    assert_eq!(analyzer.analyze(&patient(65.0, 170.0, 76)).score, 1);
}

#[test]
fn test_low_waist_ratio_adds_nothing() {
    let analyzer = ComplexityAnalyzer::default();
    let mut p = patient(65.0, 170.0, 50);
    p.waist_cm = Some(70.0);
    assert_eq!(analyzer.analyze(&p).score, 0);
}

#[test]
fn test_waist_factor_only_from_elevated_risk() {
    let analyzer = ComplexityAnalyzer::default();
    // BMI 22.5, age 50: no other factor applies
    let mut p = patient(90.0, 200.0, 50);

    p.waist_cm = Some(100.0); // 0.50, moderate
    assert_eq!(analyzer.analyze(&p).score, 0);
    assert!(factor_names(&analyzer, &p).is_empty());

    p.waist_cm = Some(110.0); // 0.55, elevated
    assert_eq!(analyzer.analyze(&p).score, 1);
    assert_eq!(factor_names(&analyzer, &p), vec!["cardiovascular_risk".to_owned()]);

    p.waist_cm = Some(116.0); // 0.58, very elevated
    assert_eq!(analyzer.analyze(&p).score, 1);
}

#[test]
fn test_waist_factor_uses_patient_sex() {
    let analyzer = ComplexityAnalyzer::default();
    let mut p = patient(90.0, 200.0, 50);
    p.waist_cm = Some(110.0); // 0.55
    assert_eq!(analyzer.analyze(&p).score, 1);

    p.sex = Sex::Male;
    assert_eq!(analyzer.analyze(&p).score, 0);
}

#[test]
fn test_score_stays_in_range() {
    let analyzer = ComplexityAnalyzer::default();
    for weight in [40.0, 65.0, 110.0, 160.0] {
        for age in [18, 45, 90] {
            let mut p = patient(weight, 165.0, age);
            p.hba1c = Some(12.0);
            p.waist_cm = Some(140.0);
            let score = analyzer.analyze(&p);
            assert!(score.score <= 10);
            let sum: u32 = score.factors.iter().map(|f| u32::from(f.score)).sum();
            assert_eq!(u32::from(score.score), sum);
        }
    }
}

#[test]
fn test_recommendation_thresholds() {
    let analyzer = ComplexityAnalyzer::default();
    assert_eq!(analyzer.recommend(3).0, GenerationStrategy::LocalOnly);
    assert_eq!(analyzer.recommend(4).0, GenerationStrategy::ExternalMinimal);
    assert_eq!(analyzer.recommend(6).0, GenerationStrategy::ExternalMinimal);
    assert_eq!(analyzer.recommend(7).0, GenerationStrategy::ExternalFull);

    let strict = ComplexityAnalyzer::new(ComplexityConfig {
        simple_threshold: 0,
        medium_threshold: 1,
    });
    assert_eq!(strict.recommend(2).0, GenerationStrategy::ExternalFull);
    let score = strict.analyze(&common::reference_patient());
    assert_eq!(score.recommendation, GenerationStrategy::ExternalMinimal);
}
