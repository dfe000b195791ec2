// ABOUTME: Additive clinical complexity scoring used to route plan generation
// ABOUTME: Scores BMI extremes, glycemic control, age and cardiovascular risk into 0..=10
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::{ComplexityConfig, NutritionConfig};
use crate::nutrition_calculator::{body_mass_index, cardiovascular_risk};
use nutriplan_core::constants::limits::MAX_COMPLEXITY_SCORE;
use nutriplan_core::models::{
    ComplexityFactor, ComplexityScore, GenerationStrategy, PatientProfile,
};
use std::fmt::Write;

/// Scores a patient and recommends a generation strategy
#[derive(Debug, Clone, Default)]
pub struct ComplexityAnalyzer {
    config: ComplexityConfig,
    nutrition: NutritionConfig,
}

impl ComplexityAnalyzer {
    /// Create an analyzer with the given thresholds
    #[must_use]
    pub fn new(config: ComplexityConfig) -> Self {
        Self {
            config,
            nutrition: NutritionConfig::default(),
        }
    }

    /// Use a non-default nutrition table for the risk classification
    #[must_use]
    pub fn with_nutrition_config(mut self, nutrition: NutritionConfig) -> Self {
        self.nutrition = nutrition;
        self
    }

    /// Thresholds in use
    #[must_use]
    pub const fn config(&self) -> &ComplexityConfig {
        &self.config
    }

    /// Score a validated patient
    #[must_use]
    pub fn analyze(&self, patient: &PatientProfile) -> ComplexityScore {
        let bmi = body_mass_index(patient.weight_kg, patient.height_cm);

        let mut factors: Vec<ComplexityFactor> = bmi_factor(bmi)
            .into_iter()
            .chain(glycemic_factor(patient))
            .collect();
        factors.extend(age_factor(patient.age));
        factors.extend(self.cardiovascular_factor(patient));

        let raw: u32 = factors.iter().map(|f| u32::from(f.score)).sum();
        let score = u8::try_from(raw)
            .unwrap_or(MAX_COMPLEXITY_SCORE)
            .min(MAX_COMPLEXITY_SCORE);
        let (recommendation, rationale) = self.recommend(score);

        ComplexityScore {
            score,
            factors,
            recommendation,
            rationale: rationale.to_owned(),
            patient_summary: patient_summary(patient, bmi),
        }
    }

    fn cardiovascular_factor(&self, patient: &PatientProfile) -> Option<ComplexityFactor> {
        let waist = patient.waist_cm?;
        let assessment = cardiovascular_risk(waist, patient.height_cm, patient.sex, &self.nutrition);
        assessment.risk.is_elevated().then(|| {
            factor(
                "cardiovascular_risk",
                1,
                format!("Risco cardiovascular {}", assessment.risk.label()),
            )
        })
    }

    /// Strategy and rationale for a score
    #[must_use]
    pub const fn recommend(&self, score: u8) -> (GenerationStrategy, &'static str) {
        if score <= self.config.simple_threshold {
            (
                GenerationStrategy::LocalOnly,
                "Caso padrão - templates locais profissionais são suficientes",
            )
        } else if score <= self.config.medium_threshold {
            (
                GenerationStrategy::ExternalMinimal,
                "Caso moderado - API para humanizar apresentação",
            )
        } else {
            (
                GenerationStrategy::ExternalFull,
                "Caso complexo - API completa para máxima qualidade",
            )
        }
    }
}

/// At most one BMI factor applies
fn bmi_factor(bmi: f64) -> Option<ComplexityFactor> {
    if bmi > 40.0 {
        Some(factor(
            "severe_obesity",
            2,
            format!("Obesidade grau III (IMC {bmi:.1})"),
        ))
    } else if bmi > 35.0 {
        Some(factor(
            "moderate_obesity",
            1,
            format!("Obesidade grau II (IMC {bmi:.1})"),
        ))
    } else if bmi < 18.5 {
        Some(factor(
            "underweight",
            2,
            format!("Baixo peso (IMC {bmi:.1})"),
        ))
    } else {
        None
    }
}

/// `HbA1c` takes precedence; glucose only counts when it is absent
fn glycemic_factor(patient: &PatientProfile) -> Option<ComplexityFactor> {
    if let Some(hba1c) = patient.hba1c {
        if hba1c > 10.0 {
            Some(factor(
                "hba1c_very_high",
                2,
                format!("HbA1c muito elevada ({hba1c}%)"),
            ))
        } else if hba1c > 8.0 {
            Some(factor("hba1c_high", 1, format!("HbA1c elevada ({hba1c}%)")))
        } else {
            None
        }
    } else {
        let glucose = patient.fasting_glucose?;
        if glucose > 300.0 {
            Some(factor(
                "glucose_very_high",
                2,
                format!("Glicemia muito elevada ({glucose} mg/dL)"),
            ))
        } else if glucose > 200.0 {
            Some(factor(
                "glucose_high",
                1,
                format!("Glicemia elevada ({glucose} mg/dL)"),
            ))
        } else {
            None
        }
    }
}

fn age_factor(age: u32) -> Option<ComplexityFactor> {
    if age > 75 {
        Some(factor(
            "advanced_age",
            1,
            format!("Idade avançada ({age} anos)"),
        ))
    } else if age < 30 {
        Some(factor(
            "young_onset",
            1,
            format!("Diabetes em idade jovem ({age} anos)"),
        ))
    } else {
        None
    }
}

fn factor(name: &str, score: u8, description: String) -> ComplexityFactor {
    ComplexityFactor {
        name: name.to_owned(),
        score,
        description,
    }
}

fn patient_summary(patient: &PatientProfile, bmi: f64) -> String {
    let mut summary = format!(
        "{} {}, {} anos, IMC {bmi:.1}",
        patient.sex.honorific(),
        patient.name,
        patient.age
    );
    if let Some(hba1c) = patient.hba1c {
        let _ = write!(summary, ", HbA1c {hba1c}%");
    } else if let Some(glucose) = patient.fasting_glucose {
        let _ = write!(summary, ", glicemia {glucose} mg/dL");
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutriplan_core::models::{DeficitLevel, DietType, Sex};

    fn patient() -> PatientProfile {
        PatientProfile {
            name: "Maria Silva".to_owned(),
            sex: Sex::Female,
            age: 45,
            weight_kg: 80.0,
            height_cm: 165.0,
            hba1c: Some(9.5),
            fasting_glucose: None,
            waist_cm: None,
            diet_type: DietType::Balanced,
            deficit_level: DeficitLevel::Moderate,
        }
    }

    #[test]
    fn test_reference_case_scores_one() {
        let score = ComplexityAnalyzer::default().analyze(&patient());

        assert_eq!(score.score, 1);
        assert_eq!(score.factors[0].name, "hba1c_high");
        assert_eq!(score.recommendation, GenerationStrategy::LocalOnly);
        assert_eq!(
            score.patient_summary,
            "Sra. Maria Silva, 45 anos, IMC 29.4, HbA1c 9.5%"
        );
    }

    #[test]
    fn test_glucose_ignored_when_hba1c_present() {
        let mut p = patient();
        p.hba1c = Some(7.0);
        p.fasting_glucose = Some(350.0);

        let score = ComplexityAnalyzer::default().analyze(&p);
        assert!(score.factors.iter().all(|f| !f.name.starts_with("glucose")));
        assert_eq!(score.score, 0);
    }

    #[test]
    fn test_complex_case_routes_to_full() {
        let p = PatientProfile {
            name: "José Pereira".to_owned(),
            sex: Sex::Male,
            age: 80,
            weight_kg: 140.0,
            height_cm: 170.0,
            hba1c: Some(11.2),
            fasting_glucose: None,
            waist_cm: Some(130.0),
            diet_type: DietType::LowCarb,
            deficit_level: DeficitLevel::Intense,
        };

        let score = ComplexityAnalyzer::default().analyze(&p);
        // obesity III (2) + hba1c (2) + age (1) + cardiovascular (1)
        assert_eq!(score.score, 6);
        assert_eq!(score.recommendation, GenerationStrategy::ExternalMinimal);

        let strict = ComplexityAnalyzer::new(ComplexityConfig {
            simple_threshold: 2,
            medium_threshold: 4,
        });
        assert_eq!(
            strict.analyze(&p).recommendation,
            GenerationStrategy::ExternalFull
        );
    }
}
