// ABOUTME: Nutrition calculation algorithms using peer-reviewed formulas
// ABOUTME: BMR, BMI, energy need, deficit target, macro split, meal distribution and body metrics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutrition Calculator Module
//!
//! Pure numeric functions over validated patient data. Every constant comes
//! from an injected [`NutritionConfig`].
//!
//! # Scientific References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
//!   *American Journal of Clinical Nutrition*, 51(2), 241-247.
//!   <https://doi.org/10.1093/ajcn/51.2.241>
//!
//! - Ashwell, M., et al. (2012). Waist-to-height ratio is a better screening tool than
//!   waist circumference and BMI for adult cardiometabolic risk factors.
//!   *Obesity Reviews*, 13(3), 275-286.

use crate::config::NutritionConfig;
use nutriplan_core::constants::energy::{
    KCAL_PER_GRAM_CARB, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN,
};
use nutriplan_core::models::{
    ActivityLevel, BmiClass, CardiovascularAssessment, CardiovascularRisk, DeficitLevel,
    DietType, IdealWeightRange, MacroSplit, MealAllocation, MealDistribution, NutritionProfile,
    Objective, PatientProfile, Sex,
};

/// Calculate Basal Metabolic Rate using the Mifflin-St Jeor equation (1990)
///
/// Formula: BMR = (10 x `weight_kg`) + (6.25 x `height_cm`) - (5 x age) + `sex_constant`
/// - Men: +5
/// - Women: -161
#[must_use]
pub fn basal_metabolic_rate(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    sex: Sex,
    config: &NutritionConfig,
) -> f64 {
    let bmr = &config.bmr;
    let base = bmr.weight_coef.mul_add(
        weight_kg,
        bmr.height_coef
            .mul_add(height_cm, bmr.age_coef * f64::from(age)),
    );
    match sex {
        Sex::Male => base + bmr.male_constant,
        Sex::Female => base + bmr.female_constant,
    }
}

/// Body-mass index, kg/m²
#[must_use]
pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// WHO classification with half-open buckets
#[must_use]
pub fn bmi_classification(bmi: f64) -> BmiClass {
    if bmi < 18.5 {
        BmiClass::Underweight
    } else if bmi < 25.0 {
        BmiClass::Normal
    } else if bmi < 30.0 {
        BmiClass::Overweight
    } else if bmi < 35.0 {
        BmiClass::ObesityGrade1
    } else if bmi < 40.0 {
        BmiClass::ObesityGrade2
    } else {
        BmiClass::ObesityGrade3
    }
}

/// Total daily energy need: BMR x activity factor
#[must_use]
pub fn total_energy_need(bmr: f64, activity_level: ActivityLevel, config: &NutritionConfig) -> f64 {
    bmr * config.activity_factors.factor(activity_level)
}

/// Daily calorie target after the deficit, never below the configured floor
///
/// The floor is the same for both sexes; `sex` is accepted so a per-sex floor
/// stays a local change.
#[must_use]
pub fn target_calories(
    total_energy_need: f64,
    deficit_level: DeficitLevel,
    _sex: Sex,
    config: &NutritionConfig,
) -> f64 {
    let target = total_energy_need * config.deficit.multiplier(deficit_level);
    target.max(config.deficit.min_calories)
}

/// Split calories into macronutrient grams and kcal for a diet type
///
/// Conversions: carbohydrate 4 kcal/g, protein 4 kcal/g, fat 9 kcal/g.
#[must_use]
pub fn macro_split(calories: f64, diet_type: DietType, config: &NutritionConfig) -> MacroSplit {
    let percentages = config.macros.for_diet(diet_type);

    let carb_kcal = calories * percentages.carb / 100.0;
    let protein_kcal = calories * percentages.protein / 100.0;
    let fat_kcal = calories * percentages.fat / 100.0;

    MacroSplit {
        carb_g: carb_kcal / KCAL_PER_GRAM_CARB,
        protein_g: protein_kcal / KCAL_PER_GRAM_PROTEIN,
        fat_g: fat_kcal / KCAL_PER_GRAM_FAT,
        carb_kcal,
        protein_kcal,
        fat_kcal,
        carb_percent: percentages.carb,
        protein_percent: percentages.protein,
        fat_percent: percentages.fat,
    }
}

/// Split daily calories across the five meal slots
#[must_use]
pub fn meal_calorie_distribution(calories: f64, config: &NutritionConfig) -> MealDistribution {
    let allocations = config
        .meals
        .shares
        .iter()
        .map(|share| MealAllocation {
            slot: share.slot,
            name: share.name.clone(),
            time: share.time.clone(),
            percent: share.percent,
            kcal: calories * share.percent / 100.0,
        })
        .collect();

    MealDistribution { allocations }
}

/// Classify cardiovascular risk from the waist-to-height ratio
#[must_use]
pub fn cardiovascular_risk(
    waist_cm: f64,
    height_cm: f64,
    sex: Sex,
    config: &NutritionConfig,
) -> CardiovascularAssessment {
    let ratio = waist_cm / height_cm;
    let cutoffs = config.cardiovascular.for_sex(sex);

    let risk = if ratio < cutoffs.moderate_from {
        CardiovascularRisk::Low
    } else if ratio < cutoffs.elevated_from {
        CardiovascularRisk::Moderate
    } else if ratio < cutoffs.very_elevated_from {
        CardiovascularRisk::Elevated
    } else {
        CardiovascularRisk::VeryElevated
    };

    CardiovascularAssessment {
        waist_to_height_ratio: ratio,
        risk,
    }
}

/// Healthy weight band (BMI 18.5-24.9) plus the Lorentz point estimate
#[must_use]
pub fn ideal_weight_range(height_cm: f64, sex: Sex, config: &NutritionConfig) -> IdealWeightRange {
    let body = &config.body_composition;
    let height_m_sq = (height_cm / 100.0) * (height_cm / 100.0);
    let divisor = match sex {
        Sex::Male => body.lorentz_male_divisor,
        Sex::Female => body.lorentz_female_divisor,
    };

    IdealWeightRange {
        min_kg: round1(body.healthy_bmi_min * height_m_sq),
        max_kg: round1(body.healthy_bmi_max * height_m_sq),
        ideal_kg: round1(height_cm - 100.0 - (height_cm - 150.0) / divisor),
    }
}

/// Recommended water intake in litres
#[must_use]
pub fn water_intake_liters(weight_kg: f64, config: &NutritionConfig) -> f64 {
    weight_kg * config.body_composition.water_ml_per_kg / 1000.0
}

/// Caloric objective suggested by BMI alone
#[must_use]
pub fn suggest_objective(bmi: f64) -> Objective {
    if bmi >= 30.0 {
        Objective::ModerateLoss
    } else if bmi >= 25.0 {
        Objective::MildLoss
    } else if bmi < 18.5 {
        Objective::MildGain
    } else {
        Objective::Maintenance
    }
}

/// Compose every metric for a validated patient
#[must_use]
pub fn compute_nutrition_profile(
    patient: &PatientProfile,
    activity_level: ActivityLevel,
    config: &NutritionConfig,
) -> NutritionProfile {
    let bmr = basal_metabolic_rate(
        patient.weight_kg,
        patient.height_cm,
        patient.age,
        patient.sex,
        config,
    );
    let energy_need = total_energy_need(bmr, activity_level, config);
    let target = target_calories(energy_need, patient.deficit_level, patient.sex, config);
    let bmi = body_mass_index(patient.weight_kg, patient.height_cm);
    let cardiovascular = patient
        .waist_cm
        .map(|waist| cardiovascular_risk(waist, patient.height_cm, patient.sex, config));

    NutritionProfile {
        basal_metabolic_rate: bmr,
        total_energy_need: energy_need,
        target_calories: target,
        body_mass_index: bmi,
        bmi_class: bmi_classification(bmi),
        macro_split: macro_split(target, patient.diet_type, config),
        meal_distribution: meal_calorie_distribution(target, config),
        cardiovascular_risk: cardiovascular.map(|c| c.risk),
        waist_to_height_ratio: cardiovascular.map(|c| c.waist_to_height_ratio),
        ideal_weight: ideal_weight_range(patient.height_cm, patient.sex, config),
        water_liters: water_intake_liters(patient.weight_kg, config),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
