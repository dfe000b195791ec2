// ABOUTME: Property and reference-value tests for the nutrition formulas
// ABOUTME: Covers Mifflin-St Jeor, energy need, deficit floor, macro split and meal distribution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Nutrition calculator tests
//!
//! Reference values come from a 45-year-old woman, 80 kg, 165 cm.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use nutriplan_server::{
    intelligence::{
        nutrition_calculator::{
            basal_metabolic_rate, bmi_classification, body_mass_index, cardiovascular_risk,
            ideal_weight_range, macro_split, meal_calorie_distribution, suggest_objective,
            target_calories, total_energy_need, water_intake_liters,
        },
        compute_nutrition_profile, NutritionConfig,
    },
    models::{
        ActivityLevel, BmiClass, CardiovascularRisk, DeficitLevel, DietType, Objective, Sex,
    },
};

mod common;

fn config() -> NutritionConfig {
    NutritionConfig::default()
}

// ============================================================================
// BMR
// ============================================================================

#[test]
fn test_bmr_reference_female() {
    let bmr = basal_metabolic_rate(80.0, 165.0, 45, Sex::Female, &config());
    // 800 + 1031.25 - 225 - 161
    assert!((bmr - 1445.25).abs() < 1e-9, "got {bmr}");
}

#[test]
fn test_bmr_sex_gap_is_constant() {
    for (weight, height, age) in [(50.0, 150.0, 20), (80.0, 165.0, 45), (140.0, 195.0, 88)] {
        let male = basal_metabolic_rate(weight, height, age, Sex::Male, &config());
        let female = basal_metabolic_rate(weight, height, age, Sex::Female, &config());
        assert!((male - female - 166.0).abs() < 1e-9);
    }
}

#[test]
fn test_bmr_grows_with_weight_and_height_and_falls_with_age() {
    let base = basal_metabolic_rate(70.0, 170.0, 50, Sex::Male, &config());
    assert!(basal_metabolic_rate(71.0, 170.0, 50, Sex::Male, &config()) > base);
    assert!(basal_metabolic_rate(70.0, 171.0, 50, Sex::Male, &config()) > base);
    assert!(basal_metabolic_rate(70.0, 170.0, 51, Sex::Male, &config()) < base);
}

// ============================================================================
// ENERGY NEED AND TARGET
// ============================================================================

#[test]
fn test_light_activity_energy_need() {
    let need = total_energy_need(1445.25, ActivityLevel::Light, &config());
    assert!((need - 1987.218_75).abs() < 1e-6);
}

#[test]
fn test_activity_factors_are_ordered() {
    let levels = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Intense,
        ActivityLevel::VeryIntense,
    ];
    let needs: Vec<f64> = levels
        .iter()
        .map(|level| total_energy_need(1500.0, *level, &config()))
        .collect();
    assert!(needs.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_target_never_below_floor() {
    for sex in [Sex::Male, Sex::Female] {
        for level in DeficitLevel::ALL {
            for need in [800.0, 1300.0, 2000.0, 3500.0] {
                let target = target_calories(need, level, sex, &config());
                assert!(target >= 1200.0, "{sex:?} {level:?} {need} -> {target}");
            }
        }
    }
}

#[test]
fn test_target_applies_multiplier_above_floor() {
    let target = target_calories(2500.0, DeficitLevel::Moderate, Sex::Female, &config());
    assert!((target - 2000.0).abs() < 1e-9);

    let deeper = target_calories(2500.0, DeficitLevel::VeryIntense, Sex::Female, &config());
    assert!(deeper < target);
}

// ============================================================================
// MACROS AND DISTRIBUTION
// ============================================================================

#[test]
fn test_macro_percentages_sum_to_hundred() {
    for diet in DietType::ALL {
        let split = macro_split(1600.0, diet, &config());
        let sum = split.carb_percent + split.protein_percent + split.fat_percent;
        assert!((sum - 100.0).abs() < 1e-9, "{diet:?} sums to {sum}");

        let kcal = split.carb_kcal + split.protein_kcal + split.fat_kcal;
        assert!((kcal - 1600.0).abs() < 1e-6);
        assert!((split.fat_g * 9.0 - split.fat_kcal).abs() < 1e-9);
        assert!((split.carb_g * 4.0 - split.carb_kcal).abs() < 1e-9);
    }
}

#[test]
fn test_low_carb_has_less_carbohydrate_than_balanced() {
    let balanced = macro_split(1800.0, DietType::Balanced, &config());
    let low_carb = macro_split(1800.0, DietType::LowCarb, &config());
    assert!(low_carb.carb_g < balanced.carb_g);
}

#[test]
fn test_meal_distribution_covers_five_slots() {
    let distribution = meal_calorie_distribution(1590.0, &config());
    assert_eq!(distribution.allocations.len(), 5);
    assert!((distribution.total_percent() - 100.0).abs() < 1e-9);
    assert!((distribution.total_kcal() - 1590.0).abs() < 1e-6);
}

// ============================================================================
// BODY COMPOSITION AND RISK
// ============================================================================

#[test]
fn test_bmi_bucket_edges() {
    assert_eq!(bmi_classification(18.49), BmiClass::Underweight);
    assert_eq!(bmi_classification(18.5), BmiClass::Normal);
    assert_eq!(bmi_classification(25.0), BmiClass::Overweight);
    assert_eq!(bmi_classification(30.0), BmiClass::ObesityGrade1);
    assert_eq!(bmi_classification(35.0), BmiClass::ObesityGrade2);
    assert_eq!(bmi_classification(40.0), BmiClass::ObesityGrade3);
}

#[test]
fn test_reference_bmi() {
    let bmi = body_mass_index(80.0, 165.0);
    assert!((bmi - 29.384_756).abs() < 1e-5);
    assert_eq!(suggest_objective(bmi), Objective::MildLoss);
    assert_eq!(suggest_objective(32.0), Objective::ModerateLoss);
    assert_eq!(suggest_objective(17.0), Objective::MildGain);
    assert_eq!(suggest_objective(22.0), Objective::Maintenance);
}

#[test]
fn test_cardiovascular_ratio_and_buckets() {
    let assessment = cardiovascular_risk(96.0, 165.0, Sex::Female, &config());
    assert!((assessment.waist_to_height_ratio - 96.0 / 165.0).abs() < 1e-12);

    let low = cardiovascular_risk(70.0, 170.0, Sex::Male, &config());
    assert_eq!(low.risk, CardiovascularRisk::Low);
    let very = cardiovascular_risk(130.0, 170.0, Sex::Male, &config());
    assert_eq!(very.risk, CardiovascularRisk::VeryElevated);
    assert!(very.risk.is_elevated());
}

#[test]
fn test_cardiovascular_cutoff_edges_by_sex() {
    // height 200 cm keeps waist / height exact at every cut-off
    let cases = [
        (Sex::Female, 97.0, CardiovascularRisk::Low),
        (Sex::Female, 98.0, CardiovascularRisk::Moderate),
        (Sex::Female, 107.0, CardiovascularRisk::Moderate),
        (Sex::Female, 108.0, CardiovascularRisk::Elevated),
        (Sex::Female, 115.0, CardiovascularRisk::Elevated),
        (Sex::Female, 116.0, CardiovascularRisk::VeryElevated),
        (Sex::Male, 105.0, CardiovascularRisk::Low),
        (Sex::Male, 106.0, CardiovascularRisk::Moderate),
        (Sex::Male, 115.0, CardiovascularRisk::Moderate),
        (Sex::Male, 116.0, CardiovascularRisk::Elevated),
        (Sex::Male, 125.0, CardiovascularRisk::Elevated),
        (Sex::Male, 126.0, CardiovascularRisk::VeryElevated),
    ];
    for (sex, waist, expected) in cases {
        let assessment = cardiovascular_risk(waist, 200.0, sex, &config());
        assert_eq!(assessment.risk, expected, "{sex:?} waist {waist}");
    }
}

#[test]
fn test_same_ratio_differs_by_sex() {
    // 0.58: very elevated for women, elevated for men
    let female = cardiovascular_risk(116.0, 200.0, Sex::Female, &config());
    let male = cardiovascular_risk(116.0, 200.0, Sex::Male, &config());
    assert_eq!(female.risk, CardiovascularRisk::VeryElevated);
    assert_eq!(male.risk, CardiovascularRisk::Elevated);
    assert!(!CardiovascularRisk::Moderate.is_elevated());
    assert!(CardiovascularRisk::Elevated.is_elevated());
}

#[test]
fn test_ideal_weight_band_contains_point_estimate() {
    let range = ideal_weight_range(165.0, Sex::Female, &config());
    assert!(range.min_kg < range.max_kg);
    assert!(range.min_kg <= range.ideal_kg && range.ideal_kg <= range.max_kg);
    // 165 - 100 - 15 / 2.5
    assert!((range.ideal_kg - 59.0).abs() < 1e-9);
}

#[test]
fn test_water_scales_with_weight() {
    let light = water_intake_liters(60.0, &config());
    let heavy = water_intake_liters(120.0, &config());
    assert!(light > 0.0);
    assert!((heavy - 2.0 * light).abs() < 1e-9);
}

#[test]
fn test_profile_composes_every_metric() {
    let patient = common::reference_patient();
    let profile = compute_nutrition_profile(&patient, ActivityLevel::Light, &config());

    assert!((profile.basal_metabolic_rate - 1445.25).abs() < 1e-9);
    assert!((profile.target_calories - 1589.775).abs() < 1e-6);
    assert_eq!(profile.bmi_class, BmiClass::Overweight);
    assert!(profile.cardiovascular_risk.is_none());
    assert!(profile.waist_to_height_ratio.is_none());
    assert!((profile.meal_distribution.total_kcal() - profile.target_calories).abs() < 1e-6);
}
