// ABOUTME: Tests for meal assembly from the builtin food table
// ABOUTME: Covers share normalization, portion clamps, seeded reproducibility and summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use nutriplan_server::{
    intelligence::{
        compute_nutrition_profile, nutritional_summary, AssemblerConfig, DietAdjustment,
        FoodTable, MealAssembler, NutritionConfig, SeededPicker,
    },
    models::{ActivityLevel, DietType, Meal, MealSlot},
};

mod common;

fn build_meals(seed: u64, diet: DietType) -> Vec<Meal> {
    let table = FoodTable::builtin().unwrap();
    let mut patient = common::reference_patient();
    patient.diet_type = diet;
    let profile = compute_nutrition_profile(&patient, ActivityLevel::Light, &NutritionConfig::default());
    let assembler = MealAssembler::new(&table, DietAdjustment::for_diet(diet), AssemblerConfig::default());
    let mut picker = SeededPicker::new(seed);
    assembler
        .build_complete_plan(&profile.meal_distribution, &profile.macro_split, &mut picker)
        .unwrap()
}

#[test]
fn test_builtin_table_loads() {
    let table = FoodTable::builtin().unwrap();
    assert!(!table.is_empty());
    let assembler = MealAssembler::new(
        &table,
        DietAdjustment::for_diet(DietType::Balanced),
        AssemblerConfig::default(),
    );
    for slot in MealSlot::ALL {
        for (role, _) in assembler.normalized_shares(slot) {
            assert!(!table.candidates(slot, role).unwrap().is_empty());
        }
    }
}

#[test]
fn test_table_roles_match_slot_layouts() {
    let table = FoodTable::builtin().unwrap();
    let assembler = MealAssembler::new(
        &table,
        DietAdjustment::for_diet(DietType::Balanced),
        AssemblerConfig::default(),
    );
    for slot in MealSlot::ALL {
        let mut layout: Vec<&str> = assembler
            .normalized_shares(slot)
            .into_iter()
            .map(|(role, _)| role)
            .collect();
        layout.sort_unstable();
        assert_eq!(table.roles(slot), layout, "{slot:?}");
    }
}

#[test]
fn test_shares_renormalize_to_one() {
    let table = FoodTable::builtin().unwrap();
    for diet in DietType::ALL {
        let assembler = MealAssembler::new(&table, DietAdjustment::for_diet(diet), AssemblerConfig::default());
        for slot in MealSlot::ALL {
            let total: f64 = assembler
                .normalized_shares(slot)
                .iter()
                .filter_map(|(_, share)| *share)
                .sum();
            assert!((total - 1.0).abs() < 1e-9, "{diet:?} {slot:?} sums to {total}");
        }
    }
}

#[test]
fn test_plan_has_five_meals_in_order() {
    let meals = build_meals(7, DietType::Balanced);
    let slots: Vec<MealSlot> = meals.iter().map(|m| m.slot).collect();
    assert_eq!(slots, MealSlot::ALL.to_vec());
    assert!(meals.iter().all(|m| !m.items.is_empty()));
}

#[test]
fn test_same_seed_same_plan() {
    for diet in DietType::ALL {
        assert_eq!(build_meals(42, diet), build_meals(42, diet));
    }
}

#[test]
fn test_scaled_portions_respect_clamp() {
    let table = FoodTable::builtin().unwrap();
    let config = AssemblerConfig::default();
    let assembler = MealAssembler::new(&table, DietAdjustment::for_diet(DietType::Balanced), config.clone());

    // Budgets far outside the usual portions force both ends of the clamp
    for target in [5.0, 5000.0] {
        for slot in MealSlot::ALL {
            let meal = assembler
                .assemble_meal(slot, target, &mut SeededPicker::new(3))
                .unwrap();
            for ((role, share), item) in assembler.normalized_shares(slot).iter().zip(&meal.items) {
                if share.is_none() {
                    continue;
                }
                let entry = table
                    .candidates(slot, role)
                    .unwrap()
                    .iter()
                    .map(|id| table.food(id).unwrap())
                    .find(|entry| entry.name == item.name)
                    .unwrap();
                if entry.kcal <= 0.0 {
                    continue;
                }
                let min = entry.usual_portion_grams * config.min_portion_multiplier;
                let max = entry.usual_portion_grams * config.max_portion_multiplier;
                assert!(
                    item.grams >= min - 1e-6 && item.grams <= max + 1e-6,
                    "{} at {target} kcal: {} g outside [{min}, {max}]",
                    item.name,
                    item.grams
                );
            }
        }
    }
}

#[test]
fn test_summary_matches_meal_totals() {
    let meals = build_meals(11, DietType::Mediterranean);
    let summary = nutritional_summary(&meals);
    let kcal: f64 = meals.iter().map(Meal::total_kcal).sum();
    assert!((summary.total_kcal - kcal).abs() < 1e-9);
    assert!(summary.carb_g > 0.0 && summary.protein_g > 0.0 && summary.fat_g > 0.0);
}

#[test]
fn test_empty_summary_is_zero() {
    let summary = nutritional_summary(&[]);
    assert!(summary.total_kcal.abs() < f64::EPSILON);
}
