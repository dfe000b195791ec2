// ABOUTME: Role-based meal assembly with diet-adjusted calorie shares and portion scaling
// ABOUTME: Randomness goes through the FoodPicker trait so plans can be reproduced from a seed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Meal Assembler
//!
//! Each slot is a fixed list of roles (cereal, protein, salad, ...). A role
//! either receives a share of the slot's calories, renormalized after the
//! diet adjustment, or has a fixed sizing rule. One food is drawn per role,
//! in output order, from the slot's candidate list.

use crate::config::{AdjustmentCategory, AssemblerConfig, DietAdjustment};
use crate::food_table::FoodTable;
use nutriplan_core::constants::energy::{
    KCAL_PER_GRAM_CARB, KCAL_PER_GRAM_FAT, KCAL_PER_GRAM_PROTEIN,
};
use nutriplan_core::errors::{AppError, AppResult};
use nutriplan_core::models::{
    FoodEntry, FoodItem, MacroSplit, Meal, MealDistribution, MealSlot, NutritionalSummary,
};
use rand::{thread_rng, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Source of the per-role food choice
pub trait FoodPicker {
    /// Index in `0..n`; `n` is always at least 1
    fn pick(&mut self, n: usize) -> usize;
}

/// Uniform choice from the thread-local generator
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformPicker;

impl FoodPicker for UniformPicker {
    fn pick(&mut self, n: usize) -> usize {
        thread_rng().gen_range(0..n.max(1))
    }
}

/// Reproducible choice from a seeded `ChaCha8` stream
#[derive(Debug, Clone)]
pub struct SeededPicker {
    rng: ChaCha8Rng,
}

impl SeededPicker {
    /// Start a stream from a seed
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl FoodPicker for SeededPicker {
    fn pick(&mut self, n: usize) -> usize {
        // Draw even for a single candidate so the stream position only
        // depends on the number of roles.
        let index = self.rng.gen_range(0..n.max(1));
        index.min(n.saturating_sub(1))
    }
}

#[derive(Debug, Clone, Copy)]
enum Sizing {
    /// Share of the slot's calories, adjusted by category then renormalized
    Scaled {
        share: f64,
        category: Option<AdjustmentCategory>,
    },
    /// Salad grams grow as the slot budget shrinks
    Greens,
    /// Fixed garnish grams
    Garnish,
    /// Household measure
    Usual,
}

#[derive(Debug, Clone, Copy)]
struct Role {
    key: &'static str,
    sizing: Sizing,
}

const fn scaled(key: &'static str, share: f64, category: AdjustmentCategory) -> Role {
    Role {
        key,
        sizing: Sizing::Scaled {
            share,
            category: Some(category),
        },
    }
}

const fn fixed(key: &'static str, sizing: Sizing) -> Role {
    Role { key, sizing }
}

const BREAKFAST: &[Role] = &[
    scaled("cereal", 0.40, AdjustmentCategory::Cereal),
    scaled("protein", 0.25, AdjustmentCategory::Protein),
    scaled("dairy", 0.15, AdjustmentCategory::Protein),
    scaled("fruit", 0.15, AdjustmentCategory::Fruit),
    scaled("seed", 0.05, AdjustmentCategory::Fat),
    fixed("beverage", Sizing::Usual),
];

const LUNCH: &[Role] = &[
    scaled("cereal", 0.25, AdjustmentCategory::Cereal),
    scaled("legume", 0.15, AdjustmentCategory::Legume),
    scaled("protein", 0.30, AdjustmentCategory::Protein),
    fixed("leafy_green", Sizing::Greens),
    fixed(
        "vegetable",
        Sizing::Scaled {
            share: 0.10,
            category: None,
        },
    ),
    fixed("garnish", Sizing::Garnish),
    scaled("fat", 0.10, AdjustmentCategory::Fat),
];

const SNACK: &[Role] = &[
    scaled("fruit", 0.40, AdjustmentCategory::Fruit),
    scaled("dairy", 0.35, AdjustmentCategory::Protein),
    scaled("fat", 0.25, AdjustmentCategory::Fat),
];

const DINNER: &[Role] = &[
    scaled("cereal", 0.25, AdjustmentCategory::Cereal),
    scaled("protein", 0.35, AdjustmentCategory::Protein),
    fixed("leafy_green", Sizing::Greens),
    fixed(
        "vegetable",
        Sizing::Scaled {
            share: 0.20,
            category: None,
        },
    ),
    fixed("garnish", Sizing::Garnish),
    scaled("fat", 0.10, AdjustmentCategory::Fat),
];

const SUPPER: &[Role] = &[
    scaled("dairy", 0.60, AdjustmentCategory::Protein),
    scaled("fruit", 0.40, AdjustmentCategory::Fruit),
    fixed("beverage", Sizing::Usual),
];

const fn layout(slot: MealSlot) -> &'static [Role] {
    match slot {
        MealSlot::Breakfast => BREAKFAST,
        MealSlot::Lunch => LUNCH,
        MealSlot::Snack => SNACK,
        MealSlot::Dinner => DINNER,
        MealSlot::Supper => SUPPER,
    }
}

/// Builds meals for one diet type from the reference table
pub struct MealAssembler<'a> {
    table: &'a FoodTable,
    adjustment: DietAdjustment,
    config: AssemblerConfig,
}

impl<'a> MealAssembler<'a> {
    /// Create an assembler
    #[must_use]
    pub const fn new(
        table: &'a FoodTable,
        adjustment: DietAdjustment,
        config: AssemblerConfig,
    ) -> Self {
        Self {
            table,
            adjustment,
            config,
        }
    }

    /// Adjusted and renormalized shares of the calorie-matched roles of a slot
    ///
    /// Roles with a fixed sizing rule report `None`.
    #[must_use]
    pub fn normalized_shares(&self, slot: MealSlot) -> Vec<(&'static str, Option<f64>)> {
        self.role_shares(slot)
            .into_iter()
            .map(|(role, share)| (role.key, share))
            .collect()
    }

    fn role_shares(&self, slot: MealSlot) -> Vec<(Role, Option<f64>)> {
        let roles = layout(slot);
        let adjusted: Vec<Option<f64>> = roles
            .iter()
            .map(|role| match role.sizing {
                Sizing::Scaled { share, category } => {
                    Some(share * self.adjustment.multiplier(category))
                }
                Sizing::Greens | Sizing::Garnish | Sizing::Usual => None,
            })
            .collect();
        let total: f64 = adjusted.iter().flatten().sum();

        roles
            .iter()
            .zip(adjusted)
            .map(|(role, share)| (*role, share.map(|s| s / total)))
            .collect()
    }

    /// Assemble one meal for a calorie budget
    ///
    /// # Errors
    ///
    /// Returns `InternalError` if the reference table lacks a role or food.
    pub fn assemble_meal(
        &self,
        slot: MealSlot,
        target_calories: f64,
        picker: &mut dyn FoodPicker,
    ) -> AppResult<Meal> {
        let roles = self.role_shares(slot);
        let mut items = Vec::with_capacity(roles.len());

        for (role, share) in roles {
            let candidates = self.table.candidates(slot, role.key)?;
            let index = picker.pick(candidates.len());
            let food_id = candidates.get(index).ok_or_else(|| {
                AppError::internal(format!(
                    "picker returned {index} for {} candidates",
                    candidates.len()
                ))
            })?;
            let entry = self.table.food(food_id)?;

            let item = match role.sizing {
                Sizing::Scaled { .. } => {
                    self.scaled_portion(entry, target_calories * share.unwrap_or_default())
                }
                Sizing::Greens => entry.portion(self.greens_grams(target_calories)),
                Sizing::Garnish => entry.portion(self.config.garnish_grams),
                Sizing::Usual => entry.usual(),
            };
            items.push(item);
        }

        Ok(Meal {
            slot,
            name: slot.display_name().to_owned(),
            time: slot.default_time().to_owned(),
            target_calories,
            items,
        })
    }

    /// Assemble all five meals from a calorie distribution
    ///
    /// # Errors
    ///
    /// Returns `InternalError` if the distribution misses a slot or the
    /// reference table lacks a role or food.
    pub fn build_complete_plan(
        &self,
        distribution: &MealDistribution,
        macros: &MacroSplit,
        picker: &mut dyn FoodPicker,
    ) -> AppResult<Vec<Meal>> {
        debug!(
            carb_g = macros.carb_g,
            protein_g = macros.protein_g,
            fat_g = macros.fat_g,
            "assembling daily plan"
        );

        MealSlot::ALL
            .iter()
            .map(|&slot| {
                let allocation = distribution.get(slot).ok_or_else(|| {
                    AppError::internal(format!("no calorie allocation for {}", slot.key()))
                })?;
                let mut meal = self.assemble_meal(slot, allocation.kcal, picker)?;
                meal.name.clone_from(&allocation.name);
                meal.time.clone_from(&allocation.time);
                Ok(meal)
            })
            .collect()
    }

    fn scaled_portion(&self, entry: &FoodEntry, target_kcal: f64) -> FoodItem {
        if entry.kcal <= 0.0 {
            return entry.usual();
        }
        let needed = target_kcal / entry.kcal * 100.0;
        let min = entry.usual_portion_grams * self.config.min_portion_multiplier;
        let max = entry.usual_portion_grams * self.config.max_portion_multiplier;
        entry.portion(needed.clamp(min, max))
    }

    fn greens_grams(&self, slot_target: f64) -> f64 {
        let shortfall = (self.config.greens_reference_kcal - slot_target).max(0.0);
        self.config.greens_base_grams + shortfall / self.config.greens_divisor
    }
}

/// Realized totals and macro percentages of a set of meals
///
/// Percentages use 4/4/9 kcal per gram and are all zero when no calories are present.
#[must_use]
pub fn nutritional_summary(meals: &[Meal]) -> NutritionalSummary {
    let total_kcal: f64 = meals.iter().map(Meal::total_kcal).sum();
    let carb_g: f64 = meals.iter().map(Meal::total_carb_g).sum();
    let protein_g: f64 = meals.iter().map(Meal::total_protein_g).sum();
    let fat_g: f64 = meals.iter().map(Meal::total_fat_g).sum();
    let fiber_g: f64 = meals.iter().map(Meal::total_fiber_g).sum();

    let percent = |grams: f64, kcal_per_gram: f64| {
        if total_kcal > 0.0 {
            grams * kcal_per_gram / total_kcal * 100.0
        } else {
            0.0
        }
    };

    NutritionalSummary {
        total_kcal,
        carb_g,
        protein_g,
        fat_g,
        fiber_g,
        carb_percent: percent(carb_g, KCAL_PER_GRAM_CARB),
        protein_percent: percent(protein_g, KCAL_PER_GRAM_PROTEIN),
        fat_percent: percent(fat_g, KCAL_PER_GRAM_FAT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutriplan_core::models::DietType;

    struct FirstPicker;

    impl FoodPicker for FirstPicker {
        fn pick(&mut self, _n: usize) -> usize {
            0
        }
    }

    #[test]
    fn test_shares_renormalize_to_one() {
        let table = FoodTable::builtin().unwrap();
        for diet in DietType::ALL {
            let assembler = MealAssembler::new(
                &table,
                DietAdjustment::for_diet(diet),
                AssemblerConfig::default(),
            );
            for slot in MealSlot::ALL {
                let sum: f64 = assembler
                    .normalized_shares(slot)
                    .iter()
                    .filter_map(|(_, share)| *share)
                    .sum();
                assert!((sum - 1.0).abs() < 1e-9, "{diet:?} {slot:?}");
            }
        }
    }

    #[test]
    fn test_lunch_output_order_and_fixed_portions() {
        let table = FoodTable::builtin().unwrap();
        let assembler =
            MealAssembler::new(&table, DietAdjustment::default(), AssemblerConfig::default());

        let meal = assembler
            .assemble_meal(MealSlot::Lunch, 500.0, &mut FirstPicker)
            .unwrap();

        assert_eq!(meal.items.len(), 7);
        // greens: 50 + (1800 - 500) / 20
        assert!((meal.items[3].grams - 115.0).abs() < 1e-9);
        assert_eq!(meal.items[5].name, "Tomate");
        assert!((meal.items[5].grams - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_kcal_food_uses_usual_portion() {
        let table = FoodTable::builtin().unwrap();
        let assembler =
            MealAssembler::new(&table, DietAdjustment::default(), AssemblerConfig::default());

        let meal = assembler
            .assemble_meal(MealSlot::Supper, 150.0, &mut FirstPicker)
            .unwrap();
        let tea = meal.items.last().unwrap();

        assert_eq!(tea.name, "Chá verde");
        assert_eq!(tea.portion, "1 xícara (200ml)");
    }

    #[test]
    fn test_seeded_picker_is_reproducible() {
        let mut a = SeededPicker::new(42);
        let mut b = SeededPicker::new(42);
        let first: Vec<usize> = (0..20).map(|_| a.pick(5)).collect();
        let second: Vec<usize> = (0..20).map(|_| b.pick(5)).collect();

        assert_eq!(first, second);
        assert!(first.iter().all(|&i| i < 5));
    }

    #[test]
    fn test_empty_summary_has_zero_percentages() {
        let summary = nutritional_summary(&[]);
        assert!(summary.carb_percent.abs() < f64::EPSILON);
        assert!(summary.total_kcal.abs() < f64::EPSILON);
    }
}
