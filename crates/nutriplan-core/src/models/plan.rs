// ABOUTME: Food reference entries, scaled food items, meals and the assembled diet plan
// ABOUTME: Meal and plan totals are computed on demand from their items
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::nutrition::{MealSlot, NutritionProfile};
use super::patient::PatientProfile;
use serde::{Deserialize, Serialize};

/// Food group of a reference entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FoodGroup {
    /// Grains, breads, tubers
    Cereal,
    /// Meat, fish, eggs
    Protein,
    /// Beans, lentils, chickpeas
    Legume,
    /// Fruit
    Fruit,
    /// Salad leaves
    LeafyGreen,
    /// Cooked or raw vegetables
    Vegetable,
    /// Milk, yogurt, cheese
    Dairy,
    /// Oils, nuts, seeds
    Fat,
    /// Coffee, tea
    Beverage,
}

/// Reference nutrient values of one food, per 100 g
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodEntry {
    /// Stable identifier used by the slot tables
    pub id: String,
    /// Display name (pt-BR)
    pub name: String,
    /// Food group
    pub group: FoodGroup,
    /// kcal per 100 g
    pub kcal: f64,
    /// Carbohydrate g per 100 g
    pub carb_g: f64,
    /// Protein g per 100 g
    pub protein_g: f64,
    /// Fat g per 100 g
    pub fat_g: f64,
    /// Fiber g per 100 g
    pub fiber_g: f64,
    /// Household measure, e.g. "1 fatia"
    pub usual_portion: String,
    /// Grams in the household measure
    pub usual_portion_grams: f64,
    /// Glycemic index, when known
    #[serde(default)]
    pub glycemic_index: Option<u32>,
}

impl FoodEntry {
    /// Scale the entry to an absolute portion
    ///
    /// The household measure is kept as the label only when `grams` matches it.
    #[must_use]
    pub fn portion(&self, grams: f64) -> FoodItem {
        let factor = grams / 100.0;
        let portion = if (grams - self.usual_portion_grams).abs() < f64::EPSILON {
            self.usual_portion.clone()
        } else {
            format!("{grams:.0}g")
        };

        FoodItem {
            name: self.name.clone(),
            portion,
            grams,
            kcal: self.kcal * factor,
            carb_g: self.carb_g * factor,
            protein_g: self.protein_g * factor,
            fat_g: self.fat_g * factor,
            fiber_g: self.fiber_g * factor,
        }
    }

    /// Scale the entry to its household measure
    #[must_use]
    pub fn usual(&self) -> FoodItem {
        self.portion(self.usual_portion_grams)
    }
}

/// A concrete food in a meal, with absolute nutrient amounts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodItem {
    /// Display name
    pub name: String,
    /// Portion label
    pub portion: String,
    /// Grams served
    pub grams: f64,
    /// kcal
    pub kcal: f64,
    /// Carbohydrate grams
    pub carb_g: f64,
    /// Protein grams
    pub protein_g: f64,
    /// Fat grams
    pub fat_g: f64,
    /// Fiber grams
    pub fiber_g: f64,
}

/// One meal of the daily plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meal {
    /// Slot
    pub slot: MealSlot,
    /// Display name (pt-BR)
    pub name: String,
    /// Suggested time
    pub time: String,
    /// Calorie budget the items were sized for
    pub target_calories: f64,
    /// Foods, in output order
    pub items: Vec<FoodItem>,
}

impl Meal {
    /// Sum of item kcal
    #[must_use]
    pub fn total_kcal(&self) -> f64 {
        self.items.iter().map(|i| i.kcal).sum()
    }

    /// Sum of item carbohydrate grams
    #[must_use]
    pub fn total_carb_g(&self) -> f64 {
        self.items.iter().map(|i| i.carb_g).sum()
    }

    /// Sum of item protein grams
    #[must_use]
    pub fn total_protein_g(&self) -> f64 {
        self.items.iter().map(|i| i.protein_g).sum()
    }

    /// Sum of item fat grams
    #[must_use]
    pub fn total_fat_g(&self) -> f64 {
        self.items.iter().map(|i| i.fat_g).sum()
    }

    /// Sum of item fiber grams
    #[must_use]
    pub fn total_fiber_g(&self) -> f64 {
        self.items.iter().map(|i| i.fiber_g).sum()
    }
}

/// Realized daily totals of an assembled plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct NutritionalSummary {
    /// kcal
    pub total_kcal: f64,
    /// Carbohydrate grams
    pub carb_g: f64,
    /// Protein grams
    pub protein_g: f64,
    /// Fat grams
    pub fat_g: f64,
    /// Fiber grams
    pub fiber_g: f64,
    /// Carbohydrate share of kcal
    pub carb_percent: f64,
    /// Protein share of kcal
    pub protein_percent: f64,
    /// Fat share of kcal
    pub fat_percent: f64,
}

/// The assembled daily plan for one patient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DietPlan {
    /// Patient the plan was built for
    pub patient: PatientProfile,
    /// Derived metrics
    pub nutrition: NutritionProfile,
    /// Five meals in slot order
    pub meals: Vec<Meal>,
}

impl DietPlan {
    /// Sum of meal kcal
    #[must_use]
    pub fn total_kcal(&self) -> f64 {
        self.meals.iter().map(Meal::total_kcal).sum()
    }
}
