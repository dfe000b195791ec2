// ABOUTME: Static food reference table with per-slot role eligibility lists
// ABOUTME: Loaded once from embedded JSON and checked for dangling food ids at load time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Food reference data
//!
//! The table pairs a catalog of foods (nutrients per 100 g) with, for each
//! meal slot, the foods eligible for each role of that slot.

use nutriplan_core::errors::{AppError, AppResult};
use nutriplan_core::models::{FoodEntry, MealSlot};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::debug;

const BUILTIN_FOODS_JSON: &str = include_str!("data/foods.json");

static BUILTIN_TABLE: OnceLock<Arc<FoodTable>> = OnceLock::new();

#[derive(Deserialize)]
struct RawTable {
    foods: Vec<FoodEntry>,
    slots: HashMap<String, HashMap<String, Vec<String>>>,
}

/// Food catalog plus slot eligibility lists
#[derive(Debug, Clone)]
pub struct FoodTable {
    foods: HashMap<String, FoodEntry>,
    slots: HashMap<MealSlot, HashMap<String, Vec<String>>>,
}

impl FoodTable {
    /// Shared copy of the embedded table
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON is malformed or inconsistent.
    pub fn builtin() -> AppResult<Arc<Self>> {
        if let Some(table) = BUILTIN_TABLE.get() {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(Self::from_json(BUILTIN_FOODS_JSON)?);
        Ok(Arc::clone(BUILTIN_TABLE.get_or_init(|| table)))
    }

    /// Parse and validate a table
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` for malformed JSON and `InternalError` when
    /// a slot is missing, a role list is empty or a candidate id is unknown.
    pub fn from_json(json: &str) -> AppResult<Self> {
        let raw: RawTable = serde_json::from_str(json)?;

        let mut foods = HashMap::with_capacity(raw.foods.len());
        for food in raw.foods {
            if foods.contains_key(&food.id) {
                return Err(AppError::internal(format!(
                    "duplicate food id in reference table: {}",
                    food.id
                )));
            }
            foods.insert(food.id.clone(), food);
        }

        let mut slots = HashMap::with_capacity(raw.slots.len());
        for (key, roles) in raw.slots {
            let slot = MealSlot::from_key(&key)
                .ok_or_else(|| AppError::internal(format!("unknown meal slot: {key}")))?;
            for (role, candidates) in &roles {
                if candidates.is_empty() {
                    return Err(AppError::internal(format!(
                        "empty candidate list for {key}.{role}"
                    )));
                }
                if let Some(missing) = candidates.iter().find(|id| !foods.contains_key(*id)) {
                    return Err(AppError::internal(format!(
                        "{key}.{role} references unknown food: {missing}"
                    )));
                }
            }
            slots.insert(slot, roles);
        }

        if let Some(slot) = MealSlot::ALL.iter().find(|s| !slots.contains_key(*s)) {
            return Err(AppError::internal(format!(
                "reference table has no entry for slot {}",
                slot.key()
            )));
        }

        debug!(foods = foods.len(), "food reference table loaded");
        Ok(Self { foods, slots })
    }

    /// Look up a food
    ///
    /// # Errors
    ///
    /// Returns `InternalError` for an unknown id.
    pub fn food(&self, id: &str) -> AppResult<&FoodEntry> {
        let found = self.foods.get(id);
        debug_assert!(found.is_some(), "unknown food id {id}");
        found.ok_or_else(|| AppError::internal(format!("unknown food id: {id}")))
    }

    /// Candidate ids for a role in a slot
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when the slot has no such role.
    pub fn candidates(&self, slot: MealSlot, role: &str) -> AppResult<&[String]> {
        self.slots
            .get(&slot)
            .and_then(|roles| roles.get(role))
            .map(Vec::as_slice)
            .ok_or_else(|| {
                AppError::internal(format!("no {role} candidates for slot {}", slot.key()))
            })
    }

    /// Role keys listed for a slot, sorted
    #[must_use]
    pub fn roles(&self, slot: MealSlot) -> Vec<&str> {
        let mut roles: Vec<&str> = self
            .slots
            .get(&slot)
            .map(|roles| roles.keys().map(String::as_str).collect())
            .unwrap_or_default();
        roles.sort_unstable();
        roles
    }

    /// Number of foods in the catalog
    #[must_use]
    pub fn len(&self) -> usize {
        self.foods.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}
