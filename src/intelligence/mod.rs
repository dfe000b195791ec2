// ABOUTME: Intelligence module re-exports from nutriplan-intelligence crate
// ABOUTME: Keeps crate::intelligence paths stable for routes, router and binaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Intelligence Module
//!
//! Nutrition formulas, meal assembly and complexity scoring, re-exported from
//! the `nutriplan-intelligence` crate.

pub use nutriplan_intelligence::*;

pub use nutriplan_intelligence::{
    complexity_analyzer, config, food_table, meal_assembler, nutrition_calculator,
};
