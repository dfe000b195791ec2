// ABOUTME: Food substitution tables printed at the end of every plan document
// ABOUTME: Seven equivalence groups loaded from embedded JSON and rendered as markdown tables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::errors::AppResult;

const BUILTIN_SUBSTITUTIONS_JSON: &str = include_str!("substitutions.json");

static BUILTIN_TABLES: OnceLock<Arc<SubstitutionTables>> = OnceLock::new();

/// One interchangeable food and its equivalent portion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubstitutionItem {
    /// Food name
    pub food: String,
    /// Household measure
    pub portion: String,
    /// Weight of the portion, 0 when not meaningful
    pub grams: u32,
}

/// Foods that can replace each other within one group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubstitutionGroup {
    /// Stable key (`cereais_paes`, `proteinas`, ...)
    pub key: String,
    /// Heading
    pub title: String,
    /// Italic note under the heading
    pub description: String,
    /// Equivalent portions
    pub items: Vec<SubstitutionItem>,
}

/// All substitution groups, in print order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SubstitutionTables {
    groups: Vec<SubstitutionGroup>,
}

impl SubstitutionTables {
    /// Shared copy of the embedded tables
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON is malformed.
    pub fn builtin() -> AppResult<Arc<Self>> {
        if let Some(tables) = BUILTIN_TABLES.get() {
            return Ok(Arc::clone(tables));
        }
        let tables: Self = serde_json::from_str(BUILTIN_SUBSTITUTIONS_JSON)?;
        Ok(Arc::clone(BUILTIN_TABLES.get_or_init(|| Arc::new(tables))))
    }

    /// Groups in print order
    #[must_use]
    pub fn groups(&self) -> &[SubstitutionGroup] {
        &self.groups
    }

    /// Group by key
    #[must_use]
    pub fn group(&self, key: &str) -> Option<&SubstitutionGroup> {
        self.groups.iter().find(|g| g.key == key)
    }

    /// Render the full substitutions section
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut output = String::from("## TABELAS DE SUBSTITUIÇÕES ALIMENTARES\n\n");
        output.push_str(
            "Use estas tabelas para variar sua alimentação mantendo o equilíbrio nutricional.\n\n",
        );
        for group in &self.groups {
            output.push_str(&group.to_markdown());
        }
        output
    }
}

impl SubstitutionGroup {
    /// Render one group as a two-column table
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "### {}", self.title);
        let _ = writeln!(output, "*{}*\n", self.description);
        output.push_str("| Alimento | Porção |\n");
        output.push_str("|----------|--------|\n");

        for item in &self.items {
            if item.grams > 0 {
                let _ = writeln!(output, "| {} | {} ({}g) |", item.food, item.portion, item.grams);
            } else {
                let _ = writeln!(output, "| {} | {} |", item.food, item.portion);
            }
        }

        output.push('\n');
        output
    }
}
