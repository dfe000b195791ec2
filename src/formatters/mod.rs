// ABOUTME: Markdown renderers for the daily meal plan document
// ABOUTME: Full plan, carb-counting variant, substitution tables and the shared signature block
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Document Renderers
//!
//! Every renderer is a pure function of a [`DietPlan`](crate::models::DietPlan):
//! the same plan always produces the same bytes. The generation router relies
//! on that to make its fallback output identical to the local path.
//!
//! - [`MarkdownFormatter`]: the complete plan document
//! - [`CarbCountingFormatter`]: variant for patients on rapid-acting insulin
//! - [`SubstitutionTables`]: food equivalence groups appended to the full plan

mod carb_counting;
mod markdown;
mod substitutions;

pub use carb_counting::CarbCountingFormatter;
pub use markdown::{diet_description, treatment_objective, MarkdownFormatter};
pub(crate) use markdown::{DISCLAIMER, SUPPLEMENTS_SECTION, TIPS_SECTION};
pub use substitutions::{SubstitutionGroup, SubstitutionItem, SubstitutionTables};

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::models::{DietPlan, PatientProfile};

/// Physician block printed at the end of every document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Signature {
    /// Physician name
    pub physician: String,
    /// Council registration and specialist numbers
    pub credentials: String,
    /// Specialty line
    pub specialty: String,
}

impl Default for Signature {
    fn default() -> Self {
        Self {
            physician: "Dr. Jorge Cecílio Daher Jr".to_owned(),
            credentials: "CRMGO 6108 | RQE 5769, 5772".to_owned(),
            specialty: "Endocrinologia e Metabologia".to_owned(),
        }
    }
}

impl Signature {
    /// Render the block with a document-specific italic disclaimer
    #[must_use]
    pub fn render(&self, disclaimer: &str) -> String {
        format!(
            "---\n\n**{}**\n{}\n{}\n\n*{disclaimer}*",
            self.physician, self.credentials, self.specialty
        )
    }
}

/// `HbA1c` line, or fasting glucose when `HbA1c` is absent
fn glycemic_line(patient: &PatientProfile) -> Option<String> {
    patient
        .hba1c
        .map(|hba1c| format!("- **HbA1c:** {hba1c}%\n"))
        .or_else(|| {
            patient
                .fasting_glucose
                .map(|glucose| format!("- **Glicemia de jejum:** {glucose} mg/dL\n"))
        })
}

/// Patient information block shared by both renderers
///
/// `extra` is inserted after the glycemic line and `closing` is the last bullet.
fn patient_block(plan: &DietPlan, extra: &str, closing: &str) -> String {
    let patient = &plan.patient;
    let nutrition = &plan.nutrition;

    let mut output = String::from("## INFORMAÇÕES DO PACIENTE\n\n");
    let _ = writeln!(output, "- **Nome:** {}", patient.name);
    let _ = writeln!(output, "- **Idade:** {} anos", patient.age);
    let _ = writeln!(output, "- **Sexo:** {}", patient.sex.label());
    let _ = writeln!(output, "- **Peso atual:** {:.1} kg", patient.weight_kg);
    let _ = writeln!(output, "- **Altura:** {:.0} cm", patient.height_cm);
    let _ = writeln!(
        output,
        "- **IMC:** {:.1} kg/m² ({})",
        nutrition.body_mass_index,
        nutrition.bmi_class.label()
    );
    if let Some(line) = glycemic_line(patient) {
        output.push_str(&line);
    }
    output.push_str(extra);
    output.push_str(closing);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeficitLevel, DietType, Sex};

    fn patient() -> PatientProfile {
        PatientProfile {
            name: "Ana Souza".to_owned(),
            sex: Sex::Female,
            age: 50,
            weight_kg: 70.0,
            height_cm: 160.0,
            hba1c: None,
            fasting_glucose: Some(180.0),
            waist_cm: None,
            diet_type: DietType::Balanced,
            deficit_level: DeficitLevel::Moderate,
        }
    }

    #[test]
    fn test_glycemic_line_prefers_hba1c() {
        let mut p = patient();
        assert_eq!(
            glycemic_line(&p).as_deref(),
            Some("- **Glicemia de jejum:** 180 mg/dL\n")
        );

        p.hba1c = Some(7.5);
        assert_eq!(glycemic_line(&p).as_deref(), Some("- **HbA1c:** 7.5%\n"));

        p.hba1c = None;
        p.fasting_glucose = None;
        assert!(glycemic_line(&p).is_none());
    }

    #[test]
    fn test_signature_layout() {
        let block = Signature::default().render("Aviso.");
        assert!(block.starts_with("---\n\n**Dr. Jorge Cecílio Daher Jr**\n"));
        assert!(block.ends_with("Endocrinologia e Metabologia\n\n*Aviso.*"));
    }
}
