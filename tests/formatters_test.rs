// ABOUTME: Tests for the markdown renderers and external prompt builders
// ABOUTME: Determinism, section layout, presentation splicing, carb counting and prompt content
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use nutriplan_server::{
    formatters::{CarbCountingFormatter, MarkdownFormatter, SubstitutionTables},
    generation::prompts::{full_document_prompt, presentation_prompt},
    intelligence::SeededPicker,
    models::DietPlan,
};

mod common;

fn plan() -> DietPlan {
    common::test_orchestrator(None, 9)
        .build_plan(&common::reference_patient(), &mut SeededPicker::new(9))
        .unwrap()
}

#[test]
fn test_complete_document_is_deterministic() {
    let formatter = MarkdownFormatter::builtin().unwrap();
    let plan = plan();
    assert_eq!(
        formatter.format_complete_diet(&plan, None),
        formatter.format_complete_diet(&plan, None)
    );
}

#[test]
fn test_complete_document_sections_in_order() {
    let formatter = MarkdownFormatter::builtin().unwrap();
    let document = formatter.format_complete_diet(&plan(), None);

    assert!(document.starts_with("# PLANO ALIMENTAR PERSONALIZADO"));
    let headings = [
        "## APRESENTAÇÃO DO PLANO",
        "## NECESSIDADES CALÓRICAS CALCULADAS",
        "## PLANO DE REFEIÇÕES DIÁRIAS",
        "## ORIENTAÇÕES ESPECÍFICAS",
        "## SUPLEMENTOS E ALIMENTOS FUNCIONAIS RECOMENDADOS",
        "## DICAS IMPORTANTES",
    ];
    let positions: Vec<usize> = headings
        .iter()
        .map(|h| document.find(h).unwrap_or_else(|| panic!("missing {h}")))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(document.contains("Sra. Maria Aparecida Silva"));
    assert!(document.contains("CRMGO 6108"));
}

#[test]
fn test_custom_presentation_replaces_template() {
    let formatter = MarkdownFormatter::builtin().unwrap();
    let plan = plan();
    let custom = "## APRESENTAÇÃO DO PLANO\n\nParágrafo escrito sob medida.";
    let document = formatter.format_complete_diet(&plan, Some(custom));

    assert!(document.contains("Parágrafo escrito sob medida."));
    assert!(!document.contains(&MarkdownFormatter::presentation_section(&plan)));
    assert!(document.contains("## PLANO DE REFEIÇÕES DIÁRIAS"));
}

#[test]
fn test_every_meal_is_rendered() {
    let formatter = MarkdownFormatter::builtin().unwrap();
    let plan = plan();
    let document = formatter.format_complete_diet(&plan, None);
    for meal in &plan.meals {
        assert!(document.contains(&format!("### {} ({})", meal.name, meal.time)));
        for item in &meal.items {
            assert!(document.contains(&item.name));
        }
    }
}

#[test]
fn test_substitution_tables_render() {
    let tables = SubstitutionTables::builtin().unwrap();
    assert!(!tables.groups().is_empty());
    let markdown = tables.to_markdown();
    for group in tables.groups() {
        for item in &group.items {
            assert!(markdown.contains(&item.food));
        }
    }
}

#[test]
fn test_carb_counting_without_ratio() {
    let document = CarbCountingFormatter::default().format_carb_counting_diet(&plan(), None);
    assert!(document.starts_with("# PLANO ALIMENTAR COM CONTAGEM DE CARBOIDRATOS"));
    assert!(document.contains("porções de CHO"));
    assert!(!document.contains("Insulina sugerida"));
}

#[test]
fn test_carb_counting_with_ratio() {
    let formatter = CarbCountingFormatter::default();
    let document = formatter.format_carb_counting_diet(&plan(), Some(1.0));
    assert!(document.contains("Insulina sugerida"));
    assert!(document.contains("razão 1:15"));
    assert!(document.contains("Insulina rápida estimada"));

    // Non-positive ratios are ignored
    let ignored = formatter.format_carb_counting_diet(&plan(), Some(0.0));
    assert!(!ignored.contains("Insulina sugerida"));
}

#[test]
fn test_presentation_prompt_mentions_patient_data() {
    let plan = plan();
    let prompt = presentation_prompt(&plan);
    assert!(prompt.contains("Sra. Maria Aparecida Silva"));
    assert!(prompt.contains("Idade: 45 anos"));
    assert!(prompt.contains("IMC: 29.4"));
    assert!(prompt.contains("## APRESENTAÇÃO DO PLANO"));
}

#[test]
fn test_full_prompt_embeds_local_tables() {
    let formatter = MarkdownFormatter::builtin().unwrap();
    let plan = plan();
    let prompt = full_document_prompt(&plan, &formatter);
    assert!(prompt.contains("## PLANO DE REFEIÇÕES DIÁRIAS"));
    assert!(prompt.contains("## NECESSIDADES CALÓRICAS CALCULADAS"));
    assert!(prompt.contains("Sra. Maria"));
    assert!(prompt.ends_with("NÃO adicione explicações fora do documento\n"));
}
