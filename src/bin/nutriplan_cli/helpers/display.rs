// ABOUTME: Output formatting helpers for nutriplan-cli
// ABOUTME: Consistent terminal display for metrics, complexity, usage and patient charts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use nutriplan_server::{
    external::PatientRecord,
    generation::{GenerationMetadata, PriceTable},
    models::ComplexityScore,
    routes::CalculationPreview,
    usage::{AllTimeStats, ModeTotals, MonthlyStats},
};
use serde_json::Value;
use std::collections::BTreeMap;

/// Summary of a generation, on stderr so stdout stays the document
pub fn display_generation_summary(metadata: &GenerationMetadata) {
    eprintln!("\nPlan generated");
    eprintln!("{}", "=".repeat(50));
    eprintln!(
        "   Mode: {} (requested {})",
        metadata.strategy_used, metadata.requested_strategy
    );
    if metadata.fell_back {
        eprintln!("   External generation failed; local templates were used");
    }
    eprintln!("   Complexity: {}/10", metadata.complexity_score);
    eprintln!(
        "   Calories: target {:.0} kcal, planned {:.0} kcal",
        metadata.target_calories, metadata.actual_calories
    );
    eprintln!(
        "   Macros: {:.0} g carbs, {:.0} g protein, {:.0} g fat",
        metadata.macros.carb_g, metadata.macros.protein_g, metadata.macros.fat_g
    );
    eprintln!(
        "   Cost: ${:.4} ({} tokens) in {:.2}s",
        metadata.cost_usd, metadata.tokens_used, metadata.generation_time_seconds
    );
}

/// Confirmation after a chart upload
pub fn display_upload_success(patient_id: u64, filename: &str) {
    println!("\nPlan attached to patient {patient_id} as {filename}");
}

/// Calculation preview
pub fn display_preview(preview: &CalculationPreview) {
    println!("\nCalculation preview");
    println!("{}", "=".repeat(50));
    println!("   BMR: {:.0} kcal", preview.tmb);
    println!("   BMI: {:.1} ({})", preview.imc, preview.classificacao_imc);
    println!("   Energy need: {:.0} kcal", preview.necessidade_calorica);
    println!(
        "   Target: {:.0} kcal ({})",
        preview.meta_calorica, preview.deficit_descricao
    );
    println!(
        "   Healthy weight: {:.1}-{:.1} kg (ideal {:.1} kg)",
        preview.peso_ideal.min_kg, preview.peso_ideal.max_kg, preview.peso_ideal.ideal_kg
    );
    println!("   Water: {:.1} L/day", preview.agua_litros);
    if let Some(risk) = &preview.risco_cardiovascular {
        println!(
            "   Cardiovascular risk: {} (waist/height {:.2})",
            risk.risco, risk.relacao_cintura_altura
        );
    }
    println!("   Suggested objective: {}", preview.suggested_objective);
}

/// Complexity analysis with per-mode prices
pub fn display_complexity(analysis: &ComplexityScore, prices: &PriceTable) {
    println!("\nComplexity analysis");
    println!("{}", "=".repeat(50));
    println!("   Patient: {}", analysis.patient_summary);
    println!("   Score: {}/10", analysis.score);
    if analysis.factors.is_empty() {
        println!("   Factors: none");
    } else {
        println!("   Factors:");
        for factor in &analysis.factors {
            println!("     +{} {}", factor.score, factor.description);
        }
    }
    println!("   Recommendation: {}", analysis.recommendation);
    println!("   Rationale: {}", analysis.rationale);
    println!(
        "   Estimated cost: python_only ${:.3}, api_minimal ${:.3}, api_full ${:.3}",
        prices.local_only, prices.external_minimal, prices.external_full
    );
}

fn display_by_mode(by_mode: &BTreeMap<String, ModeTotals>) {
    for (mode, totals) in by_mode {
        println!("     {mode}: {} plans, ${:.4}", totals.count, totals.cost);
    }
}

/// Totals for one month
pub fn display_monthly_stats(year: i32, month: u32, stats: &MonthlyStats) {
    println!("\nUsage for {year}-{month:02}");
    println!("{}", "=".repeat(50));
    println!("   Plans: {}", stats.total_diets);
    println!("   Cost: ${:.4}", stats.total_cost);
    println!("   Average: ${:.4}", stats.average_cost);
    display_by_mode(&stats.by_mode);
}

/// Totals over all time
pub fn display_all_time_stats(stats: &AllTimeStats) {
    println!("\nUsage (all time)");
    println!("{}", "=".repeat(50));
    println!("   Plans: {}", stats.total_diets);
    println!("   Cost: ${:.4}", stats.total_cost_usd);
    println!("   Tokens: {}", stats.total_tokens);
    println!("   Average: ${:.4}", stats.average_cost);
    display_by_mode(&stats.by_mode);
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// One line per patient
pub fn display_patient_list(patients: &[PatientRecord]) {
    if patients.is_empty() {
        println!("No patients found");
        return;
    }
    println!("{:>8}  {:<12}  {:<40}  CPF", "ID", "CHART", "NAME");
    for patient in patients {
        println!(
            "{:>8}  {:<12}  {:<40}  {}",
            patient.id,
            or_dash(patient.chart_number.as_deref()),
            or_dash(patient.name.as_deref()),
            or_dash(patient.cpf.as_deref()),
        );
    }
}

/// Full record
pub fn display_patient(patient: &PatientRecord) {
    println!("\nPatient {}", patient.id);
    println!("{}", "=".repeat(50));
    println!("   Name: {}", or_dash(patient.name.as_deref()));
    println!("   Chart: {}", or_dash(patient.chart_number.as_deref()));
    println!("   CPF: {}", or_dash(patient.cpf.as_deref()));
    println!("   Birth date: {}", or_dash(patient.birth_date.as_deref()));
    if let Some(age) = patient.age {
        println!("   Age: {age}");
    }
    println!("   Sex: {}", patient.sex);
    println!("   Phone: {}", or_dash(patient.phone.as_deref()));
    println!("   Email: {}", or_dash(patient.email.as_deref()));
    if let Some(weight) = patient.weight_kg {
        println!("   Weight: {weight:.1} kg");
    }
    if let Some(height) = patient.height_cm {
        println!("   Height: {height:.0} cm");
    }
}

/// Chart files as returned by the records system
pub fn display_files(patient_id: u64, files: &[Value]) {
    println!("\nFiles for patient {patient_id}: {}", files.len());
    for file in files {
        let name = ["nome_arquivo", "arquivo", "nome", "filename"]
            .iter()
            .find_map(|key| file.get(key).and_then(Value::as_str))
            .unwrap_or("(unnamed)");
        let date = ["data", "data_upload", "created_at"]
            .iter()
            .find_map(|key| file.get(key).and_then(Value::as_str))
            .unwrap_or("");
        println!("   {name}  {date}");
    }
}
