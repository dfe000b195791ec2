// ABOUTME: Prompt builders for the external generator's presentation and full-document modes
// ABOUTME: The full prompt embeds the locally computed tables so the model only writes prose
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write;

use crate::formatters::{MarkdownFormatter, DISCLAIMER, SUPPLEMENTS_SECTION, TIPS_SECTION};
use crate::models::{DietPlan, DietType};

const INTESTINAL_HEALTH_SECTION: &str = "## ORIENTAÇÕES PARA SAÚDE INTESTINAL

### Fibras Alimentares
- Consuma **25-30g de fibras por dia**
- Prefira grãos integrais (arroz integral, aveia, pão integral)
- Inclua leguminosas diariamente (feijão, lentilha, grão de bico)
- Frutas com casca e bagaço aumentam a ingestão de fibras

### Alimentos Fermentados e Probióticos
- Iogurte natural (sem açúcar)
- Kefir
- Coalhada
- Queijos frescos

### Prebióticos (alimentos que nutrem bactérias benéficas)
- Alho, cebola, alho-poró
- Banana verde
- Aveia
- Linhaça e chia";

const OUTPUT_RULES: &str = "IMPORTANTE:
- Retorne APENAS Markdown puro
- NÃO use tags XML ou blocos de código
- NÃO adicione explicações fora do documento
";

/// Short diet label used in the presentation prompt
const fn diet_label(diet: DietType) -> &'static str {
    match diet {
        DietType::Balanced => "balanceada",
        DietType::LowCarb => "com baixo teor de carboidratos",
        DietType::LowCarbModerate => "com redução moderada de carboidratos",
        DietType::Mediterranean => "no estilo mediterrâneo",
        DietType::HighProtein => "com alto teor proteico",
    }
}

fn objective_label(bmi: f64) -> &'static str {
    if bmi >= 30.0 {
        "controle do diabetes com perda de peso gradual"
    } else if bmi >= 25.0 {
        "controle do diabetes e perda moderada de peso"
    } else {
        "manutenção de peso saudável e controle glicêmico"
    }
}

/// Prompt asking for the three-paragraph presentation only
#[must_use]
pub fn presentation_prompt(plan: &DietPlan) -> String {
    let patient = &plan.patient;
    let nutrition = &plan.nutrition;

    let mut prompt =
        String::from("Escreva 3 parágrafos de apresentação para um plano alimentar personalizado:\n\n");
    let _ = writeln!(
        prompt,
        "Paciente: {} {}",
        patient.sex.honorific(),
        patient.name
    );
    let _ = writeln!(prompt, "Idade: {} anos", patient.age);
    let _ = writeln!(prompt, "IMC: {:.1} kg/m²", nutrition.body_mass_index);
    let _ = writeln!(
        prompt,
        "Meta calórica: {:.0} kcal/dia",
        nutrition.target_calories
    );
    let _ = writeln!(prompt, "Tipo de dieta: {}", diet_label(patient.diet_type));
    let _ = writeln!(
        prompt,
        "Objetivo: {}\n",
        objective_label(nutrition.body_mass_index)
    );
    prompt.push_str(
        "INSTRUÇÕES:
- Tom formal, acolhedor e educativo
- Mencionar: diabetes, alimentos brasileiros, saúde intestinal
- 3 parágrafos de 3-4 linhas cada
- 300-400 palavras total
- Use o título \"## APRESENTAÇÃO DO PLANO\" no início
- Responda APENAS os parágrafos formatados, sem explicações adicionais",
    );
    prompt
}

/// Prompt asking for the whole document around the computed tables
#[must_use]
pub fn full_document_prompt(plan: &DietPlan, formatter: &MarkdownFormatter) -> String {
    let patient = &plan.patient;
    let honorific = patient.sex.honorific();
    let signature = formatter.signature();

    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "Você é assistente do {} ({}).\n",
        signature.physician, signature.credentials
    );
    let _ = writeln!(
        prompt,
        "Formate este plano alimentar em Markdown profissional. Use tratamento formal \"{honorific} {}\".\n",
        patient.first_name()
    );
    prompt.push_str("# PLANO ALIMENTAR PERSONALIZADO\n\n");
    let _ = writeln!(
        prompt,
        "## APRESENTAÇÃO DO PLANO
[Escreva 2-3 parágrafos PERSONALIZADOS apresentando o plano para o(a) {honorific} {}, mencionando:
- Importância do controle glicêmico para diabetes
- Benefícios da alimentação equilibrada para saúde intestinal
- Como os alimentos brasileiros escolhidos ajudam no controle metabólico
Use tom educativo, humano e profissional]\n",
        patient.name
    );

    let sections = [
        MarkdownFormatter::patient_section(plan),
        MarkdownFormatter::nutrition_section(&plan.nutrition),
        MarkdownFormatter::meals_section(plan),
        formatter.substitutions().to_markdown(),
        format!(
            "{INTESTINAL_HEALTH_SECTION}\n\n### Hidratação\n- Beba **{:.1} litros de água por dia** (35ml/kg)\n- Água auxilia no funcionamento intestinal e controle glicêmico",
            plan.nutrition.water_liters
        ),
        SUPPLEMENTS_SECTION.to_owned(),
        TIPS_SECTION.to_owned(),
        signature.render(DISCLAIMER),
    ];
    for section in sections {
        prompt.push_str(&section);
        prompt.push_str("\n\n");
    }

    prompt.push_str("---\n\n");
    prompt.push_str(OUTPUT_RULES);
    prompt
}
