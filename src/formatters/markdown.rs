// ABOUTME: Renders the complete personalized meal plan as a markdown document
// ABOUTME: Presentation, patient data, calorie needs, meal tables, substitutions and guidance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write;
use std::sync::Arc;

use super::{patient_block, Signature, SubstitutionTables};
use crate::errors::AppResult;
use crate::models::{DietPlan, DietType, NutritionProfile};

const TITLE: &str = "# PLANO ALIMENTAR PERSONALIZADO\n\n";

pub(crate) const DISCLAIMER: &str = "Este plano alimentar foi elaborado de forma personalizada. Consulte sempre seu médico antes de fazer alterações significativas na alimentação.";

pub(crate) const SUPPLEMENTS_SECTION: &str = "## SUPLEMENTOS E ALIMENTOS FUNCIONAIS RECOMENDADOS

| Suplemento | Benefício | Como usar |
|------------|-----------|-----------|
| Semente de chia | Fibras, ômega-3, saciedade | 1 colher de sopa/dia |
| Semente de linhaça | Fibras, lignanas, ômega-3 | 1 colher de sopa/dia (triturada) |
| Castanha do Pará | Selênio, gorduras boas | 2 unidades/dia |
| Canela | Auxilia controle glicêmico | 1/2 colher de chá/dia |
| Psyllium | Fibra solúvel, saciedade | 1 colher de chá antes das refeições |
| Cúrcuma | Anti-inflamatório natural | 1/2 colher de chá/dia |

**Observação:** Consulte seu médico antes de iniciar qualquer suplementação.";

pub(crate) const TIPS_SECTION: &str = "## DICAS IMPORTANTES

1. **Mastigue bem os alimentos** - a digestão começa na boca
2. **Faça refeições em horários regulares** - evite pular refeições
3. **Evite líquidos durante as refeições** - beba 30 min antes ou depois
4. **Não deite logo após comer** - espere pelo menos 2 horas
5. **Pratique atividade física regular** - caminhadas de 30 min ajudam
6. **Monitore sua glicemia** - especialmente em jejum e pós-prandial
7. **Durma bem** - o sono adequado ajuda no controle metabólico

## ALIMENTOS A EVITAR

- Açúcar refinado e doces em geral
- Refrigerantes e sucos industrializados
- Pães brancos e massas refinadas
- Frituras e alimentos ultraprocessados
- Bebidas alcoólicas
- Embutidos (salsicha, presunto, mortadela)

## SINAIS DE ALERTA

### Hipoglicemia (açúcar baixo)
- Sintomas: tremores, suor frio, tontura, fome intensa
- Ação: consumir 15g de carboidrato rápido (1 colher de sopa de mel ou 150ml de suco)

### Hiperglicemia (açúcar alto)
- Sintomas: sede excessiva, cansaço, visão turva
- Ação: verificar glicemia e seguir orientação médica";

/// Treatment objective phrase chosen by BMI
#[must_use]
pub fn treatment_objective(bmi: f64) -> &'static str {
    if bmi >= 30.0 {
        "controle do diabetes com perda de peso gradual e sustentável"
    } else if bmi >= 25.0 {
        "controle do diabetes e perda moderada de peso"
    } else {
        "manutenção de peso saudável e controle glicêmico otimizado"
    }
}

/// Sentence fragment describing a diet type
#[must_use]
pub const fn diet_description(diet: DietType) -> &'static str {
    match diet {
        DietType::Balanced => "balanceada, com proporção adequada de macronutrientes",
        DietType::LowCarb => "com baixo teor de carboidratos para melhor controle glicêmico",
        DietType::LowCarbModerate => "com redução moderada de carboidratos",
        DietType::Mediterranean => "no estilo mediterrâneo, rica em gorduras saudáveis",
        DietType::HighProtein => "com alto teor proteico para preservar massa muscular",
    }
}

/// Renders [`DietPlan`]s into the full markdown document
///
/// Output is a pure function of the plan and the optional presentation.
#[derive(Debug, Clone)]
pub struct MarkdownFormatter {
    substitutions: Arc<SubstitutionTables>,
    signature: Signature,
}

impl MarkdownFormatter {
    /// Create a formatter over the given tables and signature
    #[must_use]
    pub const fn new(substitutions: Arc<SubstitutionTables>, signature: Signature) -> Self {
        Self {
            substitutions,
            signature,
        }
    }

    /// Formatter over the embedded substitution tables with the default signature
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded tables cannot be parsed.
    pub fn builtin() -> AppResult<Self> {
        Ok(Self::new(SubstitutionTables::builtin()?, Signature::default()))
    }

    /// Signature printed at the end of documents
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Substitution tables appended to documents
    #[must_use]
    pub fn substitutions(&self) -> &SubstitutionTables {
        &self.substitutions
    }

    /// Render the complete plan
    ///
    /// `custom_presentation` replaces the templated presentation section when given.
    #[must_use]
    pub fn format_complete_diet(&self, plan: &DietPlan, custom_presentation: Option<&str>) -> String {
        let presentation = custom_presentation
            .map_or_else(|| Self::presentation_section(plan), str::to_owned);

        let sections = [
            presentation,
            Self::patient_section(plan),
            Self::nutrition_section(&plan.nutrition),
            Self::meals_section(plan),
            self.substitutions.to_markdown(),
            Self::guidance_section(plan),
            SUPPLEMENTS_SECTION.to_owned(),
            TIPS_SECTION.to_owned(),
        ];

        let mut output = String::from(TITLE);
        for section in sections {
            output.push_str(&section);
            output.push_str("\n\n");
        }
        output.push_str(&self.signature.render(DISCLAIMER));
        output
    }

    /// Templated three-paragraph presentation
    #[must_use]
    pub fn presentation_section(plan: &DietPlan) -> String {
        let patient = &plan.patient;
        format!(
            "## APRESENTAÇÃO DO PLANO

Caro(a) {} {},

Este plano alimentar personalizado foi desenvolvido especialmente para atender às suas necessidades nutricionais individuais, considerando seus dados antropométricos e o objetivo de {}. A dieta é {}. O plano prioriza alimentos brasileiros tradicionais e ingredientes funcionais que contribuem para a saúde digestiva e metabólica.

O planejamento nutricional visa proporcionar equilíbrio entre macronutrientes, promover saciedade adequada e facilitar o controle glicêmico através da escolha de alimentos de baixo índice glicêmico e alto teor de fibras. As tabelas de substituições permitem flexibilidade e variedade no dia a dia.

Este é um plano inicial que poderá ser ajustado conforme sua resposta individual e acompanhamento dos exames laboratoriais. Recomenda-se acompanhamento médico e nutricional periódico para otimizar os resultados.",
            patient.sex.honorific(),
            patient.name,
            treatment_objective(plan.nutrition.body_mass_index),
            diet_description(patient.diet_type),
        )
    }

    pub(crate) fn patient_section(plan: &DietPlan) -> String {
        let risk_line = plan
            .nutrition
            .cardiovascular_risk
            .map(|risk| format!("- **Risco Cardiovascular:** {}\n", risk.label()))
            .unwrap_or_default();
        patient_block(plan, &risk_line, "- **Condição:** Diabetes Mellitus")
    }

    pub(crate) fn nutrition_section(nutrition: &NutritionProfile) -> String {
        let m = &nutrition.macro_split;
        let mut output = String::from("## NECESSIDADES CALÓRICAS CALCULADAS\n\n");
        let _ = writeln!(
            output,
            "- **Taxa Metabólica Basal (TMB):** {:.0} kcal/dia",
            nutrition.basal_metabolic_rate
        );
        let _ = writeln!(
            output,
            "- **Necessidade Calórica Total:** {:.0} kcal/dia",
            nutrition.total_energy_need
        );
        let _ = writeln!(
            output,
            "- **Meta Calórica (para controle glicêmico):** {:.0} kcal/dia\n",
            nutrition.target_calories
        );
        output.push_str("### Distribuição de Macronutrientes\n\n");
        output.push_str("| Macronutriente | Gramas/dia | % do VET |\n");
        output.push_str("|----------------|------------|----------|\n");
        let _ = writeln!(
            output,
            "| Carboidratos | {:.0}g | {:.0}% |",
            m.carb_g, m.carb_percent
        );
        let _ = writeln!(
            output,
            "| Proteínas | {:.0}g | {:.0}% |",
            m.protein_g, m.protein_percent
        );
        let _ = write!(
            output,
            "| Gorduras | {:.0}g | {:.0}% |",
            m.fat_g, m.fat_percent
        );
        output
    }

    pub(crate) fn meals_section(plan: &DietPlan) -> String {
        let mut output = String::from("## PLANO DE REFEIÇÕES DIÁRIAS\n");

        for meal in &plan.meals {
            let _ = writeln!(output, "\n### {} ({})", meal.name, meal.time);
            let _ = writeln!(output, "**Meta:** ~{:.0} kcal\n", meal.target_calories);
            output.push_str("| Alimento | Porção | Kcal | Carb | Prot | Gord |\n");
            output.push_str("|----------|--------|------|------|------|------|\n");

            for item in &meal.items {
                let _ = writeln!(
                    output,
                    "| {} | {} | {:.0} | {:.1}g | {:.1}g | {:.1}g |",
                    item.name, item.portion, item.kcal, item.carb_g, item.protein_g, item.fat_g
                );
            }

            let _ = writeln!(
                output,
                "| **TOTAL** | | **{:.0}** | **{:.1}g** | **{:.1}g** | **{:.1}g** |",
                meal.total_kcal(),
                meal.total_carb_g(),
                meal.total_protein_g(),
                meal.total_fat_g()
            );
        }

        output
    }

    fn guidance_section(plan: &DietPlan) -> String {
        let water_liters = plan.nutrition.water_liters;
        format!(
            "## ORIENTAÇÕES ESPECÍFICAS

### Controle Glicêmico
- Combinar carboidratos com fibras ou proteínas para reduzir pico glicêmico
- Preferir carboidratos integrais (arroz integral, pão integral, aveia)
- Distribuir carboidratos ao longo do dia em porções moderadas
- Monitorar glicemia conforme orientação médica
- Evitar jejum prolongado (máximo 3-4 horas entre refeições)

### Saúde Intestinal
- **Fibras solúveis:** Aveia, frutas com casca, leguminosas
- **Fibras insolúveis:** Verduras, cereais integrais, cascas
- **Alimentos fermentados:** Iogurte natural, kefir, coalhada
- **Prebióticos:** Alho, cebola, banana verde, chicória

### Hidratação
- Beba **{water_liters:.1} litros de água por dia** (35ml/kg)
- Água auxilia no funcionamento intestinal e controle glicêmico
- Evite líquidos em excesso durante as refeições principais

### Mastigação e Digestão
- Mastigue cada porção 20-30 vezes
- Faça refeições com calma, sentado, sem distrações
- Não deite imediatamente após as refeições (espere 2 horas)"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objective_thresholds() {
        assert!(treatment_objective(31.0).contains("perda de peso gradual"));
        assert!(treatment_objective(29.4).contains("perda moderada"));
        assert!(treatment_objective(22.0).starts_with("manutenção"));
    }

    #[test]
    fn test_every_diet_has_description() {
        for diet in [
            DietType::Balanced,
            DietType::LowCarb,
            DietType::LowCarbModerate,
            DietType::Mediterranean,
            DietType::HighProtein,
        ] {
            assert!(!diet_description(diet).is_empty());
        }
    }
}
