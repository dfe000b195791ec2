// ABOUTME: Meal plan variant for patients counting carbohydrates on basal-bolus insulin
// ABOUTME: Shows CHO grams and 15 g portions per food, meal and day, with optional insulin estimates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write;

use super::{patient_block, Signature};
use crate::constants::energy::GRAMS_PER_CHO_PORTION;
use crate::models::{DietPlan, Meal, NutritionProfile};

const TITLE: &str = "# PLANO ALIMENTAR COM CONTAGEM DE CARBOIDRATOS\n\n";

const DISCLAIMER: &str = "Este plano alimentar foi elaborado de forma personalizada para contagem de carboidratos.
A razão insulina/carboidrato deve ser ajustada individualmente com acompanhamento médico.";

const PRESENTATION_BODY: &str = "Este plano alimentar foi desenvolvido com **foco na contagem de carboidratos**, uma técnica essencial para pacientes em uso de insulina de ação rápida. A contagem de carboidratos permite maior flexibilidade alimentar e melhor controle glicêmico, pois você aprenderá a ajustar a dose de insulina conforme a quantidade de carboidratos consumida.

Neste documento, cada alimento está apresentado com sua quantidade de carboidratos em gramas e em **porções de CHO** (1 porção = 15g de carboidrato). Isso facilita o cálculo da dose de insulina necessária para cada refeição.

**Importante:** A contagem de carboidratos deve ser combinada com monitorização frequente da glicemia capilar para ajustes finos da terapia insulínica.";

const QUICK_GUIDE: &str = "## GUIA RÁPIDO DE CONTAGEM DE CARBOIDRATOS

### O que é uma porção de carboidrato?
**1 porção de CHO = 15 gramas de carboidrato**

### Como usar este plano:
1. Identifique os carboidratos em cada alimento
2. Some o total de carboidratos da refeição
3. Divida por 15 para saber quantas porções
4. Aplique sua razão insulina/carboidrato

### Exemplo prático:
- Refeição com 60g de carboidratos
- 60g ÷ 15 = **4 porções de CHO**
- Se sua razão é 1:15 (1 UI para cada 15g)
- Dose de insulina rápida: **4 UI**

### Dica importante:
Sempre confirme sua razão insulina/carboidrato com seu médico, pois ela pode variar conforme o horário do dia e sensibilidade individual.";

const PORTION_REFERENCE: &str = "## TABELA DE REFERÊNCIA - PORÇÕES DE CARBOIDRATO

### PÃES E CEREAIS (1 porção = 15g CHO)
| Alimento | Quantidade para 1 porção |
|----------|-------------------------|
| Pão francês | ½ unidade (25g) |
| Pão de forma | 1 fatia (30g) |
| Arroz branco cozido | 2 colheres de sopa (50g) |
| Arroz integral cozido | 2½ colheres de sopa (60g) |
| Macarrão cozido | 2 colheres de sopa (50g) |
| Aveia em flocos | 2 colheres de sopa (30g) |
| Batata cozida | 1 unidade pequena (70g) |
| Mandioca cozida | 2 colheres de sopa (50g) |
| Tapioca (goma) | 2 colheres de sopa (30g) |

### FRUTAS (1 porção = 15g CHO)
| Alimento | Quantidade para 1 porção |
|----------|-------------------------|
| Banana | ½ unidade média (50g) |
| Maçã | 1 unidade pequena (100g) |
| Laranja | 1 unidade média (150g) |
| Mamão papaia | 1 fatia média (150g) |
| Manga | ½ unidade pequena (70g) |
| Uva | 10 unidades (50g) |
| Melancia | 1 fatia média (200g) |
| Abacaxi | 1 fatia média (100g) |

### LEITE E DERIVADOS (1 porção = 15g CHO)
| Alimento | Quantidade para 1 porção |
|----------|-------------------------|
| Leite integral | 1 copo (200ml) |
| Iogurte natural | 1 pote (170g) |
| Leite desnatado | 1 copo (200ml) |

### LEGUMINOSAS (1 porção = 15g CHO)
| Alimento | Quantidade para 1 porção |
|----------|-------------------------|
| Feijão cozido | 1 concha média (80g) |
| Lentilha cozida | 3 colheres de sopa (60g) |
| Grão de bico cozido | 3 colheres de sopa (60g) |

### ALIMENTOS LIVRES (< 5g CHO por porção)
Podem ser consumidos com mais liberdade:
- Verduras folhosas (alface, rúcula, agrião)
- Legumes não amiláceos (pepino, tomate, abobrinha)
- Carnes, ovos, peixes
- Queijos
- Azeite, óleo
- Café e chá sem açúcar";

/// Insulin-to-carbohydrate ratio in units per 15 g portion
#[derive(Debug, Clone, Copy, PartialEq)]
struct InsulinRatio(f64);

impl InsulinRatio {
    /// Only strictly positive finite ratios are usable
    fn new(units_per_portion: f64) -> Option<Self> {
        (units_per_portion.is_finite() && units_per_portion > 0.0).then_some(Self(units_per_portion))
    }

    fn units_for(self, carb_g: f64) -> f64 {
        carb_g * self.0 / GRAMS_PER_CHO_PORTION
    }

    /// Grams of carbohydrate covered by one unit, truncated
    fn grams_per_unit(self) -> i64 {
        (GRAMS_PER_CHO_PORTION / self.0).trunc() as i64
    }
}

/// Renders plans for carbohydrate counting
#[derive(Debug, Clone, Default)]
pub struct CarbCountingFormatter {
    signature: Signature,
}

impl CarbCountingFormatter {
    /// Create a formatter with the given signature
    #[must_use]
    pub const fn new(signature: Signature) -> Self {
        Self { signature }
    }

    /// Render the carb-counting document
    ///
    /// `insulin_ratio` is insulin units per 15 g of carbohydrate. When it is
    /// given and positive, every meal gets a suggested bolus.
    #[must_use]
    pub fn format_carb_counting_diet(&self, plan: &DietPlan, insulin_ratio: Option<f64>) -> String {
        let ratio = insulin_ratio.and_then(InsulinRatio::new);

        let sections = [
            Self::presentation_section(plan),
            patient_block(plan, "", "- **Regime:** Contagem de Carboidratos"),
            QUICK_GUIDE.to_owned(),
            Self::targets_section(&plan.nutrition),
            Self::meals_section(&plan.meals, ratio),
            PORTION_REFERENCE.to_owned(),
            Self::guidance_section(plan, ratio),
        ];

        let mut output = String::from(TITLE);
        for section in sections {
            output.push_str(&section);
            output.push_str("\n\n");
        }
        output.push_str(&self.signature.render(DISCLAIMER));
        output
    }

    fn presentation_section(plan: &DietPlan) -> String {
        format!(
            "## APRESENTAÇÃO\n\nCaro(a) {} {},\n\n{PRESENTATION_BODY}",
            plan.patient.sex.honorific(),
            plan.patient.name
        )
    }

    fn targets_section(nutrition: &NutritionProfile) -> String {
        let m = &nutrition.macro_split;
        let portions = m.carb_g / GRAMS_PER_CHO_PORTION;

        let mut output = String::from("## METAS NUTRICIONAIS DIÁRIAS\n\n");
        let _ = writeln!(
            output,
            "- **Meta Calórica:** {:.0} kcal/dia\n",
            nutrition.target_calories
        );
        output.push_str("### Carboidratos (FOCO PRINCIPAL)\n");
        let _ = writeln!(output, "- **Total:** {:.0}g/dia", m.carb_g);
        let _ = writeln!(
            output,
            "- **Porções de CHO:** {portions:.1} porções/dia (≈ {:.0} porções)",
            portions.round()
        );
        let _ = writeln!(
            output,
            "- **Percentual:** {:.0}% das calorias\n",
            m.carb_percent
        );
        output.push_str("### Outros Macronutrientes\n");
        output.push_str("| Nutriente | Gramas/dia | % das Calorias |\n");
        output.push_str("|-----------|------------|----------------|\n");
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

    fn meals_section(meals: &[Meal], ratio: Option<InsulinRatio>) -> String {
        let mut output = String::from("## PLANO DE REFEIÇÕES COM CONTAGEM DE CHO\n");

        for meal in meals {
            let carb = meal.total_carb_g();
            let portions = carb / GRAMS_PER_CHO_PORTION;

            let _ = writeln!(output, "\n### {} ({})", meal.name, meal.time);
            let _ = writeln!(
                output,
                "**Carboidratos:** {carb:.0}g = **{portions:.1} porções de CHO**"
            );
            if let Some(ratio) = ratio {
                let _ = writeln!(
                    output,
                    "**Insulina sugerida:** ~{:.0} UI (razão 1:{})",
                    ratio.units_for(carb),
                    ratio.grams_per_unit()
                );
            }

            output.push_str("\n| Alimento | Porção | **CHO (g)** | Porções | Kcal |\n");
            output.push_str("|----------|--------|-------------|---------|------|\n");
            for item in &meal.items {
                let _ = writeln!(
                    output,
                    "| {} | {} | **{:.0}g** | {:.1} | {:.0} |",
                    item.name,
                    item.portion,
                    item.carb_g,
                    item.carb_g / GRAMS_PER_CHO_PORTION,
                    item.kcal
                );
            }
            let _ = writeln!(
                output,
                "| **TOTAL** | | **{carb:.0}g** | **{portions:.1}** | {:.0} |",
                meal.total_kcal()
            );
        }

        let daily_carb: f64 = meals.iter().map(Meal::total_carb_g).sum();
        output.push_str("\n### RESUMO DIÁRIO DE CARBOIDRATOS\n");
        let _ = writeln!(output, "- **Total de CHO:** {daily_carb:.0}g");
        let _ = writeln!(
            output,
            "- **Total de porções:** {:.1} porções",
            daily_carb / GRAMS_PER_CHO_PORTION
        );
        if let Some(ratio) = ratio {
            let _ = writeln!(
                output,
                "- **Insulina rápida estimada:** ~{:.0} UI/dia",
                ratio.units_for(daily_carb)
            );
        }

        output
    }

    fn guidance_section(plan: &DietPlan, ratio: Option<InsulinRatio>) -> String {
        let ratio_line = ratio
            .map(|r| {
                format!(
                    "\n- **Sua razão I:CHO:** 1 UI para cada {}g de carboidrato",
                    r.grams_per_unit()
                )
            })
            .unwrap_or_default();
        let water_liters = plan.nutrition.water_liters;

        format!(
            "## ORIENTAÇÕES PARA CONTAGEM DE CARBOIDRATOS

### Passos para cada refeição:
1. **Identifique** os alimentos que contêm carboidratos
2. **Meça ou estime** as porções (use balança de cozinha no início)
3. **Calcule** o total de carboidratos em gramas
4. **Aplique** sua razão insulina/carboidrato
5. **Ajuste** conforme glicemia pré-prandial (correção){ratio_line}

### Monitorização recomendada:
- Glicemia em jejum
- Glicemia 2h após as principais refeições
- Registre: glicemia + CHO consumidos + insulina aplicada

### Fatores que afetam a glicemia além dos CHO:
- Índice glicêmico do alimento
- Presença de fibras, proteínas e gorduras na refeição
- Atividade física
- Estresse e doenças
- Horário da refeição

### Hidratação:
- Beba **{water_liters:.1} litros de água por dia** (35ml/kg)

### Sinais de hipoglicemia (glicemia < 70 mg/dL):
- Tremores, suor frio, tontura, fome intensa
- **Ação:** Consumir 15g de carboidrato rápido (1 porção):
  - 150ml de suco de laranja
  - 1 colher de sopa de mel
  - 3 balas de glicose
- Aguardar 15 minutos e medir novamente

### Quando procurar atendimento:
- Glicemias persistentemente > 300 mg/dL
- Hipoglicemias frequentes ou graves
- Sintomas de cetoacidose (náuseas, vômitos, dor abdominal)"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insulin_ratio_math() {
        let ratio = InsulinRatio::new(1.0).unwrap();
        assert!((ratio.units_for(60.0) - 4.0).abs() < f64::EPSILON);
        assert_eq!(ratio.grams_per_unit(), 15);

        let ratio = InsulinRatio::new(1.5).unwrap();
        assert_eq!(ratio.grams_per_unit(), 10);
    }

    #[test]
    fn test_non_positive_ratio_is_ignored() {
        assert!(InsulinRatio::new(0.0).is_none());
        assert!(InsulinRatio::new(-1.0).is_none());
        assert!(InsulinRatio::new(f64::NAN).is_none());
    }
}
