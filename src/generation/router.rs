// ABOUTME: Hybrid generation router choosing local templates or the external generator per case
// ABOUTME: Resolves the strategy, assembles the plan, applies the typed fallback and records usage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use super::prompts::{full_document_prompt, presentation_prompt};
use super::{
    ExternalGenerationError, GenerationPurpose, TextGenerationRequest, TextGenerator,
};
use crate::errors::AppResult;
use crate::formatters::MarkdownFormatter;
use crate::intelligence::{
    compute_nutrition_profile, nutritional_summary, AssemblerConfig, ComplexityAnalyzer,
    ComplexityConfig, DietAdjustment, FoodPicker, FoodTable, MealAssembler, NutritionConfig,
    UniformPicker,
};
use crate::logging::AppLogger;
use crate::models::{
    ActivityLevel, ComplexityScore, DeficitLevel, DietPlan, DietType, GenerationStrategy,
    PatientProfile,
};
use crate::usage::UsageTracker;

/// Default deadline for one external generation attempt
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Creates a fresh food picker for each request
pub type PickerFactory = Arc<dyn Fn() -> Box<dyn FoodPicker + Send> + Send + Sync>;

/// Estimated USD cost of one generation per strategy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceTable {
    /// Local templates
    #[serde(rename = "python_only")]
    pub local_only: f64,
    /// External presentation
    #[serde(rename = "api_minimal")]
    pub external_minimal: f64,
    /// External full document
    #[serde(rename = "api_full")]
    pub external_full: f64,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            local_only: 0.0,
            external_minimal: 0.015,
            external_full: 0.048,
        }
    }
}

impl PriceTable {
    /// Cost of a resolved strategy; `Auto` is never charged
    #[must_use]
    pub const fn cost_for(&self, strategy: GenerationStrategy) -> f64 {
        match strategy {
            GenerationStrategy::LocalOnly | GenerationStrategy::Auto => self.local_only,
            GenerationStrategy::ExternalMinimal => self.external_minimal,
            GenerationStrategy::ExternalFull => self.external_full,
        }
    }
}

/// Realized macro totals of the assembled plan, rounded to grams
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MacroTotals {
    /// Carbohydrate grams
    #[serde(rename = "carboidratos_g")]
    pub carb_g: f64,
    /// Protein grams
    #[serde(rename = "proteinas_g")]
    pub protein_g: f64,
    /// Fat grams
    #[serde(rename = "gorduras_g")]
    pub fat_g: f64,
}

/// Everything the caller learns about a generation besides the document
///
/// Wire keys keep the names existing web clients read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationMetadata {
    /// Strategy that actually produced the document
    #[serde(rename = "mode_used")]
    pub strategy_used: GenerationStrategy,
    /// Strategy the caller asked for
    #[serde(rename = "requested_mode")]
    pub requested_strategy: GenerationStrategy,
    /// Whether an external attempt failed and local output was returned
    pub fell_back: bool,
    /// Estimated cost, USD
    pub cost_usd: f64,
    /// External tokens consumed
    pub tokens_used: u32,
    /// Complexity score
    pub complexity_score: u8,
    /// Descriptions of the factors that fired
    pub complexity_factors: Vec<String>,
    /// Strategy the analyzer recommended
    pub complexity_recommendation: GenerationStrategy,
    /// Wall time, seconds, two decimals
    pub generation_time_seconds: f64,
    /// Basal metabolic rate, kcal
    #[serde(rename = "tmb")]
    pub bmr: f64,
    /// Total energy need, kcal
    #[serde(rename = "necessidade_calorica")]
    pub total_energy_need: f64,
    /// Target calories, kcal
    #[serde(rename = "meta_calorica")]
    pub target_calories: f64,
    /// Body-mass index, one decimal
    #[serde(rename = "imc")]
    pub bmi: f64,
    /// BMI class label
    #[serde(rename = "classificacao_imc")]
    pub bmi_classification: String,
    /// Diet type
    #[serde(rename = "tipo_dieta")]
    pub diet_type: DietType,
    /// Deficit level
    #[serde(rename = "nivel_deficit")]
    pub deficit_level: DeficitLevel,
    /// Cardiovascular risk label, when a waist was given
    #[serde(rename = "risco_cardiovascular")]
    pub cardiovascular_risk: Option<String>,
    /// Waist-to-height ratio, when a waist was given
    #[serde(rename = "relacao_cintura_altura")]
    pub waist_to_height_ratio: Option<f64>,
    /// Realized plan calories
    #[serde(rename = "calorias_reais")]
    pub actual_calories: f64,
    /// Realized plan macros
    pub macros: MacroTotals,
}

/// A rendered document and its metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationOutcome {
    /// Markdown document
    pub document: String,
    /// Routing and nutrition metadata
    pub metadata: GenerationMetadata,
}

/// Output of one dispatch path
#[derive(Debug)]
struct RenderedDocument {
    markdown: String,
    strategy_used: GenerationStrategy,
    tokens_used: u32,
    fell_back: bool,
}

impl RenderedDocument {
    const fn local(markdown: String, fell_back: bool) -> Self {
        Self {
            markdown,
            strategy_used: GenerationStrategy::LocalOnly,
            tokens_used: 0,
            fell_back,
        }
    }
}

/// Composes calculator, analyzer, assembler and renderer into one generation call
pub struct HybridOrchestrator {
    nutrition: NutritionConfig,
    assembler: AssemblerConfig,
    analyzer: ComplexityAnalyzer,
    foods: Arc<FoodTable>,
    formatter: MarkdownFormatter,
    generator: Option<Arc<dyn TextGenerator>>,
    prices: PriceTable,
    usage: Arc<UsageTracker>,
    cost_tracking: bool,
    default_strategy: GenerationStrategy,
    max_tokens_minimal: u32,
    max_tokens_full: u32,
    generation_timeout: Duration,
    picker_factory: PickerFactory,
}

impl HybridOrchestrator {
    /// Create a router with default tables, no external generator and uniform picks
    #[must_use]
    pub fn new(
        foods: Arc<FoodTable>,
        formatter: MarkdownFormatter,
        usage: Arc<UsageTracker>,
    ) -> Self {
        Self {
            nutrition: NutritionConfig::default(),
            assembler: AssemblerConfig::default(),
            analyzer: ComplexityAnalyzer::default(),
            foods,
            formatter,
            generator: None,
            prices: PriceTable::default(),
            usage,
            cost_tracking: true,
            default_strategy: GenerationStrategy::Auto,
            max_tokens_minimal: 800,
            max_tokens_full: 8000,
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
            picker_factory: Arc::new(|| Box::new(UniformPicker)),
        }
    }

    /// Use an external generator; `None` keeps every request local
    #[must_use]
    pub fn with_generator(mut self, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        self.generator = generator;
        self
    }

    /// Use non-default complexity thresholds
    #[must_use]
    pub fn with_complexity(mut self, config: ComplexityConfig) -> Self {
        self.analyzer = ComplexityAnalyzer::new(config).with_nutrition_config(self.nutrition.clone());
        self
    }

    /// Use a non-default nutrition table
    #[must_use]
    pub fn with_nutrition_config(mut self, nutrition: NutritionConfig) -> Self {
        self.analyzer = ComplexityAnalyzer::new(*self.analyzer.config())
            .with_nutrition_config(nutrition.clone());
        self.nutrition = nutrition;
        self
    }

    /// Use non-default portion sizing rules
    #[must_use]
    pub fn with_assembler_config(mut self, assembler: AssemblerConfig) -> Self {
        self.assembler = assembler;
        self
    }

    /// Use a non-default price table
    #[must_use]
    pub const fn with_prices(mut self, prices: PriceTable) -> Self {
        self.prices = prices;
        self
    }

    /// Strategy used when a request does not name one
    #[must_use]
    pub const fn with_default_strategy(mut self, strategy: GenerationStrategy) -> Self {
        self.default_strategy = strategy;
        self
    }

    /// Output budgets for the presentation and full-document prompts
    #[must_use]
    pub const fn with_token_limits(mut self, minimal: u32, full: u32) -> Self {
        self.max_tokens_minimal = minimal;
        self.max_tokens_full = full;
        self
    }

    /// Deadline for one external attempt
    #[must_use]
    pub const fn with_timeout(mut self, generation_timeout: Duration) -> Self {
        self.generation_timeout = generation_timeout;
        self
    }

    /// Record usage events or not
    #[must_use]
    pub const fn with_cost_tracking(mut self, enabled: bool) -> Self {
        self.cost_tracking = enabled;
        self
    }

    /// Replace the per-request picker source
    #[must_use]
    pub fn with_picker_factory(mut self, factory: PickerFactory) -> Self {
        self.picker_factory = factory;
        self
    }

    /// Complexity analyzer in use
    #[must_use]
    pub const fn analyzer(&self) -> &ComplexityAnalyzer {
        &self.analyzer
    }

    /// Nutrition table in use
    #[must_use]
    pub const fn nutrition_config(&self) -> &NutritionConfig {
        &self.nutrition
    }

    /// Price table in use
    #[must_use]
    pub const fn prices(&self) -> &PriceTable {
        &self.prices
    }

    /// Strategy used when a request does not name one
    #[must_use]
    pub const fn default_strategy(&self) -> GenerationStrategy {
        self.default_strategy
    }

    /// Usage sink
    #[must_use]
    pub fn usage(&self) -> &UsageTracker {
        &self.usage
    }

    /// Document renderer
    #[must_use]
    pub const fn formatter(&self) -> &MarkdownFormatter {
        &self.formatter
    }

    /// Whether an external generator is configured
    #[must_use]
    pub fn api_available(&self) -> bool {
        self.generator.is_some()
    }

    /// Model of the configured generator
    #[must_use]
    pub fn api_model(&self) -> Option<&str> {
        self.generator.as_deref().map(TextGenerator::model)
    }

    /// Score a patient without generating anything
    #[must_use]
    pub fn analyze_complexity(&self, patient: &PatientProfile) -> ComplexityScore {
        self.analyzer.analyze(patient)
    }

    /// Compute the nutrition profile and assemble the five meals
    ///
    /// # Errors
    ///
    /// Returns `InternalError` if the food table lacks a role or food.
    pub fn build_plan(
        &self,
        patient: &PatientProfile,
        picker: &mut dyn FoodPicker,
    ) -> AppResult<DietPlan> {
        let nutrition = compute_nutrition_profile(patient, ActivityLevel::Light, &self.nutrition);
        let assembler = MealAssembler::new(
            &self.foods,
            DietAdjustment::for_diet(patient.diet_type),
            self.assembler.clone(),
        );
        let meals = assembler.build_complete_plan(
            &nutrition.meal_distribution,
            &nutrition.macro_split,
            picker,
        )?;

        Ok(DietPlan {
            patient: patient.clone(),
            nutrition,
            meals,
        })
    }

    /// Generate a complete plan document
    ///
    /// `requested` of `None` uses the configured default. `Auto` resolves to
    /// the analyzer's recommendation. External failures never surface: the
    /// local document is returned and reported as `LocalOnly`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for out-of-range patient data, or
    /// `InternalError` if the food table is inconsistent.
    #[instrument(skip(self, patient), fields(requested = ?requested))]
    pub async fn generate(
        &self,
        patient: &PatientProfile,
        requested: Option<GenerationStrategy>,
    ) -> AppResult<GenerationOutcome> {
        let started = Instant::now();
        patient.validate()?;

        let requested = requested.unwrap_or(self.default_strategy);
        let complexity = self.analyzer.analyze(patient);
        let strategy = match requested {
            GenerationStrategy::Auto => complexity.recommendation,
            explicit => explicit,
        };
        debug!(
            score = complexity.score,
            strategy = %strategy,
            "strategy resolved"
        );

        let plan = {
            let mut picker = (self.picker_factory)();
            self.build_plan(patient, picker.as_mut())?
        };

        let rendered = match strategy {
            GenerationStrategy::ExternalMinimal | GenerationStrategy::ExternalFull => self
                .render_external(strategy, &plan)
                .await
                .unwrap_or_else(|error| {
                    warn!(
                        strategy = %strategy,
                        error.kind = error.kind(),
                        error = %error,
                        "external generation failed, using local templates"
                    );
                    RenderedDocument::local(self.formatter.format_complete_diet(&plan, None), true)
                }),
            GenerationStrategy::LocalOnly | GenerationStrategy::Auto => {
                RenderedDocument::local(self.formatter.format_complete_diet(&plan, None), false)
            }
        };

        let cost_usd = self.prices.cost_for(rendered.strategy_used);
        if self.cost_tracking {
            if let Err(error) = self
                .usage
                .record_generation(
                    &patient.name,
                    rendered.strategy_used,
                    rendered.tokens_used,
                    complexity.score,
                    cost_usd,
                )
                .await
            {
                warn!(error = %error, "failed to record usage event");
            }
        }

        let elapsed = started.elapsed();
        AppLogger::log_generation(
            rendered.strategy_used.as_str(),
            requested.as_str(),
            rendered.fell_back,
            rendered.tokens_used,
            cost_usd,
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        );

        let metadata = build_metadata(&plan, &complexity, &rendered, requested, cost_usd, elapsed);
        Ok(GenerationOutcome {
            document: rendered.markdown,
            metadata,
        })
    }

    async fn render_external(
        &self,
        strategy: GenerationStrategy,
        plan: &DietPlan,
    ) -> Result<RenderedDocument, ExternalGenerationError> {
        let generator = self.generator.as_deref().ok_or_else(|| {
            ExternalGenerationError::Unavailable("no external generator configured".to_owned())
        })?;

        let request = if strategy == GenerationStrategy::ExternalFull {
            TextGenerationRequest {
                prompt: full_document_prompt(plan, &self.formatter),
                max_tokens: self.max_tokens_full,
                purpose: GenerationPurpose::FullDocument,
            }
        } else {
            TextGenerationRequest {
                prompt: presentation_prompt(plan),
                max_tokens: self.max_tokens_minimal,
                purpose: GenerationPurpose::Presentation,
            }
        };

        let started = Instant::now();
        let result = timeout(self.generation_timeout, generator.generate(&request))
            .await
            .map_err(|_| ExternalGenerationError::Timeout(self.generation_timeout.as_secs()))
            .and_then(|inner| inner);
        AppLogger::log_external_call(
            generator.name(),
            &request.purpose.to_string(),
            result.is_ok(),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );
        let generated = result?;

        let markdown = match request.purpose {
            GenerationPurpose::Presentation => self
                .formatter
                .format_complete_diet(plan, Some(&generated.text)),
            GenerationPurpose::FullDocument => generated.text,
        };

        Ok(RenderedDocument {
            markdown,
            strategy_used: strategy,
            tokens_used: generated.tokens_used,
            fell_back: false,
        })
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

fn build_metadata(
    plan: &DietPlan,
    complexity: &ComplexityScore,
    rendered: &RenderedDocument,
    requested: GenerationStrategy,
    cost_usd: f64,
    elapsed: Duration,
) -> GenerationMetadata {
    let nutrition = &plan.nutrition;
    let summary = nutritional_summary(&plan.meals);

    GenerationMetadata {
        strategy_used: rendered.strategy_used,
        requested_strategy: requested,
        fell_back: rendered.fell_back,
        cost_usd,
        tokens_used: rendered.tokens_used,
        complexity_score: complexity.score,
        complexity_factors: complexity.factor_descriptions(),
        complexity_recommendation: complexity.recommendation,
        generation_time_seconds: round_to(elapsed.as_secs_f64(), 2),
        bmr: nutrition.basal_metabolic_rate.round(),
        total_energy_need: nutrition.total_energy_need.round(),
        target_calories: nutrition.target_calories.round(),
        bmi: round_to(nutrition.body_mass_index, 1),
        bmi_classification: nutrition.bmi_class.label().to_owned(),
        diet_type: plan.patient.diet_type,
        deficit_level: plan.patient.deficit_level,
        cardiovascular_risk: nutrition.cardiovascular_risk.map(|r| r.label().to_owned()),
        waist_to_height_ratio: nutrition.waist_to_height_ratio.map(|r| round_to(r, 2)),
        actual_calories: summary.total_kcal.round(),
        macros: MacroTotals {
            carb_g: summary.carb_g.round(),
            protein_g: summary.protein_g.round(),
            fat_g: summary.fat_g.round(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_table_defaults() {
        let prices = PriceTable::default();
        assert!(prices.cost_for(GenerationStrategy::LocalOnly).abs() < f64::EPSILON);
        assert!((prices.cost_for(GenerationStrategy::ExternalMinimal) - 0.015).abs() < f64::EPSILON);
        assert!((prices.cost_for(GenerationStrategy::ExternalFull) - 0.048).abs() < f64::EPSILON);
    }

    #[test]
    fn test_price_table_wire_names() {
        let json = serde_json::to_value(PriceTable::default()).unwrap();
        assert!(json.get("python_only").is_some());
        assert!(json.get("api_minimal").is_some());
        assert!(json.get("api_full").is_some());
    }

    #[test]
    fn test_round_to() {
        assert!((round_to(29.3847, 1) - 29.4).abs() < 1e-9);
        assert!((round_to(0.125_4, 2) - 0.13).abs() < 1e-9);
    }
}
