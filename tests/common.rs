// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Quiet logging, reference patients, seeded pickers, stub generators and app state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `nutriplan_server`

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use async_trait::async_trait;
use nutriplan_server::{
    external::{MockPatientRecords, PatientRecords},
    formatters::MarkdownFormatter,
    generation::{
        ExternalGenerationError, GeneratedText, HybridOrchestrator, PickerFactory,
        TextGenerationRequest, TextGenerator,
    },
    intelligence::{FoodTable, SeededPicker},
    middleware::RedactionConfig,
    models::{DeficitLevel, DietType, PatientProfile, Sex},
    server::AppState,
    usage::UsageTracker,
};
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// F, 45 y, 80 kg, 165 cm, `HbA1c` 9.5
pub fn reference_patient() -> PatientProfile {
    PatientProfile {
        name: "Maria Aparecida Silva".to_owned(),
        sex: Sex::Female,
        age: 45,
        weight_kg: 80.0,
        height_cm: 165.0,
        hba1c: Some(9.5),
        fasting_glucose: None,
        waist_cm: None,
        diet_type: DietType::Balanced,
        deficit_level: DeficitLevel::Moderate,
    }
}

/// Scores 6: severe obesity, very high `HbA1c`, advanced age and elevated waist ratio
pub fn complex_patient() -> PatientProfile {
    PatientProfile {
        name: "João Pereira Santos".to_owned(),
        sex: Sex::Male,
        age: 78,
        weight_kg: 130.0,
        height_cm: 170.0,
        hba1c: Some(11.0),
        fasting_glucose: Some(280.0),
        waist_cm: Some(130.0),
        diet_type: DietType::LowCarb,
        deficit_level: DeficitLevel::Intense,
    }
}

/// Picker factory restarting the same seeded stream on every request
pub fn seeded_factory(seed: u64) -> PickerFactory {
    Arc::new(move || Box::new(SeededPicker::new(seed)))
}

/// Generator returning fixed text and counting calls
pub struct StubGenerator {
    text: String,
    tokens: u32,
    calls: AtomicUsize,
}

impl StubGenerator {
    pub fn new(text: &str, tokens: u32) -> Self {
        Self {
            text: text.to_owned(),
            tokens,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    async fn generate(
        &self,
        _request: &TextGenerationRequest,
    ) -> Result<GeneratedText, ExternalGenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(GeneratedText {
            text: self.text.clone(),
            tokens_used: self.tokens,
        })
    }
}

/// Generator that always fails
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    fn name(&self) -> &str {
        "failing"
    }

    fn model(&self) -> &str {
        "failing-model"
    }

    async fn generate(
        &self,
        _request: &TextGenerationRequest,
    ) -> Result<GeneratedText, ExternalGenerationError> {
        Err(ExternalGenerationError::RateLimited("quota exhausted".to_owned()))
    }
}

/// Generator that answers after a delay
pub struct SlowGenerator(pub Duration);

#[async_trait]
impl TextGenerator for SlowGenerator {
    fn name(&self) -> &str {
        "slow"
    }

    fn model(&self) -> &str {
        "slow-model"
    }

    async fn generate(
        &self,
        _request: &TextGenerationRequest,
    ) -> Result<GeneratedText, ExternalGenerationError> {
        tokio::time::sleep(self.0).await;
        Ok(GeneratedText {
            text: "late".to_owned(),
            tokens_used: 10,
        })
    }
}

/// Router with builtin tables, seeded picks and in-memory usage
pub fn test_orchestrator(
    generator: Option<Arc<dyn TextGenerator>>,
    seed: u64,
) -> HybridOrchestrator {
    init_test_logging();
    HybridOrchestrator::new(
        FoodTable::builtin().unwrap(),
        MarkdownFormatter::builtin().unwrap(),
        Arc::new(UsageTracker::in_memory()),
    )
    .with_generator(generator)
    .with_picker_factory(seeded_factory(seed))
}

/// HTTP state over the given router and records backend
pub fn test_state(
    orchestrator: HybridOrchestrator,
    records: Arc<dyn PatientRecords>,
) -> Arc<AppState> {
    Arc::new(AppState {
        orchestrator: Arc::new(orchestrator),
        records,
        redaction: RedactionConfig::default(),
    })
}

/// Local-only state with the seeded mock records
pub fn default_state() -> Arc<AppState> {
    test_state(test_orchestrator(None, 42), Arc::new(MockPatientRecords::new()))
}
