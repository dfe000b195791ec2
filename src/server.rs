// ABOUTME: HTTP server assembly: shared state, router composition and the serve loop
// ABOUTME: Wires config into the hybrid router and records client, then layers middleware
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server
//!
//! [`AppState`] holds everything handlers share. It is built once from
//! [`ServerConfig`] and passed to every route group as `Arc<AppState>`.

#[cfg(not(unix))]
use std::future::pending;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use axum::{middleware::from_fn, Router};
use tokio::net::TcpListener;
use tokio::signal;
#[cfg(unix)]
use tokio::signal::unix::{signal as unix_signal, SignalKind};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::errors::AppResult;
use crate::external::{FeegowClient, PatientRecords};
use crate::formatters::MarkdownFormatter;
use crate::generation::HybridOrchestrator;
use crate::intelligence::FoodTable;
use crate::middleware::{request_id_middleware, setup_cors, RedactionConfig};
use crate::routes::{AnalysisRoutes, DietRoutes, HealthRoutes, RecordsRoutes, StatsRoutes};
use crate::usage::UsageTracker;

/// Resources shared by every handler
pub struct AppState {
    /// Plan generation
    pub orchestrator: Arc<HybridOrchestrator>,
    /// Patient charts
    pub records: Arc<dyn PatientRecords>,
    /// PII masking for log lines
    pub redaction: RedactionConfig,
}

impl AppState {
    /// Build state from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the food or substitution tables fail to load, or an
    /// HTTP client cannot be built.
    pub async fn from_config(config: &ServerConfig) -> AppResult<Self> {
        let usage = Arc::new(UsageTracker::open(&config.usage).await);
        let orchestrator = build_orchestrator(config, usage)?;
        let records: Arc<dyn PatientRecords> = Arc::new(FeegowClient::new(&config.feegow)?);
        if !records.is_configured() {
            warn!("FEEGOW_API_TOKEN not set, patient records routes will return 502");
        }

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            records,
            redaction: RedactionConfig::from_env(),
        })
    }
}

/// Configure the hybrid router from the server configuration
///
/// # Errors
///
/// Returns an error if the food or substitution tables fail to load, or the
/// external generator cannot be built.
pub fn build_orchestrator(
    config: &ServerConfig,
    usage: Arc<UsageTracker>,
) -> AppResult<HybridOrchestrator> {
    let generator = config.llm.build_generator()?;
    if generator.is_none() {
        info!("no external generator configured, every plan is rendered locally");
    }

    Ok(
        HybridOrchestrator::new(FoodTable::builtin()?, MarkdownFormatter::builtin()?, usage)
            .with_generator(generator)
            .with_complexity(config.generation.complexity)
            .with_prices(config.generation.prices)
            .with_default_strategy(config.generation.default_mode)
            .with_cost_tracking(config.generation.cost_tracking)
            .with_token_limits(config.llm.max_tokens_minimal, config.llm.max_tokens_full)
            .with_timeout(config.llm.timeout()),
    )
}

/// Compose every route group with CORS, request ids and tracing
pub fn router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&state)))
        .merge(DietRoutes::routes(Arc::clone(&state)))
        .merge(AnalysisRoutes::routes(Arc::clone(&state)))
        .merge(StatsRoutes::routes(Arc::clone(&state)))
        .merge(RecordsRoutes::routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(setup_cors(&config.cors))
                .layer(from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http()),
        )
}

/// Bind and serve until Ctrl-C or SIGTERM
///
/// # Errors
///
/// Returns an error if state cannot be built, the port cannot be bound, or
/// the server fails while running.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = Arc::new(
        AppState::from_config(&config)
            .await
            .map_err(|e| anyhow!("failed to initialize server state: {e}"))?,
    );
    let app = router(state, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow!("failed to bind {addr}: {e}"))?;
    info!("HTTP server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow!("server error: {e}"))?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match unix_signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
