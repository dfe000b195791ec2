// ABOUTME: Main library entry point for the nutriplan diabetic meal-plan service
// ABOUTME: Exposes the hybrid generation router, HTTP routes, records client and configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Nutriplan
//!
//! Generates personalized meal plans for people with diabetes. Each request
//! computes the patient's energy and macro targets, assembles five meals from
//! a reference food table and renders a pt-BR markdown document, either from
//! local templates or with an external text generator when the case is
//! complex enough to justify the cost.
//!
//! ## Architecture
//!
//! - **Intelligence** (`nutriplan-intelligence`): calculator, food table,
//!   meal assembler and complexity analyzer
//! - **Generation**: the hybrid router, prompts and the typed fallback
//! - **Formatters**: markdown, carb-counting and substitution tables
//! - **External**: patient records (Feegow)
//! - **Routes** and **Server**: the axum HTTP API
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use nutriplan_server::config::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("{}", config.summary());
//!     nutriplan_server::server::serve(config).await
//! }
//! ```

/// Environment-driven configuration
pub mod config;

/// Service constants
pub mod constants;

/// Unified error types
pub mod errors;

/// Patient records integration
pub mod external;

/// Document renderers
pub mod formatters;

/// Hybrid generation router and external text generation
pub mod generation;

/// Nutrition algorithms
pub mod intelligence;

/// LLM provider clients
pub mod llm;

/// Logging setup and structured log helpers
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Domain models
pub mod models;

/// HTTP route groups
pub mod routes;

/// Server assembly and serve loop
pub mod server;

/// Usage and cost tracking
pub mod usage;
