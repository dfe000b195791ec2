// ABOUTME: Usage and cost tracking for plan generations, persisted to a JSON file or kept in memory
// ABOUTME: Provides monthly and all-time aggregates by generation strategy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Usage Tracking
//!
//! Every generation appends one record. In file mode the whole stats document
//! is rewritten after each record; in memory mode (read-only deployments) the
//! stats live for the life of the process only.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::UsageConfig;
use crate::errors::{AppError, AppResult};
use crate::models::GenerationStrategy;

/// Timestamps are naive local time; older files may use a space separator
mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const WRITE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
    const READ_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(WRITE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        READ_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(&raw, format).ok())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

/// One recorded generation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationRecord {
    /// Local time of the generation
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,
    /// Patient name as submitted
    pub patient_name: String,
    /// Strategy wire name (`python_only`, `api_minimal`, `api_full`)
    pub mode: String,
    /// External tokens consumed
    pub tokens_used: u32,
    /// Estimated cost, USD
    pub cost_usd: f64,
    /// Complexity score at generation time
    pub complexity_score: u8,
}

/// Count and cost for one strategy
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ModeTotals {
    /// Generations
    pub count: u64,
    /// USD
    pub cost: f64,
}

impl ModeTotals {
    fn add(&mut self, cost: f64) {
        self.count += 1;
        self.cost += cost;
    }
}

/// Persisted stats document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UsageStats {
    /// Every generation, oldest first
    pub generations: Vec<GenerationRecord>,
    /// Number of generations
    pub total_diets: u64,
    /// Sum of costs, USD
    pub total_cost_usd: f64,
    /// Sum of tokens
    pub total_tokens: u64,
    /// Totals keyed by strategy wire name
    pub by_mode: BTreeMap<String, ModeTotals>,
}

/// Aggregates for one calendar month
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonthlyStats {
    /// Generations in the month
    pub total_diets: u64,
    /// USD spent in the month
    pub total_cost: f64,
    /// Totals keyed by strategy wire name
    pub by_mode: BTreeMap<String, ModeTotals>,
    /// Mean cost per generation, zero when empty
    pub average_cost: f64,
}

/// Aggregates over every recorded generation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AllTimeStats {
    /// Generations
    pub total_diets: u64,
    /// USD
    pub total_cost_usd: f64,
    /// Tokens
    pub total_tokens: u64,
    /// Totals keyed by strategy wire name
    pub by_mode: BTreeMap<String, ModeTotals>,
    /// Mean cost per generation, zero when empty
    pub average_cost: f64,
}

fn average(total: f64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Shared usage sink
pub struct UsageTracker {
    storage_path: Option<PathBuf>,
    stats: RwLock<UsageStats>,
}

impl UsageTracker {
    /// Open the tracker described by `config`
    ///
    /// In file mode a missing or unreadable file starts empty.
    pub async fn open(config: &UsageConfig) -> Self {
        if config.read_only {
            info!("usage tracking in memory only");
            return Self::in_memory();
        }

        let stats = load_stats(&config.storage_path).await;
        info!(
            path = %config.storage_path.display(),
            total_diets = stats.total_diets,
            "usage tracking loaded"
        );
        Self {
            storage_path: Some(config.storage_path.clone()),
            stats: RwLock::new(stats),
        }
    }

    /// Tracker that never touches the filesystem
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            storage_path: None,
            stats: RwLock::new(UsageStats::default()),
        }
    }

    /// Whether records survive a restart
    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        self.storage_path.is_some()
    }

    /// Append one generation and persist
    ///
    /// The in-memory aggregate is always updated, even when the write fails.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the stats file cannot be written.
    pub async fn record_generation(
        &self,
        patient_name: &str,
        strategy: GenerationStrategy,
        tokens_used: u32,
        complexity_score: u8,
        cost_usd: f64,
    ) -> AppResult<()> {
        let mode = strategy.as_str().to_owned();
        let record = GenerationRecord {
            timestamp: Local::now().naive_local(),
            patient_name: patient_name.to_owned(),
            mode: mode.clone(),
            tokens_used,
            cost_usd,
            complexity_score,
        };

        let mut stats = self.stats.write().await;
        stats.generations.push(record);
        stats.total_diets += 1;
        stats.total_cost_usd += cost_usd;
        stats.total_tokens += u64::from(tokens_used);
        stats.by_mode.entry(mode).or_default().add(cost_usd);
        debug!(total_diets = stats.total_diets, "usage recorded");

        let Some(path) = &self.storage_path else {
            return Ok(());
        };
        let body = serde_json::to_vec_pretty(&*stats)?;
        // Held across the write so concurrent records land in order
        let result = save_stats(path, &body).await;
        drop(stats);
        result
    }

    /// Aggregates for one calendar month
    pub async fn monthly_stats(&self, year: i32, month: u32) -> MonthlyStats {
        let stats = self.stats.read().await;
        let mut monthly = MonthlyStats::default();
        for record in stats
            .generations
            .iter()
            .filter(|g| g.timestamp.year() == year && g.timestamp.month() == month)
        {
            monthly.total_diets += 1;
            monthly.total_cost += record.cost_usd;
            monthly
                .by_mode
                .entry(record.mode.clone())
                .or_default()
                .add(record.cost_usd);
        }
        drop(stats);

        monthly.average_cost = average(monthly.total_cost, monthly.total_diets);
        monthly
    }

    /// Aggregates over every recorded generation
    pub async fn all_time_stats(&self) -> AllTimeStats {
        let stats = self.stats.read().await;
        AllTimeStats {
            total_diets: stats.total_diets,
            total_cost_usd: stats.total_cost_usd,
            total_tokens: stats.total_tokens,
            by_mode: stats.by_mode.clone(),
            average_cost: average(stats.total_cost_usd, stats.total_diets),
        }
    }
}

async fn load_stats(path: &Path) -> UsageStats {
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "usage file unreadable, starting empty");
            UsageStats::default()
        }),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no usage file, starting empty");
            UsageStats::default()
        }
    }
}

async fn save_stats(path: &Path, body: &[u8]) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(|e| {
            AppError::storage(format!("cannot create {}: {e}", parent.display()))
        })?;
    }
    fs::write(path, body)
        .await
        .map_err(|e| AppError::storage(format!("cannot write {}: {e}", path.display())))
}
