// ABOUTME: Tests for usage tracking persistence and aggregation
// ABOUTME: File round-trips through a temp directory, corrupt files, memory mode and monthly stats
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::{Datelike, Local};
use nutriplan_server::{
    config::UsageConfig, models::GenerationStrategy, usage::UsageTracker,
};
use tempfile::TempDir;

mod common;

fn file_config(dir: &TempDir) -> UsageConfig {
    UsageConfig {
        storage_path: dir.path().join("stats").join("usage_stats.json"),
        read_only: false,
    }
}

#[tokio::test]
async fn test_records_survive_reopen() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);

    let tracker = UsageTracker::open(&config).await;
    assert!(tracker.is_persistent());
    tracker
        .record_generation("Ana", GenerationStrategy::LocalOnly, 0, 2, 0.0)
        .await
        .unwrap();
    tracker
        .record_generation("Bia", GenerationStrategy::ExternalMinimal, 640, 5, 0.015)
        .await
        .unwrap();
    assert!(config.storage_path.exists());

    let reopened = UsageTracker::open(&config).await;
    let stats = reopened.all_time_stats().await;
    assert_eq!(stats.total_diets, 2);
    assert_eq!(stats.total_tokens, 640);
    assert!((stats.total_cost_usd - 0.015).abs() < 1e-12);
    assert_eq!(stats.by_mode["api_minimal"].count, 1);
    assert_eq!(stats.by_mode["python_only"].count, 1);
}

#[tokio::test]
async fn test_stored_document_layout() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);
    let tracker = UsageTracker::open(&config).await;
    tracker
        .record_generation("Ana", GenerationStrategy::ExternalFull, 5000, 8, 0.048)
        .await
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&config.storage_path).unwrap()).unwrap();
    assert_eq!(raw["total_diets"], 1);
    assert_eq!(raw["generations"][0]["patient_name"], "Ana");
    assert_eq!(raw["generations"][0]["mode"], "api_full");
    assert_eq!(raw["by_mode"]["api_full"]["count"], 1);
    assert!(raw["generations"][0]["timestamp"].as_str().unwrap().contains('T'));
}

#[tokio::test]
async fn test_corrupt_file_starts_empty() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);
    std::fs::create_dir_all(config.storage_path.parent().unwrap()).unwrap();
    std::fs::write(&config.storage_path, b"{not json").unwrap();

    let tracker = UsageTracker::open(&config).await;
    assert_eq!(tracker.all_time_stats().await.total_diets, 0);

    // The next write replaces the corrupt document
    tracker
        .record_generation("Ana", GenerationStrategy::LocalOnly, 0, 1, 0.0)
        .await
        .unwrap();
    let reopened = UsageTracker::open(&config).await;
    assert_eq!(reopened.all_time_stats().await.total_diets, 1);
}

#[tokio::test]
async fn test_read_only_mode_never_writes() {
    let dir = TempDir::new().unwrap();
    let config = UsageConfig {
        read_only: true,
        ..file_config(&dir)
    };

    let tracker = UsageTracker::open(&config).await;
    assert!(!tracker.is_persistent());
    tracker
        .record_generation("Ana", GenerationStrategy::LocalOnly, 0, 1, 0.0)
        .await
        .unwrap();
    assert_eq!(tracker.all_time_stats().await.total_diets, 1);
    assert!(!config.storage_path.exists());
}

#[tokio::test]
async fn test_monthly_stats_filter_by_calendar_month() {
    let tracker = UsageTracker::in_memory();
    tracker
        .record_generation("Ana", GenerationStrategy::ExternalMinimal, 500, 4, 0.015)
        .await
        .unwrap();
    tracker
        .record_generation("Bia", GenerationStrategy::ExternalFull, 5000, 8, 0.048)
        .await
        .unwrap();

    let now = Local::now();
    let current = tracker.monthly_stats(now.year(), now.month()).await;
    assert_eq!(current.total_diets, 2);
    assert!((current.total_cost - 0.063).abs() < 1e-12);
    assert!((current.average_cost - 0.0315).abs() < 1e-12);

    let empty = tracker.monthly_stats(now.year() - 1, now.month()).await;
    assert_eq!(empty.total_diets, 0);
    assert!(empty.average_cost.abs() < f64::EPSILON);
    assert!(empty.by_mode.is_empty());
}

#[tokio::test]
async fn test_legacy_space_separated_file_loads() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);
    std::fs::create_dir_all(config.storage_path.parent().unwrap()).unwrap();
    std::fs::write(
        &config.storage_path,
        r#"{
            "generations": [{
                "timestamp": "2025-01-15 09:30:00.000000",
                "patient_name": "Ana",
                "mode": "python_only",
                "tokens_used": 0,
                "cost_usd": 0.0,
                "complexity_score": 1
            }],
            "total_diets": 1,
            "total_cost_usd": 0.0,
            "total_tokens": 0,
            "by_mode": {"python_only": {"count": 1, "cost": 0.0}}
        }"#,
    )
    .unwrap();

    let tracker = UsageTracker::open(&config).await;
    assert_eq!(tracker.monthly_stats(2025, 1).await.total_diets, 1);
    assert_eq!(tracker.monthly_stats(2025, 2).await.total_diets, 0);
}
