// ABOUTME: Usage statistics command for nutriplan-cli
// ABOUTME: Reads the usage file and prints monthly or all-time totals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use nutriplan_server::{
    config::ServerConfig, errors::AppResult, routes::StatsQuery, usage::UsageTracker,
};

use crate::helpers::display::{display_all_time_stats, display_monthly_stats};

/// Print usage statistics
pub async fn show(config: &ServerConfig, month: Option<u32>, year: Option<i32>) -> AppResult<()> {
    let tracker = UsageTracker::open(&config.usage).await;
    if !tracker.is_persistent() {
        println!("Usage tracking runs in memory only; no history is available.");
    }

    match (StatsQuery { month, year }).period()? {
        Some((year, month)) => {
            let stats = tracker.monthly_stats(year, month).await;
            display_monthly_stats(year, month, &stats);
        }
        None => display_all_time_stats(&tracker.all_time_stats().await),
    }
    Ok(())
}
