// ABOUTME: Unified error handling re-exported from nutriplan-core
// ABOUTME: AppError, ErrorCode and AppResult with axum response support
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use nutriplan_core::errors::*;
