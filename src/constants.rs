// ABOUTME: System-wide constants re-exported from nutriplan-core
// ABOUTME: Energy factors, input limits, endpoints, ports and service names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use nutriplan_core::constants::*;
