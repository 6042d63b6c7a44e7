// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod environment;
pub mod insights;

pub use activity::{ActivityService, LogActivityResponse};
pub use environment::EnvironmentService;
pub use insights::InsightsService;
