// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! EcoTrack: impact estimation and gamification backend
//!
//! This crate provides the backend API for logging eco-activities,
//! estimating their CO₂ and financial impact, and driving the streak,
//! XP, achievement and community features built on top of the log.

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{ActivityService, InsightsService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub activity: ActivityService,
    pub insights: InsightsService,
}
