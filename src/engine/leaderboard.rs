// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard scoring.
//!
//! The weights are behavioral constants inherited from the product design;
//! they are tunable configuration, kept together here rather than spread
//! through call sites.

use crate::models::{LeaderboardEntry, UserStats};

/// Points per kg of CO₂ saved.
pub const CO2_WEIGHT: f64 = 10.0;
/// Points per day of current streak.
pub const STREAK_WEIGHT: f64 = 50.0;
/// Points per distinct activity category used.
pub const DIVERSITY_WEIGHT: f64 = 100.0;

/// Combined leaderboard score. Higher is better.
pub fn score(stats: &UserStats) -> f64 {
    stats.total_co2_saved * CO2_WEIGHT
        + stats.current_streak as f64 * STREAK_WEIGHT
        + stats.category_diversity as f64 * DIVERSITY_WEIGHT
}

/// Sort entries for display: score descending, ties broken by ascending
/// user id so the order is stable across refreshes.
pub fn rank(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
}
