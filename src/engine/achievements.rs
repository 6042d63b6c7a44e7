// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Achievement catalog and evaluation.
//!
//! The catalog is a data table of (id, metadata, predicate) entries
//! evaluated uniformly; adding an achievement is a data change. Evaluation
//! is pure and idempotent — recording unlocks at-most-once per user is the
//! caller's job.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::UserStats;

/// Rarity tier, mostly for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// One catalog entry.
///
/// `predicate` decides unlocking; `progress` feeds partial-progress display
/// and never affects evaluation.
pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub rarity: Rarity,
    pub xp_reward: u64,
    pub max_progress: f64,
    predicate: fn(&UserStats) -> bool,
    progress: fn(&UserStats) -> f64,
}

impl AchievementDef {
    pub fn is_satisfied(&self, stats: &UserStats) -> bool {
        (self.predicate)(stats)
    }

    /// Progress toward the target, clamped to `max_progress`.
    pub fn progress(&self, stats: &UserStats) -> f64 {
        (self.progress)(stats).min(self.max_progress)
    }

    pub fn find(id: &str) -> Option<&'static AchievementDef> {
        CATALOG.iter().find(|a| a.id == id)
    }
}

pub const CATALOG: [AchievementDef; 8] = [
    AchievementDef {
        id: "first_activity",
        title: "First Steps",
        description: "Log your first eco-activity",
        icon: "👶",
        rarity: Rarity::Common,
        xp_reward: 50,
        max_progress: 1.0,
        predicate: |s| s.total_activities >= 1,
        progress: |s| s.total_activities as f64,
    },
    AchievementDef {
        id: "week_streak",
        title: "Weekly Warrior",
        description: "Maintain a 7-day activity streak",
        icon: "🔥",
        rarity: Rarity::Rare,
        xp_reward: 200,
        max_progress: 7.0,
        predicate: |s| s.current_streak >= 7,
        progress: |s| s.current_streak as f64,
    },
    AchievementDef {
        id: "transport_switch",
        title: "Transport Transformer",
        description: "Switch from car to eco-friendly transport 10 times",
        icon: "🚲",
        rarity: Rarity::Rare,
        xp_reward: 150,
        max_progress: 10.0,
        predicate: |s| s.eco_transport_count >= 10,
        progress: |s| s.eco_transport_count as f64,
    },
    AchievementDef {
        id: "co2_saver_100",
        title: "CO₂ Saver",
        description: "Save 100kg of CO₂ emissions",
        icon: "🌬️",
        rarity: Rarity::Epic,
        xp_reward: 300,
        max_progress: 100.0,
        predicate: |s| s.total_co2_saved >= 100.0,
        progress: |s| s.total_co2_saved,
    },
    AchievementDef {
        id: "money_saver_5000",
        title: "Penny Pincher",
        description: "Save ₹5,000 through eco-choices",
        icon: "💰",
        rarity: Rarity::Epic,
        xp_reward: 250,
        max_progress: 5000.0,
        predicate: |s| s.total_money_saved >= 5000.0,
        progress: |s| s.total_money_saved,
    },
    AchievementDef {
        id: "month_perfect",
        title: "Monthly Master",
        description: "Log activities every day for a month",
        icon: "📅",
        rarity: Rarity::Epic,
        xp_reward: 500,
        max_progress: 30.0,
        predicate: |s| s.longest_streak >= 30,
        progress: |s| s.longest_streak as f64,
    },
    AchievementDef {
        id: "plant_based_champion",
        title: "Plant-Based Champion",
        description: "Choose plant-based meals 100 times",
        icon: "🥬",
        rarity: Rarity::Epic,
        xp_reward: 400,
        max_progress: 100.0,
        predicate: |s| s.plant_based_meals >= 100,
        progress: |s| s.plant_based_meals as f64,
    },
    AchievementDef {
        id: "zero_emissions_week",
        title: "Zero Emissions Hero",
        description: "Achieve net-zero transport emissions for a week",
        icon: "⚡",
        rarity: Rarity::Legendary,
        xp_reward: 1000,
        max_progress: 7.0,
        predicate: |s| s.zero_emission_days >= 7,
        progress: |s| s.zero_emission_days as f64,
    },
];

/// All catalog entries whose predicate holds for these stats.
///
/// The caller filters out entries already unlocked for the user.
pub fn evaluate(stats: &UserStats) -> Vec<&'static AchievementDef> {
    CATALOG.iter().filter(|a| a.is_satisfied(stats)).collect()
}
