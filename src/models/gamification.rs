// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Stored gamification records: XP progress, achievement unlocks,
//! leaderboard entries and community challenges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Cumulative XP document, one per user.
///
/// Updated read-modify-write whenever an activity is logged or an
/// achievement unlocks; the activity append and the XP write commit
/// together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProgress {
    pub user_id: String,
    pub total_xp: u64,
    pub updated_at: DateTime<Utc>,
}

impl UserProgress {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            total_xp: 0,
            updated_at: Utc::now(),
        }
    }
}

/// Recorded achievement unlock.
///
/// Append-only; document ID `{user_id}_{achievement_id}` enforces
/// at-most-once semantics in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementUnlock {
    pub user_id: String,
    pub achievement_id: String,
    pub unlocked_at: DateTime<Utc>,
}

impl AchievementUnlock {
    /// Document ID enforcing uniqueness per (user, achievement).
    pub fn doc_id(&self) -> String {
        format!("{}_{}", self.user_id, self.achievement_id)
    }
}

/// Persisted leaderboard entry, refreshed after each logged activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub display_name: Option<String>,
    pub score: f64,
    pub level: u32,
    pub total_co2_saved: f64,
    pub current_streak: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub updated_at: DateTime<Utc>,
}

/// Community-wide challenge document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CommunityChallenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub goal: f64,
    pub current_progress: f64,
    pub participants: u32,
    pub reward: String,
    /// Fixed-precision so the active-challenge filter compares exactly.
    #[serde(with = "crate::time_utils::rfc3339_nanos")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub ends_at: DateTime<Utc>,
}

/// Membership record for a community challenge.
///
/// Document ID `{challenge_id}_{user_id}` keeps joins idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeMembership {
    pub challenge_id: String,
    pub user_id: String,
    pub joined_at: DateTime<Utc>,
}

impl ChallengeMembership {
    pub fn doc_id(&self) -> String {
        format!("{}_{}", self.challenge_id, self.user_id)
    }
}
