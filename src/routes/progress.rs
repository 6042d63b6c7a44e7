// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Progress route: XP, level, streak, achievements and personal
//! challenges in one dashboard payload.

use crate::engine::{achievements, challenges, levels, streak};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/progress", get(get_progress))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LevelStatus {
    pub level: u32,
    pub title: &'static str,
    pub icon: &'static str,
    pub benefits: &'static [&'static str],
    /// Progress toward the next level, 0..=100
    pub progress_percent: f64,
    /// XP threshold of the next level; absent at the terminal level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_level_xp: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_level_title: Option<&'static str>,
}

/// One catalog entry annotated with this user's unlock state.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AchievementStatus {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub rarity: achievements::Rarity,
    pub xp_reward: u64,
    /// Progress toward the target, clamped to `max_progress`
    pub progress: f64,
    pub max_progress: f64,
    pub unlocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub unlocked_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgressResponse {
    pub total_xp: u64,
    pub level: LevelStatus,
    pub streak: streak::StreakSummary,
    pub achievements: Vec<AchievementStatus>,
    pub challenges: Vec<challenges::PersonalChallenge>,
}

/// Full gamification dashboard for the current user.
async fn get_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProgressResponse>> {
    // The three reads are independent; fetch them concurrently.
    let (progress, stats, unlocks) = futures_util::try_join!(
        state.db.get_progress(&user.user_id),
        state.activity.user_stats(&user.user_id),
        state.db.list_unlocks(&user.user_id),
    )?;

    let total_xp = progress.map(|p| p.total_xp).unwrap_or(0);

    let unlocked_at: HashMap<String, DateTime<Utc>> = unlocks
        .into_iter()
        .map(|u| (u.achievement_id, u.unlocked_at))
        .collect();

    let achievements = achievements::CATALOG
        .iter()
        .map(|def| {
            let unlocked_at = unlocked_at.get(def.id).copied();
            AchievementStatus {
                id: def.id,
                title: def.title,
                description: def.description,
                icon: def.icon,
                rarity: def.rarity,
                xp_reward: def.xp_reward,
                progress: def.progress(&stats),
                max_progress: def.max_progress,
                unlocked: unlocked_at.is_some(),
                unlocked_at,
            }
        })
        .collect();

    let current = levels::level_for_xp(total_xp);
    let next = levels::next_level(total_xp);
    let level = LevelStatus {
        level: current.level,
        title: current.title,
        icon: current.icon,
        benefits: current.benefits,
        progress_percent: levels::progress_percent(total_xp),
        next_level_xp: next.map(|l| l.xp_threshold),
        next_level_title: next.map(|l| l.title),
    };

    let streak = streak::StreakSummary {
        current: stats.current_streak,
        longest: stats.longest_streak,
        multiplier: streak::multiplier_for(stats.current_streak),
    };

    Ok(Json(ProgressResponse {
        total_xp,
        level,
        streak,
        achievements,
        challenges: challenges::generate(&stats, Utc::now()),
    }))
}
