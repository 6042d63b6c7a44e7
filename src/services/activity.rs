// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity logging orchestration.
//!
//! Ties the pure engine modules to storage: computes the impact estimate,
//! appends the activity atomically with its XP credit, then evaluates
//! achievements and refreshes the user's leaderboard entry. Unlock
//! evaluation happens after the commit so a crash mid-flow loses at most
//! the side effects, never the activity itself.

use chrono::{FixedOffset, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::config::Config;
use crate::db::FirestoreDb;
use crate::engine::{achievements, impact, leaderboard, levels, streak};
use crate::error::Result;
use crate::models::{
    AchievementUnlock, Activity, LeaderboardEntry, LogActivityRequest, UserStats,
};
use crate::services::environment::EnvironmentService;
use crate::time_utils::today;

/// Response for `POST /api/activities`.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LogActivityResponse {
    pub activity: Activity,
    /// Confidence in the stored impact figures, 0..=1
    pub accuracy: f64,
    /// Provenance label for the impact figures
    pub source: &'static str,
    /// XP credited for this activity (after the streak multiplier)
    pub xp_awarded: u64,
    /// New cumulative XP total
    pub total_xp: u64,
    pub level: u32,
    pub level_title: &'static str,
    pub streak: streak::StreakSummary,
    /// Achievement IDs newly unlocked by this activity
    pub unlocked: Vec<&'static str>,
}

#[derive(Clone)]
pub struct ActivityService {
    db: FirestoreDb,
    environment: EnvironmentService,
    offset: FixedOffset,
    enhanced: bool,
    default_region: String,
}

impl ActivityService {
    pub fn new(config: &Config, db: FirestoreDb, environment: EnvironmentService) -> Self {
        Self {
            db,
            environment,
            offset: config.app_offset(),
            enhanced: config.enhanced_estimates,
            default_region: config.default_region.clone(),
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Log an activity and apply every gamification consequence.
    pub async fn log_activity(
        &self,
        user_id: &str,
        request: LogActivityRequest,
    ) -> Result<LogActivityResponse> {
        let estimate = self.estimate(user_id, &request).await?;

        let activity = Activity {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            category: request.category,
            activity_type: request.activity_type,
            amount: request.amount,
            co2_impact: estimate.co2_impact,
            financial_impact: estimate.financial_impact,
            created_at: Utc::now(),
        };

        // The streak that prices this award includes the activity being
        // logged, so the first log of day N immediately earns day-N rates.
        let mut history = self.db.list_all_activities(user_id).await?;
        history.push(activity.clone());

        let today = today(self.offset);
        let timestamps: Vec<_> = history.iter().map(|a| a.created_at).collect();
        let streak = streak::compute_streak(&timestamps, today, self.offset);

        let xp_awarded = levels::award_xp(
            estimate.co2_impact,
            estimate.financial_impact,
            streak.multiplier,
        );
        let mut total_xp = self.db.log_activity_atomic(&activity, xp_awarded).await?;

        // Post-commit side effects: achievements and the leaderboard.
        let stats = UserStats::from_activities(&history, today, self.offset);
        let unlocked = self.apply_unlocks(user_id, &stats, &mut total_xp).await?;
        self.refresh_leaderboard(user_id, &stats, total_xp).await?;

        let level = levels::level_for_xp(total_xp);
        Ok(LogActivityResponse {
            activity,
            accuracy: estimate.accuracy,
            source: estimate.source,
            xp_awarded,
            total_xp,
            level: level.level,
            level_title: level.title,
            streak,
            unlocked,
        })
    }

    /// Derived stats over the full history.
    pub async fn user_stats(&self, user_id: &str) -> Result<UserStats> {
        let history = self.db.list_all_activities(user_id).await?;
        Ok(UserStats::from_activities(
            &history,
            today(self.offset),
            self.offset,
        ))
    }

    async fn estimate(
        &self,
        user_id: &str,
        request: &LogActivityRequest,
    ) -> Result<impact::ImpactEstimate> {
        if !self.enhanced {
            return Ok(impact::compute_impact(
                request.category,
                &request.activity_type,
                request.amount,
            )?);
        }

        let region = self
            .db
            .get_user(user_id)
            .await?
            .and_then(|profile| profile.region)
            .unwrap_or_else(|| self.default_region.clone());
        let signals = self.environment.signals(&region).await;
        Ok(impact::compute_enhanced(
            request.category,
            &request.activity_type,
            request.amount,
            &signals,
        )?)
    }

    /// Evaluate the catalog against fresh stats and record any new unlocks,
    /// crediting their XP rewards. Returns the newly-unlocked IDs.
    async fn apply_unlocks(
        &self,
        user_id: &str,
        stats: &UserStats,
        total_xp: &mut u64,
    ) -> Result<Vec<&'static str>> {
        let mut unlocked = Vec::new();
        for def in achievements::evaluate(stats) {
            let record = AchievementUnlock {
                user_id: user_id.to_string(),
                achievement_id: def.id.to_string(),
                unlocked_at: Utc::now(),
            };
            if self.db.record_unlock(&record).await? {
                *total_xp = self.db.add_xp(user_id, def.xp_reward).await?;
                tracing::info!(user_id, achievement = def.id, "Achievement unlocked");
                unlocked.push(def.id);
            }
        }
        Ok(unlocked)
    }

    async fn refresh_leaderboard(
        &self,
        user_id: &str,
        stats: &UserStats,
        total_xp: u64,
    ) -> Result<()> {
        let display_name = self
            .db
            .get_user(user_id)
            .await?
            .and_then(|p| p.display_name);

        self.db
            .upsert_leaderboard_entry(&LeaderboardEntry {
                user_id: user_id.to_string(),
                display_name,
                score: leaderboard::score(stats),
                level: levels::level_for_xp(total_xp).level,
                total_co2_saved: stats.total_co2_saved,
                current_streak: stats.current_streak,
                updated_at: Utc::now(),
            })
            .await
    }
}
