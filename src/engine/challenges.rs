// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Personalized challenge generation.
//!
//! Challenges are ephemeral suggestions synthesized from the user's current
//! behavioral skew. They are recomputed on every request and never
//! persisted as a source of truth.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::UserStats;

const CHALLENGE_WINDOW_DAYS: i64 = 7;

/// An ephemeral challenge suggestion.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PersonalChallenge {
    pub title: &'static str,
    pub description: &'static str,
    pub target: u32,
    pub current: u32,
    pub reward: &'static str,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub deadline: DateTime<Utc>,
}

/// Generate challenges for the user's current stats.
///
/// Behavioral challenges fire when the user skews car-heavy or meat-heavy;
/// the consistency challenge is always present and seeded with the current
/// streak.
pub fn generate(stats: &UserStats, now: DateTime<Utc>) -> Vec<PersonalChallenge> {
    let deadline = now + Duration::days(CHALLENGE_WINDOW_DAYS);
    let mut challenges = Vec::with_capacity(3);

    if stats.car_usage > stats.eco_transport_count {
        challenges.push(PersonalChallenge {
            title: "Green Commute Challenge",
            description: "Use eco-friendly transport 5 times this week",
            target: 5,
            current: 0,
            reward: "100 XP + Transport Master badge",
            deadline,
        });
    }

    if stats.meat_consumption > stats.plant_based_meals {
        challenges.push(PersonalChallenge {
            title: "Plant Power Week",
            description: "Try 3 plant-based meals this week",
            target: 3,
            current: 0,
            reward: "80 XP + Herbivore Hero badge",
            deadline,
        });
    }

    challenges.push(PersonalChallenge {
        title: "Daily Consistency",
        description: "Log at least one activity every day for 7 days",
        target: 7,
        current: stats.current_streak,
        reward: "200 XP + Consistency King badge",
        deadline,
    });

    challenges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_includes_consistency_challenge() {
        let stats = UserStats::default();
        let challenges = generate(&stats, Utc::now());
        assert_eq!(challenges.len(), 1);
        assert_eq!(challenges[0].title, "Daily Consistency");
        assert_eq!(challenges[0].target, 7);
    }

    #[test]
    fn test_car_heavy_user_gets_transport_challenge() {
        let stats = UserStats {
            car_usage: 8,
            eco_transport_count: 2,
            ..UserStats::default()
        };
        let challenges = generate(&stats, Utc::now());
        assert!(challenges.iter().any(|c| c.title == "Green Commute Challenge"));
    }

    #[test]
    fn test_balanced_user_gets_no_transport_challenge() {
        let stats = UserStats {
            car_usage: 2,
            eco_transport_count: 2,
            ..UserStats::default()
        };
        let challenges = generate(&stats, Utc::now());
        assert!(!challenges.iter().any(|c| c.title == "Green Commute Challenge"));
    }

    #[test]
    fn test_meat_heavy_user_gets_plant_challenge() {
        let stats = UserStats {
            meat_consumption: 10,
            plant_based_meals: 3,
            ..UserStats::default()
        };
        let challenges = generate(&stats, Utc::now());
        assert!(challenges.iter().any(|c| c.title == "Plant Power Week"));
    }

    #[test]
    fn test_consistency_seeded_with_current_streak() {
        let stats = UserStats {
            current_streak: 4,
            ..UserStats::default()
        };
        let challenges = generate(&stats, Utc::now());
        let consistency = challenges
            .iter()
            .find(|c| c.title == "Daily Consistency")
            .unwrap();
        assert_eq!(consistency.current, 4);
    }

    #[test]
    fn test_deadline_is_one_week_out() {
        let now = Utc::now();
        let challenges = generate(&UserStats::default(), now);
        assert_eq!(challenges[0].deadline, now + Duration::days(7));
    }
}
