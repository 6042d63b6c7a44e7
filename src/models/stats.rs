//! Derived user statistics.
//!
//! Stats are never stored; they are derived on demand from the activity log
//! so that factor-table or streak-rule changes never leave stale aggregates
//! behind.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::engine::streak;
use crate::models::{Activity, Category};
use crate::time_utils::local_day;

/// Aggregate view over a user's activity history.
///
/// Inputs to the achievement, challenge and leaderboard engines, and the
/// payload of `GET /api/stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserStats {
    /// Total activities logged
    pub total_activities: u32,
    /// Lifetime CO₂ impact avoided (kg)
    pub total_co2_saved: f64,
    /// Lifetime financial impact avoided (₹)
    pub total_money_saved: f64,
    /// CO₂ impact over the last 7 calendar days (kg)
    pub weekly_co2_saved: f64,
    /// Financial impact over the last 7 calendar days (₹)
    pub weekly_money_saved: f64,
    /// Travel activities by bike, public transport or walking
    pub eco_transport_count: u32,
    /// Travel activities by car
    pub car_usage: u32,
    /// Vegetarian, vegan or local-produce meals
    pub plant_based_meals: u32,
    /// Meat meals
    pub meat_consumption: u32,
    /// Distinct categories ever logged (0..=4)
    pub category_diversity: u32,
    /// Calendar days with travel activity and zero travel CO₂
    pub zero_emission_days: u32,
    /// Consecutive active days ending today or yesterday
    pub current_streak: u32,
    /// Longest run of consecutive active days anywhere in history
    pub longest_streak: u32,
}

const ECO_TRANSPORT_TYPES: [&str; 3] = ["Bike", "Public Transport", "Walking"];
const PLANT_BASED_TYPES: [&str; 3] = ["Vegetarian", "Vegan", "Local Produce"];

impl UserStats {
    /// Derive stats from the full activity history.
    ///
    /// `today` and `offset` fix the calendar so streaks and the weekly
    /// window are stable within a request.
    pub fn from_activities(activities: &[Activity], today: NaiveDate, offset: FixedOffset) -> Self {
        let week_start = today - Duration::days(6);

        let mut stats = UserStats::default();
        let mut categories = HashSet::new();
        let mut travel_co2_by_day: HashMap<NaiveDate, f64> = HashMap::new();

        for activity in activities {
            let day = local_day(activity.created_at, offset);

            stats.total_activities += 1;
            stats.total_co2_saved += activity.co2_impact;
            stats.total_money_saved += activity.financial_impact;

            if day >= week_start && day <= today {
                stats.weekly_co2_saved += activity.co2_impact;
                stats.weekly_money_saved += activity.financial_impact;
            }

            categories.insert(activity.category);

            match activity.category {
                Category::Travel => {
                    *travel_co2_by_day.entry(day).or_insert(0.0) += activity.co2_impact;
                    if ECO_TRANSPORT_TYPES.contains(&activity.activity_type.as_str()) {
                        stats.eco_transport_count += 1;
                    }
                    if activity.activity_type == "Car" {
                        stats.car_usage += 1;
                    }
                }
                Category::Food => {
                    if PLANT_BASED_TYPES.contains(&activity.activity_type.as_str()) {
                        stats.plant_based_meals += 1;
                    }
                    if activity.activity_type == "Meat" {
                        stats.meat_consumption += 1;
                    }
                }
                _ => {}
            }
        }

        stats.category_diversity = categories.len() as u32;
        stats.zero_emission_days =
            travel_co2_by_day.values().filter(|co2| **co2 == 0.0).count() as u32;

        let days: Vec<NaiveDate> = activities
            .iter()
            .map(|a| local_day(a.created_at, offset))
            .collect();
        let summary = streak::compute_streak_for_days(&days, today);
        stats.current_streak = summary.current;
        stats.longest_streak = summary.longest;

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(330 * 60).unwrap()
    }

    fn make_activity(
        category: Category,
        activity_type: &str,
        co2: f64,
        day: NaiveDate,
    ) -> Activity {
        Activity {
            id: format!("a-{}-{}", activity_type, day),
            user_id: "u1".to_string(),
            category,
            activity_type: activity_type.to_string(),
            amount: 1.0,
            co2_impact: co2,
            financial_impact: co2 * 10.0,
            // 06:30 UTC is midday at +05:30, safely inside `day`
            created_at: Utc.from_utc_datetime(&day.and_hms_opt(6, 30, 0).unwrap()),
        }
    }

    #[test]
    fn test_empty_history() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let stats = UserStats::from_activities(&[], today, offset());
        assert_eq!(stats.total_activities, 0);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.category_diversity, 0);
    }

    #[test]
    fn test_counters_and_sums() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let activities = vec![
            make_activity(Category::Travel, "Car", 2.1, today),
            make_activity(Category::Travel, "Bike", 0.1, today),
            make_activity(Category::Food, "Meat", 2.5, today),
            make_activity(Category::Food, "Vegan", 0.5, today),
        ];

        let stats = UserStats::from_activities(&activities, today, offset());

        assert_eq!(stats.total_activities, 4);
        assert_eq!(stats.car_usage, 1);
        assert_eq!(stats.eco_transport_count, 1);
        assert_eq!(stats.meat_consumption, 1);
        assert_eq!(stats.plant_based_meals, 1);
        assert_eq!(stats.category_diversity, 2);
        assert!((stats.total_co2_saved - 5.2).abs() < 1e-9);
    }

    #[test]
    fn test_weekly_window_excludes_older_activity() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let in_window = today - Duration::days(6);
        let out_of_window = today - Duration::days(7);

        let activities = vec![
            make_activity(Category::Energy, "Electricity", 3.0, in_window),
            make_activity(Category::Energy, "Electricity", 5.0, out_of_window),
        ];

        let stats = UserStats::from_activities(&activities, today, offset());

        assert!((stats.total_co2_saved - 8.0).abs() < 1e-9);
        assert!((stats.weekly_co2_saved - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_emission_days_counts_walking_only_days() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let activities = vec![
            // Day 1: walking only, zero travel CO₂
            make_activity(Category::Travel, "Walking", 0.0, today - Duration::days(2)),
            // Day 2: walking plus a car trip, not zero
            make_activity(Category::Travel, "Walking", 0.0, today - Duration::days(1)),
            make_activity(Category::Travel, "Car", 2.1, today - Duration::days(1)),
            // Day 3: no travel at all, does not count
            make_activity(Category::Food, "Vegan", 0.5, today),
        ];

        let stats = UserStats::from_activities(&activities, today, offset());
        assert_eq!(stats.zero_emission_days, 1);
    }

    #[test]
    fn test_streaks_flow_through() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let activities = vec![
            make_activity(Category::Food, "Vegan", 0.5, today - Duration::days(2)),
            make_activity(Category::Food, "Vegan", 0.5, today - Duration::days(1)),
            make_activity(Category::Food, "Vegan", 0.5, today),
        ];

        let stats = UserStats::from_activities(&activities, today, offset());
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.longest_streak, 3);
    }
}
