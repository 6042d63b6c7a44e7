// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Analytics aggregation.
//!
//! Rolls the raw activity log into a dense daily series, per-category
//! breakdowns, week-over-week trends and simple linear projections. All
//! bucketing uses calendar days at the fixed application offset.

use std::collections::HashMap;

use chrono::{Duration, FixedOffset, NaiveDate};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{Activity, Category};
use crate::time_utils::local_day;

/// Eco score for one day: `count*10 + co2`.
fn eco_score(count: u32, co2: f64) -> f64 {
    count as f64 * 10.0 + co2
}

/// Percentage change with the explicit zero-previous convention.
fn pct_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

/// One day in the dense series. Days with no activity are zero-filled.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DailyPoint {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    pub activities: u32,
    pub co2: f64,
    pub money: f64,
    pub eco_score: f64,
}

/// Totals per category over the window.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub count: u32,
    pub co2: f64,
    pub cost: f64,
    pub avg_co2: f64,
    pub avg_cost: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeekTotals {
    pub activities: u32,
    pub co2: f64,
    pub money: f64,
    pub eco_score: f64,
}

/// Most recent 7 days vs the prior 7, as percentage changes.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeeklyTrend {
    pub current_week: WeekTotals,
    pub previous_week: WeekTotals,
    pub activities_change: f64,
    pub co2_change: f64,
    pub money_change: f64,
    pub eco_score_change: f64,
}

/// Linear projections from the mean of the last 7 days.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Projections {
    pub monthly_co2: f64,
    pub yearly_co2: f64,
    pub monthly_cost: f64,
    pub yearly_cost: f64,
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AnalyticsReport {
    /// Dense series, exactly `days` entries, ascending dates
    pub daily: Vec<DailyPoint>,
    pub categories: Vec<CategoryBreakdown>,
    pub weekly: WeeklyTrend,
    /// Withheld (not zero) with fewer than 7 active days in the window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projections: Option<Projections>,
}

/// Minimum distinct active days before projections are emitted.
const PROJECTION_MIN_ACTIVE_DAYS: usize = 7;

/// Build the analytics report for a window of `days` calendar days ending
/// at `today`.
pub fn report(
    activities: &[Activity],
    days: u32,
    today: NaiveDate,
    offset: FixedOffset,
) -> AnalyticsReport {
    let window_start = today - Duration::days(days as i64 - 1);

    // Bucket once; every section below reads from these.
    let mut by_day: HashMap<NaiveDate, WeekTotals> = HashMap::new();
    let mut by_category: HashMap<Category, (u32, f64, f64)> = HashMap::new();
    for activity in activities {
        let day = local_day(activity.created_at, offset);
        if day < window_start || day > today {
            continue;
        }
        let bucket = by_day.entry(day).or_default();
        bucket.activities += 1;
        bucket.co2 += activity.co2_impact;
        bucket.money += activity.financial_impact;

        let cat = by_category.entry(activity.category).or_insert((0, 0.0, 0.0));
        cat.0 += 1;
        cat.1 += activity.co2_impact;
        cat.2 += activity.financial_impact;
    }

    let daily: Vec<DailyPoint> = (0..days as i64)
        .map(|i| {
            let date = window_start + Duration::days(i);
            let bucket = by_day.get(&date).copied().unwrap_or_default();
            DailyPoint {
                date,
                activities: bucket.activities,
                co2: bucket.co2,
                money: bucket.money,
                eco_score: eco_score(bucket.activities, bucket.co2),
            }
        })
        .collect();

    let categories: Vec<CategoryBreakdown> = Category::ALL
        .iter()
        .filter_map(|category| {
            let (count, co2, cost) = by_category.get(category).copied()?;
            Some(CategoryBreakdown {
                category: *category,
                count,
                co2,
                cost,
                avg_co2: co2 / count as f64,
                avg_cost: cost / count as f64,
            })
        })
        .collect();

    let weekly = weekly_trend(activities, today, offset);

    // Projections use the mean of the last 7 days, gated on enough data in
    // the requested window.
    let active_days = by_day.len();
    let projections = if active_days >= PROJECTION_MIN_ACTIVE_DAYS {
        let week_start = today - Duration::days(6);
        let (week_co2, week_cost) = activities
            .iter()
            .filter(|a| {
                let day = local_day(a.created_at, offset);
                day >= week_start && day <= today
            })
            .fold((0.0, 0.0), |(c, m), a| {
                (c + a.co2_impact, m + a.financial_impact)
            });
        let avg_daily_co2 = week_co2 / 7.0;
        let avg_daily_cost = week_cost / 7.0;
        Some(Projections {
            monthly_co2: avg_daily_co2 * 30.0,
            yearly_co2: avg_daily_co2 * 365.0,
            monthly_cost: avg_daily_cost * 30.0,
            yearly_cost: avg_daily_cost * 365.0,
        })
    } else {
        None
    };

    AnalyticsReport {
        daily,
        categories,
        weekly,
        projections,
    }
}

fn week_totals(
    activities: &[Activity],
    start: NaiveDate,
    end: NaiveDate,
    offset: FixedOffset,
) -> WeekTotals {
    let mut totals = WeekTotals::default();
    for activity in activities {
        let day = local_day(activity.created_at, offset);
        if day >= start && day <= end {
            totals.activities += 1;
            totals.co2 += activity.co2_impact;
            totals.money += activity.financial_impact;
        }
    }
    totals.eco_score = eco_score(totals.activities, totals.co2);
    totals
}

fn weekly_trend(activities: &[Activity], today: NaiveDate, offset: FixedOffset) -> WeeklyTrend {
    let current_start = today - Duration::days(6);
    let previous_end = current_start - Duration::days(1);
    let previous_start = previous_end - Duration::days(6);

    let current_week = week_totals(activities, current_start, today, offset);
    let previous_week = week_totals(activities, previous_start, previous_end, offset);

    WeeklyTrend {
        activities_change: pct_change(
            current_week.activities as f64,
            previous_week.activities as f64,
        ),
        co2_change: pct_change(current_week.co2, previous_week.co2),
        money_change: pct_change(current_week.money, previous_week.money),
        eco_score_change: pct_change(current_week.eco_score, previous_week.eco_score),
        current_week,
        previous_week,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(330 * 60).unwrap()
    }

    fn make_activity(category: Category, co2: f64, money: f64, day: NaiveDate) -> Activity {
        Activity {
            id: format!("a-{day}-{co2}"),
            user_id: "u1".to_string(),
            category,
            activity_type: "Car".to_string(),
            amount: 1.0,
            co2_impact: co2,
            financial_impact: money,
            created_at: Utc.from_utc_datetime(&day.and_hms_opt(6, 30, 0).unwrap()),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    #[test]
    fn test_series_is_dense_and_sorted() {
        let activities = vec![
            make_activity(Category::Travel, 2.0, 10.0, today()),
            make_activity(Category::Food, 1.0, 5.0, today() - Duration::days(3)),
        ];
        let report = report(&activities, 14, today(), offset());

        assert_eq!(report.daily.len(), 14);
        for pair in report.daily.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
        assert_eq!(report.daily.last().unwrap().date, today());
    }

    #[test]
    fn test_series_totals_match_direct_aggregate() {
        let activities = vec![
            make_activity(Category::Travel, 2.0, 10.0, today()),
            make_activity(Category::Travel, 3.0, 15.0, today()),
            make_activity(Category::Energy, 1.0, 6.0, today() - Duration::days(5)),
        ];
        let report = report(&activities, 7, today(), offset());

        let series_co2: f64 = report.daily.iter().map(|d| d.co2).sum();
        let series_count: u32 = report.daily.iter().map(|d| d.activities).sum();
        assert!((series_co2 - 6.0).abs() < 1e-9);
        assert_eq!(series_count, 3);
    }

    #[test]
    fn test_window_excludes_older_activity() {
        let activities = vec![
            make_activity(Category::Travel, 2.0, 10.0, today()),
            make_activity(Category::Travel, 9.0, 90.0, today() - Duration::days(10)),
        ];
        let report = report(&activities, 7, today(), offset());
        let series_co2: f64 = report.daily.iter().map(|d| d.co2).sum();
        assert!((series_co2 - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_category_breakdown_averages() {
        let activities = vec![
            make_activity(Category::Travel, 2.0, 10.0, today()),
            make_activity(Category::Travel, 4.0, 30.0, today() - Duration::days(1)),
        ];
        let report = report(&activities, 30, today(), offset());

        assert_eq!(report.categories.len(), 1);
        let travel = &report.categories[0];
        assert_eq!(travel.count, 2);
        assert!((travel.avg_co2 - 3.0).abs() < 1e-9);
        assert!((travel.avg_cost - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_previous_week_change_is_zero() {
        // All activity in the current week, none in the prior one.
        let activities = vec![make_activity(Category::Travel, 5.0, 10.0, today())];
        let report = report(&activities, 30, today(), offset());

        assert_eq!(report.weekly.previous_week.co2, 0.0);
        assert!((report.weekly.current_week.co2 - 5.0).abs() < 1e-9);
        assert_eq!(report.weekly.co2_change, 0.0);
    }

    #[test]
    fn test_week_over_week_percentage() {
        let activities = vec![
            make_activity(Category::Travel, 4.0, 0.0, today()),
            make_activity(Category::Travel, 2.0, 0.0, today() - Duration::days(8)),
        ];
        let report = report(&activities, 30, today(), offset());
        assert!((report.weekly.co2_change - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_projections_withheld_below_seven_active_days() {
        let activities: Vec<Activity> = (0..6)
            .map(|i| make_activity(Category::Travel, 1.0, 2.0, today() - Duration::days(i)))
            .collect();
        let report = report(&activities, 30, today(), offset());
        assert!(report.projections.is_none());
    }

    #[test]
    fn test_projections_from_last_week_average() {
        let activities: Vec<Activity> = (0..7)
            .map(|i| make_activity(Category::Travel, 7.0, 14.0, today() - Duration::days(i)))
            .collect();
        let report = report(&activities, 30, today(), offset());

        let projections = report.projections.expect("seven active days");
        // avg daily co2 = 49/7 = 7
        assert!((projections.monthly_co2 - 210.0).abs() < 1e-6);
        assert!((projections.yearly_co2 - 2555.0).abs() < 1e-6);
        assert!((projections.monthly_cost - 420.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_history() {
        let report = report(&[], 7, today(), offset());
        assert_eq!(report.daily.len(), 7);
        assert!(report.daily.iter().all(|d| d.activities == 0));
        assert!(report.categories.is_empty());
        assert!(report.projections.is_none());
        assert_eq!(report.weekly.co2_change, 0.0);
    }
}
