// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Consecutive-day streak calculation.
//!
//! Timestamps are normalized to calendar days at the fixed application
//! offset before any counting, so the streak never depends on where the
//! server happens to run.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::time_utils::local_day;

/// Result of a streak computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StreakSummary {
    /// Consecutive active days ending today or yesterday
    pub current: u32,
    /// Longest consecutive run anywhere in history
    pub longest: u32,
    /// XP multiplier derived from `current`
    pub multiplier: f64,
}

impl StreakSummary {
    pub const NONE: StreakSummary = StreakSummary {
        current: 0,
        longest: 0,
        multiplier: 1.0,
    };
}

/// XP multiplier for a current streak length.
///
/// The steps scale XP awards only; raw CO₂/cost figures are never
/// multiplied.
pub fn multiplier_for(current: u32) -> f64 {
    match current {
        n if n >= 30 => 3.0,
        n if n >= 14 => 2.5,
        n if n >= 7 => 2.0,
        n if n >= 3 => 1.5,
        _ => 1.0,
    }
}

/// Compute streaks from raw activity timestamps.
pub fn compute_streak(
    timestamps: &[DateTime<Utc>],
    today: NaiveDate,
    offset: FixedOffset,
) -> StreakSummary {
    let days: Vec<NaiveDate> = timestamps.iter().map(|ts| local_day(*ts, offset)).collect();
    compute_streak_for_days(&days, today)
}

/// Compute streaks from already-normalized calendar days.
///
/// Duplicate days are fine; only distinct days count.
pub fn compute_streak_for_days(days: &[NaiveDate], today: NaiveDate) -> StreakSummary {
    let active: BTreeSet<NaiveDate> = days.iter().copied().collect();
    if active.is_empty() {
        return StreakSummary::NONE;
    }

    // Longest run across all of history.
    let mut longest: u32 = 0;
    let mut run: u32 = 0;
    let mut prev: Option<NaiveDate> = None;
    for day in &active {
        run = match prev {
            Some(p) if *day - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(*day);
    }

    // Current streak anchors at today, or yesterday if today has no
    // activity yet. Anything older means the streak is broken.
    let yesterday = today - Duration::days(1);
    let anchor = if active.contains(&today) {
        Some(today)
    } else if active.contains(&yesterday) {
        Some(yesterday)
    } else {
        None
    };

    let mut current: u32 = 0;
    if let Some(mut day) = anchor {
        while active.contains(&day) {
            current += 1;
            day -= Duration::days(1);
        }
    }

    StreakSummary {
        current,
        longest: longest.max(current),
        multiplier: multiplier_for(current),
    }
}
