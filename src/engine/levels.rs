// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! XP awards and the level ladder.
//!
//! The ladder is static configuration ordered ascending by threshold; the
//! XP formula weights are behavioral constants kept tunable in one place.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One rung of the level ladder.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Level {
    pub level: u32,
    pub title: &'static str,
    /// Cumulative XP required to reach this level
    pub xp_threshold: u64,
    pub benefits: &'static [&'static str],
    pub icon: &'static str,
}

/// The fixed ladder, ending at a terminal max level.
pub const LEVELS: [Level; 10] = [
    Level { level: 1, title: "Eco Novice", xp_threshold: 0, benefits: &["Basic tracking"], icon: "🌱" },
    Level { level: 2, title: "Green Explorer", xp_threshold: 100, benefits: &["AI suggestions"], icon: "🌿" },
    Level { level: 3, title: "Sustainability Seeker", xp_threshold: 300, benefits: &["Advanced analytics"], icon: "🍃" },
    Level { level: 4, title: "Climate Champion", xp_threshold: 700, benefits: &["Community features"], icon: "🌳" },
    Level { level: 5, title: "Carbon Ninja", xp_threshold: 1300, benefits: &["Premium insights"], icon: "🥷" },
    Level { level: 6, title: "Eco Warrior", xp_threshold: 2100, benefits: &["Leadership board"], icon: "⚔️" },
    Level { level: 7, title: "Planet Protector", xp_threshold: 3100, benefits: &["Custom goals"], icon: "🛡️" },
    Level { level: 8, title: "Green Guru", xp_threshold: 4300, benefits: &["Mentor status"], icon: "🧘" },
    Level { level: 9, title: "Sustainability Sage", xp_threshold: 5800, benefits: &["Expert insights"], icon: "🧙‍♂️" },
    Level { level: 10, title: "Earth Guardian", xp_threshold: 7800, benefits: &["Ultimate status"], icon: "🌍" },
];

// XP formula weights. Tunable configuration, not physics.
pub const BASE_XP: f64 = 10.0;
pub const CO2_BONUS_PER_KG: f64 = 2.0;
pub const COST_BONUS_PER_RUPEE: f64 = 0.01;

/// Base XP for an activity's impact, before the streak multiplier.
pub fn xp_for_impact(co2_impact: f64, financial_impact: f64) -> u64 {
    let raw = BASE_XP
        + CO2_BONUS_PER_KG * co2_impact.max(0.0)
        + COST_BONUS_PER_RUPEE * financial_impact.max(0.0);
    raw.floor() as u64
}

/// Final XP award: base XP scaled by the streak multiplier, truncated.
pub fn award_xp(co2_impact: f64, financial_impact: f64, multiplier: f64) -> u64 {
    (xp_for_impact(co2_impact, financial_impact) as f64 * multiplier).floor() as u64
}

/// Highest ladder rung whose threshold is within the XP total.
pub fn level_for_xp(total_xp: u64) -> &'static Level {
    LEVELS
        .iter()
        .rev()
        .find(|l| l.xp_threshold <= total_xp)
        .unwrap_or(&LEVELS[0])
}

/// The rung after the current one, or `None` at the terminal level.
pub fn next_level(total_xp: u64) -> Option<&'static Level> {
    let current = level_for_xp(total_xp);
    LEVELS.iter().find(|l| l.level == current.level + 1)
}

/// Progress toward the next level as a percentage, 100 at the terminal
/// level.
pub fn progress_percent(total_xp: u64) -> f64 {
    let current = level_for_xp(total_xp);
    match next_level(total_xp) {
        Some(next) => {
            let span = (next.xp_threshold - current.xp_threshold) as f64;
            let into = (total_xp - current.xp_threshold) as f64;
            (into / span * 100.0).clamp(0.0, 100.0)
        }
        None => 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladder_is_ascending() {
        for pair in LEVELS.windows(2) {
            assert!(pair[0].xp_threshold < pair[1].xp_threshold);
            assert_eq!(pair[0].level + 1, pair[1].level);
        }
    }

    #[test]
    fn test_level_650_xp() {
        // 650 XP against [0, 100, 300, 700, ...]
        let current = level_for_xp(650);
        assert_eq!(current.level, 3);
        let next = next_level(650).unwrap();
        assert_eq!(next.level, 4);
        assert!((progress_percent(650) - 87.5).abs() < 1e-9);
    }

    #[test]
    fn test_level_at_exact_threshold() {
        assert_eq!(level_for_xp(0).level, 1);
        assert_eq!(level_for_xp(100).level, 2);
        assert_eq!(level_for_xp(99).level, 1);
    }

    #[test]
    fn test_terminal_level_has_no_next() {
        assert_eq!(level_for_xp(7800).level, 10);
        assert!(next_level(7800).is_none());
        assert_eq!(progress_percent(1_000_000), 100.0);
    }

    #[test]
    fn test_level_monotonic_in_xp() {
        let mut prev = 0;
        for xp in (0..10_000).step_by(37) {
            let level = level_for_xp(xp).level;
            assert!(level >= prev);
            prev = level;
        }
    }

    #[test]
    fn test_xp_formula() {
        // base 10 + 2*2.1 + 0.01*80 = 15.0
        assert_eq!(xp_for_impact(2.1, 80.0), 15);
        // Negative impacts never reduce below base.
        assert_eq!(xp_for_impact(-5.0, -100.0), 10);
    }

    #[test]
    fn test_award_applies_multiplier_then_floors() {
        // floor(15 * 1.5) = 22
        assert_eq!(award_xp(2.1, 80.0, 1.5), 22);
        assert_eq!(award_xp(2.1, 80.0, 1.0), 15);
        assert_eq!(award_xp(2.1, 80.0, 3.0), 45);
    }
}
