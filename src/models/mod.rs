// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod finance;
pub mod gamification;
pub mod stats;
pub mod user;

pub use activity::{Activity, Category, LogActivityRequest};
pub use finance::{FinanceSummary, NewTransactionRequest, Transaction, TransactionKind};
pub use gamification::{
    AchievementUnlock, ChallengeMembership, CommunityChallenge, LeaderboardEntry, UserProgress,
};
pub use stats::UserStats;
pub use user::{UpdateProfileRequest, UserProfile};
