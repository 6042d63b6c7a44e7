// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The impact estimation and gamification engine.
//!
//! Every module here is a pure computation over data supplied by the caller:
//! no I/O, no clocks, no hidden state. Signal fetching, persistence and
//! timeouts live in the service layer; the engine only ever sees snapshots.

pub mod achievements;
pub mod analytics;
pub mod challenges;
pub mod impact;
pub mod leaderboard;
pub mod levels;
pub mod streak;
pub mod suggestions;
