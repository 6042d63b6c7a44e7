// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Community routes: leaderboard and shared challenges.

use crate::engine::leaderboard;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{CommunityChallenge, LeaderboardEntry};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/community/leaderboard", get(get_leaderboard))
        .route("/api/community/challenges", get(get_challenges))
        .route(
            "/api/community/challenges/{id}/join",
            post(join_challenge),
        )
}

// ─── Leaderboard ─────────────────────────────────────────────

const DEFAULT_LEADERBOARD_SIZE: u32 = 20;
const MAX_LEADERBOARD_SIZE: u32 = 100;

#[derive(Deserialize)]
struct LeaderboardQuery {
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_LEADERBOARD_SIZE
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RankedLeaderboardEntry {
    /// 1-based display rank
    pub rank: u32,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeaderboardResponse {
    pub entries: Vec<RankedLeaderboardEntry>,
}

/// Top users by eco score.
async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthUser>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>> {
    let limit = params.limit.clamp(1, MAX_LEADERBOARD_SIZE);
    let mut entries = state.db.top_leaderboard(limit).await?;

    // The store orders by score alone; re-rank for a stable tie-break.
    leaderboard::rank(&mut entries);

    let entries = entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| RankedLeaderboardEntry {
            rank: i as u32 + 1,
            entry,
        })
        .collect();

    Ok(Json(LeaderboardResponse { entries }))
}

// ─── Community Challenges ────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ChallengesResponse {
    pub challenges: Vec<CommunityChallenge>,
}

/// Active community challenges, soonest deadline first.
async fn get_challenges(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthUser>,
) -> Result<Json<ChallengesResponse>> {
    let challenges = state.db.list_active_challenges(chrono::Utc::now()).await?;
    Ok(Json(ChallengesResponse { challenges }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct JoinChallengeResponse {
    /// False when the user was already a participant
    pub joined: bool,
    pub participants: u32,
}

/// Join a community challenge (idempotent).
async fn join_challenge(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(challenge_id): Path<String>,
) -> Result<Json<JoinChallengeResponse>> {
    // Reject unknown challenges before writing any membership record.
    state
        .db
        .get_challenge(&challenge_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Challenge {}", challenge_id)))?;

    let joined = state.db.join_challenge(&challenge_id, &user.user_id).await?;

    let participants = state
        .db
        .get_challenge(&challenge_id)
        .await?
        .map(|c| c.participants)
        .unwrap_or(0);

    Ok(Json(JoinChallengeResponse {
        joined,
        participants,
    }))
}
