// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI suggestion route.

use crate::engine::suggestions::RankedSuggestion;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::AppState;
use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/insights/suggestions", post(get_suggestions))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<RankedSuggestion>,
}

/// Personalized eco suggestions derived from the user's history.
///
/// Returns 502 when the AI gateway is unconfigured or unreachable; the
/// frontend falls back to its static tips in that case.
async fn get_suggestions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SuggestionsResponse>> {
    let activities = state.db.list_all_activities(&user.user_id).await?;
    let stats = state.activity.user_stats(&user.user_id).await?;

    let suggestions = state.insights.suggestions(&activities, &stats).await?;
    tracing::debug!(
        user_id = %user.user_id,
        count = suggestions.len(),
        "Returning AI suggestions"
    );

    Ok(Json(SuggestionsResponse { suggestions }))
}
