// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Analytics route: daily series, category breakdown, weekly trend and
//! projections over a fixed set of window sizes.

use crate::engine::analytics::{self, AnalyticsReport};
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::time_utils::today;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/analytics", get(get_analytics))
}

/// Window sizes the frontend can request.
const ALLOWED_WINDOWS: [u32; 4] = [7, 30, 90, 365];

#[derive(Deserialize)]
struct AnalyticsQuery {
    #[serde(default = "default_days")]
    days: u32,
}

fn default_days() -> u32 {
    30
}

/// Analytics report over the trailing `days` window.
async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsReport>> {
    if !ALLOWED_WINDOWS.contains(&params.days) {
        return Err(AppError::BadRequest(format!(
            "Invalid 'days' parameter: must be one of {:?}",
            ALLOWED_WINDOWS
        )));
    }

    let activities = state.db.list_all_activities(&user.user_id).await?;
    let offset = state.activity.offset();
    let report = analytics::report(&activities, params.days, today(offset), offset);
    Ok(Json(report))
}
