// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity logging, history and stats routes.

use crate::db::firestore::ActivityQueryCursor;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Activity, Category, LogActivityRequest, UserStats};
use crate::services::LogActivityResponse;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(get_activities).post(log_activity))
        .route("/api/stats", get(get_stats))
}

// ─── Logging ─────────────────────────────────────────────────

/// Log an eco-activity and apply its gamification consequences.
async fn log_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<LogActivityRequest>,
) -> Result<Json<LogActivityResponse>> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let response = state.activity.log_activity(&user.user_id, request).await?;
    Ok(Json(response))
}

// ─── History ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct ActivitiesQuery {
    /// Filter by category
    category: Option<Category>,
    /// Filter by logged-after date (RFC3339)
    after: Option<String>,
    /// Cursor for forward pagination (opaque token).
    cursor: Option<String>,
    /// Pagination: items per page
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_per_page() -> u32 {
    50
}

const MAX_PER_PAGE: u32 = 100;
const CURSOR_PARTS: usize = 3;

fn parse_after_timestamp(after: Option<&str>) -> Result<Option<chrono::DateTime<chrono::Utc>>> {
    after
        .map(|raw| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .map_err(|_| {
                    AppError::BadRequest(
                        "Invalid 'after' parameter: must be RFC3339 datetime".to_string(),
                    )
                })
        })
        .transpose()
}

fn parse_cursor(cursor: Option<&str>) -> Result<Option<ActivityQueryCursor>> {
    cursor
        .map(|raw| {
            let invalid_cursor =
                || AppError::BadRequest("Invalid 'cursor' parameter".to_string());

            let decoded = URL_SAFE_NO_PAD.decode(raw).map_err(|_| invalid_cursor())?;
            let decoded_str = std::str::from_utf8(&decoded).map_err(|_| invalid_cursor())?;

            let parts: Vec<&str> = decoded_str.splitn(CURSOR_PARTS, ':').collect();
            if parts.len() != CURSOR_PARTS || parts[2].is_empty() {
                return Err(invalid_cursor());
            }

            let seconds = parts[0].parse::<i64>().map_err(|_| invalid_cursor())?;
            let nanos = parts[1].parse::<u32>().map_err(|_| invalid_cursor())?;
            let created_at =
                chrono::DateTime::from_timestamp(seconds, nanos).ok_or_else(invalid_cursor)?;

            Ok(ActivityQueryCursor {
                created_at,
                activity_id: parts[2].to_string(),
            })
        })
        .transpose()
}

fn encode_cursor(cursor: ActivityQueryCursor) -> String {
    let payload = format!(
        "{}:{}:{}",
        cursor.created_at.timestamp(),
        cursor.created_at.timestamp_subsec_nanos(),
        cursor.activity_id
    );
    URL_SAFE_NO_PAD.encode(payload)
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivitiesResponse {
    pub activities: Vec<Activity>,
    pub per_page: u32,
    pub next_cursor: Option<String>,
}

/// Get the user's activity log, newest first.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<ActivitiesResponse>> {
    tracing::debug!(
        user_id = %user.user_id,
        category = ?params.category,
        after = ?params.after,
        cursor = ?params.cursor,
        "Fetching activities"
    );

    let limit = params.per_page.clamp(1, MAX_PER_PAGE);
    let after_timestamp = parse_after_timestamp(params.after.as_deref())?;
    let cursor = parse_cursor(params.cursor.as_deref())?;

    // Fetch one extra item to determine if another page is available.
    let fetch_limit = limit.saturating_add(1);
    let mut results = state
        .db
        .list_activities(
            &user.user_id,
            params.category,
            after_timestamp,
            cursor,
            fetch_limit,
        )
        .await?;

    let has_more = results.len() > limit as usize;
    if has_more {
        results.truncate(limit as usize);
    }

    let next_cursor = if has_more {
        results.last().map(|a| {
            encode_cursor(ActivityQueryCursor {
                created_at: a.created_at,
                activity_id: a.id.clone(),
            })
        })
    } else {
        None
    };

    Ok(Json(ActivitiesResponse {
        activities: results,
        per_page: limit,
        next_cursor,
    }))
}

// ─── Stats ───────────────────────────────────────────────────

/// Derived stats over the full history.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserStats>> {
    let stats = state.activity.user_stats(&user.user_id).await?;
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_round_trip() {
        let cursor = ActivityQueryCursor {
            created_at: chrono::DateTime::from_timestamp(1_704_103_200, 123).unwrap(),
            activity_id: "9f6c1c9e-6a9a-4a0a-8a5a-d5b3f3b7a001".to_string(),
        };

        let encoded = encode_cursor(cursor.clone());
        let decoded = parse_cursor(Some(&encoded)).unwrap().unwrap();

        assert_eq!(decoded.created_at, cursor.created_at);
        assert_eq!(decoded.activity_id, cursor.activity_id);
    }

    #[test]
    fn test_cursor_rejects_invalid_input() {
        let err = parse_cursor(Some("not-base64")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let truncated = URL_SAFE_NO_PAD.encode("12345:0");
        let err = parse_cursor(Some(&truncated)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_after_must_be_rfc3339() {
        assert!(parse_after_timestamp(Some("2026-03-15T00:00:00Z")).is_ok());
        assert!(parse_after_timestamp(Some("yesterday")).is_err());
        assert!(parse_after_timestamp(None).unwrap().is_none());
    }
}
