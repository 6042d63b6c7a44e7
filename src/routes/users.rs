// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{UpdateProfileRequest, UserProfile};
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use chrono::Utc;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/me", get(get_me).put(update_me))
}

/// Get the current user's profile, creating a blank one on first access.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    if let Some(mut profile) = state.db.get_user(&user.user_id).await? {
        profile.last_active = Utc::now();
        state.db.upsert_user(&profile).await?;
        return Ok(Json(profile));
    }

    // First request from this subject: materialize a profile so region
    // and display name have a place to live.
    let now = Utc::now();
    let profile = UserProfile {
        user_id: user.user_id.clone(),
        display_name: None,
        email: None,
        region: None,
        created_at: now,
        last_active: now,
    };
    state.db.upsert_user(&profile).await?;
    tracing::info!(user_id = %user.user_id, "Created user profile");

    Ok(Json(profile))
}

/// Update display name and/or region.
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", user.user_id)))?;

    if let Some(display_name) = request.display_name {
        profile.display_name = Some(display_name);
    }
    if let Some(region) = request.region {
        profile.region = Some(region);
    }
    profile.last_active = Utc::now();

    state.db.upsert_user(&profile).await?;
    Ok(Json(profile))
}
