// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! EcoTrack API Server
//!
//! Logs eco-activities, estimates their CO₂ and financial impact, and
//! serves the gamification, analytics and community endpoints.

use ecotrack::{
    config::Config,
    db::FirestoreDb,
    services::{ActivityService, EnvironmentService, InsightsService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting EcoTrack API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Environmental signal client (grid intensity, fuel prices)
    let environment = EnvironmentService::new(&config);
    tracing::info!(
        enhanced = config.enhanced_estimates,
        region = %config.default_region,
        "Environmental signal service initialized"
    );

    // AI suggestion gateway
    let insights = InsightsService::new(&config);
    if config.ai_api_key.is_none() {
        tracing::warn!("AI_GATEWAY_KEY not set; suggestions endpoint will return 502");
    }

    // Activity logging orchestration
    let activity = ActivityService::new(&config, db.clone(), environment);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        activity,
        insights,
    });

    // Build router
    let app = ecotrack::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ecotrack=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
