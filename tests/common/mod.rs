// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use ecotrack::config::Config;
use ecotrack::db::FirestoreDb;
use ecotrack::routes::create_router;
use ecotrack::services::{ActivityService, EnvironmentService, InsightsService};
use ecotrack::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a signed JWT for a test user.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    ecotrack::middleware::auth::create_jwt(user_id, signing_key).expect("Failed to sign test JWT")
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(test_db_offline())
}

/// Create a test app over a specific database (mock or emulator).
#[allow(dead_code)]
pub fn create_test_app_with(db: FirestoreDb) -> (axum::Router, Arc<AppState>) {
    let config = Config::default();
    let environment = EnvironmentService::new(&config);
    let insights = InsightsService::new(&config);
    let activity = ActivityService::new(&config, db.clone(), environment);

    let state = Arc::new(AppState {
        config,
        db,
        activity,
        insights,
    });

    (create_router(state.clone()), state)
}
