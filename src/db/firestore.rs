// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile storage)
//! - Activities (append-only eco-activity log)
//! - Progress (cumulative XP, read-modify-write in transactions)
//! - Achievement unlocks (create-only, at-most-once per user/achievement)
//! - Leaderboard entries, community challenges, finance transactions

use chrono::{DateTime, Utc};

use crate::db::collections;
use crate::error::AppError;
use crate::models::{
    AchievementUnlock, Activity, Category, ChallengeMembership, CommunityChallenge,
    LeaderboardEntry, Transaction, UserProfile, UserProgress,
};
use crate::time_utils::format_utc_nanos;

/// Cursor for forward pagination over the activity log.
#[derive(Debug, Clone)]
pub struct ActivityQueryCursor {
    pub created_at: DateTime<Utc>,
    pub activity_id: String,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing async-trait
        // or a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user profile by auth subject.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user profile.
    pub async fn upsert_user(&self, user: &UserProfile) -> Result<(), AppError> {
        #[allow(clippy::let_unit_value)]
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.user_id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Activity Operations ─────────────────────────────────────

    /// Get the full activity history for a user, ascending by time.
    ///
    /// Streaks, stats and analytics all derive from this snapshot.
    pub async fn list_all_activities(&self, user_id: &str) -> Result<Vec<Activity>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .filter(move |q| q.field("user_id").eq(user_id.clone()))
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List activities for a user, newest first, with cursor pagination and
    /// optional category/after filters.
    pub async fn list_activities(
        &self,
        user_id: &str,
        category: Option<Category>,
        after: Option<DateTime<Utc>>,
        cursor: Option<ActivityQueryCursor>,
        limit: u32,
    ) -> Result<Vec<Activity>, AppError> {
        let user_id = user_id.to_string();
        // Bounds must use the exact format `created_at` is stored in
        // (fixed nanosecond precision); a truncated bound would compare
        // against the fractional stored string at the wrong offset and
        // re-match the cursor's own row.
        let after_str = after.map(format_utc_nanos);
        let cursor_str = cursor.map(|c| format_utc_nanos(c.created_at));
        let category_str = category.map(|c| c.as_str().to_string());

        self.get_client()?
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .filter(move |q| {
                let mut clauses = vec![q.field("user_id").eq(user_id.clone())];
                if let Some(cat) = &category_str {
                    clauses.push(q.field("category").eq(cat.clone()));
                }
                if let Some(after) = &after_str {
                    clauses.push(q.field("created_at").greater_than(after.clone()));
                }
                if let Some(before) = &cursor_str {
                    clauses.push(q.field("created_at").less_than(before.clone()));
                }
                q.for_all(clauses)
            })
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Progress Operations ─────────────────────────────────────

    /// Get the cumulative XP document for a user.
    pub async fn get_progress(&self, user_id: &str) -> Result<Option<UserProgress>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROGRESS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Atomically append an activity and credit its XP.
    ///
    /// The two writes commit together in a transaction. The progress read
    /// is a plain snapshot read, not attached to the transaction, so two
    /// concurrent logs for the same user can read the same total and the
    /// later commit wins; each request logs at most one activity, so the
    /// activity itself is never lost, only a concurrent XP delta.
    ///
    /// Returns the new cumulative XP total.
    pub async fn log_activity_atomic(
        &self,
        activity: &Activity,
        xp_delta: u64,
    ) -> Result<u64, AppError> {
        let user_id = activity.user_id.clone();

        let mut transaction = self
            .get_client()?
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // Snapshot read; see the method docs for the concurrency caveat.
        let current: Option<UserProgress> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROGRESS)
            .obj()
            .one(&user_id)
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to read progress in transaction: {}", e))
            })?;

        let mut progress = current.unwrap_or_else(|| UserProgress::new(&user_id));
        progress.total_xp += xp_delta;
        progress.updated_at = Utc::now();

        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::ACTIVITIES)
            .document_id(&activity.id)
            .object(activity)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add activity to transaction: {}", e))
            })?;

        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::PROGRESS)
            .document_id(&user_id)
            .object(&progress)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add progress to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(
            user_id = %user_id,
            activity_id = %activity.id,
            xp_delta,
            total_xp = progress.total_xp,
            "Activity logged atomically"
        );

        Ok(progress.total_xp)
    }

    /// Credit XP (e.g. achievement rewards) read-modify-write.
    ///
    /// Returns the new cumulative total.
    pub async fn add_xp(&self, user_id: &str, xp_delta: u64) -> Result<u64, AppError> {
        let mut transaction = self
            .get_client()?
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let current: Option<UserProgress> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROGRESS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to read progress in transaction: {}", e))
            })?;

        let mut progress = current.unwrap_or_else(|| UserProgress::new(user_id));
        progress.total_xp += xp_delta;
        progress.updated_at = Utc::now();

        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::PROGRESS)
            .document_id(user_id)
            .object(&progress)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add progress to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        Ok(progress.total_xp)
    }

    // ─── Achievement Unlock Operations ───────────────────────────

    /// Record an achievement unlock, at most once per (user, achievement).
    ///
    /// Uses a create-only insert against the `{user_id}_{achievement_id}`
    /// document id; a conflict means the unlock already exists and is
    /// treated as a no-op success.
    ///
    /// Returns `true` if the unlock was newly recorded.
    pub async fn record_unlock(&self, unlock: &AchievementUnlock) -> Result<bool, AppError> {
        let result = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::ACHIEVEMENT_UNLOCKS)
            .document_id(unlock.doc_id())
            .object(unlock)
            .execute::<()>()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(firestore::errors::FirestoreError::DataConflictError(_)) => {
                tracing::debug!(
                    user_id = %unlock.user_id,
                    achievement_id = %unlock.achievement_id,
                    "Achievement already unlocked (idempotent skip)"
                );
                Ok(false)
            }
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// All unlock records for a user.
    pub async fn list_unlocks(&self, user_id: &str) -> Result<Vec<AchievementUnlock>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ACHIEVEMENT_UNLOCKS)
            .filter(move |q| q.field("user_id").eq(user_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Leaderboard Operations ──────────────────────────────────

    /// Refresh a user's leaderboard entry.
    pub async fn upsert_leaderboard_entry(
        &self,
        entry: &LeaderboardEntry,
    ) -> Result<(), AppError> {
        #[allow(clippy::let_unit_value)]
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::LEADERBOARD)
            .document_id(&entry.user_id)
            .object(entry)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Top leaderboard entries by score. Ties are resolved in memory by
    /// the caller via `engine::leaderboard::rank`.
    pub async fn top_leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::LEADERBOARD)
            .order_by([("score", firestore::FirestoreQueryDirection::Descending)])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Community Challenge Operations ──────────────────────────

    /// Active community challenges (end date in the future).
    pub async fn list_active_challenges(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<CommunityChallenge>, AppError> {
        let now_str = format_utc_nanos(now);
        self.get_client()?
            .fluent()
            .select()
            .from(collections::CHALLENGES)
            .filter(move |q| q.field("ends_at").greater_than(now_str.clone()))
            .order_by([("ends_at", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace a community challenge (admin/seeding path).
    pub async fn upsert_challenge(&self, challenge: &CommunityChallenge) -> Result<(), AppError> {
        #[allow(clippy::let_unit_value)]
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::CHALLENGES)
            .document_id(&challenge.id)
            .object(challenge)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn get_challenge(
        &self,
        challenge_id: &str,
    ) -> Result<Option<CommunityChallenge>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::CHALLENGES)
            .obj()
            .one(challenge_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Join a community challenge.
    ///
    /// The membership record is create-only (idempotent joins); the
    /// participant count is bumped only when the membership is new. The
    /// count read is a snapshot read, so simultaneous first-time joins can
    /// race and undercount; the membership records stay exact either way.
    ///
    /// Returns `true` if the user newly joined.
    pub async fn join_challenge(
        &self,
        challenge_id: &str,
        user_id: &str,
    ) -> Result<bool, AppError> {
        let membership = ChallengeMembership {
            challenge_id: challenge_id.to_string(),
            user_id: user_id.to_string(),
            joined_at: Utc::now(),
        };

        let result = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::CHALLENGE_MEMBERS)
            .document_id(membership.doc_id())
            .object(&membership)
            .execute::<()>()
            .await;

        match result {
            Ok(_) => {}
            Err(firestore::errors::FirestoreError::DataConflictError(_)) => {
                return Ok(false);
            }
            Err(e) => return Err(AppError::Database(e.to_string())),
        }

        let mut transaction = self
            .get_client()?
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let mut challenge = self
            .get_challenge(challenge_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Challenge {}", challenge_id)))?;
        challenge.participants += 1;

        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::CHALLENGES)
            .document_id(challenge_id)
            .object(&challenge)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add challenge to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(challenge_id, user_id, "Joined community challenge");
        Ok(true)
    }

    // ─── Finance Operations ──────────────────────────────────────

    /// Store a finance transaction.
    pub async fn insert_transaction(&self, tx: &Transaction) -> Result<(), AppError> {
        #[allow(clippy::let_unit_value)]
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::TRANSACTIONS)
            .document_id(&tx.id)
            .object(tx)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// All finance transactions for a user, newest first.
    pub async fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::TRANSACTIONS)
            .filter(move |q| q.field("user_id").eq(user_id.clone()))
            .order_by([(
                "occurred_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
