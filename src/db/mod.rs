//! Database layer (Firestore).

pub mod firestore;

pub use firestore::{ActivityQueryCursor, FirestoreDb};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const ACTIVITIES: &str = "activities";
    /// Cumulative XP documents (keyed by user_id)
    pub const PROGRESS: &str = "progress";
    /// Achievement unlocks (keyed by `{user_id}_{achievement_id}`)
    pub const ACHIEVEMENT_UNLOCKS: &str = "achievement_unlocks";
    /// Leaderboard entries (keyed by user_id)
    pub const LEADERBOARD: &str = "leaderboard";
    pub const CHALLENGES: &str = "challenges";
    /// Challenge memberships (keyed by `{challenge_id}_{user_id}`)
    pub const CHALLENGE_MEMBERS: &str = "challenge_members";
    /// Personal finance transactions
    pub const TRANSACTIONS: &str = "transactions";
}
