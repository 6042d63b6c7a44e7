//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Auth subject (also used as document ID)
    pub user_id: String,
    /// Display name shown on leaderboards
    pub display_name: Option<String>,
    /// Email address (may be None if not shared)
    pub email: Option<String>,
    /// Region used for environmental signal lookups
    pub region: Option<String>,
    /// When the user first appeared
    pub created_at: DateTime<Utc>,
    /// Last activity timestamp
    pub last_active: DateTime<Utc>,
}

/// Request body for profile updates.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 80))]
    pub display_name: Option<String>,
    #[validate(length(min = 2, max = 40))]
    pub region: Option<String>,
}
