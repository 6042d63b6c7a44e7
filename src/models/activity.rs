// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Activity category. The set is closed; each category carries its own
/// enumeration of activity types and factor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Travel,
    Food,
    Shopping,
    Energy,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 4] = [
        Category::Travel,
        Category::Food,
        Category::Shopping,
        Category::Energy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Travel => "travel",
            Category::Food => "food",
            Category::Shopping => "shopping",
            Category::Energy => "energy",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored activity record in Firestore.
///
/// Impacts are computed once when the activity is logged and never
/// recomputed, even if factor tables change later.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Activity {
    /// Generated UUID (also used as document ID)
    pub id: String,
    /// Owning user ID (JWT subject)
    pub user_id: String,
    /// Activity category
    pub category: Category,
    /// Activity type within the category (validated against the factor tables)
    pub activity_type: String,
    /// Quantity in the category's unit (km, meals, items, kWh)
    pub amount: f64,
    /// CO₂ impact in kg
    pub co2_impact: f64,
    /// Financial impact in ₹
    pub financial_impact: f64,
    /// When the activity was logged; all calendar bucketing uses this.
    /// Fixed-precision so pagination bounds compare exactly against it.
    #[serde(with = "crate::time_utils::rfc3339_nanos")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
}

/// Request body for logging an activity.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LogActivityRequest {
    pub category: Category,
    #[validate(length(min = 1, max = 64))]
    pub activity_type: String,
    #[validate(range(min = 0.0))]
    pub amount: f64,
}
