// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Personal finance tracker models.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Income or expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// Stored financial transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Transaction {
    /// Generated UUID (also used as document ID)
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub description: Option<String>,
    /// Amount in ₹, always positive; the kind carries the sign
    pub amount: f64,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub occurred_at: DateTime<Utc>,
}

/// Request body for recording a transaction.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewTransactionRequest {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[validate(length(min = 1, max = 40))]
    pub category: String,
    #[validate(length(max = 200))]
    pub description: Option<String>,
    #[validate(range(min = 0.01))]
    pub amount: f64,
}

/// Aggregated finance view for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FinanceSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    /// Lifetime financial impact avoided via logged eco activities (₹)
    pub total_eco_savings: f64,
    /// `income - expenses + eco savings`
    pub net_savings: f64,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub monthly_eco_savings: f64,
    /// Expense totals per category, all time
    pub category_spending: HashMap<String, f64>,
}
