// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Personal finance routes: transactions and the combined summary.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{FinanceSummary, NewTransactionRequest, Transaction, TransactionKind};
use crate::time_utils::{local_day, today};
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use chrono::{Datelike, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/finance/transactions",
            get(get_transactions).post(add_transaction),
        )
        .route("/api/finance/summary", get(get_summary))
}

/// Record an income or expense transaction.
async fn add_transaction(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<NewTransactionRequest>,
) -> Result<Json<Transaction>> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let tx = Transaction {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.user_id.clone(),
        kind: request.kind,
        category: request.category,
        description: request.description,
        amount: request.amount,
        occurred_at: Utc::now(),
    };

    state.db.insert_transaction(&tx).await?;
    Ok(Json(tx))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
}

/// The user's transactions, newest first.
async fn get_transactions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TransactionsResponse>> {
    let transactions = state.db.list_transactions(&user.user_id).await?;
    Ok(Json(TransactionsResponse { transactions }))
}

/// Combined finance summary: manual transactions plus eco savings derived
/// from the activity log. Monthly figures cover the current calendar
/// month at the application offset.
async fn get_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<FinanceSummary>> {
    let transactions = state.db.list_transactions(&user.user_id).await?;
    let activities = state.db.list_all_activities(&user.user_id).await?;

    let offset = state.activity.offset();
    let today = today(offset);
    let in_current_month = |ts: chrono::DateTime<Utc>| {
        let day = local_day(ts, offset);
        day.year() == today.year() && day.month() == today.month()
    };

    let mut summary = FinanceSummary {
        total_income: 0.0,
        total_expenses: 0.0,
        total_eco_savings: 0.0,
        net_savings: 0.0,
        monthly_income: 0.0,
        monthly_expenses: 0.0,
        monthly_eco_savings: 0.0,
        category_spending: HashMap::new(),
    };

    for tx in &transactions {
        let monthly = in_current_month(tx.occurred_at);
        match tx.kind {
            TransactionKind::Income => {
                summary.total_income += tx.amount;
                if monthly {
                    summary.monthly_income += tx.amount;
                }
            }
            TransactionKind::Expense => {
                summary.total_expenses += tx.amount;
                if monthly {
                    summary.monthly_expenses += tx.amount;
                }
                *summary
                    .category_spending
                    .entry(tx.category.clone())
                    .or_insert(0.0) += tx.amount;
            }
        }
    }

    for activity in &activities {
        summary.total_eco_savings += activity.financial_impact;
        if in_current_month(activity.created_at) {
            summary.monthly_eco_savings += activity.financial_impact;
        }
    }

    summary.net_savings =
        summary.total_income - summary.total_expenses + summary.total_eco_savings;

    Ok(Json(summary))
}
