//! Expense handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::parse_ledger_period;
use crate::AppState;
use dukaan_core::validation::validate_amount_paisa;
use dukaan_core::{CoreError, Expense};
use dukaan_db::repository::expense::generate_expense_id;

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub filter: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub description: String,
    pub category: Option<String>,
    pub amount_paisa: i64,
    pub expense_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    pub description: Option<String>,
    pub category: Option<String>,
    pub amount_paisa: Option<i64>,
    pub expense_date: Option<DateTime<Utc>>,
}

/// The expense page shows the filtered list plus its total.
#[derive(Debug, Serialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
    pub total_amount_paisa: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<ExpenseListResponse>> {
    let period = parse_ledger_period(
        query.filter.as_deref(),
        query.from.as_deref(),
        query.to.as_deref(),
    )?;
    let range = period.range(Utc::now());

    let expenses = state.db.expenses().list_between(range).await?;
    let total_amount_paisa = expenses.iter().map(|e| e.amount_paisa).sum();

    Ok(Json(ExpenseListResponse {
        expenses,
        total_amount_paisa,
    }))
}

pub async fn create_expense(
    State(state): State<AppState>,
    Json(request): Json<CreateExpenseRequest>,
) -> AppResult<Json<Expense>> {
    if request.description.trim().is_empty() {
        return Err(AppError::Validation("description is required".to_string()));
    }
    validate_amount_paisa(request.amount_paisa).map_err(CoreError::Validation)?;

    let expense = Expense {
        id: generate_expense_id(),
        description: request.description.trim().to_string(),
        category: request.category,
        amount_paisa: request.amount_paisa,
        expense_date: request.expense_date,
        created_at: Utc::now(),
    };

    state.db.expenses().insert(&expense).await?;

    Ok(Json(expense))
}

pub async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateExpenseRequest>,
) -> AppResult<Json<Expense>> {
    let mut expense = state
        .db
        .expenses()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Expense {id}")))?;
    if let Some(description) = request.description {
        if description.trim().is_empty() {
            return Err(AppError::Validation("description is required".to_string()));
        }
        expense.description = description.trim().to_string();
    }
    if let Some(category) = request.category {
        expense.category = Some(category);
    }
    if let Some(amount) = request.amount_paisa {
        validate_amount_paisa(amount).map_err(CoreError::Validation)?;
        expense.amount_paisa = amount;
    }
    if let Some(date) = request.expense_date {
        expense.expense_date = date;
    }

    state.db.expenses().update(&expense).await?;

    Ok(Json(expense))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.db.expenses().delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "Expense deleted".to_string(),
    }))
}
