//! Category list handlers (product + expense).

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Product categories
// =============================================================================

pub async fn list_product_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<String>>> {
    let names = state.db.categories().list_product_categories().await?;
    Ok(Json(names))
}

pub async fn create_product_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> AppResult<Json<MessageResponse>> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("category name is required".to_string()));
    }

    state
        .db
        .categories()
        .add_product_category(&request.name)
        .await?;

    Ok(Json(MessageResponse {
        message: "Category added".to_string(),
    }))
}

pub async fn delete_product_category(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.db.categories().remove_product_category(&name).await?;
    Ok(Json(MessageResponse {
        message: "Category deleted".to_string(),
    }))
}

// =============================================================================
// Expense categories
// =============================================================================

pub async fn list_expense_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<String>>> {
    let names = state.db.categories().list_expense_categories().await?;
    Ok(Json(names))
}

pub async fn create_expense_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> AppResult<Json<MessageResponse>> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("category name is required".to_string()));
    }

    state
        .db
        .categories()
        .add_expense_category(&request.name)
        .await?;

    Ok(Json(MessageResponse {
        message: "Expense category added".to_string(),
    }))
}

pub async fn delete_expense_category(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.db.categories().remove_expense_category(&name).await?;
    Ok(Json(MessageResponse {
        message: "Expense category deleted".to_string(),
    }))
}
