//! Product catalog handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::AppState;
use dukaan_core::validation::{validate_amount_paisa, validate_product_name};
use dukaan_core::{CoreError, Product};
use dukaan_db::repository::product::generate_product_id;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub category: Option<String>,
    #[serde(default)]
    pub purchase_price_paisa: i64,
    #[serde(default)]
    pub sale_price_paisa: i64,
    #[serde(default)]
    pub remaining: i64,
}

/// Partial update; omitted fields keep their current values. The stock
/// field is what the manual stocktake edits (clamped at zero below).
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub purchase_price_paisa: Option<i64>,
    pub sale_price_paisa: Option<i64>,
    pub remaining: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let products = state.db.products().list().await?;
    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> AppResult<Json<Product>> {
    validate_product_name(&request.name).map_err(CoreError::Validation)?;
    validate_amount_paisa(request.purchase_price_paisa).map_err(CoreError::Validation)?;
    validate_amount_paisa(request.sale_price_paisa).map_err(CoreError::Validation)?;

    let now = Utc::now();
    let product = Product {
        id: generate_product_id(),
        name: request.name.trim().to_string(),
        category: request.category,
        purchase_price_paisa: request.purchase_price_paisa,
        sale_price_paisa: request.sale_price_paisa,
        remaining: request.remaining.max(0),
        created_at: now,
        updated_at: now,
    };

    state.db.products().insert(&product).await?;

    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    let mut product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {id}")))?;

    if let Some(name) = request.name {
        validate_product_name(&name).map_err(CoreError::Validation)?;
        product.name = name.trim().to_string();
    }
    if let Some(category) = request.category {
        product.category = Some(category);
    }
    if let Some(price) = request.purchase_price_paisa {
        validate_amount_paisa(price).map_err(CoreError::Validation)?;
        product.purchase_price_paisa = price;
    }
    if let Some(price) = request.sale_price_paisa {
        validate_amount_paisa(price).map_err(CoreError::Validation)?;
        product.sale_price_paisa = price;
    }
    if let Some(remaining) = request.remaining {
        product.remaining = remaining.max(0);
    }

    state.db.products().update(&product).await?;

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.db.products().delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "Product deleted".to_string(),
    }))
}
