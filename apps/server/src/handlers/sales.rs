//! Sales journal handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::AppState;
use dukaan_core::{Sale, SaleDraft, SaleItem};
use dukaan_db::{SaleFilter, SaleService};

// =============================================================================
// Requests / Responses
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ListSalesQuery {
    /// Exact customer name, matched trimmed and case-insensitively.
    pub customer_name: Option<String>,
    pub salesman_id: Option<String>,
}

/// A sale with its line items inlined, as the invoice page consumes it.
#[derive(Debug, Serialize)]
pub struct SaleWithItems {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

#[derive(Debug, Serialize)]
pub struct LatestInvoiceResponse {
    pub latest_invoice_number: i64,
}

#[derive(Debug, Deserialize)]
pub struct LinkSaleRequest {
    pub invoice_number: i64,
    pub salesman_id: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Lists sales, newest first, optionally filtered by customer name or
/// salesman.
pub async fn list_sales(
    State(state): State<AppState>,
    Query(query): Query<ListSalesQuery>,
) -> AppResult<Json<Vec<Sale>>> {
    let filter = SaleFilter {
        customer_name: query.customer_name,
        salesman_id: query.salesman_id,
    };
    let sales = state.db.sales().list(&filter).await?;
    Ok(Json(sales))
}

/// Fetches one sale with its items.
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SaleWithItems>> {
    let sale = state
        .db
        .sales()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Sale {id}")))?;
    let items = state.db.sales().items(&id).await?;

    Ok(Json(SaleWithItems { sale, items }))
}

/// Records a new sale (invoice save).
pub async fn record_sale(
    State(state): State<AppState>,
    Json(draft): Json<SaleDraft>,
) -> AppResult<Json<Sale>> {
    let sale = SaleService::new(state.db.clone()).record(draft).await?;
    Ok(Json(sale))
}

/// Edits a sale as a full-record rewrite (inventory reverted and
/// re-applied).
pub async fn edit_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<SaleDraft>,
) -> AppResult<Json<Sale>> {
    let sale = SaleService::new(state.db.clone()).edit(&id, draft).await?;
    Ok(Json(sale))
}

/// Deletes a sale and restores its stock.
pub async fn delete_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    SaleService::new(state.db.clone()).delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "Sale deleted and inventory restored".to_string(),
    }))
}

/// Latest assigned invoice number (0 when the journal is empty); the
/// invoice form shows the next one.
pub async fn latest_invoice_number(
    State(state): State<AppState>,
) -> AppResult<Json<LatestInvoiceResponse>> {
    let latest = state.db.sales().max_invoice_number().await?;
    Ok(Json(LatestInvoiceResponse {
        latest_invoice_number: latest,
    }))
}

/// Links a sale to a salesman by invoice number.
pub async fn link_sale(
    State(state): State<AppState>,
    Json(request): Json<LinkSaleRequest>,
) -> AppResult<Json<MessageResponse>> {
    SaleService::new(state.db.clone())
        .link_salesman(request.invoice_number, &request.salesman_id)
        .await?;
    Ok(Json(MessageResponse {
        message: "Sale linked successfully".to_string(),
    }))
}
