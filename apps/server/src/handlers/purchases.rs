//! Purchasing handlers (stock in).

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::parse_ledger_period;
use crate::AppState;
use dukaan_core::Purchase;
use dukaan_db::{PurchaseDraft, PurchaseService};

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub filter: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn list_purchases(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<Vec<Purchase>>> {
    let period = parse_ledger_period(
        query.filter.as_deref(),
        query.from.as_deref(),
        query.to.as_deref(),
    )?;
    let purchases = state
        .db
        .purchases()
        .list_between(period.range(Utc::now()))
        .await?;
    Ok(Json(purchases))
}

/// Records a purchase; the product's stock and purchase price move in the
/// same transaction.
pub async fn record_purchase(
    State(state): State<AppState>,
    Json(draft): Json<PurchaseDraft>,
) -> AppResult<Json<Purchase>> {
    let purchase = PurchaseService::new(state.db.clone()).record(draft).await?;
    Ok(Json(purchase))
}

/// Deletes a purchase and takes its quantity back out of stock.
pub async fn delete_purchase(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    PurchaseService::new(state.db.clone()).delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "Purchase deleted and inventory updated".to_string(),
    }))
}
