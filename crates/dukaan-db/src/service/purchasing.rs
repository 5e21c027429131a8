//! # Purchasing Service
//!
//! Stock-in bookkeeping: a purchase row and its product's stock move in the
//! same transaction. Creating a purchase also rewrites the product's
//! purchase price to the latest cost, which is what the profit report uses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbError;
use crate::pool::Database;
use crate::service::ServiceResult;
use dukaan_core::validation::{validate_amount_paisa, validate_quantity};
use dukaan_core::{CoreError, Product, Purchase};

/// Input for recording a purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseDraft {
    pub product_id: String,
    pub vendor_name: Option<String>,
    pub quantity: i64,
    pub cost_per_item_paisa: i64,
    pub purchase_date: DateTime<Utc>,
}

/// Service owning the purchase write paths.
#[derive(Debug, Clone)]
pub struct PurchaseService {
    db: Database,
}

impl PurchaseService {
    /// Creates a new PurchaseService.
    pub fn new(db: Database) -> Self {
        PurchaseService { db }
    }

    /// Records a purchase: inserts the row, increments the product's stock
    /// and rewrites its purchase price, in one transaction.
    pub async fn record(&self, draft: PurchaseDraft) -> ServiceResult<Purchase> {
        validate_quantity(draft.quantity).map_err(CoreError::Validation)?;
        validate_amount_paisa(draft.cost_per_item_paisa).map_err(CoreError::Validation)?;

        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        let product = fetch_product(&mut tx, &draft.product_id)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| CoreError::ProductNotFound(draft.product_id.clone()))?;

        let now = Utc::now();
        let purchase = Purchase {
            id: Uuid::new_v4().to_string(),
            product_id: draft.product_id.clone(),
            vendor_name: draft.vendor_name.clone(),
            quantity: draft.quantity,
            cost_per_item_paisa: draft.cost_per_item_paisa,
            total_cost_paisa: draft.quantity * draft.cost_per_item_paisa,
            purchase_date: draft.purchase_date,
            created_at: now,
        };

        sqlx::query(
            "INSERT INTO purchases (id, product_id, vendor_name, quantity, \
             cost_per_item_paisa, total_cost_paisa, purchase_date, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&purchase.id)
        .bind(&purchase.product_id)
        .bind(&purchase.vendor_name)
        .bind(purchase.quantity)
        .bind(purchase.cost_per_item_paisa)
        .bind(purchase.total_cost_paisa)
        .bind(purchase.purchase_date)
        .bind(purchase.created_at)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        sqlx::query(
            "UPDATE products SET remaining = remaining + ?2, purchase_price_paisa = ?3, \
             updated_at = ?4 WHERE id = ?1",
        )
        .bind(&purchase.product_id)
        .bind(purchase.quantity)
        .bind(purchase.cost_per_item_paisa)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;

        info!(
            purchase_id = %purchase.id,
            product = %product.name,
            quantity = purchase.quantity,
            "Purchase recorded, stock increased"
        );

        Ok(purchase)
    }

    /// Deletes a purchase and takes its quantity back out of stock, in one
    /// transaction. The decrement is unconditional, mirroring sale-driven
    /// stock movement.
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        let purchase: Option<Purchase> = sqlx::query_as(&format!(
            "SELECT {} FROM purchases WHERE id = ?1",
            crate::repository::purchase::PURCHASE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DbError::from)?;

        let purchase = purchase.ok_or_else(|| DbError::not_found("Purchase", id))?;

        sqlx::query("DELETE FROM purchases WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

        let updated = sqlx::query(
            "UPDATE products SET remaining = remaining - ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(&purchase.product_id)
        .bind(purchase.quantity)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        if updated.rows_affected() == 0 {
            // Product was deleted since; nothing to give back
            debug!(product_id = %purchase.product_id, "Deleted purchase's product no longer exists");
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(purchase_id = %id, quantity = purchase.quantity, "Purchase deleted, stock decreased");

        Ok(())
    }
}

async fn fetch_product(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        "SELECT id, name, category, purchase_price_paisa, sale_price_paisa, remaining, \
         created_at, updated_at FROM products WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(conn)
    .await
}
