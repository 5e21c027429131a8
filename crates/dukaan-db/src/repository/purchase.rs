//! # Purchase Repository
//!
//! Read-side operations for the purchase book. Creating and deleting a
//! purchase moves stock, so those paths live in
//! [`crate::service::purchasing`].

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::DbResult;
use dukaan_core::Purchase;

pub(crate) const PURCHASE_COLUMNS: &str = "id, product_id, vendor_name, quantity, \
     cost_per_item_paisa, total_cost_paisa, purchase_date, created_at";

/// Repository for purchase read operations.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    /// Creates a new PurchaseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Gets a purchase by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Purchase>> {
        let purchase = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(purchase)
    }

    /// Lists purchases inside a half-open date range (no range = all),
    /// newest first.
    pub async fn list_between(
        &self,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> DbResult<Vec<Purchase>> {
        let (start, end) = match range {
            Some((s, e)) => (Some(s), Some(e)),
            None => (None, None),
        };

        let purchases = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases \
             WHERE (?1 IS NULL OR purchase_date >= ?1) \
               AND (?2 IS NULL OR purchase_date < ?2) \
             ORDER BY purchase_date DESC"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(purchases)
    }

    /// Total purchase cost inside the range (for the analytics summary).
    pub async fn total_cost_between(
        &self,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> DbResult<i64> {
        let (start, end) = match range {
            Some((s, e)) => (Some(s), Some(e)),
            None => (None, None),
        };

        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_cost_paisa), 0) FROM purchases \
             WHERE (?1 IS NULL OR purchase_date >= ?1) \
               AND (?2 IS NULL OR purchase_date < ?2)",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Counts purchases (for backup stats).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
