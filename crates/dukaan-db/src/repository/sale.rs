//! # Sale Repository
//!
//! Read-side database operations for the sales journal.
//!
//! The journal's write paths (record / edit / delete / link) are multi-step
//! sequences with inventory side effects and invoice numbering; they live in
//! [`crate::service::sales`] where they get proper transaction boundaries.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use dukaan_core::{Sale, SaleItem};

pub(crate) const SALE_COLUMNS: &str = "id, invoice_number, customer_id, customer_name, \
     customer_phone, sub_total_paisa, others_paisa, discount_paisa, total_paisa, \
     received_paisa, balance_paisa, invoice_date, salesman_id, is_adjustment, \
     created_at, updated_at";

/// Optional filters for the sale listing.
#[derive(Debug, Clone, Default)]
pub struct SaleFilter {
    /// Exact customer name, matched trimmed and case-insensitively
    /// (the invoice page looks sales up this way).
    pub customer_name: Option<String>,

    /// Restrict to sales linked to one salesman.
    pub salesman_id: Option<String>,
}

/// Repository for sale read operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets a sale by its business invoice number.
    pub async fn get_by_invoice_number(&self, invoice_number: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE invoice_number = ?1"
        ))
        .bind(invoice_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets all items for a sale.
    pub async fn items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            "SELECT id, sale_id, description, quantity, unit_price_paisa \
             FROM sale_items WHERE sale_id = ?1 ORDER BY rowid",
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists sales, newest invoice date first, with optional filters.
    pub async fn list(&self, filter: &SaleFilter) -> DbResult<Vec<Sale>> {
        debug!(?filter, "Listing sales");

        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales \
             WHERE (?1 IS NULL OR TRIM(customer_name) COLLATE NOCASE = TRIM(?1)) \
               AND (?2 IS NULL OR salesman_id = ?2) \
             ORDER BY invoice_date DESC"
        ))
        .bind(&filter.customer_name)
        .bind(&filter.salesman_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists sales inside a half-open `[start, end)` date range (no range =
    /// all), newest first. Used by the backup export.
    pub async fn list_between(
        &self,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> DbResult<Vec<Sale>> {
        let (start, end) = unzip_range(range);

        let sales = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales \
             WHERE (?1 IS NULL OR invoice_date >= ?1) \
               AND (?2 IS NULL OR invoice_date < ?2) \
             ORDER BY invoice_date DESC"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists the items of every sale in the range, sale by sale. Used by the
    /// backup export (one CSV row per item).
    pub async fn list_items_between(
        &self,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> DbResult<Vec<SaleItem>> {
        let (start, end) = unzip_range(range);

        let items = sqlx::query_as::<_, SaleItem>(
            "SELECT si.id, si.sale_id, si.description, si.quantity, si.unit_price_paisa \
             FROM sale_items si \
             JOIN sales s ON s.id = si.sale_id \
             WHERE (?1 IS NULL OR s.invoice_date >= ?1) \
               AND (?2 IS NULL OR s.invoice_date < ?2) \
             ORDER BY s.invoice_date DESC, si.rowid",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Highest invoice number currently in the journal (0 when empty).
    ///
    /// Invoice numbers of deleted sales are never reused; new numbers are
    /// always max + 1.
    pub async fn max_invoice_number(&self) -> DbResult<i64> {
        let max: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(invoice_number), 0) FROM sales")
                .fetch_one(&self.pool)
                .await?;

        Ok(max)
    }

    /// Counts journal entries (for backup stats).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn unzip_range(
    range: Option<(DateTime<Utc>, DateTime<Utc>)>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    match range {
        Some((start, end)) => (Some(start), Some(end)),
        None => (None, None),
    }
}
