//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Stock Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  ❌ WRONG: absolute writes from readers                                 │
//! │     UPDATE products SET remaining = 7 WHERE name = ?                   │
//! │     (loses concurrent movements between read and write)                 │
//! │                                                                         │
//! │  ✅ CORRECT: delta writes                                               │
//! │     UPDATE products SET remaining = remaining - 3 WHERE name = ?       │
//! │                                                                         │
//! │  The one deliberate exception is the manual stock endpoint, which       │
//! │  sets an absolute count from a stocktake and clamps at zero.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use dukaan_core::Product;

const PRODUCT_COLUMNS: &str =
    "id, name, category, purchase_price_paisa, sale_price_paisa, remaining, created_at, updated_at";

/// Repository for product catalog operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its exact name (the sale-item join key).
    pub async fn find_by_name(&self, name: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE name = ?1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists the whole catalog sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - name already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(name = %product.name, "Inserting product");

        sqlx::query(
            "INSERT INTO products (id, name, category, purchase_price_paisa, \
             sale_price_paisa, remaining, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.purchase_price_paisa)
        .bind(product.sale_price_paisa)
        .bind(product.remaining)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product's fields.
    ///
    /// The manual stock count is clamped at zero; stocktakes cannot push a
    /// product negative (only oversell can).
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();
        let remaining = product.remaining.max(0);

        let result = sqlx::query(
            "UPDATE products SET name = ?2, category = ?3, purchase_price_paisa = ?4, \
             sale_price_paisa = ?5, remaining = ?6, updated_at = ?7 WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.purchase_price_paisa)
        .bind(product.sale_price_paisa)
        .bind(remaining)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Sets the stock count from a manual stocktake, clamped at zero.
    pub async fn set_remaining(&self, id: &str, remaining: i64) -> DbResult<()> {
        debug!(id = %id, remaining, "Setting stock from stocktake");

        let now = Utc::now();
        let clamped = remaining.max(0);

        let result = sqlx::query(
            "UPDATE products SET remaining = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(clamped)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Hard-deletes a product.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Map of product name to purchase price, used by the profit report.
    pub async fn purchase_price_map(&self) -> DbResult<HashMap<String, i64>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT name, purchase_price_paisa FROM products")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().collect())
    }

    /// Counts catalog products (for backup stats).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}
