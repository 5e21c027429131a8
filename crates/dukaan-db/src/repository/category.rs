//! # Category Repository
//!
//! Two flat name lists: product categories (inventory dropdowns) and expense
//! categories. Names are primary keys; adding a duplicate is a conflict,
//! removal is by name.

use sqlx::SqlitePool;

use crate::error::{DbError, DbResult};

/// Repository over both category lists.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    // -------------------------------------------------------------------------
    // Product categories
    // -------------------------------------------------------------------------

    /// Lists product categories sorted by name.
    pub async fn list_product_categories(&self) -> DbResult<Vec<String>> {
        let names: Vec<String> =
            sqlx::query_scalar("SELECT name FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(names)
    }

    /// Adds a product category (trimmed). Duplicate name is a conflict.
    pub async fn add_product_category(&self, name: &str) -> DbResult<()> {
        sqlx::query("INSERT INTO categories (name) VALUES (?1)")
            .bind(name.trim())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Removes a product category by name.
    pub async fn remove_product_category(&self, name: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE name = ?1")
            .bind(name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", name));
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Expense categories
    // -------------------------------------------------------------------------

    /// Lists expense categories sorted by name.
    pub async fn list_expense_categories(&self) -> DbResult<Vec<String>> {
        let names: Vec<String> =
            sqlx::query_scalar("SELECT name FROM expense_categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(names)
    }

    /// Adds an expense category (trimmed). Duplicate name is a conflict.
    pub async fn add_expense_category(&self, name: &str) -> DbResult<()> {
        sqlx::query("INSERT INTO expense_categories (name) VALUES (?1)")
            .bind(name.trim())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Removes an expense category by name.
    pub async fn remove_expense_category(&self, name: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM expense_categories WHERE name = ?1")
            .bind(name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense category", name));
        }

        Ok(())
    }

    /// Counts product categories (for backup stats).
    pub async fn count_product_categories(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
