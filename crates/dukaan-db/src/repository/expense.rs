//! # Expense Repository
//!
//! Plain CRUD over the expense book with period filtering.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use dukaan_core::Expense;

const EXPENSE_COLUMNS: &str = "id, description, category, amount_paisa, expense_date, created_at";

/// Repository for expense operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Gets an expense by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Expense>> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(expense)
    }

    /// Lists expenses inside a half-open date range (no range = all),
    /// newest first.
    pub async fn list_between(
        &self,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> DbResult<Vec<Expense>> {
        let (start, end) = match range {
            Some((s, e)) => (Some(s), Some(e)),
            None => (None, None),
        };

        let expenses = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses \
             WHERE (?1 IS NULL OR expense_date >= ?1) \
               AND (?2 IS NULL OR expense_date < ?2) \
             ORDER BY expense_date DESC"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    /// Total spend inside the range.
    pub async fn total_between(
        &self,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> DbResult<i64> {
        let (start, end) = match range {
            Some((s, e)) => (Some(s), Some(e)),
            None => (None, None),
        };

        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount_paisa), 0) FROM expenses \
             WHERE (?1 IS NULL OR expense_date >= ?1) \
               AND (?2 IS NULL OR expense_date < ?2)",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Inserts a new expense.
    pub async fn insert(&self, expense: &Expense) -> DbResult<()> {
        debug!(description = %expense.description, amount = expense.amount_paisa, "Inserting expense");

        sqlx::query(
            "INSERT INTO expenses (id, description, category, amount_paisa, expense_date, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&expense.id)
        .bind(&expense.description)
        .bind(&expense.category)
        .bind(expense.amount_paisa)
        .bind(expense.expense_date)
        .bind(expense.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an expense. `created_at` is never rewritten.
    pub async fn update(&self, expense: &Expense) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE expenses SET description = ?2, category = ?3, amount_paisa = ?4, \
             expense_date = ?5 WHERE id = ?1",
        )
        .bind(&expense.id)
        .bind(&expense.description)
        .bind(&expense.category)
        .bind(expense.amount_paisa)
        .bind(expense.expense_date)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", &expense.id));
        }

        Ok(())
    }

    /// Deletes an expense.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", id));
        }

        Ok(())
    }

    /// Counts expenses (for backup stats).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM expenses")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new expense ID.
pub fn generate_expense_id() -> String {
    Uuid::new_v4().to_string()
}
