//! # Salesman Repository
//!
//! CRUD over the salesman roster. The running `total_sales_paisa` counter is
//! only ever moved by the sale-link service, in the same transaction as the
//! link itself.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use dukaan_core::Salesman;

pub(crate) const SALESMAN_COLUMNS: &str = "id, name, phone, secondary_phone, address, cnic, \
     salary_paisa, joining_date, total_sales_paisa, commission_earned_paisa, created_at";

/// Repository for salesman operations.
#[derive(Debug, Clone)]
pub struct SalesmanRepository {
    pool: SqlitePool,
}

impl SalesmanRepository {
    /// Creates a new SalesmanRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SalesmanRepository { pool }
    }

    /// Gets a salesman by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Salesman>> {
        let salesman = sqlx::query_as::<_, Salesman>(&format!(
            "SELECT {SALESMAN_COLUMNS} FROM salesmen WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(salesman)
    }

    /// Lists salesmen, newest joiner first.
    pub async fn list(&self) -> DbResult<Vec<Salesman>> {
        let salesmen = sqlx::query_as::<_, Salesman>(&format!(
            "SELECT {SALESMAN_COLUMNS} FROM salesmen ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(salesmen)
    }

    /// Inserts a new salesman.
    pub async fn insert(&self, salesman: &Salesman) -> DbResult<()> {
        debug!(name = %salesman.name, "Inserting salesman");

        sqlx::query(
            "INSERT INTO salesmen (id, name, phone, secondary_phone, address, cnic, \
             salary_paisa, joining_date, total_sales_paisa, commission_earned_paisa, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(&salesman.id)
        .bind(&salesman.name)
        .bind(&salesman.phone)
        .bind(&salesman.secondary_phone)
        .bind(&salesman.address)
        .bind(&salesman.cnic)
        .bind(salesman.salary_paisa)
        .bind(salesman.joining_date)
        .bind(salesman.total_sales_paisa)
        .bind(salesman.commission_earned_paisa)
        .bind(salesman.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a salesman's roster fields. The sales counters are owned by
    /// the link path and left untouched here.
    pub async fn update(&self, salesman: &Salesman) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE salesmen SET name = ?2, phone = ?3, secondary_phone = ?4, address = ?5, \
             cnic = ?6, salary_paisa = ?7, joining_date = ?8 WHERE id = ?1",
        )
        .bind(&salesman.id)
        .bind(&salesman.name)
        .bind(&salesman.phone)
        .bind(&salesman.secondary_phone)
        .bind(&salesman.address)
        .bind(&salesman.cnic)
        .bind(salesman.salary_paisa)
        .bind(salesman.joining_date)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Salesman", &salesman.id));
        }

        Ok(())
    }

    /// Deletes a salesman. Linked sales keep their history (FK SET NULL).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM salesmen WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Salesman", id));
        }

        Ok(())
    }

    /// Counts salesmen (for backup stats).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM salesmen")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new salesman ID.
pub fn generate_salesman_id() -> String {
    Uuid::new_v4().to_string()
}
