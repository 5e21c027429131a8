//! # Customer Repository
//!
//! Database operations for the customer registry.
//!
//! ## Identity & Links
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  customers                     sales                                    │
//! │  ┌──────────────────┐          ┌────────────────────────────┐          │
//! │  │ id  ◄────────────┼──────────┼─ customer_id (nullable)    │          │
//! │  │ (name, phone) ◄──┼──────────┼─ (customer_name, phone)    │          │
//! │  └──────────────────┘  legacy  └────────────────────────────┘          │
//! │                        string                                           │
//! │                        match                                            │
//! │                                                                         │
//! │  Registering a customer backfills customer_id onto matching unlinked   │
//! │  sales; deleting a customer severs the links (FK SET NULL) so its      │
//! │  history resurfaces as a "normal" customer.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use dukaan_core::{Customer, CustomerIdentity};

const CUSTOMER_COLUMNS: &str = "id, name, phone, city, opening_balance_paisa, created_at, updated_at";

/// Repository for customer registry operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Finds the registered customer matching a trimmed (name, phone) identity.
    ///
    /// Matching is exact and case-sensitive; only surrounding whitespace is
    /// forgiven (both sides are trimmed).
    pub async fn find_by_identity(&self, identity: &CustomerIdentity) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers \
             WHERE TRIM(name) = ?1 AND TRIM(phone) = ?2"
        ))
        .bind(&identity.name)
        .bind(&identity.phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists all registered customers sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Registers a new customer and backfills the surrogate link onto any
    /// unlinked sales sharing the identity.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - identity already registered
    pub async fn register(&self, customer: &Customer) -> DbResult<()> {
        debug!(name = %customer.name, phone = %customer.phone, "Registering customer");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO customers (id, name, phone, city, opening_balance_paisa, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.city)
        .bind(customer.opening_balance_paisa)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&mut *tx)
        .await?;

        // Adopt the identity's existing journal history
        let identity = customer.identity();
        let linked = sqlx::query(
            "UPDATE sales SET customer_id = ?1 \
             WHERE customer_id IS NULL AND TRIM(customer_name) = ?2 AND TRIM(customer_phone) = ?3",
        )
        .bind(&customer.id)
        .bind(&identity.name)
        .bind(&identity.phone)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            customer_id = %customer.id,
            linked_sales = linked.rows_affected(),
            "Customer registered"
        );
        Ok(())
    }

    /// Updates a customer's registry fields (name, phone, city, opening
    /// balance). Linked sales follow the id, so renames keep the history.
    pub async fn update(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, "Updating customer");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE customers SET name = ?2, phone = ?3, city = ?4, \
             opening_balance_paisa = ?5, updated_at = ?6 WHERE id = ?1",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.city)
        .bind(customer.opening_balance_paisa)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", &customer.id));
        }

        Ok(())
    }

    /// Rewrites only the opening balance.
    ///
    /// This is the adjustment path for registered customers; the sales
    /// journal is never touched.
    pub async fn update_opening_balance(&self, id: &str, opening_balance_paisa: i64) -> DbResult<()> {
        debug!(id = %id, opening_balance_paisa, "Rewriting opening balance");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE customers SET opening_balance_paisa = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(opening_balance_paisa)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    /// Hard-deletes a customer.
    ///
    /// The FK on sales.customer_id is ON DELETE SET NULL: the identity's
    /// sales are orphaned and resurface under a "normal" customer.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    /// Counts registered customers (for backup stats).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new customer ID.
pub fn generate_customer_id() -> String {
    Uuid::new_v4().to_string()
}
