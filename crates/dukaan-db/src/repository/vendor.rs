//! # Vendor Repository
//!
//! CRUD over the vendor address book.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use dukaan_core::Vendor;

const VENDOR_COLUMNS: &str = "id, name, phone, address, created_at";

/// Repository for vendor operations.
#[derive(Debug, Clone)]
pub struct VendorRepository {
    pool: SqlitePool,
}

impl VendorRepository {
    /// Creates a new VendorRepository.
    pub fn new(pool: SqlitePool) -> Self {
        VendorRepository { pool }
    }

    /// Gets a vendor by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Vendor>> {
        let vendor = sqlx::query_as::<_, Vendor>(&format!(
            "SELECT {VENDOR_COLUMNS} FROM vendors WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vendor)
    }

    /// Lists vendors sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Vendor>> {
        let vendors = sqlx::query_as::<_, Vendor>(&format!(
            "SELECT {VENDOR_COLUMNS} FROM vendors ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(vendors)
    }

    /// Inserts a new vendor.
    pub async fn insert(&self, vendor: &Vendor) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO vendors (id, name, phone, address, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&vendor.id)
        .bind(&vendor.name)
        .bind(&vendor.phone)
        .bind(&vendor.address)
        .bind(vendor.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a vendor.
    pub async fn update(&self, vendor: &Vendor) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE vendors SET name = ?2, phone = ?3, address = ?4 WHERE id = ?1",
        )
        .bind(&vendor.id)
        .bind(&vendor.name)
        .bind(&vendor.phone)
        .bind(&vendor.address)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Vendor", &vendor.id));
        }

        Ok(())
    }

    /// Deletes a vendor.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM vendors WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Vendor", id));
        }

        Ok(())
    }

    /// Counts vendors (for backup stats).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vendors")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new vendor ID.
pub fn generate_vendor_id() -> String {
    Uuid::new_v4().to_string()
}
