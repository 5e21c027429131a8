//! # User Repository
//!
//! The back-office has a single operator account. Login accepts either the
//! account name or the email, case-insensitively; the password itself is a
//! bcrypt hash verified by the server (this crate never sees plaintext).

use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::error::DbResult;
use dukaan_core::User;

const USER_COLUMNS: &str = "id, name, email, phone, role, password_hash";

/// Repository for operator account operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Finds a user by name or email, case-insensitively, trimmed.
    pub async fn find_by_login(&self, login: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE name COLLATE NOCASE = TRIM(?1) OR email COLLATE NOCASE = TRIM(?1)"
        ))
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Seeds the default operator account when the table is empty.
    ///
    /// Called once at startup so a fresh installation can log in.
    pub async fn ensure_default_admin(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> DbResult<()> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        if count > 0 {
            return Ok(());
        }

        info!(name = %name, "Seeding default operator account");

        sqlx::query(
            "INSERT INTO users (id, name, email, phone, role, password_hash) \
             VALUES (?1, ?2, ?3, NULL, 'Administrator', ?4)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
