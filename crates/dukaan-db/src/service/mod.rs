//! # Reconciliation Services
//!
//! The multi-step operations of the back-office, each wrapped in a single
//! transaction (or a bounded retry loop) scoped to the rows it touches:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Service Transaction Units                          │
//! │                                                                         │
//! │  ledger::LedgerService                                                 │
//! │  ├── resolve            (pure read, never cached)                      │
//! │  └── adjust             resolve + rewrite-or-post in ONE transaction   │
//! │                                                                         │
//! │  sales::SaleService                                                    │
//! │  ├── record             read-max + insert invoice number in ONE        │
//! │  │                      transaction, retried on collision; stock       │
//! │  │                      applied AFTER commit (sale wins)               │
//! │  ├── edit               revert-old + apply-new stock + rewrite in      │
//! │  │                      ONE transaction                                │
//! │  └── delete             restore stock + delete in ONE transaction      │
//! │                                                                         │
//! │  purchasing::PurchaseService                                           │
//! │  └── record/delete      purchase row + stock delta in ONE transaction  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers talk to these services; repositories stay single-table.

pub mod inventory;
pub mod ledger;
pub mod purchasing;
pub mod reports;
pub mod sales;

use thiserror::Error;

use crate::error::DbError;
use dukaan_core::{CoreError, ValidationError};

/// Errors produced by the transactional services: either a business rule
/// violation (core) or a storage failure (db).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Core(CoreError::Validation(err))
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Db(DbError::from(err))
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
