//! # dukaan-db: Database Layer for the Dukaan Back-Office
//!
//! This crate provides database access for the back-office. It uses SQLite
//! for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Dukaan Back-Office Data Flow                        │
//! │                                                                         │
//! │  HTTP handler (record_sale, adjust_balance, ...)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     dukaan-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐  ┌───────────────┐  ┌──────────────────┐  │   │
//! │  │   │   Database    │  │  Repositories │  │    Services      │  │   │
//! │  │   │   (pool.rs)   │  │  single-table │  │  ledger, sales,  │  │   │
//! │  │   │               │  │  reads/writes │  │  inventory sync, │  │   │
//! │  │   │ SqlitePool    │◄─│               │  │  purchasing,     │  │   │
//! │  │   │ + migrations  │  │               │◄─│  reports (tx     │  │   │
//! │  │   │               │  │               │  │  boundaries)     │  │   │
//! │  │   └───────────────┘  └───────────────┘  └──────────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL mode)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Single-collection repositories
//! - [`service`] - Transactional reconciliation services (balance resolver,
//!   adjustment engine, sale lifecycle with inventory sync, purchasing,
//!   reports)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dukaan_db::{Database, DbConfig};
//! use dukaan_db::service::ledger::LedgerService;
//!
//! let db = Database::new(DbConfig::new("dukaan.db")).await?;
//! let ledger = LedgerService::new(db.clone());
//! let balance = ledger.resolve(&identity).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::customer::CustomerRepository;
pub use repository::expense::ExpenseRepository;
pub use repository::product::ProductRepository;
pub use repository::purchase::PurchaseRepository;
pub use repository::sale::{SaleFilter, SaleRepository};
pub use repository::salesman::SalesmanRepository;
pub use repository::user::UserRepository;
pub use repository::vendor::VendorRepository;

// Service re-exports
pub use service::ledger::{AdjustmentOutcome, LedgerService, RecoveryReport};
pub use service::purchasing::{PurchaseDraft, PurchaseService};
pub use service::reports::{AnalyticsSummary, BackupRow, BackupStats, ReportService};
pub use service::sales::SaleService;
pub use service::{ServiceError, ServiceResult};
