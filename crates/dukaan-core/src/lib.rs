//! # dukaan-core: Pure Business Logic for the Dukaan Back-Office
//!
//! This crate is the **heart** of the back-office. It contains the ledger
//! and inventory rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Dukaan Back-Office Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (axum)                              │   │
//! │  │    sales ──► customers ──► recovery ──► purchasing ──► backup  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ dukaan-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  ledger   │  │ identity  │  │   │
//! │  │   │ Customer  │  │   Money   │  │ balances  │  │ (name,    │  │   │
//! │  │   │   Sale    │  │  (paisa)  │  │ deltas    │  │  phone)   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    dukaan-db (Database Layer)                   │   │
//! │  │          SQLite queries, migrations, ledger services            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Sale, Product, Purchase, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`identity`] - The (name, phone) customer identity key
//! - [`ledger`] - Balance resolution and adjustment math
//! - [`period`] - Date-range filters shared by listings and reports
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paisa (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod identity;
pub mod ledger;
pub mod money;
pub mod period;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use dukaan_core::Money` instead of
// `use dukaan_core::money::Money`

pub use error::{CoreError, ValidationError};
pub use identity::CustomerIdentity;
pub use ledger::ResolvedBalance;
pub use money::Money;
pub use period::Period;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Line-item description used for synthetic balance-adjustment sales.
///
/// ## Why a constant?
/// Adjustment rows are ordinary journal entries distinguished only by this
/// description and the `is_adjustment` flag. The inventory sync must never
/// resolve it against the product catalog, so it is defined once and reused
/// by the adjustment engine, the sync skip-check and the tests.
pub const ADJUSTMENT_DESCRIPTION: &str = "Manual Balance Adjustment";

/// Default tolerance (in paisa) under which a balance adjustment is a no-op.
///
/// The legacy system compared floating-point rupee amounts against 0.01;
/// with integer paisa one unit is the same band. Configurable on the
/// adjustment engine for operators who want a wider dead zone.
pub const DEFAULT_BALANCE_EPSILON_PAISA: i64 = 1;

/// Maximum line items accepted on a single invoice.
///
/// ## Business Reason
/// Prevents runaway invoices from a stuck form submission.
pub const MAX_INVOICE_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-entry (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 9999;
