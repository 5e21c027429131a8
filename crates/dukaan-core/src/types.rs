//! # Domain Types
//!
//! Core domain types used throughout the Dukaan back-office.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │      Sale       │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  (name, phone)  │   │  invoice_number │   │  name (unique)  │       │
//! │  │  opening balance│   │  balance_paisa  │   │  remaining      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Purchase     │   │    Expense      │   │    Salesman     │       │
//! │  │  stock in       │   │  running costs  │   │  linked sales   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Entities carry:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business key: `(name, phone)` for customers, `invoice_number` for sales,
//!   `name` for products - human-facing and used as legacy join keys

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::CustomerIdentity;
use crate::money::Money;

// =============================================================================
// Customer
// =============================================================================

/// A registered customer with an explicit opening balance.
///
/// Customers without a row here ("normal" customers) exist only as
/// aggregations over the sales journal sharing a `(name, phone)` identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Customer name, stored trimmed. Part of the identity key.
    pub name: String,

    /// Customer phone, stored trimmed. Part of the identity key.
    pub phone: String,

    /// Optional city for the address book.
    pub city: Option<String>,

    /// Balance carried from before the customer was registered, in paisa.
    pub opening_balance_paisa: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Returns the opening balance as Money.
    #[inline]
    pub fn opening_balance(&self) -> Money {
        Money::from_paisa(self.opening_balance_paisa)
    }

    /// Returns the customer's identity key.
    #[inline]
    pub fn identity(&self) -> CustomerIdentity {
        CustomerIdentity::new(&self.name, &self.phone)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A journal entry in the append-only sales history.
///
/// `balance_paisa` is the signed receivable delta this sale contributes to
/// its customer's total; positive means the customer owes money.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,

    /// Unique, monotonically assigned business number (max + 1).
    pub invoice_number: i64,

    /// Surrogate link to a registered customer, stamped at record time.
    /// NULL for "normal" customers and for legacy/imported rows; those are
    /// matched by the denormalized `(customer_name, customer_phone)` pair.
    pub customer_id: Option<String>,

    pub customer_name: String,
    pub customer_phone: String,

    /// Sum of line totals (qty × unit price).
    pub sub_total_paisa: i64,

    /// Extra charges added on top of the sub-total.
    pub others_paisa: i64,

    /// Absolute discount subtracted from the sub-total.
    pub discount_paisa: i64,

    /// sub_total + others - discount.
    pub total_paisa: i64,

    /// Amount received at the counter.
    pub received_paisa: i64,

    /// total - received; set directly for adjustment rows.
    pub balance_paisa: i64,

    pub invoice_date: DateTime<Utc>,

    /// Salesman credited with this sale, if linked.
    pub salesman_id: Option<String>,

    /// True for synthetic balance-adjustment rows. Adjustment rows never
    /// touch inventory.
    pub is_adjustment: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the receivable delta as Money.
    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_paisa(self.balance_paisa)
    }

    /// Returns the invoice total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paisa(self.total_paisa)
    }

    /// Returns the identity this sale belongs to.
    #[inline]
    pub fn identity(&self) -> CustomerIdentity {
        CustomerIdentity::new(&self.customer_name, &self.customer_phone)
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item on an invoice.
///
/// `description` doubles as the legacy join key into the product catalog for
/// inventory sync; a description that matches no product simply does not move
/// stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub description: String,
    pub quantity: i64,
    pub unit_price_paisa: i64,
}

impl SaleItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_paisa(self.unit_price_paisa)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Sale Draft
// =============================================================================

/// Input for recording or editing a sale.
///
/// Totals are NOT part of the draft; the ledger computes them from the items
/// so the stored invariants cannot be violated by a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleDraft {
    pub customer_name: String,
    pub customer_phone: String,
    pub items: Vec<SaleItemDraft>,
    pub others_paisa: i64,
    pub discount_paisa: i64,
    pub received_paisa: i64,
    pub invoice_date: DateTime<Utc>,
    pub salesman_id: Option<String>,
}

/// A line item on a draft invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItemDraft {
    pub description: String,
    pub quantity: i64,
    pub unit_price_paisa: i64,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
///
/// `name` is unique and acts as the join key from sale item descriptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: Option<String>,

    /// Cost price, rewritten by the latest purchase.
    pub purchase_price_paisa: i64,

    /// Selling price shown on the invoice form.
    pub sale_price_paisa: i64,

    /// Current stock level. Sale-driven deltas are unconditional, so an
    /// oversell can drive this negative; manual stock edits clamp at 0.
    pub remaining: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn purchase_price(&self) -> Money {
        Money::from_paisa(self.purchase_price_paisa)
    }

    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_paisa(self.sale_price_paisa)
    }
}

// =============================================================================
// Purchase
// =============================================================================

/// A stock purchase from a vendor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Purchase {
    pub id: String,
    pub product_id: String,
    pub vendor_name: Option<String>,
    pub quantity: i64,
    pub cost_per_item_paisa: i64,

    /// quantity × cost_per_item, computed at creation time.
    pub total_cost_paisa: i64,

    pub purchase_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Expense
// =============================================================================

/// A running cost entry (rent, utilities, wages...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub category: Option<String>,
    pub amount_paisa: i64,
    pub expense_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Salesman
// =============================================================================

/// A salesman on the shop payroll.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Salesman {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub secondary_phone: Option<String>,
    pub address: Option<String>,
    pub cnic: Option<String>,
    pub salary_paisa: i64,
    pub joining_date: DateTime<Utc>,

    /// Running total of linked sale sub-totals.
    pub total_sales_paisa: i64,
    pub commission_earned_paisa: i64,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Vendor
// =============================================================================

/// A supplier the shop buys stock from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// User
// =============================================================================

/// The back-office operator account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,

    /// bcrypt hash; never serialized out of the database layer.
    #[serde(skip_serializing)]
    pub password_hash: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_item_line_total() {
        let item = SaleItem {
            id: "i1".into(),
            sale_id: "s1".into(),
            description: "Widget".into(),
            quantity: 3,
            unit_price_paisa: 250,
        };
        assert_eq!(item.line_total().paisa(), 750);
    }

    #[test]
    fn test_customer_identity_trims() {
        let customer = Customer {
            id: "c1".into(),
            name: "Ali Traders ".into(),
            phone: " 0300-1234567".into(),
            city: None,
            opening_balance_paisa: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(customer.identity().key(), "Ali Traders-0300-1234567");
    }
}
