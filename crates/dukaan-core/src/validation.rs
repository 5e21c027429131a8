//! # Validation Module
//!
//! Input validation for the back-office write paths.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP deserialization (serde)                                 │
//! │  ├── Type checks (an i64 field rejects "abc" and NaN outright)         │
//! │  └── Missing required JSON fields                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │  ├── Non-empty identity fields                                         │
//! │  └── Quantity / amount ranges                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Validation rejects BEFORE any write reaches the store.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{SaleDraft, SaleItemDraft};
use crate::{MAX_INVOICE_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identity Validators
// =============================================================================

/// Validates a customer name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 200 characters
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "customer name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "customer name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a customer phone.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 30 characters
/// - No digit-format enforcement: the legacy data contains dashes, spaces
///   and country prefixes, and the identity match is exact-string anyway
pub fn validate_customer_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "customer phone".to_string(),
        });
    }

    if phone.len() > 30 {
        return Err(ValidationError::TooLong {
            field: "customer phone".to_string(),
            max: 30,
        });
    }

    Ok(())
}

// =============================================================================
// Product Validators
// =============================================================================

/// Validates a product name (the inventory join key).
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "product name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "product name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in paisa.
///
/// ## Rules
/// - Must be non-negative (zero is allowed: adjustment rows price at 0)
pub fn validate_price_paisa(paisa: i64) -> ValidationResult<()> {
    if paisa < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates an expense or purchase amount in paisa.
pub fn validate_amount_paisa(paisa: i64) -> ValidationResult<()> {
    if paisa < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Sale Draft Validator
// =============================================================================

/// Validates a full sale draft before it reaches the journal.
///
/// ## Rules
/// - Identity fields present
/// - At least one item, at most MAX_INVOICE_ITEMS
/// - Every item has a description, a positive bounded quantity and a
///   non-negative price
/// - Discount and others are non-negative
pub fn validate_sale_draft(draft: &SaleDraft) -> ValidationResult<()> {
    validate_customer_name(&draft.customer_name)?;
    validate_customer_phone(&draft.customer_phone)?;

    if draft.items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if draft.items.len() > MAX_INVOICE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_INVOICE_ITEMS as i64,
        });
    }

    for item in &draft.items {
        validate_sale_item(item)?;
    }

    if draft.discount_paisa < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "discount".to_string(),
        });
    }

    if draft.others_paisa < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "others".to_string(),
        });
    }

    Ok(())
}

/// Validates a single draft line item.
pub fn validate_sale_item(item: &SaleItemDraft) -> ValidationResult<()> {
    if item.description.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "item description".to_string(),
        });
    }

    validate_quantity(item.quantity)?;
    validate_price_paisa(item.unit_price_paisa)?;

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn draft() -> SaleDraft {
        SaleDraft {
            customer_name: "Ali Traders".into(),
            customer_phone: "0300-1234567".into(),
            items: vec![SaleItemDraft {
                description: "Widget".into(),
                quantity: 2,
                unit_price_paisa: 500,
            }],
            others_paisa: 0,
            discount_paisa: 0,
            received_paisa: 1000,
            invoice_date: Utc::now(),
            salesman_id: None,
        }
    }

    #[test]
    fn test_validate_customer_name() {
        assert!(validate_customer_name("Ali Traders").is_ok());
        assert!(validate_customer_name("").is_err());
        assert!(validate_customer_name("   ").is_err());
        assert!(validate_customer_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_customer_phone() {
        assert!(validate_customer_phone("0300-1234567").is_ok());
        assert!(validate_customer_phone("+92 300 1234567").is_ok());
        assert!(validate_customer_phone("").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(9999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(10_000).is_err());
    }

    #[test]
    fn test_validate_price_paisa() {
        assert!(validate_price_paisa(0).is_ok());
        assert!(validate_price_paisa(1099).is_ok());
        assert!(validate_price_paisa(-100).is_err());
    }

    #[test]
    fn test_validate_sale_draft_happy_path() {
        assert!(validate_sale_draft(&draft()).is_ok());
    }

    #[test]
    fn test_validate_sale_draft_rejects_empty_items() {
        let mut d = draft();
        d.items.clear();
        assert!(validate_sale_draft(&d).is_err());
    }

    #[test]
    fn test_validate_sale_draft_rejects_blank_identity() {
        let mut d = draft();
        d.customer_name = "  ".into();
        assert!(validate_sale_draft(&d).is_err());
    }

    #[test]
    fn test_validate_sale_draft_rejects_negative_discount() {
        let mut d = draft();
        d.discount_paisa = -5;
        assert!(validate_sale_draft(&d).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
