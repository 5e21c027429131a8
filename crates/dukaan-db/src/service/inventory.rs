//! # Inventory Sync
//!
//! Applies sale-driven stock deltas to the product catalog so `remaining`
//! reflects currently-active sales only.
//!
//! ## Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sale create:  remaining -= qty   for each matching item                │
//! │  Sale delete:  remaining += qty   (stock returned)                      │
//! │  Sale edit:    revert FULL old list, then apply FULL new list           │
//! │                (never diffed; correct even when rows come and go)       │
//! │                                                                         │
//! │  An item matches by EXACT product name. No match = no movement, not     │
//! │  an error: free-text items and the "Manual Balance Adjustment" row      │
//! │  are meant to fall through.                                             │
//! │                                                                         │
//! │  Deltas are unconditional. An oversell can push remaining below zero;   │
//! │  that is allowed, logged, and left for the stocktake to sort out.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};

use crate::error::DbResult;
use dukaan_core::{SaleItem, SaleItemDraft};

/// A (product name, quantity) stock movement.
pub(crate) type Movement = (String, i64);

/// Extracts movements from stored sale items: non-empty description and a
/// positive quantity, everything else is skipped.
pub(crate) fn movements_of_items(items: &[SaleItem]) -> Vec<Movement> {
    items
        .iter()
        .filter(|item| !item.description.trim().is_empty() && item.quantity > 0)
        .map(|item| (item.description.clone(), item.quantity))
        .collect()
}

/// Extracts movements from draft sale items, same filter as stored items.
pub(crate) fn movements_of_drafts(items: &[SaleItemDraft]) -> Vec<Movement> {
    items
        .iter()
        .filter(|item| !item.description.trim().is_empty() && item.quantity > 0)
        .map(|item| (item.description.clone(), item.quantity))
        .collect()
}

/// Applies `sign * qty` to each movement's product inside a transaction.
///
/// `sign` is -1 to consume stock (create/apply) and +1 to return it
/// (delete/revert).
pub(crate) async fn apply_movements(
    conn: &mut SqliteConnection,
    movements: &[Movement],
    sign: i64,
) -> Result<(), sqlx::Error> {
    let now = Utc::now();

    for (name, qty) in movements {
        let delta = sign * qty;

        // RETURNING lets us observe the post-update level without a second read
        let remaining: Option<i64> = sqlx::query_scalar(
            "UPDATE products SET remaining = remaining + ?2, updated_at = ?3 \
             WHERE name = ?1 RETURNING remaining",
        )
        .bind(name)
        .bind(delta)
        .bind(now)
        .fetch_optional(&mut *conn)
        .await?;

        match remaining {
            None => {
                // Free-text or adjustment item: intentionally no catalog match
                debug!(item = %name, "No catalog product for sale item, stock untouched");
            }
            Some(level) if level < 0 => {
                warn!(product = %name, remaining = level, "Product oversold, stock is negative");
            }
            Some(level) => {
                debug!(product = %name, delta, remaining = level, "Stock updated");
            }
        }
    }

    Ok(())
}

/// Consumes stock for a recorded sale, OUTSIDE the sale's transaction.
///
/// The sale is already committed when this runs; a failure here must not
/// un-record it. Callers log the error on the operator channel and return
/// success regardless (sale wins over inventory consistency).
pub(crate) async fn apply_sale_stock(pool: &SqlitePool, items: &[SaleItem]) -> DbResult<()> {
    let movements = movements_of_items(items);
    if movements.is_empty() {
        return Ok(());
    }

    let mut conn = pool.acquire().await?;
    apply_movements(&mut conn, &movements, -1).await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use dukaan_core::ADJUSTMENT_DESCRIPTION;

    fn draft(desc: &str, qty: i64) -> SaleItemDraft {
        SaleItemDraft {
            description: desc.into(),
            quantity: qty,
            unit_price_paisa: 100,
        }
    }

    #[test]
    fn test_movements_skip_blank_and_nonpositive() {
        let drafts = vec![
            draft("Widget", 5),
            draft("   ", 3),
            draft("Gadget", 0),
            draft("Gizmo", -2),
        ];
        let movements = movements_of_drafts(&drafts);
        assert_eq!(movements, vec![("Widget".to_string(), 5)]);
    }

    #[test]
    fn test_adjustment_description_is_a_movement_but_never_matches() {
        // The adjustment row passes the filter; it is the catalog lookup
        // that is guaranteed to miss. The sale-level is_adjustment skip in
        // the lifecycle service is the second line of defense.
        let drafts = vec![draft(ADJUSTMENT_DESCRIPTION, 1)];
        let movements = movements_of_drafts(&drafts);
        assert_eq!(movements.len(), 1);
    }
}
