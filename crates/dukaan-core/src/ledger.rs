//! # Ledger Math
//!
//! Pure balance arithmetic for the reconciliation core.
//!
//! ## The Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Customer Balance Model                               │
//! │                                                                         │
//! │   total balance = opening balance + Σ sale.balance                      │
//! │                   ───────┬───────   ──────┬───────                      │
//! │                          │                │                             │
//! │            registry row (0 if      every journal entry                  │
//! │            the customer is         matching the customer                │
//! │            not registered)         identity                             │
//! │                                                                         │
//! │   Adjusting to a target either rewrites the opening balance             │
//! │   (registered) or posts a synthetic zero-value sale whose               │
//! │   balance is exactly the delta (normal).                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is deterministic; the database services feed these
//! functions and persist their results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::SaleItemDraft;

// =============================================================================
// Sale Totals
// =============================================================================

/// The derived financial fields of a sale.
///
/// Invariants enforced by construction:
/// - `sub_total = Σ quantity × unit price`
/// - `total = sub_total + others - discount`
/// - `balance = total - received`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleTotals {
    pub sub_total: Money,
    pub total: Money,
    pub balance: Money,
}

/// Computes the stored totals for a draft invoice.
///
/// ## Example
/// ```rust
/// use dukaan_core::ledger::compute_totals;
/// use dukaan_core::types::SaleItemDraft;
/// use dukaan_core::Money;
///
/// let items = vec![SaleItemDraft {
///     description: "Widget".into(),
///     quantity: 2,
///     unit_price_paisa: 500,
/// }];
/// let totals = compute_totals(
///     &items,
///     Money::from_paisa(100), // others
///     Money::from_paisa(50),  // discount
///     Money::from_paisa(700), // received
/// );
/// assert_eq!(totals.sub_total.paisa(), 1000);
/// assert_eq!(totals.total.paisa(), 1050);
/// assert_eq!(totals.balance.paisa(), 350);
/// ```
pub fn compute_totals(
    items: &[SaleItemDraft],
    others: Money,
    discount: Money,
    received: Money,
) -> SaleTotals {
    let sub_total: Money = items
        .iter()
        .map(|item| Money::from_paisa(item.unit_price_paisa).multiply_quantity(item.quantity))
        .sum();
    let total = sub_total + others - discount;
    let balance = total - received;

    SaleTotals {
        sub_total,
        total,
        balance,
    }
}

// =============================================================================
// Resolved Balance
// =============================================================================

/// The outcome of resolving one customer identity against the ledger.
///
/// Computed fresh on every read; the journal is mutated independently so
/// nothing here is ever cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedBalance {
    pub opening_balance_paisa: i64,
    pub sales_balance_paisa: i64,
    pub total_balance_paisa: i64,
}

impl ResolvedBalance {
    /// Merges an opening balance with the sum of matching sale balances.
    pub fn new(opening: Money, sales: Money) -> Self {
        ResolvedBalance {
            opening_balance_paisa: opening.paisa(),
            sales_balance_paisa: sales.paisa(),
            total_balance_paisa: (opening + sales).paisa(),
        }
    }

    #[inline]
    pub fn total_balance(&self) -> Money {
        Money::from_paisa(self.total_balance_paisa)
    }

    #[inline]
    pub fn sales_balance(&self) -> Money {
        Money::from_paisa(self.sales_balance_paisa)
    }
}

// =============================================================================
// Customer Balance (listing entry)
// =============================================================================

/// One row of the customer/recovery listings: a resolved identity with its
/// purchase statistics. Registered customers carry their registry fields;
/// normal customers are synthesized purely from journal grouping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerBalance {
    /// Registry id; None for normal customers.
    pub customer_id: Option<String>,
    pub name: String,
    pub phone: String,
    pub city: Option<String>,

    /// True when no registry row matches this identity.
    pub is_normal: bool,

    pub opening_balance_paisa: i64,
    pub sales_balance_paisa: i64,
    pub total_balance_paisa: i64,

    /// Number of journal entries for this identity.
    pub total_purchases: i64,

    /// Σ sub_total over the identity's sales.
    pub amount_spent_paisa: i64,

    pub last_purchase_date: Option<DateTime<Utc>>,
}

impl CustomerBalance {
    #[inline]
    pub fn total_balance(&self) -> Money {
        Money::from_paisa(self.total_balance_paisa)
    }
}

// =============================================================================
// Adjustment Math
// =============================================================================

/// Computes the delta needed to move `current_total` to `target`, or `None`
/// when the difference is within the tolerance band (no adjustment needed).
///
/// ## Example
/// ```rust
/// use dukaan_core::ledger::adjustment_delta;
/// use dukaan_core::Money;
///
/// let current = Money::from_paisa(10_000);
/// assert_eq!(
///     adjustment_delta(current, Money::from_paisa(15_000), 1),
///     Some(Money::from_paisa(5_000))
/// );
/// assert_eq!(adjustment_delta(current, current, 1), None);
/// ```
pub fn adjustment_delta(current_total: Money, target: Money, epsilon_paisa: i64) -> Option<Money> {
    let delta = target - current_total;
    if delta.abs().paisa() < epsilon_paisa {
        None
    } else {
        Some(delta)
    }
}

/// The financial fields of a synthetic adjustment sale.
///
/// The row is zero-valued (`sub_total = total = 0`) so the ledger identity
/// `balance = total - received` forces `received = -delta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustmentPosting {
    pub balance: Money,
    pub received: Money,
}

impl AdjustmentPosting {
    /// Builds the posting carrying exactly `delta`.
    pub fn for_delta(delta: Money) -> Self {
        AdjustmentPosting {
            balance: delta,
            received: -delta,
        }
    }
}

/// Opening balance that makes the resolver reproduce `target` given the
/// identity's current sales balance. Used both when rewriting a registered
/// customer's opening balance and when registering a normal customer at a
/// target balance.
#[inline]
pub fn opening_balance_for_target(target: Money, sales_balance: Money) -> Money {
    target - sales_balance
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(qty: i64, price: i64) -> SaleItemDraft {
        SaleItemDraft {
            description: "Widget".into(),
            quantity: qty,
            unit_price_paisa: price,
        }
    }

    #[test]
    fn test_compute_totals_invariants() {
        let items = vec![item(5, 200), item(3, 150)];
        let totals = compute_totals(
            &items,
            Money::from_paisa(100),
            Money::from_paisa(50),
            Money::from_paisa(1000),
        );

        assert_eq!(totals.sub_total.paisa(), 1450);
        assert_eq!(totals.total.paisa(), 1500);
        assert_eq!(totals.balance.paisa(), 500);
    }

    #[test]
    fn test_compute_totals_empty_items() {
        let totals = compute_totals(&[], Money::zero(), Money::zero(), Money::zero());
        assert_eq!(totals.sub_total, Money::zero());
        assert_eq!(totals.total, Money::zero());
        assert_eq!(totals.balance, Money::zero());
    }

    #[test]
    fn test_resolved_balance_merges_opening_and_sales() {
        let resolved = ResolvedBalance::new(Money::from_paisa(500), Money::from_paisa(1500));
        assert_eq!(resolved.opening_balance_paisa, 500);
        assert_eq!(resolved.sales_balance_paisa, 1500);
        assert_eq!(resolved.total_balance_paisa, 2000);
    }

    /// Balance resolution is a plain sum: insertion order cannot matter.
    #[test]
    fn test_sales_balance_order_independent() {
        let balances = [100, -40, 370, 0, 25];
        let forward: Money = balances.iter().map(|&p| Money::from_paisa(p)).sum();
        let reverse: Money = balances.iter().rev().map(|&p| Money::from_paisa(p)).sum();
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_adjustment_delta_within_tolerance() {
        let current = Money::from_paisa(10_000);
        assert_eq!(adjustment_delta(current, current, 1), None);
        // A wider epsilon widens the dead zone
        assert_eq!(
            adjustment_delta(current, Money::from_paisa(10_050), 100),
            None
        );
        assert_eq!(
            adjustment_delta(current, Money::from_paisa(10_150), 100),
            Some(Money::from_paisa(150))
        );
    }

    #[test]
    fn test_adjustment_delta_signs() {
        let current = Money::from_paisa(10_000);
        assert_eq!(
            adjustment_delta(current, Money::from_paisa(15_000), 1),
            Some(Money::from_paisa(5_000))
        );
        assert_eq!(
            adjustment_delta(current, Money::from_paisa(4_000), 1),
            Some(Money::from_paisa(-6_000))
        );
    }

    #[test]
    fn test_adjustment_posting() {
        let posting = AdjustmentPosting::for_delta(Money::from_paisa(5_000));
        assert_eq!(posting.balance.paisa(), 5_000);
        assert_eq!(posting.received.paisa(), -5_000);

        // Reducing a balance means money was received
        let posting = AdjustmentPosting::for_delta(Money::from_paisa(-2_000));
        assert_eq!(posting.balance.paisa(), -2_000);
        assert_eq!(posting.received.paisa(), 2_000);
    }

    #[test]
    fn test_opening_balance_for_target() {
        // Registering at exactly the current sales balance carries nothing over
        assert_eq!(
            opening_balance_for_target(Money::from_paisa(10_000), Money::from_paisa(10_000)),
            Money::zero()
        );
        assert_eq!(
            opening_balance_for_target(Money::from_paisa(15_000), Money::from_paisa(10_000)),
            Money::from_paisa(5_000)
        );
    }
}
