//! # Ledger Service
//!
//! Balance resolution and the adjustment engine.
//!
//! ## Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              How a customer balance is resolved                         │
//! │                                                                         │
//! │  identity (name, phone)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  registered? ──yes──► opening balance                                  │
//! │       │                    +                                            │
//! │       │               Σ balance of sales LINKED by customer_id         │
//! │       │                    +                                            │
//! │       │               Σ balance of UNLINKED sales matching the         │
//! │       │               trimmed identity (compatibility path)            │
//! │       │                                                                 │
//! │       └──no───► 0 + Σ balance of unlinked sales matching the identity  │
//! │                                                                         │
//! │  Computed fresh on every read - the journal moves independently.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adjustment
//! One policy per classification, applied inside a single transaction:
//!
//! - **Registered** customer: rewrite `opening_balance` so the resolver
//!   reproduces the target. The journal is never inflated with synthetic
//!   rows for registered customers.
//! - **Normal** customer: post a zero-value adjustment sale carrying exactly
//!   the delta (there is no registry row to rewrite).
//!
//! A delta inside the epsilon band is a success-no-op, which also makes
//! repeated calls with the same target idempotent.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::pool::Database;
use crate::repository::customer::generate_customer_id;
use crate::service::sales::{insert_items, insert_sale, next_invoice_number};
use crate::service::{ServiceError, ServiceResult};
use dukaan_core::ledger::{
    adjustment_delta, opening_balance_for_target, AdjustmentPosting, CustomerBalance,
    ResolvedBalance,
};
use dukaan_core::validation::{validate_customer_name, validate_customer_phone};
use dukaan_core::{
    CoreError, Customer, CustomerIdentity, Money, Sale, SaleItem, ADJUSTMENT_DESCRIPTION,
    DEFAULT_BALANCE_EPSILON_PAISA,
};

// =============================================================================
// Outcome Types
// =============================================================================

/// Result of an adjustment request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdjustmentOutcome {
    /// False when the target was already met within tolerance.
    pub adjusted: bool,

    /// The delta that was applied (0 when no adjustment was needed).
    pub delta_paisa: i64,
}

/// The recovery (dues collection) view: every debtor plus headline stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryReport {
    pub customers: Vec<CustomerBalance>,
    pub total_dues_paisa: i64,
    pub customers_with_dues: i64,
    pub top_debtor_name: Option<String>,
}

// =============================================================================
// Ledger Service
// =============================================================================

/// Balance resolver + adjustment engine over the shared database handle.
#[derive(Debug, Clone)]
pub struct LedgerService {
    db: Database,
    epsilon_paisa: i64,
}

impl LedgerService {
    /// Creates a ledger service with the default one-paisa tolerance.
    pub fn new(db: Database) -> Self {
        LedgerService {
            db,
            epsilon_paisa: DEFAULT_BALANCE_EPSILON_PAISA,
        }
    }

    /// Overrides the no-op tolerance band (in paisa).
    pub fn with_epsilon(mut self, epsilon_paisa: i64) -> Self {
        self.epsilon_paisa = epsilon_paisa;
        self
    }

    /// Resolves one identity's balance. Pure read, no caching.
    pub async fn resolve(&self, identity: &CustomerIdentity) -> ServiceResult<ResolvedBalance> {
        validate_identity(identity)?;

        let mut conn = self.db.pool().acquire().await.map_err(crate::error::DbError::from)?;

        let customer = find_customer_by_identity(&mut conn, identity).await?;
        let opening = customer
            .as_ref()
            .map(|c| c.opening_balance_paisa)
            .unwrap_or(0);
        let sales =
            sales_balance_of(&mut conn, customer.as_ref().map(|c| c.id.as_str()), identity)
                .await?;

        Ok(ResolvedBalance::new(
            Money::from_paisa(opening),
            Money::from_paisa(sales),
        ))
    }

    /// Resolves every distinct identity present in the registry or the
    /// journal: registered customers with their stats, then the "normal"
    /// customers synthesized from unlinked journal groups. Sorted by name.
    pub async fn resolve_all(&self) -> ServiceResult<Vec<CustomerBalance>> {
        let customers = self.db.customers().list().await?;

        let pool = self.db.pool();

        let linked: Vec<LinkedAgg> = sqlx::query_as(
            "SELECT customer_id, \
                    COALESCE(SUM(balance_paisa), 0) AS sales_balance_paisa, \
                    COUNT(*) AS total_purchases, \
                    COALESCE(SUM(sub_total_paisa), 0) AS amount_spent_paisa, \
                    MAX(invoice_date) AS last_purchase_date \
             FROM sales WHERE customer_id IS NOT NULL \
             GROUP BY customer_id",
        )
        .fetch_all(pool)
        .await
        .map_err(crate::error::DbError::from)?;

        let unlinked: Vec<UnlinkedAgg> = sqlx::query_as(
            "SELECT TRIM(customer_name) AS customer_name, \
                    TRIM(customer_phone) AS customer_phone, \
                    COALESCE(SUM(balance_paisa), 0) AS sales_balance_paisa, \
                    COUNT(*) AS total_purchases, \
                    COALESCE(SUM(sub_total_paisa), 0) AS amount_spent_paisa, \
                    MAX(invoice_date) AS last_purchase_date \
             FROM sales WHERE customer_id IS NULL \
             GROUP BY TRIM(customer_name), TRIM(customer_phone)",
        )
        .fetch_all(pool)
        .await
        .map_err(crate::error::DbError::from)?;

        let linked_by_id: HashMap<String, LinkedAgg> = linked
            .into_iter()
            .map(|agg| (agg.customer_id.clone(), agg))
            .collect();

        // Unlinked groups keyed by identity; registered customers consume
        // their matching group (compatibility path), the leftovers become
        // normal customers.
        let mut unlinked_by_key: HashMap<String, UnlinkedAgg> = unlinked
            .into_iter()
            .map(|agg| {
                let key = CustomerIdentity::new(&agg.customer_name, &agg.customer_phone).key();
                (key, agg)
            })
            .collect();

        let mut balances = Vec::with_capacity(customers.len() + unlinked_by_key.len());

        for customer in customers {
            let identity = customer.identity();
            let from_link = linked_by_id.get(&customer.id);
            let from_string = unlinked_by_key.remove(&identity.key());

            let sales_balance = from_link.map(|a| a.sales_balance_paisa).unwrap_or(0)
                + from_string.as_ref().map(|a| a.sales_balance_paisa).unwrap_or(0);
            let total_purchases = from_link.map(|a| a.total_purchases).unwrap_or(0)
                + from_string.as_ref().map(|a| a.total_purchases).unwrap_or(0);
            let amount_spent = from_link.map(|a| a.amount_spent_paisa).unwrap_or(0)
                + from_string.as_ref().map(|a| a.amount_spent_paisa).unwrap_or(0);
            let last_purchase_date = [
                from_link.and_then(|a| a.last_purchase_date),
                from_string.as_ref().and_then(|a| a.last_purchase_date),
            ]
            .into_iter()
            .flatten()
            .max();

            balances.push(CustomerBalance {
                customer_id: Some(customer.id.clone()),
                name: customer.name.clone(),
                phone: customer.phone.clone(),
                city: customer.city.clone(),
                is_normal: false,
                opening_balance_paisa: customer.opening_balance_paisa,
                sales_balance_paisa: sales_balance,
                total_balance_paisa: customer.opening_balance_paisa + sales_balance,
                total_purchases,
                amount_spent_paisa: amount_spent,
                last_purchase_date,
            });
        }

        for agg in unlinked_by_key.into_values() {
            balances.push(CustomerBalance {
                customer_id: None,
                name: agg.customer_name,
                phone: agg.customer_phone,
                city: None,
                is_normal: true,
                opening_balance_paisa: 0,
                sales_balance_paisa: agg.sales_balance_paisa,
                total_balance_paisa: agg.sales_balance_paisa,
                total_purchases: agg.total_purchases,
                amount_spent_paisa: agg.amount_spent_paisa,
                last_purchase_date: agg.last_purchase_date,
            });
        }

        balances.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(balances)
    }

    /// The recovery view: debtors only (total > 0), largest balance first,
    /// plus the headline stats the dashboard shows.
    pub async fn recovery_report(&self) -> ServiceResult<RecoveryReport> {
        let mut debtors: Vec<CustomerBalance> = self
            .resolve_all()
            .await?
            .into_iter()
            .filter(|c| c.total_balance_paisa > 0)
            .collect();

        debtors.sort_by(|a, b| b.total_balance_paisa.cmp(&a.total_balance_paisa));

        let total_dues_paisa = debtors.iter().map(|c| c.total_balance_paisa).sum();
        let customers_with_dues = debtors.len() as i64;
        let top_debtor_name = debtors.first().map(|c| c.name.clone());

        Ok(RecoveryReport {
            customers: debtors,
            total_dues_paisa,
            customers_with_dues,
            top_debtor_name,
        })
    }

    /// Moves an identity's total balance to `target_total_paisa`.
    ///
    /// The whole resolve-then-adjust sequence runs in one transaction so a
    /// concurrent journal write cannot slip between the read and the write.
    pub async fn adjust(
        &self,
        identity: &CustomerIdentity,
        target_total_paisa: i64,
    ) -> ServiceResult<AdjustmentOutcome> {
        validate_identity(identity)?;

        let target = Money::from_paisa(target_total_paisa);

        let mut tx = self.db.pool().begin().await.map_err(crate::error::DbError::from)?;

        let customer = find_customer_by_identity(&mut tx, identity).await?;
        let opening = Money::from_paisa(
            customer
                .as_ref()
                .map(|c| c.opening_balance_paisa)
                .unwrap_or(0),
        );
        let sales = Money::from_paisa(
            sales_balance_of(&mut tx, customer.as_ref().map(|c| c.id.as_str()), identity)
                .await?,
        );
        let current = opening + sales;

        let Some(delta) = adjustment_delta(current, target, self.epsilon_paisa) else {
            tx.commit().await.map_err(crate::error::DbError::from)?;
            debug!(identity = %identity, "No adjustment needed, balance already at target");
            return Ok(AdjustmentOutcome {
                adjusted: false,
                delta_paisa: 0,
            });
        };

        match customer {
            Some(customer) => {
                // Registered: rewrite the opening balance, never the journal
                let new_opening = opening_balance_for_target(target, sales);
                let now = Utc::now();

                sqlx::query(
                    "UPDATE customers SET opening_balance_paisa = ?2, updated_at = ?3 \
                     WHERE id = ?1",
                )
                .bind(&customer.id)
                .bind(new_opening.paisa())
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(crate::error::DbError::from)?;

                tx.commit().await.map_err(crate::error::DbError::from)?;

                info!(
                    identity = %identity,
                    delta = %delta,
                    new_opening = %new_opening,
                    "Adjusted registered customer via opening balance"
                );
            }
            None => {
                // Normal: post a synthetic zero-value sale carrying the delta
                let posting = AdjustmentPosting::for_delta(delta);
                let now = Utc::now();
                let invoice_number = next_invoice_number(&mut tx).await?;

                let sale_id = Uuid::new_v4().to_string();
                let sale = Sale {
                    id: sale_id.clone(),
                    invoice_number,
                    customer_id: None,
                    customer_name: identity.name.clone(),
                    customer_phone: identity.phone.clone(),
                    sub_total_paisa: 0,
                    others_paisa: 0,
                    discount_paisa: 0,
                    total_paisa: 0,
                    received_paisa: posting.received.paisa(),
                    balance_paisa: posting.balance.paisa(),
                    invoice_date: now,
                    salesman_id: None,
                    is_adjustment: true,
                    created_at: now,
                    updated_at: now,
                };
                let item = SaleItem {
                    id: Uuid::new_v4().to_string(),
                    sale_id,
                    description: ADJUSTMENT_DESCRIPTION.to_string(),
                    quantity: 1,
                    unit_price_paisa: 0,
                };

                insert_sale(&mut tx, &sale).await?;
                insert_items(&mut tx, std::slice::from_ref(&item)).await?;

                tx.commit().await.map_err(crate::error::DbError::from)?;

                info!(
                    identity = %identity,
                    delta = %delta,
                    invoice_number,
                    "Adjusted normal customer via adjustment sale"
                );
            }
        }

        Ok(AdjustmentOutcome {
            adjusted: true,
            delta_paisa: delta.paisa(),
        })
    }

    /// Registers a "normal" customer at a target total balance.
    ///
    /// The opening balance is chosen so the resolver reproduces the target
    /// (`target - current sales balance`; registering at exactly the current
    /// sales balance carries nothing over). Unlinked sales with the identity
    /// are adopted in the same transaction.
    pub async fn register_with_target(
        &self,
        identity: &CustomerIdentity,
        city: Option<String>,
        target_total_paisa: i64,
    ) -> ServiceResult<Customer> {
        validate_identity(identity)?;

        let mut tx = self.db.pool().begin().await.map_err(crate::error::DbError::from)?;

        if find_customer_by_identity(&mut tx, identity).await?.is_some() {
            return Err(ServiceError::Core(CoreError::CustomerAlreadyRegistered {
                name: identity.name.clone(),
                phone: identity.phone.clone(),
            }));
        }

        let sales = Money::from_paisa(sales_balance_of(&mut tx, None, identity).await?);
        let opening = opening_balance_for_target(Money::from_paisa(target_total_paisa), sales);
        let now = Utc::now();

        let customer = Customer {
            id: generate_customer_id(),
            name: identity.name.clone(),
            phone: identity.phone.clone(),
            city,
            opening_balance_paisa: opening.paisa(),
            created_at: now,
            updated_at: now,
        };

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
        .await
        .map_err(crate::error::DbError::from)?;

        sqlx::query(
            "UPDATE sales SET customer_id = ?1 \
             WHERE customer_id IS NULL AND TRIM(customer_name) = ?2 AND TRIM(customer_phone) = ?3",
        )
        .bind(&customer.id)
        .bind(&identity.name)
        .bind(&identity.phone)
        .execute(&mut *tx)
        .await
        .map_err(crate::error::DbError::from)?;

        tx.commit().await.map_err(crate::error::DbError::from)?;

        info!(
            identity = %identity,
            opening_balance = %opening,
            "Registered normal customer at target balance"
        );

        Ok(customer)
    }
}

// =============================================================================
// Shared Queries
// =============================================================================

/// Finds the registered customer matching a trimmed identity, usable inside
/// a transaction.
pub(crate) async fn find_customer_by_identity(
    conn: &mut SqliteConnection,
    identity: &CustomerIdentity,
) -> Result<Option<Customer>, sqlx::Error> {
    sqlx::query_as::<_, Customer>(
        "SELECT id, name, phone, city, opening_balance_paisa, created_at, updated_at \
         FROM customers WHERE TRIM(name) = ?1 AND TRIM(phone) = ?2",
    )
    .bind(&identity.name)
    .bind(&identity.phone)
    .fetch_optional(conn)
    .await
}

/// Sums the balances of every sale belonging to the identity: rows linked by
/// `customer_id` plus unlinked rows matching the trimmed string identity.
pub(crate) async fn sales_balance_of(
    conn: &mut SqliteConnection,
    customer_id: Option<&str>,
    identity: &CustomerIdentity,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COALESCE(SUM(balance_paisa), 0) FROM sales \
         WHERE (?1 IS NOT NULL AND customer_id = ?1) \
            OR (customer_id IS NULL \
                AND TRIM(customer_name) = ?2 AND TRIM(customer_phone) = ?3)",
    )
    .bind(customer_id)
    .bind(&identity.name)
    .bind(&identity.phone)
    .fetch_one(conn)
    .await
}

fn validate_identity(identity: &CustomerIdentity) -> ServiceResult<()> {
    validate_customer_name(&identity.name)?;
    validate_customer_phone(&identity.phone)?;
    Ok(())
}

// =============================================================================
// Aggregate Rows
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct LinkedAgg {
    customer_id: String,
    sales_balance_paisa: i64,
    total_purchases: i64,
    amount_spent_paisa: i64,
    last_purchase_date: Option<chrono::DateTime<Utc>>,
}

#[derive(Debug, sqlx::FromRow)]
struct UnlinkedAgg {
    customer_name: String,
    customer_phone: String,
    sales_balance_paisa: i64,
    total_purchases: i64,
    amount_spent_paisa: i64,
    last_purchase_date: Option<chrono::DateTime<Utc>>,
}
