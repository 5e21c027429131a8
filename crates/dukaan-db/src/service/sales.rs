//! # Sale Lifecycle Service
//!
//! Recording, editing, deleting and salesman-linking of journal entries,
//! with invoice numbering and inventory sync.
//!
//! ## Write Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record:  ┌── ONE transaction ──────────────┐   ┌── afterwards ──────┐ │
//! │           │ resolve customer link           │   │ consume stock      │ │
//! │           │ invoice number = max + 1        │ → │ (failure is logged,│ │
//! │           │ insert sale + items             │   │  sale still wins)  │ │
//! │           └─────────────────────────────────┘   └────────────────────┘ │
//! │           The UNIQUE index on invoice_number turns a numbering race    │
//! │           into a retry instead of a duplicate.                         │
//! │                                                                         │
//! │  edit:    ONE transaction: revert old stock, apply new stock,          │
//! │           re-resolve link, rewrite record, replace items               │
//! │                                                                         │
//! │  delete:  ONE transaction: restore stock, delete record                │
//! │                                                                         │
//! │  link:    ONE transaction: stamp salesman, bump running total          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::DbError;
use crate::pool::Database;
use crate::service::inventory::{apply_movements, apply_sale_stock, movements_of_drafts, movements_of_items};
use crate::service::ledger::find_customer_by_identity;
use crate::service::{ServiceError, ServiceResult};
use dukaan_core::ledger::compute_totals;
use dukaan_core::validation::validate_sale_draft;
use dukaan_core::{CoreError, CustomerIdentity, Money, Sale, SaleDraft, SaleItem, Salesman};

/// Attempts before giving up on an invoice-number collision. Collisions need
/// two writers inside the same few microseconds; one retry is normally
/// enough, three is generous.
const MAX_INVOICE_RETRIES: u32 = 3;

/// Service owning the sale write paths.
#[derive(Debug, Clone)]
pub struct SaleService {
    db: Database,
}

impl SaleService {
    /// Creates a new SaleService.
    pub fn new(db: Database) -> Self {
        SaleService { db }
    }

    /// Records a new sale.
    ///
    /// The sale and its items commit first; stock is consumed afterwards so
    /// an inventory failure can never lose a recorded sale. That failure is
    /// surfaced on the error log for the operator, not to the caller.
    pub async fn record(&self, draft: SaleDraft) -> ServiceResult<Sale> {
        validate_sale_draft(&draft)?;

        let identity = CustomerIdentity::new(&draft.customer_name, &draft.customer_phone);
        let totals = compute_totals(
            &draft.items,
            Money::from_paisa(draft.others_paisa),
            Money::from_paisa(draft.discount_paisa),
            Money::from_paisa(draft.received_paisa),
        );
        let now = Utc::now();

        for attempt in 1..=MAX_INVOICE_RETRIES {
            let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

            let customer = find_customer_by_identity(&mut tx, &identity).await.map_err(DbError::from)?;
            let invoice_number = next_invoice_number(&mut tx).await?;

            let sale_id = Uuid::new_v4().to_string();
            let sale = Sale {
                id: sale_id.clone(),
                invoice_number,
                customer_id: customer.map(|c| c.id),
                customer_name: identity.name.clone(),
                customer_phone: identity.phone.clone(),
                sub_total_paisa: totals.sub_total.paisa(),
                others_paisa: draft.others_paisa,
                discount_paisa: draft.discount_paisa,
                total_paisa: totals.total.paisa(),
                received_paisa: draft.received_paisa,
                balance_paisa: totals.balance.paisa(),
                invoice_date: draft.invoice_date,
                salesman_id: draft.salesman_id.clone(),
                is_adjustment: false,
                created_at: now,
                updated_at: now,
            };
            let items: Vec<SaleItem> = draft
                .items
                .iter()
                .map(|item| SaleItem {
                    id: Uuid::new_v4().to_string(),
                    sale_id: sale_id.clone(),
                    description: item.description.clone(),
                    quantity: item.quantity,
                    unit_price_paisa: item.unit_price_paisa,
                })
                .collect();

            let inserted: Result<(), DbError> = async {
                insert_sale(&mut tx, &sale).await?;
                insert_items(&mut tx, &items).await?;
                Ok(())
            }
            .await;

            match inserted {
                Ok(()) => {
                    tx.commit().await.map_err(DbError::from)?;

                    info!(
                        sale_id = %sale.id,
                        invoice_number,
                        total = %sale.total(),
                        items = items.len(),
                        "Sale recorded"
                    );

                    // Inventory runs after commit: the sale wins over stock
                    // consistency, a sync failure is an operator alert only
                    if let Err(e) = apply_sale_stock(self.db.pool(), &items).await {
                        error!(
                            sale_id = %sale.id,
                            error = %e,
                            "Inventory update failed, but sale was saved"
                        );
                    }

                    return Ok(sale);
                }
                Err(e) if e.is_unique_violation_on("invoice_number") && attempt < MAX_INVOICE_RETRIES => {
                    warn!(invoice_number, attempt, "Invoice number collision, retrying");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ServiceError::Db(DbError::TransactionFailed(
            "invoice number contention persisted across retries".to_string(),
        )))
    }

    /// Edits a sale as a full-record rewrite.
    ///
    /// Stock is reverted for the complete old item list and re-applied for
    /// the complete new list (never diffed), the customer link is
    /// re-resolved from the new identity, and everything commits atomically.
    pub async fn edit(&self, id: &str, draft: SaleDraft) -> ServiceResult<Sale> {
        validate_sale_draft(&draft)?;

        let identity = CustomerIdentity::new(&draft.customer_name, &draft.customer_phone);
        let totals = compute_totals(
            &draft.items,
            Money::from_paisa(draft.others_paisa),
            Money::from_paisa(draft.discount_paisa),
            Money::from_paisa(draft.received_paisa),
        );
        let now = Utc::now();

        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        let old = fetch_sale(&mut tx, id)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| CoreError::SaleNotFound(id.to_string()))?;
        let old_items = fetch_items(&mut tx, id).await.map_err(DbError::from)?;

        // Adjustment rows are pure ledger postings; their items must never
        // resolve against the catalog in either direction
        if !old.is_adjustment {
            apply_movements(&mut tx, &movements_of_items(&old_items), 1)
                .await
                .map_err(DbError::from)?;
            apply_movements(&mut tx, &movements_of_drafts(&draft.items), -1)
                .await
                .map_err(DbError::from)?;
        }

        let customer = find_customer_by_identity(&mut tx, &identity).await.map_err(DbError::from)?;

        let updated = Sale {
            id: old.id.clone(),
            invoice_number: old.invoice_number,
            customer_id: customer.map(|c| c.id),
            customer_name: identity.name.clone(),
            customer_phone: identity.phone.clone(),
            sub_total_paisa: totals.sub_total.paisa(),
            others_paisa: draft.others_paisa,
            discount_paisa: draft.discount_paisa,
            total_paisa: totals.total.paisa(),
            received_paisa: draft.received_paisa,
            balance_paisa: totals.balance.paisa(),
            invoice_date: draft.invoice_date,
            salesman_id: draft.salesman_id.clone(),
            is_adjustment: old.is_adjustment,
            created_at: old.created_at,
            updated_at: now,
        };

        sqlx::query(
            "UPDATE sales SET customer_id = ?2, customer_name = ?3, customer_phone = ?4, \
             sub_total_paisa = ?5, others_paisa = ?6, discount_paisa = ?7, total_paisa = ?8, \
             received_paisa = ?9, balance_paisa = ?10, invoice_date = ?11, salesman_id = ?12, \
             updated_at = ?13 \
             WHERE id = ?1",
        )
        .bind(&updated.id)
        .bind(&updated.customer_id)
        .bind(&updated.customer_name)
        .bind(&updated.customer_phone)
        .bind(updated.sub_total_paisa)
        .bind(updated.others_paisa)
        .bind(updated.discount_paisa)
        .bind(updated.total_paisa)
        .bind(updated.received_paisa)
        .bind(updated.balance_paisa)
        .bind(updated.invoice_date)
        .bind(&updated.salesman_id)
        .bind(updated.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        sqlx::query("DELETE FROM sale_items WHERE sale_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

        let items: Vec<SaleItem> = draft
            .items
            .iter()
            .map(|item| SaleItem {
                id: Uuid::new_v4().to_string(),
                sale_id: id.to_string(),
                description: item.description.clone(),
                quantity: item.quantity,
                unit_price_paisa: item.unit_price_paisa,
            })
            .collect();
        insert_items(&mut tx, &items).await?;

        tx.commit().await.map_err(DbError::from)?;

        info!(sale_id = %id, invoice_number = updated.invoice_number, "Sale edited, inventory adjusted");

        Ok(updated)
    }

    /// Deletes a sale and returns its stock to the shelf, atomically.
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        let sale = fetch_sale(&mut tx, id)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| CoreError::SaleNotFound(id.to_string()))?;
        let items = fetch_items(&mut tx, id).await.map_err(DbError::from)?;

        if !sale.is_adjustment {
            apply_movements(&mut tx, &movements_of_items(&items), 1)
                .await
                .map_err(DbError::from)?;
        }

        // Items cascade with the sale row
        sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;

        info!(sale_id = %id, invoice_number = sale.invoice_number, "Sale deleted, inventory restored");

        Ok(())
    }

    /// Assigns an unowned sale to a salesman and credits the sale's
    /// sub-total to the salesman's running total.
    pub async fn link_salesman(&self, invoice_number: i64, salesman_id: &str) -> ServiceResult<()> {
        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        let sale = fetch_sale_by_invoice(&mut tx, invoice_number)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| CoreError::SaleNotFound(format!("invoice #{invoice_number}")))?;

        let salesman = fetch_salesman(&mut tx, salesman_id)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| CoreError::SalesmanNotFound(salesman_id.to_string()))?;

        if sale.salesman_id.is_some() {
            return Err(ServiceError::Core(CoreError::SaleAlreadyLinked {
                invoice_number,
            }));
        }

        let now = Utc::now();

        sqlx::query("UPDATE sales SET salesman_id = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(&sale.id)
            .bind(salesman_id)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

        sqlx::query(
            "UPDATE salesmen SET total_sales_paisa = total_sales_paisa + ?2 WHERE id = ?1",
        )
        .bind(salesman_id)
        .bind(sale.sub_total_paisa)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;

        info!(
            invoice_number,
            salesman = %salesman.name,
            credited = sale.sub_total_paisa,
            "Sale linked to salesman"
        );

        Ok(())
    }
}

// =============================================================================
// Shared Queries
// =============================================================================

/// Next invoice number: max + 1, computed inside the caller's transaction.
/// The UNIQUE index on invoice_number backs this against concurrent inserts.
pub(crate) async fn next_invoice_number(
    conn: &mut SqliteConnection,
) -> Result<i64, sqlx::Error> {
    let max: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(invoice_number), 0) FROM sales")
        .fetch_one(conn)
        .await?;

    Ok(max + 1)
}

/// Inserts a sale row inside the caller's transaction.
pub(crate) async fn insert_sale(
    conn: &mut SqliteConnection,
    sale: &Sale,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO sales (id, invoice_number, customer_id, customer_name, customer_phone, \
         sub_total_paisa, others_paisa, discount_paisa, total_paisa, received_paisa, \
         balance_paisa, invoice_date, salesman_id, is_adjustment, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
    )
    .bind(&sale.id)
    .bind(sale.invoice_number)
    .bind(&sale.customer_id)
    .bind(&sale.customer_name)
    .bind(&sale.customer_phone)
    .bind(sale.sub_total_paisa)
    .bind(sale.others_paisa)
    .bind(sale.discount_paisa)
    .bind(sale.total_paisa)
    .bind(sale.received_paisa)
    .bind(sale.balance_paisa)
    .bind(sale.invoice_date)
    .bind(&sale.salesman_id)
    .bind(sale.is_adjustment)
    .bind(sale.created_at)
    .bind(sale.updated_at)
    .execute(conn)
    .await?;

    Ok(())
}

/// Inserts sale items inside the caller's transaction.
pub(crate) async fn insert_items(
    conn: &mut SqliteConnection,
    items: &[SaleItem],
) -> Result<(), DbError> {
    for item in items {
        sqlx::query(
            "INSERT INTO sale_items (id, sale_id, description, quantity, unit_price_paisa) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&item.id)
        .bind(&item.sale_id)
        .bind(&item.description)
        .bind(item.quantity)
        .bind(item.unit_price_paisa)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

async fn fetch_sale(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Option<Sale>, sqlx::Error> {
    sqlx::query_as::<_, Sale>(&format!(
        "SELECT {} FROM sales WHERE id = ?1",
        crate::repository::sale::SALE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}

async fn fetch_sale_by_invoice(
    conn: &mut SqliteConnection,
    invoice_number: i64,
) -> Result<Option<Sale>, sqlx::Error> {
    sqlx::query_as::<_, Sale>(&format!(
        "SELECT {} FROM sales WHERE invoice_number = ?1",
        crate::repository::sale::SALE_COLUMNS
    ))
    .bind(invoice_number)
    .fetch_optional(conn)
    .await
}

async fn fetch_items(
    conn: &mut SqliteConnection,
    sale_id: &str,
) -> Result<Vec<SaleItem>, sqlx::Error> {
    sqlx::query_as::<_, SaleItem>(
        "SELECT id, sale_id, description, quantity, unit_price_paisa \
         FROM sale_items WHERE sale_id = ?1 ORDER BY rowid",
    )
    .bind(sale_id)
    .fetch_all(conn)
    .await
}

async fn fetch_salesman(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Option<Salesman>, sqlx::Error> {
    sqlx::query_as::<_, Salesman>(&format!(
        "SELECT {} FROM salesmen WHERE id = ?1",
        crate::repository::salesman::SALESMAN_COLUMNS
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}
