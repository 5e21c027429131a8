//! # Reporting Service
//!
//! Read-only aggregations behind the analytics page, the backup export and
//! the backup stats card. Everything is computed fresh per request from the
//! journal and the catalog; dues come from the same resolver the customer
//! pages use.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::pool::Database;
use crate::service::ledger::LedgerService;
use crate::service::ServiceResult;
use dukaan_core::Period;

// =============================================================================
// Report Types
// =============================================================================

/// Headline numbers for the analytics page.
///
/// Revenue, profit, purchases and expenses respect the selected period;
/// total dues are a lifetime figure by definition (a debt does not stop
/// existing outside the filter window).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_revenue_paisa: i64,
    pub total_sales: i64,
    pub avg_sale_value_paisa: i64,
    pub total_profit_paisa: i64,
    pub total_purchase_value_paisa: i64,
    pub total_expenses_paisa: i64,
    pub total_dues_paisa: i64,
}

/// One CSV row of the sales backup: a single sale item with its parent
/// sale's financial summary. Field renames become the CSV headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRow {
    #[serde(rename = "Invoice #")]
    pub invoice_number: i64,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Customer Name")]
    pub customer_name: String,
    #[serde(rename = "Customer Phone")]
    pub customer_phone: String,
    #[serde(rename = "Item Description")]
    pub description: String,
    #[serde(rename = "Quantity")]
    pub quantity: i64,
    #[serde(rename = "Price (paisa)")]
    pub unit_price_paisa: i64,
    #[serde(rename = "Item Total (paisa)")]
    pub item_total_paisa: i64,
    #[serde(rename = "Sub Total (paisa)")]
    pub sub_total_paisa: i64,
    #[serde(rename = "Discount (paisa)")]
    pub discount_paisa: i64,
    #[serde(rename = "Received (paisa)")]
    pub received_paisa: i64,
    #[serde(rename = "Balance (paisa)")]
    pub balance_paisa: i64,
}

/// Collection counts for the backup page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupStats {
    pub sales: i64,
    pub customers: i64,
    pub products: i64,
    pub categories: i64,
    pub purchases: i64,
    pub expenses: i64,
    pub salesmen: i64,
    pub vendors: i64,
}

// =============================================================================
// Report Service
// =============================================================================

/// Read-only reporting over the shared database handle.
#[derive(Debug, Clone)]
pub struct ReportService {
    db: Database,
}

impl ReportService {
    /// Creates a new ReportService.
    pub fn new(db: Database) -> Self {
        ReportService { db }
    }

    /// Computes the analytics summary for a period.
    pub async fn summary(&self, period: Period) -> ServiceResult<AnalyticsSummary> {
        let range = period.range(Utc::now());

        let sales = self.db.sales().list_between(range).await?;
        let items = self.db.sales().list_items_between(range).await?;
        let price_map = self.db.products().purchase_price_map().await?;

        let total_revenue_paisa: i64 = sales.iter().map(|s| s.total_paisa).sum();
        let total_sales = sales.len() as i64;
        let avg_sale_value_paisa = if total_sales > 0 {
            total_revenue_paisa / total_sales
        } else {
            0
        };

        // Profit = Σ (sale price - purchase price) × qty over items, minus
        // each sale's discount. Items with no catalog match contribute their
        // full price (purchase price 0), same as the legacy report.
        let item_margin: i64 = items
            .iter()
            .map(|item| {
                let purchase_price = price_map.get(&item.description).copied().unwrap_or(0);
                (item.unit_price_paisa - purchase_price) * item.quantity
            })
            .sum();
        let total_discount: i64 = sales.iter().map(|s| s.discount_paisa).sum();
        let total_profit_paisa = item_margin - total_discount;

        let total_purchase_value_paisa = self.db.purchases().total_cost_between(range).await?;
        let total_expenses_paisa = self.db.expenses().total_between(range).await?;

        let total_dues_paisa = LedgerService::new(self.db.clone())
            .resolve_all()
            .await?
            .into_iter()
            .filter(|c| c.total_balance_paisa > 0)
            .map(|c| c.total_balance_paisa)
            .sum();

        debug!(
            ?period,
            total_sales, total_revenue_paisa, total_profit_paisa, "Analytics summary computed"
        );

        Ok(AnalyticsSummary {
            total_revenue_paisa,
            total_sales,
            avg_sale_value_paisa,
            total_profit_paisa,
            total_purchase_value_paisa,
            total_expenses_paisa,
            total_dues_paisa,
        })
    }

    /// Flattens the journal into backup rows, one per sale item, newest
    /// sale first.
    pub async fn backup_rows(&self, period: Period) -> ServiceResult<Vec<BackupRow>> {
        let range = period.range(Utc::now());

        let sales = self.db.sales().list_between(range).await?;
        let items = self.db.sales().list_items_between(range).await?;

        let mut items_by_sale: HashMap<String, Vec<_>> = HashMap::new();
        for item in items {
            items_by_sale.entry(item.sale_id.clone()).or_default().push(item);
        }

        let mut rows = Vec::new();
        for sale in &sales {
            let Some(sale_items) = items_by_sale.get(&sale.id) else {
                continue;
            };
            for item in sale_items {
                rows.push(BackupRow {
                    invoice_number: sale.invoice_number,
                    date: sale.invoice_date.to_rfc3339(),
                    customer_name: sale.customer_name.clone(),
                    customer_phone: sale.customer_phone.clone(),
                    description: item.description.clone(),
                    quantity: item.quantity,
                    unit_price_paisa: item.unit_price_paisa,
                    item_total_paisa: item.unit_price_paisa * item.quantity,
                    sub_total_paisa: sale.sub_total_paisa,
                    discount_paisa: sale.discount_paisa,
                    received_paisa: sale.received_paisa,
                    balance_paisa: sale.balance_paisa,
                });
            }
        }

        Ok(rows)
    }

    /// Collection counts for the backup page.
    pub async fn backup_stats(&self) -> ServiceResult<BackupStats> {
        Ok(BackupStats {
            sales: self.db.sales().count().await?,
            customers: self.db.customers().count().await?,
            products: self.db.products().count().await?,
            categories: self.db.categories().count_product_categories().await?,
            purchases: self.db.purchases().count().await?,
            expenses: self.db.expenses().count().await?,
            salesmen: self.db.salesmen().count().await?,
            vendors: self.db.vendors().count().await?,
        })
    }
}
