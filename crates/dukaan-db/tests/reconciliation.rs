//! Reconciliation core tests
//!
//! End-to-end tests of the ledger against an in-memory SQLite database:
//! balance resolution, adjustment idempotence, inventory round-trips and
//! invoice numbering.

use chrono::Utc;

use dukaan_core::{
    Customer, CustomerIdentity, Product, SaleDraft, SaleItemDraft, ADJUSTMENT_DESCRIPTION,
};
use dukaan_db::{Database, DbConfig, LedgerService, PurchaseDraft, PurchaseService, SaleService};

// ============================================================================
// Helpers
// ============================================================================

async fn test_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

async fn seed_product(db: &Database, name: &str, remaining: i64) -> Product {
    let now = Utc::now();
    let product = Product {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        category: None,
        purchase_price_paisa: 5_000,
        sale_price_paisa: 10_000,
        remaining,
        created_at: now,
        updated_at: now,
    };
    db.products().insert(&product).await.unwrap();
    product
}

async fn register_customer(db: &Database, name: &str, phone: &str, opening: i64) -> Customer {
    let now = Utc::now();
    let customer = Customer {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
        city: None,
        opening_balance_paisa: opening,
        created_at: now,
        updated_at: now,
    };
    db.customers().register(&customer).await.unwrap();
    customer
}

fn draft(name: &str, phone: &str, items: Vec<(&str, i64, i64)>, received: i64) -> SaleDraft {
    SaleDraft {
        customer_name: name.to_string(),
        customer_phone: phone.to_string(),
        items: items
            .into_iter()
            .map(|(desc, qty, price)| SaleItemDraft {
                description: desc.to_string(),
                quantity: qty,
                unit_price_paisa: price,
            })
            .collect(),
        others_paisa: 0,
        discount_paisa: 0,
        received_paisa: received,
        invoice_date: Utc::now(),
        salesman_id: None,
    }
}

async fn remaining_of(db: &Database, name: &str) -> i64 {
    db.products()
        .find_by_name(name)
        .await
        .unwrap()
        .unwrap()
        .remaining
}

// ============================================================================
// Balance Resolution
// ============================================================================

/// Opening balance plus sale balances, independent of insertion order.
#[tokio::test]
async fn resolve_sums_opening_and_sales_in_any_order() {
    let db = test_db().await;
    let sales = SaleService::new(db.clone());
    let ledger = LedgerService::new(db.clone());

    register_customer(&db, "Ali Traders", "0300-1111111", 5_000).await;

    // Three sales with balances 1000, -400, 2500 in one order...
    for (qty, price, received) in [(1, 2_000, 1_000), (1, 600, 1_000), (1, 3_000, 500)] {
        sales
            .record(draft("Ali Traders", "0300-1111111", vec![("X", qty, price)], received))
            .await
            .unwrap();
    }

    let identity = CustomerIdentity::new("Ali Traders", "0300-1111111");
    let resolved = ledger.resolve(&identity).await.unwrap();

    assert_eq!(resolved.opening_balance_paisa, 5_000);
    assert_eq!(resolved.sales_balance_paisa, 1_000 - 400 + 2_500);
    assert_eq!(resolved.total_balance_paisa, 5_000 + 3_100);

    // ...and the same balances for another customer in reverse order
    for (qty, price, received) in [(1, 3_000, 500), (1, 600, 1_000), (1, 2_000, 1_000)] {
        sales
            .record(draft("Bilal & Co", "0300-2222222", vec![("X", qty, price)], received))
            .await
            .unwrap();
    }

    let other = ledger
        .resolve(&CustomerIdentity::new("Bilal & Co", "0300-2222222"))
        .await
        .unwrap();
    assert_eq!(other.sales_balance_paisa, resolved.sales_balance_paisa);
}

/// An unregistered identity resolves with opening balance zero.
#[tokio::test]
async fn resolve_normal_customer_has_zero_opening() {
    let db = test_db().await;
    let sales = SaleService::new(db.clone());
    let ledger = LedgerService::new(db.clone());

    sales
        .record(draft("Walk In", "0300-9999999", vec![("X", 2, 500)], 400))
        .await
        .unwrap();

    let resolved = ledger
        .resolve(&CustomerIdentity::new("Walk In", "0300-9999999"))
        .await
        .unwrap();

    assert_eq!(resolved.opening_balance_paisa, 0);
    assert_eq!(resolved.sales_balance_paisa, 600);
    assert_eq!(resolved.total_balance_paisa, 600);
}

// ============================================================================
// Adjustment Engine
// ============================================================================

/// Adjusting a normal customer posts an adjustment sale; a second call with
/// the same target is a no-op and creates no new rows.
#[tokio::test]
async fn adjust_normal_customer_is_idempotent() {
    let db = test_db().await;
    let sales = SaleService::new(db.clone());
    let ledger = LedgerService::new(db.clone());
    let identity = CustomerIdentity::new("Walk In", "0300-9999999");

    sales
        .record(draft("Walk In", "0300-9999999", vec![("X", 1, 10_000)], 0))
        .await
        .unwrap();

    let first = ledger.adjust(&identity, 15_000).await.unwrap();
    assert!(first.adjusted);
    assert_eq!(first.delta_paisa, 5_000);

    let resolved = ledger.resolve(&identity).await.unwrap();
    assert_eq!(resolved.total_balance_paisa, 15_000);

    let journal_count = db.sales().count().await.unwrap();

    let second = ledger.adjust(&identity, 15_000).await.unwrap();
    assert!(!second.adjusted);
    assert_eq!(second.delta_paisa, 0);
    assert_eq!(db.sales().count().await.unwrap(), journal_count);

    // The posted row is a proper zero-value adjustment sale
    let adjustment = db
        .sales()
        .list(&Default::default())
        .await
        .unwrap()
        .into_iter()
        .find(|s| s.is_adjustment)
        .expect("adjustment sale posted");
    assert_eq!(adjustment.total_paisa, 0);
    assert_eq!(adjustment.sub_total_paisa, 0);
    assert_eq!(adjustment.balance_paisa, 5_000);
    assert_eq!(adjustment.received_paisa, -5_000);

    let items = db.sales().items(&adjustment.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].description, ADJUSTMENT_DESCRIPTION);
    assert_eq!(items[0].quantity, 1);
    assert_eq!(items[0].unit_price_paisa, 0);
}

/// Adjusting a registered customer rewrites the opening balance and never
/// inflates the journal.
#[tokio::test]
async fn adjust_registered_customer_rewrites_opening_balance() {
    let db = test_db().await;
    let sales = SaleService::new(db.clone());
    let ledger = LedgerService::new(db.clone());
    let identity = CustomerIdentity::new("Ali Traders", "0300-1111111");

    let customer = register_customer(&db, "Ali Traders", "0300-1111111", 2_000).await;
    sales
        .record(draft("Ali Traders", "0300-1111111", vec![("X", 1, 10_000)], 4_000))
        .await
        .unwrap();
    // current total: 2000 opening + 6000 sales = 8000

    let journal_count = db.sales().count().await.unwrap();

    let outcome = ledger.adjust(&identity, 10_000).await.unwrap();
    assert!(outcome.adjusted);
    assert_eq!(outcome.delta_paisa, 2_000);

    // No synthetic sale for registered customers
    assert_eq!(db.sales().count().await.unwrap(), journal_count);

    let updated = db.customers().get_by_id(&customer.id).await.unwrap().unwrap();
    assert_eq!(updated.opening_balance_paisa, 4_000);

    let resolved = ledger.resolve(&identity).await.unwrap();
    assert_eq!(resolved.total_balance_paisa, 10_000);

    // Idempotent here too
    let again = ledger.adjust(&identity, 10_000).await.unwrap();
    assert!(!again.adjusted);
}

/// A widened epsilon turns small deltas into no-ops.
#[tokio::test]
async fn adjust_respects_configured_epsilon() {
    let db = test_db().await;
    let sales = SaleService::new(db.clone());
    let ledger = LedgerService::new(db.clone()).with_epsilon(100);
    let identity = CustomerIdentity::new("Walk In", "0300-9999999");

    sales
        .record(draft("Walk In", "0300-9999999", vec![("X", 1, 10_000)], 0))
        .await
        .unwrap();

    // 50 paisa off: inside the band
    let outcome = ledger.adjust(&identity, 10_050).await.unwrap();
    assert!(!outcome.adjusted);

    // 150 paisa off: outside
    let outcome = ledger.adjust(&identity, 10_150).await.unwrap();
    assert!(outcome.adjusted);
    assert_eq!(outcome.delta_paisa, 150);
}

/// Registering a normal customer at exactly its sales balance produces a
/// zero opening balance and adopts the journal history.
#[tokio::test]
async fn register_with_target_at_sales_balance_gives_zero_opening() {
    let db = test_db().await;
    let sales = SaleService::new(db.clone());
    let ledger = LedgerService::new(db.clone());
    let identity = CustomerIdentity::new("Walk In", "0300-9999999");

    sales
        .record(draft("Walk In", "0300-9999999", vec![("X", 1, 10_000)], 2_000))
        .await
        .unwrap();

    let customer = ledger
        .register_with_target(&identity, Some("Lahore".into()), 8_000)
        .await
        .unwrap();
    assert_eq!(customer.opening_balance_paisa, 0);

    // The sale is now linked to the new registry row
    let listed = db.sales().list(&Default::default()).await.unwrap();
    assert_eq!(listed[0].customer_id.as_deref(), Some(customer.id.as_str()));

    // Registering again is a conflict
    let err = ledger.register_with_target(&identity, None, 8_000).await;
    assert!(err.is_err());

    let resolved = ledger.resolve(&identity).await.unwrap();
    assert_eq!(resolved.total_balance_paisa, 8_000);
}

/// Register-with-target above the sales balance carries the difference as
/// the opening balance.
#[tokio::test]
async fn register_with_target_carries_difference_as_opening() {
    let db = test_db().await;
    let sales = SaleService::new(db.clone());
    let ledger = LedgerService::new(db.clone());
    let identity = CustomerIdentity::new("Walk In", "0300-9999999");

    sales
        .record(draft("Walk In", "0300-9999999", vec![("X", 1, 10_000)], 2_000))
        .await
        .unwrap();

    let customer = ledger
        .register_with_target(&identity, None, 12_000)
        .await
        .unwrap();
    assert_eq!(customer.opening_balance_paisa, 4_000);

    let resolved = ledger.resolve(&identity).await.unwrap();
    assert_eq!(resolved.total_balance_paisa, 12_000);
}

// ============================================================================
// Inventory Sync
// ============================================================================

/// Deleting a sale returns its stock; re-creating it consumes it again.
#[tokio::test]
async fn delete_and_recreate_round_trips_stock() {
    let db = test_db().await;
    let sales = SaleService::new(db.clone());

    seed_product(&db, "Widget", 20).await;

    let sale = sales
        .record(draft("Walk In", "0300-9999999", vec![("Widget", 5, 1_000)], 5_000))
        .await
        .unwrap();
    assert_eq!(remaining_of(&db, "Widget").await, 15);

    sales.delete(&sale.id).await.unwrap();
    assert_eq!(remaining_of(&db, "Widget").await, 20);

    sales
        .record(draft("Walk In", "0300-9999999", vec![("Widget", 5, 1_000)], 5_000))
        .await
        .unwrap();
    assert_eq!(remaining_of(&db, "Widget").await, 15);
}

/// Editing a quantity from 5 to 3 frees exactly 2 units.
#[tokio::test]
async fn edit_quantity_adjusts_net_consumption() {
    let db = test_db().await;
    let sales = SaleService::new(db.clone());

    seed_product(&db, "Widget", 20).await;

    let sale = sales
        .record(draft("Walk In", "0300-9999999", vec![("Widget", 5, 1_000)], 5_000))
        .await
        .unwrap();
    assert_eq!(remaining_of(&db, "Widget").await, 15);

    sales
        .edit(
            &sale.id,
            draft("Walk In", "0300-9999999", vec![("Widget", 3, 1_000)], 3_000),
        )
        .await
        .unwrap();
    assert_eq!(remaining_of(&db, "Widget").await, 17);
}

/// Edit reverts the full old list then applies the full new one, so items
/// can come and go between products.
#[tokio::test]
async fn edit_handles_item_list_reshaping() {
    let db = test_db().await;
    let sales = SaleService::new(db.clone());

    seed_product(&db, "Widget", 20).await;
    seed_product(&db, "Gadget", 10).await;

    let sale = sales
        .record(draft("Walk In", "0300-9999999", vec![("Widget", 4, 1_000)], 0))
        .await
        .unwrap();
    assert_eq!(remaining_of(&db, "Widget").await, 16);

    sales
        .edit(
            &sale.id,
            draft("Walk In", "0300-9999999", vec![("Gadget", 2, 2_000)], 0),
        )
        .await
        .unwrap();

    assert_eq!(remaining_of(&db, "Widget").await, 20);
    assert_eq!(remaining_of(&db, "Gadget").await, 8);
}

/// Unknown item descriptions move no stock and are not an error.
#[tokio::test]
async fn unknown_items_are_silently_skipped() {
    let db = test_db().await;
    let sales = SaleService::new(db.clone());

    seed_product(&db, "Widget", 20).await;

    sales
        .record(draft(
            "Walk In",
            "0300-9999999",
            vec![("Widget", 2, 1_000), ("Hand-written thing", 3, 500)],
            0,
        ))
        .await
        .unwrap();

    assert_eq!(remaining_of(&db, "Widget").await, 18);
}

/// Oversell pushes stock negative and stays there (documented edge case).
#[tokio::test]
async fn oversell_goes_negative_uncorrected() {
    let db = test_db().await;
    let sales = SaleService::new(db.clone());

    seed_product(&db, "Widget", 2).await;

    sales
        .record(draft("Walk In", "0300-9999999", vec![("Widget", 5, 1_000)], 0))
        .await
        .unwrap();

    assert_eq!(remaining_of(&db, "Widget").await, -3);
}

/// Adjustment sales never touch inventory, even when a product shares the
/// adjustment description, and even through delete.
#[tokio::test]
async fn adjustment_sales_never_move_stock() {
    let db = test_db().await;
    let ledger = LedgerService::new(db.clone());
    let sales = SaleService::new(db.clone());

    seed_product(&db, ADJUSTMENT_DESCRIPTION, 10).await;

    let identity = CustomerIdentity::new("Walk In", "0300-9999999");
    ledger.adjust(&identity, 5_000).await.unwrap();
    assert_eq!(remaining_of(&db, ADJUSTMENT_DESCRIPTION).await, 10);

    let adjustment = db
        .sales()
        .list(&Default::default())
        .await
        .unwrap()
        .into_iter()
        .find(|s| s.is_adjustment)
        .unwrap();
    sales.delete(&adjustment.id).await.unwrap();
    assert_eq!(remaining_of(&db, ADJUSTMENT_DESCRIPTION).await, 10);
}

// ============================================================================
// Invoice Numbering
// ============================================================================

/// Sequential creates get strictly increasing, gap-free numbers. max+1
/// assignment means deleting the newest invoice frees its number for the
/// next create (numbers below the maximum are never revisited).
#[tokio::test]
async fn invoice_numbers_are_monotonic_without_gaps() {
    let db = test_db().await;
    let sales = SaleService::new(db.clone());

    let mut numbers = Vec::new();
    for _ in 0..5 {
        let sale = sales
            .record(draft("Walk In", "0300-9999999", vec![("X", 1, 100)], 100))
            .await
            .unwrap();
        numbers.push(sale.invoice_number);
    }
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);

    // Deleting the newest sale frees its number; max+1 hands it out again
    let latest = db.sales().get_by_invoice_number(5).await.unwrap().unwrap();
    sales.delete(&latest.id).await.unwrap();

    let next = sales
        .record(draft("Walk In", "0300-9999999", vec![("X", 1, 100)], 100))
        .await
        .unwrap();
    assert_eq!(next.invoice_number, 5);
    assert_eq!(db.sales().max_invoice_number().await.unwrap(), 5);
}

// ============================================================================
// The Widget Scenario (spec walkthrough)
// ============================================================================

#[tokio::test]
async fn widget_scenario_end_to_end() {
    let db = test_db().await;
    let sales = SaleService::new(db.clone());
    let ledger = LedgerService::new(db.clone());
    let identity = CustomerIdentity::new("Walk In", "0300-9999999");

    // Widget starts at 20
    seed_product(&db, "Widget", 20).await;

    // Sale A sells 5 Widgets
    let sale_a = sales
        .record(draft("Other Guy", "0300-8888888", vec![("Widget", 5, 1_000)], 5_000))
        .await
        .unwrap();
    assert_eq!(remaining_of(&db, "Widget").await, 15);

    // Sale A is deleted
    sales.delete(&sale_a.id).await.unwrap();
    assert_eq!(remaining_of(&db, "Widget").await, 20);

    // Sale B sells 3 Widgets with balance 100 paisa
    sales
        .record(draft("Walk In", "0300-9999999", vec![("Widget", 3, 1_000)], 2_900))
        .await
        .unwrap();
    assert_eq!(remaining_of(&db, "Widget").await, 17);
    assert_eq!(
        ledger.resolve(&identity).await.unwrap().total_balance_paisa,
        100
    );

    // Adjustment to the current balance is a no-op
    let noop = ledger.adjust(&identity, 100).await.unwrap();
    assert!(!noop.adjusted);

    // Adjustment to 150 posts a delta-50 sale; stock untouched
    let outcome = ledger.adjust(&identity, 150).await.unwrap();
    assert!(outcome.adjusted);
    assert_eq!(outcome.delta_paisa, 50);
    assert_eq!(
        ledger.resolve(&identity).await.unwrap().total_balance_paisa,
        150
    );
    assert_eq!(remaining_of(&db, "Widget").await, 17);
}

// ============================================================================
// Identity & Links
// ============================================================================

/// A case difference between a sale and the registry silently creates a
/// ghost normal customer (legacy string-match behavior, kept).
#[tokio::test]
async fn case_mismatch_creates_ghost_normal_customer() {
    let db = test_db().await;
    let sales = SaleService::new(db.clone());
    let ledger = LedgerService::new(db.clone());

    register_customer(&db, "Ali Traders", "0300-1111111", 0).await;

    sales
        .record(draft("ali traders", "0300-1111111", vec![("X", 1, 1_000)], 0))
        .await
        .unwrap();

    let registered = ledger
        .resolve(&CustomerIdentity::new("Ali Traders", "0300-1111111"))
        .await
        .unwrap();
    assert_eq!(registered.total_balance_paisa, 0);

    let all = ledger.resolve_all().await.unwrap();
    let ghost = all
        .iter()
        .find(|c| c.name == "ali traders")
        .expect("ghost normal customer exists");
    assert!(ghost.is_normal);
    assert_eq!(ghost.total_balance_paisa, 1_000);
}

/// The surrogate link keeps a registered customer's history across renames;
/// the string identity alone would have lost it.
#[tokio::test]
async fn rename_keeps_linked_history() {
    let db = test_db().await;
    let sales = SaleService::new(db.clone());
    let ledger = LedgerService::new(db.clone());

    let mut customer = register_customer(&db, "Ali Traders", "0300-1111111", 0).await;
    sales
        .record(draft("Ali Traders", "0300-1111111", vec![("X", 1, 1_000)], 0))
        .await
        .unwrap();

    customer.name = "Ali Trading Co".to_string();
    db.customers().update(&customer).await.unwrap();

    let resolved = ledger
        .resolve(&CustomerIdentity::new("Ali Trading Co", "0300-1111111"))
        .await
        .unwrap();
    assert_eq!(resolved.sales_balance_paisa, 1_000);
}

/// Deleting a customer orphans its sales back into a normal customer.
#[tokio::test]
async fn customer_delete_orphans_sales_to_normal() {
    let db = test_db().await;
    let sales = SaleService::new(db.clone());
    let ledger = LedgerService::new(db.clone());

    let customer = register_customer(&db, "Ali Traders", "0300-1111111", 5_000).await;
    sales
        .record(draft("Ali Traders", "0300-1111111", vec![("X", 1, 1_000)], 0))
        .await
        .unwrap();

    db.customers().delete(&customer.id).await.unwrap();

    let all = ledger.resolve_all().await.unwrap();
    let resurfaced = all
        .iter()
        .find(|c| c.name == "Ali Traders")
        .expect("identity resurfaces from the journal");
    assert!(resurfaced.is_normal);
    // The opening balance died with the registry row
    assert_eq!(resurfaced.total_balance_paisa, 1_000);
}

// ============================================================================
// Purchasing
// ============================================================================

/// Purchase create/delete moves stock symmetrically and rewrites the
/// purchase price.
#[tokio::test]
async fn purchase_create_delete_stock_symmetry() {
    let db = test_db().await;
    let purchasing = PurchaseService::new(db.clone());

    let product = seed_product(&db, "Widget", 10).await;

    let purchase = purchasing
        .record(PurchaseDraft {
            product_id: product.id.clone(),
            vendor_name: Some("Karachi Wholesale".into()),
            quantity: 15,
            cost_per_item_paisa: 700,
            purchase_date: Utc::now(),
        })
        .await
        .unwrap();

    assert_eq!(purchase.total_cost_paisa, 15 * 700);
    assert_eq!(remaining_of(&db, "Widget").await, 25);

    let updated = db.products().get_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(updated.purchase_price_paisa, 700);

    purchasing.delete(&purchase.id).await.unwrap();
    assert_eq!(remaining_of(&db, "Widget").await, 10);
}

// ============================================================================
// Recovery view
// ============================================================================

#[tokio::test]
async fn recovery_lists_only_debtors_sorted_desc() {
    let db = test_db().await;
    let sales = SaleService::new(db.clone());
    let ledger = LedgerService::new(db.clone());

    // One debtor of 300, one of 900, one fully paid
    sales
        .record(draft("Small Debtor", "0300-1", vec![("X", 1, 300)], 0))
        .await
        .unwrap();
    sales
        .record(draft("Big Debtor", "0300-2", vec![("X", 1, 900)], 0))
        .await
        .unwrap();
    sales
        .record(draft("Paid Up", "0300-3", vec![("X", 1, 500)], 500))
        .await
        .unwrap();

    let report = ledger.recovery_report().await.unwrap();
    assert_eq!(report.customers_with_dues, 2);
    assert_eq!(report.total_dues_paisa, 1_200);
    assert_eq!(report.top_debtor_name.as_deref(), Some("Big Debtor"));
    assert_eq!(report.customers[0].total_balance_paisa, 900);
    assert_eq!(report.customers[1].total_balance_paisa, 300);
}
