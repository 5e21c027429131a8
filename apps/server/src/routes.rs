//! Route definitions for the Dukaan back-office API.

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth (credential check only; no sessions)
        .route("/auth/login", post(handlers::auth::login))
        // Customers + ledger
        .nest("/customers", customer_routes())
        // Sales journal
        .nest("/sales", sale_routes())
        // Product catalog
        .nest("/products", product_routes())
        // Purchasing (stock in)
        .nest("/purchases", purchase_routes())
        // Expenses
        .nest("/expenses", expense_routes())
        // Salesmen
        .nest("/salesmen", salesman_routes())
        // Vendors
        .nest("/vendors", vendor_routes())
        // Category name lists
        .nest("/categories", category_routes())
        .nest("/expense-categories", expense_category_routes())
        // Recovery (dues collection view)
        .route("/recovery", get(handlers::customers::recovery))
        // Backup export + stats
        .route("/backup", get(handlers::reports::backup))
        .route("/backup/stats", get(handlers::reports::backup_stats))
        // Analytics summary
        .route("/analytics", get(handlers::reports::analytics))
}

fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::customers::list_customers).post(handlers::customers::create_customer),
        )
        .route("/normal", get(handlers::customers::list_normal_customers))
        .route("/balance", get(handlers::customers::get_balance))
        .route("/adjust-balance", post(handlers::customers::adjust_balance))
        .route(
            "/register-with-balance",
            post(handlers::customers::register_with_balance),
        )
        .route(
            "/:id",
            axum::routing::put(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        )
}

fn sale_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::sales::list_sales).post(handlers::sales::record_sale),
        )
        .route("/latest", get(handlers::sales::latest_invoice_number))
        .route("/link", post(handlers::sales::link_sale))
        .route(
            "/:id",
            get(handlers::sales::get_sale)
                .put(handlers::sales::edit_sale)
                .delete(handlers::sales::delete_sale),
        )
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/:id",
            axum::routing::put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
}

fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::purchases::list_purchases).post(handlers::purchases::record_purchase),
        )
        .route("/:id", delete(handlers::purchases::delete_purchase))
}

fn expense_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::expenses::list_expenses).post(handlers::expenses::create_expense),
        )
        .route(
            "/:id",
            axum::routing::put(handlers::expenses::update_expense)
                .delete(handlers::expenses::delete_expense),
        )
}

fn salesman_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::salesmen::list_salesmen).post(handlers::salesmen::create_salesman),
        )
        .route(
            "/:id",
            axum::routing::put(handlers::salesmen::update_salesman)
                .delete(handlers::salesmen::delete_salesman),
        )
}

fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::vendors::list_vendors).post(handlers::vendors::create_vendor),
        )
        .route(
            "/:id",
            axum::routing::put(handlers::vendors::update_vendor)
                .delete(handlers::vendors::delete_vendor),
        )
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::categories::list_product_categories)
                .post(handlers::categories::create_product_category),
        )
        .route(
            "/:name",
            delete(handlers::categories::delete_product_category),
        )
}

fn expense_category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::categories::list_expense_categories)
                .post(handlers::categories::create_expense_category),
        )
        .route(
            "/:name",
            delete(handlers::categories::delete_expense_category),
        )
}
