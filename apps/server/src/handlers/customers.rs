//! Customer and ledger handlers.
//!
//! The customer pages show resolved balances, so the listings go through the
//! ledger service rather than the raw registry. The two adjustment
//! operations are distinct on purpose:
//!
//! - `adjust-balance` moves an identity to a target total (opening-balance
//!   rewrite for registered customers, adjustment sale for normal ones)
//! - `register-with-balance` converts a normal customer into a registered
//!   one whose opening balance reproduces the target

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::AppState;
use dukaan_core::ledger::{CustomerBalance, ResolvedBalance};
use dukaan_core::validation::{validate_customer_name, validate_customer_phone};
use dukaan_core::{CoreError, Customer, CustomerIdentity};
use dukaan_db::repository::customer::generate_customer_id;
use dukaan_db::{AdjustmentOutcome, LedgerService, RecoveryReport};

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub phone: String,
    pub city: Option<String>,
    #[serde(default)]
    pub opening_balance_paisa: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub opening_balance_paisa: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct IdentityQuery {
    pub customer_name: String,
    pub customer_phone: String,
}

#[derive(Debug, Deserialize)]
pub struct AdjustBalanceRequest {
    pub customer_name: String,
    pub customer_phone: String,
    pub target_total_paisa: i64,
}

#[derive(Debug, Deserialize)]
pub struct RegisterWithBalanceRequest {
    pub customer_name: String,
    pub customer_phone: String,
    pub city: Option<String>,
    pub target_total_paisa: i64,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Registered customers with their resolved balances and stats.
pub async fn list_customers(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CustomerBalance>>> {
    let all = LedgerService::new(state.db.clone()).resolve_all().await?;
    let registered = all.into_iter().filter(|c| !c.is_normal).collect();
    Ok(Json(registered))
}

/// Normal customers synthesized from the journal grouping.
pub async fn list_normal_customers(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CustomerBalance>>> {
    let all = LedgerService::new(state.db.clone()).resolve_all().await?;
    let normal = all.into_iter().filter(|c| c.is_normal).collect();
    Ok(Json(normal))
}

/// Plain registration with an explicit opening balance.
pub async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CreateCustomerRequest>,
) -> AppResult<Json<Customer>> {
    validate_customer_name(&request.name).map_err(CoreError::Validation)?;
    validate_customer_phone(&request.phone).map_err(CoreError::Validation)?;

    let identity = CustomerIdentity::new(&request.name, &request.phone);

    if state
        .db
        .customers()
        .find_by_identity(&identity)
        .await?
        .is_some()
    {
        return Err(CoreError::CustomerAlreadyRegistered {
            name: identity.name,
            phone: identity.phone,
        }
        .into());
    }

    let now = Utc::now();
    let customer = Customer {
        id: generate_customer_id(),
        name: identity.name,
        phone: identity.phone,
        city: request.city,
        opening_balance_paisa: request.opening_balance_paisa,
        created_at: now,
        updated_at: now,
    };

    state.db.customers().register(&customer).await?;

    Ok(Json(customer))
}

/// Full-record customer update (name, phone, city, opening balance).
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCustomerRequest>,
) -> AppResult<Json<Customer>> {
    let mut customer = state
        .db
        .customers()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Customer {id}")))?;

    if let Some(name) = request.name {
        validate_customer_name(&name).map_err(CoreError::Validation)?;
        customer.name = name.trim().to_string();
    }
    if let Some(phone) = request.phone {
        validate_customer_phone(&phone).map_err(CoreError::Validation)?;
        customer.phone = phone.trim().to_string();
    }
    if let Some(city) = request.city {
        customer.city = Some(city);
    }
    if let Some(opening) = request.opening_balance_paisa {
        customer.opening_balance_paisa = opening;
    }

    state.db.customers().update(&customer).await?;

    Ok(Json(customer))
}

/// Hard delete; the identity's sales resurface as a normal customer.
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    state.db.customers().delete(&id).await?;

    Ok(Json(DeleteResponse {
        message: "Customer deleted".to_string(),
    }))
}

/// Resolves one identity's balance (opening + sales + total).
pub async fn get_balance(
    State(state): State<AppState>,
    Query(query): Query<IdentityQuery>,
) -> AppResult<Json<ResolvedBalance>> {
    let identity = CustomerIdentity::new(&query.customer_name, &query.customer_phone);
    let resolved = LedgerService::new(state.db.clone()).resolve(&identity).await?;
    Ok(Json(resolved))
}

/// Moves an identity's total balance to a target.
pub async fn adjust_balance(
    State(state): State<AppState>,
    Json(request): Json<AdjustBalanceRequest>,
) -> AppResult<Json<AdjustmentOutcome>> {
    let identity = CustomerIdentity::new(&request.customer_name, &request.customer_phone);
    let outcome = LedgerService::new(state.db.clone())
        .adjust(&identity, request.target_total_paisa)
        .await?;
    Ok(Json(outcome))
}

/// Registers a normal customer at a target total balance.
pub async fn register_with_balance(
    State(state): State<AppState>,
    Json(request): Json<RegisterWithBalanceRequest>,
) -> AppResult<Json<Customer>> {
    let identity = CustomerIdentity::new(&request.customer_name, &request.customer_phone);
    let customer = LedgerService::new(state.db.clone())
        .register_with_target(&identity, request.city, request.target_total_paisa)
        .await?;
    Ok(Json(customer))
}

/// The dues-collection view: debtors, largest first, with headline stats.
pub async fn recovery(State(state): State<AppState>) -> AppResult<Json<RecoveryReport>> {
    let report = LedgerService::new(state.db.clone()).recovery_report().await?;
    Ok(Json(report))
}
