//! Salesman roster handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::AppState;
use dukaan_core::validation::validate_amount_paisa;
use dukaan_core::{CoreError, Salesman};
use dukaan_db::repository::salesman::generate_salesman_id;

#[derive(Debug, Deserialize)]
pub struct CreateSalesmanRequest {
    pub name: String,
    pub phone: String,
    pub secondary_phone: Option<String>,
    pub address: Option<String>,
    pub cnic: Option<String>,
    #[serde(default)]
    pub salary_paisa: i64,
    pub joining_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSalesmanRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub secondary_phone: Option<String>,
    pub address: Option<String>,
    pub cnic: Option<String>,
    pub salary_paisa: Option<i64>,
    pub joining_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn list_salesmen(State(state): State<AppState>) -> AppResult<Json<Vec<Salesman>>> {
    let salesmen = state.db.salesmen().list().await?;
    Ok(Json(salesmen))
}

pub async fn create_salesman(
    State(state): State<AppState>,
    Json(request): Json<CreateSalesmanRequest>,
) -> AppResult<Json<Salesman>> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    validate_amount_paisa(request.salary_paisa).map_err(CoreError::Validation)?;

    let salesman = Salesman {
        id: generate_salesman_id(),
        name: request.name.trim().to_string(),
        phone: request.phone.trim().to_string(),
        secondary_phone: request.secondary_phone,
        address: request.address,
        cnic: request.cnic,
        salary_paisa: request.salary_paisa,
        joining_date: request.joining_date,
        total_sales_paisa: 0,
        commission_earned_paisa: 0,
        created_at: Utc::now(),
    };

    state.db.salesmen().insert(&salesman).await?;

    Ok(Json(salesman))
}

pub async fn update_salesman(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateSalesmanRequest>,
) -> AppResult<Json<Salesman>> {
    let mut salesman = state
        .db
        .salesmen()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Salesman {id}")))?;

    if let Some(name) = request.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }
        salesman.name = name.trim().to_string();
    }
    if let Some(phone) = request.phone {
        salesman.phone = phone.trim().to_string();
    }
    if let Some(secondary_phone) = request.secondary_phone {
        salesman.secondary_phone = Some(secondary_phone);
    }
    if let Some(address) = request.address {
        salesman.address = Some(address);
    }
    if let Some(cnic) = request.cnic {
        salesman.cnic = Some(cnic);
    }
    if let Some(salary) = request.salary_paisa {
        validate_amount_paisa(salary).map_err(CoreError::Validation)?;
        salesman.salary_paisa = salary;
    }
    if let Some(joining_date) = request.joining_date {
        salesman.joining_date = joining_date;
    }

    state.db.salesmen().update(&salesman).await?;

    Ok(Json(salesman))
}

pub async fn delete_salesman(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.db.salesmen().delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "Salesman deleted".to_string(),
    }))
}
