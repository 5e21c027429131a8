//! Vendor address-book handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::AppState;
use dukaan_core::Vendor;
use dukaan_db::repository::vendor::generate_vendor_id;

#[derive(Debug, Deserialize)]
pub struct CreateVendorRequest {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVendorRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn list_vendors(State(state): State<AppState>) -> AppResult<Json<Vec<Vendor>>> {
    let vendors = state.db.vendors().list().await?;
    Ok(Json(vendors))
}

pub async fn create_vendor(
    State(state): State<AppState>,
    Json(request): Json<CreateVendorRequest>,
) -> AppResult<Json<Vendor>> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }

    let vendor = Vendor {
        id: generate_vendor_id(),
        name: request.name.trim().to_string(),
        phone: request.phone,
        address: request.address,
        created_at: Utc::now(),
    };

    state.db.vendors().insert(&vendor).await?;

    Ok(Json(vendor))
}

pub async fn update_vendor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateVendorRequest>,
) -> AppResult<Json<Vendor>> {
    let mut vendor = state
        .db
        .vendors()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vendor {id}")))?;

    if let Some(name) = request.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }
        vendor.name = name.trim().to_string();
    }
    if let Some(phone) = request.phone {
        vendor.phone = Some(phone);
    }
    if let Some(address) = request.address {
        vendor.address = Some(address);
    }

    state.db.vendors().update(&vendor).await?;

    Ok(Json(vendor))
}

pub async fn delete_vendor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.db.vendors().delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "Vendor deleted".to_string(),
    }))
}
