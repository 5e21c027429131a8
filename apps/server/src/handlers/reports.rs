//! Backup export and analytics handlers.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::parse_report_period;
use crate::AppState;
use dukaan_db::{AnalyticsSummary, BackupStats, ReportService};

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub filter: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Streams the sales journal as a CSV download, one row per sale item.
pub async fn backup(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let filter_name = query.filter.clone().unwrap_or_else(|| "lifetime".to_string());
    let period = parse_report_period(
        query.filter.as_deref(),
        query.from.as_deref(),
        query.to.as_deref(),
    )?;

    let rows = ReportService::new(state.db.clone()).backup_rows(period).await?;

    if rows.is_empty() {
        return Err(AppError::NotFound(
            "Sales data for the selected period".to_string(),
        ));
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in &rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::Internal(e.to_string()))?;
    }
    let data = writer
        .into_inner()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"sales_backup_{filter_name}.csv\""),
        ),
    ];

    Ok((headers, data))
}

/// Collection counts for the backup page.
pub async fn backup_stats(State(state): State<AppState>) -> AppResult<Json<BackupStats>> {
    let stats = ReportService::new(state.db.clone()).backup_stats().await?;
    Ok(Json(stats))
}

/// Headline analytics for a period (revenue, profit, purchases, expenses,
/// lifetime dues).
pub async fn analytics(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<AnalyticsSummary>> {
    // The dashboard defaults to "today"; "monthly" is its this-year view
    let filter = match query.filter.as_deref() {
        None => Some("today"),
        Some("monthly") => Some("thisyear"),
        other => other,
    };
    let period = parse_report_period(filter, query.from.as_deref(), query.to.as_deref())?;

    let summary = ReportService::new(state.db.clone()).summary(period).await?;
    Ok(Json(summary))
}
