//! HTTP handlers for the back-office API.
//!
//! Handlers stay thin: parse the request, call a repository or service,
//! shape the response. Anything with an invariant lives below this layer.

use chrono::NaiveDate;

use crate::error::{AppError, AppResult};
use dukaan_core::Period;

pub mod auth;
pub mod categories;
pub mod customers;
pub mod expenses;
pub mod products;
pub mod purchases;
pub mod reports;
pub mod sales;
pub mod salesmen;
pub mod vendors;

/// Filter vocabulary of the purchase/expense pages:
/// `all | daily | monthly | yearly | custom`.
pub(crate) fn parse_ledger_period(
    filter: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
) -> AppResult<Period> {
    match filter.unwrap_or("all") {
        "all" => Ok(Period::All),
        "daily" => Ok(Period::Today),
        "monthly" => Ok(Period::ThisMonth),
        "yearly" => Ok(Period::ThisYear),
        "custom" => parse_custom(from, to),
        other => Err(AppError::Validation(format!("unknown filter '{other}'"))),
    }
}

/// Filter vocabulary of the backup/analytics pages:
/// `lifetime | today | last7days | thisyear | custom`.
pub(crate) fn parse_report_period(
    filter: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
) -> AppResult<Period> {
    match filter.unwrap_or("lifetime") {
        "lifetime" => Ok(Period::All),
        "today" => Ok(Period::Today),
        "last7days" => Ok(Period::Last7Days),
        "thisyear" => Ok(Period::ThisYear),
        "custom" => parse_custom(from, to),
        other => Err(AppError::Validation(format!("unknown filter '{other}'"))),
    }
}

fn parse_custom(from: Option<&str>, to: Option<&str>) -> AppResult<Period> {
    let (Some(from), Some(to)) = (from, to) else {
        return Err(AppError::Validation(
            "custom filter requires from and to dates".to_string(),
        ));
    };

    let parse = |value: &str| {
        value.parse::<NaiveDate>().map_err(|_| {
            AppError::Validation(format!("invalid date '{value}', expected YYYY-MM-DD"))
        })
    };

    Ok(Period::Custom {
        from: parse(from)?,
        to: parse(to)?,
    })
}
