use axum::{http::StatusCode, Json};
use chrono::NaiveDate;

use crate::error::EarningsError;
use crate::models::earnings::ErrorResponse;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(e: EarningsError) -> ApiError {
    let (status, code) = match &e {
        EarningsError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        EarningsError::LookupMiss(_) => (StatusCode::NOT_FOUND, "PLATFORM_NOT_FOUND"),
        EarningsError::StoreUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE"),
        EarningsError::Malformed(_)
        | EarningsError::UnsupportedVersion { .. }
        | EarningsError::Overflow(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "STORE_CORRUPT")
        }
        EarningsError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
    };

    if status.is_server_error() {
        tracing::error!(error = %e, code, "Request failed");
    } else {
        tracing::warn!(error = %e, code, "Request rejected");
    }

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
            code: code.to_string(),
        }),
    )
}

/// Parse an optional `YYYY-MM-DD` parameter, falling back to today's local date
pub fn date_or_today(raw: Option<&str>, field: &str) -> Result<NaiveDate, EarningsError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(chrono::Local::now().date_naive()),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
            EarningsError::Validation(format!("{} must be a date in YYYY-MM-DD format", field))
        }),
    }
}
