//! Platform detail and earning entry handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use crate::error::EarningsError;
use crate::handlers::api_error::{api_error, date_or_today, ApiError};
use crate::models::catalog::CATALOG;
use crate::models::earnings::{AddEarningRequest, PlatformDetailQuery, PlatformDetailResponse};
use crate::services::ledger::append_earning;
use crate::services::registry::load_or_seed_registry;
use crate::services::rollups::compute_rollups;
use crate::AppState;

/// GET /api/platforms/{id}
///
/// # Query Parameters
/// - `asOf`: YYYY-MM-DD reference day for the weekly/monthly rollups (default: today)
///
/// # Response
/// - 200: Platform ledger with rollups
/// - 400: Invalid `asOf`
/// - 404: Platform not tracked
pub async fn get_platform_detail(
    State(state): State<AppState>,
    Path(platform_id): Path<String>,
    Query(query): Query<PlatformDetailQuery>,
) -> Result<Json<PlatformDetailResponse>, ApiError> {
    let as_of = date_or_today(query.as_of.as_deref(), "asOf").map_err(api_error)?;

    let registry = {
        let _guard = state.write_gate.lock().await;
        load_or_seed_registry(state.store.as_ref(), &state.registry_key, &CATALOG)
            .await
            .map_err(api_error)?
    };

    let platform = registry
        .platform(&platform_id)
        .ok_or_else(|| api_error(EarningsError::LookupMiss(platform_id.clone())))?;

    let rollups = compute_rollups(&platform.earning_entries, as_of).map_err(api_error)?;
    debug!(
        platform_id = %platform_id,
        as_of = %as_of,
        weekly = %rollups.weekly,
        monthly = %rollups.monthly,
        "Computed rollups"
    );

    Ok(Json(PlatformDetailResponse::new(platform, as_of, rollups)))
}

/// POST /api/platforms/{id}/earnings
///
/// Body: `{"amount": "250", "date": "2026-10-14"}` (date optional)
///
/// # Response
/// - 201: Updated platform detail, rollups as of today
/// - 400: Missing, non-numeric or negative amount; bad date
/// - 404: Platform not tracked
pub async fn add_earning(
    State(state): State<AppState>,
    Path(platform_id): Path<String>,
    Json(payload): Json<AddEarningRequest>,
) -> Result<(StatusCode, Json<PlatformDetailResponse>), ApiError> {
    let date = date_or_today(payload.date.as_deref(), "date").map_err(api_error)?;
    let amount_text = payload.amount_text();

    // Held across read-modify-write so concurrent saves cannot drop entries
    let _guard = state.write_gate.lock().await;

    let registry = load_or_seed_registry(state.store.as_ref(), &state.registry_key, &CATALOG)
        .await
        .map_err(api_error)?;

    let registry = append_earning(
        state.store.as_ref(),
        &state.registry_key,
        registry,
        &platform_id,
        &amount_text,
        date,
    )
    .await
    .map_err(api_error)?;

    let platform = registry
        .platform(&platform_id)
        .ok_or_else(|| api_error(EarningsError::LookupMiss(platform_id.clone())))?;

    info!(platform_id = %platform_id, entries = platform.earning_entries.len(), "Earning saved");

    let today = chrono::Local::now().date_naive();
    let rollups = compute_rollups(&platform.earning_entries, today).map_err(api_error)?;
    Ok((
        StatusCode::CREATED,
        Json(PlatformDetailResponse::new(platform, today, rollups)),
    ))
}
