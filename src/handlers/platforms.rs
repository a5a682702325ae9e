use axum::{extract::State, Json};
use tracing::info;

use crate::handlers::api_error::{api_error, ApiError};
use crate::models::catalog::{CatalogListResponse, SelectPlatformsRequest, CATALOG};
use crate::models::earnings::PlatformsResponse;
use crate::services::registry::{initialize_registry, load_or_seed_registry, resolve_selection};
use crate::AppState;

pub async fn hello() -> &'static str {
    "Gig earnings tracker is running"
}

/// GET /api/catalog
pub async fn get_catalog() -> Json<CatalogListResponse> {
    Json(CATALOG.to_vec())
}

/// POST /api/platforms/select
///
/// Replaces the stored registry (and every ledger in it) with the selection.
pub async fn select_platforms(
    State(state): State<AppState>,
    Json(payload): Json<SelectPlatformsRequest>,
) -> Result<Json<PlatformsResponse>, ApiError> {
    let selected = resolve_selection(&payload.platform_ids).map_err(api_error)?;

    let _guard = state.write_gate.lock().await;
    let registry = initialize_registry(state.store.as_ref(), &state.registry_key, &selected)
        .await
        .map_err(api_error)?;

    info!(selected = selected.len(), "Platform selection saved");

    PlatformsResponse::try_from(&registry)
        .map(Json)
        .map_err(api_error)
}

/// GET /api/platforms
///
/// Home view: every tracked platform with its running total, plus the
/// grand total. Seeds the full catalog on first use.
pub async fn get_platforms(
    State(state): State<AppState>,
) -> Result<Json<PlatformsResponse>, ApiError> {
    let _guard = state.write_gate.lock().await;
    let registry = load_or_seed_registry(state.store.as_ref(), &state.registry_key, &CATALOG)
        .await
        .map_err(api_error)?;

    PlatformsResponse::try_from(&registry)
        .map(Json)
        .map_err(api_error)
}
