use crate::error::{ApiError, ApiResult};
use crate::AppState;
use api_shared::{
    BedMapEntryRes, FreeBedsRes, OccupancyRes, OccupancySummaryRes, SectorOccupancyRes,
    SectorQuery,
};
use axum::{
    extract::{Query, State},
    response::Json,
};
use ward_core::{Sector, SectorScope};

fn scope(query: &SectorQuery) -> ApiResult<SectorScope> {
    match query.sector.as_deref().map(str::trim) {
        None | Some("") => Ok(SectorScope::All),
        Some(s) => s
            .parse()
            .map_err(|e: ward_core::UnknownSector| ApiError::unprocessable(e.to_string())),
    }
}

#[utoipa::path(
    get,
    path = "/beds/occupancy",
    params(SectorQuery),
    responses(
        (status = 200, description = "Ward summary and per-sector occupancy", body = OccupancyRes),
        (status = 422, description = "Unknown sector", body = api_shared::ErrorRes)
    )
)]
/// Bed occupancy per sector
///
/// The summary always covers the whole ward; `sectors` is limited to the requested scope.
///
/// # Errors
/// Returns `422 Unprocessable Entity` if `sector` is not a known sector or `all`.
#[axum::debug_handler]
pub(crate) async fn occupancy(
    State(state): State<AppState>,
    Query(query): Query<SectorQuery>,
) -> ApiResult<Json<OccupancyRes>> {
    let scope = scope(&query)?;
    Ok(Json(OccupancyRes {
        summary: OccupancySummaryRes::from(state.ledger.occupancy_summary()),
        sectors: state
            .ledger
            .occupancy_by_sector(scope)
            .into_iter()
            .map(SectorOccupancyRes::from)
            .collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/beds/free",
    params(SectorQuery),
    responses(
        (status = 200, description = "Free beds in the sector", body = FreeBedsRes),
        (status = 422, description = "Missing or unknown sector", body = api_shared::ErrorRes)
    )
)]
/// Free beds of one sector, in bed-id order
///
/// # Errors
/// Returns `422 Unprocessable Entity` if `sector` is missing or unknown.
#[axum::debug_handler]
pub(crate) async fn free_beds(
    State(state): State<AppState>,
    Query(query): Query<SectorQuery>,
) -> ApiResult<Json<FreeBedsRes>> {
    let sector: Sector = match query.sector.as_deref().map(str::trim) {
        None | Some("") => return Err(ApiError::unprocessable("sector is required")),
        Some(s) => s
            .parse()
            .map_err(|e: ward_core::UnknownSector| ApiError::unprocessable(e.to_string()))?,
    };
    let beds = state
        .ledger
        .list_free_beds(sector)
        .into_iter()
        .map(|b| b.to_string())
        .collect();
    Ok(Json(FreeBedsRes { sector, beds }))
}

#[utoipa::path(
    get,
    path = "/beds/map",
    params(SectorQuery),
    responses(
        (status = 200, description = "Every bed with its occupant", body = [BedMapEntryRes]),
        (status = 422, description = "Unknown sector", body = api_shared::ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn bed_map(
    State(state): State<AppState>,
    Query(query): Query<SectorQuery>,
) -> ApiResult<Json<Vec<BedMapEntryRes>>> {
    let scope = scope(&query)?;
    Ok(Json(
        state
            .ledger
            .bed_map(scope)
            .into_iter()
            .map(BedMapEntryRes::from)
            .collect(),
    ))
}
