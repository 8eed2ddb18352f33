//! Ward-level reporting and table export.

use crate::error::ApiResult;
use crate::{today, AppState};
use api_shared::{ErrorRes, ExportQuery};
use axum::{
    extract::{Query, State},
    response::Json,
};
use ward_core::{WardExport, WardReport};

#[utoipa::path(
    get,
    path = "/reports/summary",
    responses(
        (status = 200, description = "Ward report as of today: admissions, alerts, births, cesarean rate, occupancy and newborn statistics", content_type = "application/json")
    )
)]
#[axum::debug_handler]
pub(crate) async fn report_summary(State(state): State<AppState>) -> Json<WardReport> {
    Json(WardReport::compute(&state.store, today()))
}

#[utoipa::path(
    get,
    path = "/reports/export",
    params(ExportQuery),
    responses(
        (status = 200, description = "Selected tables as JSON, optionally anonymised", content_type = "application/json"),
        (status = 422, description = "Unknown table name", body = ErrorRes)
    )
)]
/// Export whole tables
///
/// # Errors
/// - `422 Unprocessable Entity` if `tables` names an unknown table.
#[axum::debug_handler]
pub(crate) async fn export_tables(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<Json<WardExport>> {
    let options = query.to_options()?;
    Ok(Json(WardExport::compute(&state.store, today(), &options)?))
}
