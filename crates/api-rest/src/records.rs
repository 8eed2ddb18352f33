use crate::error::{ApiError, ApiResult};
use crate::{today, AppState};
use api_shared::{
    ErrorRes, LabOrderQuery, LabOrderReq, LabOrderRes, LabResultReq, ListLabOrdersRes,
    ListNotesRes, NoteReq, NoteRes,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use ward_core::{LabOrderFilter, LabOrderId, NonEmptyText, PatientId};

#[utoipa::path(
    get,
    path = "/patients/{id}/notes",
    params(("id" = u32, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Clinical notes, newest first", body = ListNotesRes),
        (status = 404, description = "No such patient", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_notes(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<Json<ListNotesRes>> {
    let notes = state
        .queries
        .notes_for(PatientId(id))?
        .into_iter()
        .map(NoteRes::from)
        .collect();
    Ok(Json(ListNotesRes { notes }))
}

#[utoipa::path(
    post,
    path = "/patients/{id}/notes",
    params(("id" = u32, Path, description = "Patient id")),
    request_body = NoteReq,
    responses(
        (status = 201, description = "Note added", body = NoteRes),
        (status = 404, description = "No such patient", body = ErrorRes),
        (status = 422, description = "Blank description", body = ErrorRes)
    )
)]
/// Add a clinical note
///
/// The note is stamped with the current time and attributed to the request's actor.
#[axum::debug_handler]
pub(crate) async fn add_note(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<NoteReq>,
) -> ApiResult<(StatusCode, Json<NoteRes>)> {
    let actor = req.actor.to_actor()?;
    let note = state
        .clinical
        .add_note(PatientId(id), req.to_note()?, &actor)?;
    Ok((StatusCode::CREATED, Json(NoteRes::from(note))))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/lab-orders",
    params(("id" = u32, Path, description = "Patient id")),
    responses(
        (status = 200, description = "The patient's lab orders", body = ListLabOrdersRes),
        (status = 404, description = "No such patient", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_patient_lab_orders(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<Json<ListLabOrdersRes>> {
    let patient_id = PatientId(id);
    if state.store.get_patient(patient_id).is_none() {
        return Err(ApiError::not_found(format!("patient {patient_id} not found")));
    }
    let filter = LabOrderFilter {
        patient: Some(patient_id),
        ..Default::default()
    };
    Ok(Json(lab_orders(&state, &filter)))
}

#[utoipa::path(
    post,
    path = "/patients/{id}/lab-orders",
    params(("id" = u32, Path, description = "Patient id")),
    request_body = LabOrderReq,
    responses(
        (status = 201, description = "Lab order requested", body = LabOrderRes),
        (status = 404, description = "No such patient", body = ErrorRes),
        (status = 422, description = "Blank exam name", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn request_lab_order(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<LabOrderReq>,
) -> ApiResult<(StatusCode, Json<LabOrderRes>)> {
    let actor = req.actor.to_actor()?;
    let exam = NonEmptyText::new(&req.exam).map_err(ward_core::StoreError::from)?;
    let order = state.clinical.request_lab_order(
        PatientId(id),
        exam,
        req.requested_on.unwrap_or_else(today),
        &actor,
    )?;
    Ok((StatusCode::CREATED, Json(LabOrderRes::from(order))))
}

#[utoipa::path(
    get,
    path = "/lab-orders",
    params(LabOrderQuery),
    responses(
        (status = 200, description = "Matching lab orders", body = ListLabOrdersRes),
        (status = 422, description = "Unknown status", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_lab_orders(
    State(state): State<AppState>,
    Query(query): Query<LabOrderQuery>,
) -> ApiResult<Json<ListLabOrdersRes>> {
    let filter = query.to_filter()?;
    Ok(Json(lab_orders(&state, &filter)))
}

#[utoipa::path(
    post,
    path = "/lab-orders/{id}/result",
    params(("id" = u32, Path, description = "Lab order id")),
    request_body = LabResultReq,
    responses(
        (status = 200, description = "Result recorded", body = LabOrderRes),
        (status = 404, description = "No such lab order", body = ErrorRes),
        (status = 422, description = "Order already completed or result predates request", body = ErrorRes)
    )
)]
/// Record the result of a pending lab order
///
/// # Errors
/// - `404 Not Found` if the order does not exist,
/// - `422 Unprocessable Entity` if the order already has a result, the result is blank, or
///   `resulted_on` is before the request date.
#[axum::debug_handler]
pub(crate) async fn record_lab_result(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<LabResultReq>,
) -> ApiResult<Json<LabOrderRes>> {
    let actor = req.actor.to_actor()?;
    let result = NonEmptyText::new(&req.result).map_err(ward_core::StoreError::from)?;
    let order = state.clinical.record_lab_result(
        LabOrderId(id),
        result,
        req.resulted_on.unwrap_or_else(today),
        &actor,
    )?;
    Ok(Json(LabOrderRes::from(order)))
}

fn lab_orders(state: &AppState, filter: &LabOrderFilter) -> ListLabOrdersRes {
    ListLabOrdersRes {
        lab_orders: state
            .queries
            .lab_orders(filter)
            .into_iter()
            .map(LabOrderRes::from)
            .collect(),
    }
}
