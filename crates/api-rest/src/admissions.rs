//! Bed and admission ledger endpoints.
//!
//! Every write answers with the patient as she stands afterwards.

use crate::error::ApiResult;
use crate::patients::patient_res;
use crate::AppState;
use api_shared::{AdmitReq, DischargeReq, ErrorRes, PatientRes, StatusReq, TransferReq};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use ward_core::{BedId, PatientId};

#[utoipa::path(
    post,
    path = "/admissions",
    request_body = AdmitReq,
    responses(
        (status = 201, description = "Patient admitted", body = PatientRes),
        (status = 404, description = "No such patient or bed", body = ErrorRes),
        (status = 409, description = "Patient already admitted or bed occupied", body = ErrorRes)
    )
)]
/// Admit a patient into a free bed
///
/// Every admission starts in `admitted`; labor is entered through the status route.
///
/// # Errors
/// - `404 Not Found` if the patient or bed does not exist,
/// - `409 Conflict` if the patient already holds a bed or the bed is taken.
#[axum::debug_handler]
pub(crate) async fn admit(
    State(state): State<AppState>,
    Json(req): Json<AdmitReq>,
) -> ApiResult<(StatusCode, Json<PatientRes>)> {
    let actor = req.actor.to_actor()?;
    let patient_id = PatientId(req.patient_id);
    state.ledger.admit(
        patient_id,
        &req.bed(),
        req.admitted_at.unwrap_or_else(Utc::now),
        req.admission_reason(),
        &actor,
    )?;
    Ok((StatusCode::CREATED, patient_res(&state, patient_id)?))
}

#[utoipa::path(
    post,
    path = "/admissions/{patient_id}/transfer",
    params(("patient_id" = u32, Path, description = "Patient id")),
    request_body = TransferReq,
    responses(
        (status = 200, description = "Patient transferred", body = PatientRes),
        (status = 404, description = "No such patient or bed", body = ErrorRes),
        (status = 409, description = "Not admitted, same bed, or bed occupied", body = ErrorRes)
    )
)]
/// Move an admitted patient to another free bed
///
/// # Errors
/// - `404 Not Found` if the patient or target bed does not exist,
/// - `409 Conflict` if the patient holds no bed, already lies in the target bed, or the
///   target is taken.
#[axum::debug_handler]
pub(crate) async fn transfer(
    State(state): State<AppState>,
    Path(patient_id): Path<u32>,
    Json(req): Json<TransferReq>,
) -> ApiResult<Json<PatientRes>> {
    let actor = req.actor.to_actor()?;
    let patient_id = PatientId(patient_id);
    state
        .ledger
        .transfer(patient_id, &BedId::new(&req.bed_id), &req.reason, &actor)?;
    patient_res(&state, patient_id)
}

#[utoipa::path(
    post,
    path = "/admissions/{patient_id}/discharge",
    params(("patient_id" = u32, Path, description = "Patient id")),
    request_body = DischargeReq,
    responses(
        (status = 200, description = "Patient discharged", body = PatientRes),
        (status = 404, description = "No such patient", body = ErrorRes),
        (status = 409, description = "Patient not admitted or still in labor", body = ErrorRes),
        (status = 422, description = "Checklist incomplete; `unmet` lists the blocking items", body = ErrorRes)
    )
)]
/// Discharge an admitted patient and free her bed
///
/// Every required checklist item must be acknowledged and no supplied item may be false.
///
/// # Errors
/// - `404 Not Found` if the patient does not exist,
/// - `409 Conflict` if the patient holds no bed or is still in labor,
/// - `422 Unprocessable Entity` if the checklist is incomplete.
#[axum::debug_handler]
pub(crate) async fn discharge(
    State(state): State<AppState>,
    Path(patient_id): Path<u32>,
    Json(req): Json<DischargeReq>,
) -> ApiResult<Json<PatientRes>> {
    let actor = req.actor.to_actor()?;
    let patient_id = PatientId(patient_id);
    state
        .ledger
        .discharge(patient_id, req.discharge_type, &req.checklist(), &actor)?;
    patient_res(&state, patient_id)
}

#[utoipa::path(
    post,
    path = "/admissions/{patient_id}/status",
    params(("patient_id" = u32, Path, description = "Patient id")),
    request_body = StatusReq,
    responses(
        (status = 200, description = "Status changed", body = PatientRes),
        (status = 404, description = "No such patient", body = ErrorRes),
        (status = 409, description = "Not admitted or transition not allowed", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn set_status(
    State(state): State<AppState>,
    Path(patient_id): Path<u32>,
    Json(req): Json<StatusReq>,
) -> ApiResult<Json<PatientRes>> {
    let actor = req.actor.to_actor()?;
    let patient_id = PatientId(patient_id);
    state.ledger.set_status(patient_id, req.status, &actor)?;
    patient_res(&state, patient_id)
}
