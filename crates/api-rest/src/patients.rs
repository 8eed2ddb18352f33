use crate::error::{ApiError, ApiResult};
use crate::{today, AppState};
use api_shared::{
    EpisodeRes, ErrorRes, ListEpisodesRes, ListPatientsRes, PatientQuery, PatientRes,
    RegisterPatientReq, UpdatePatientReq,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use ward_core::PatientId;

/// Looks up a patient and renders it, or answers 404.
pub(crate) fn patient_res(state: &AppState, id: PatientId) -> ApiResult<Json<PatientRes>> {
    state
        .store
        .get_patient(id)
        .map(|p| Json(PatientRes::from(&p)))
        .ok_or_else(|| ApiError::not_found(format!("patient {id} not found")))
}

#[utoipa::path(
    get,
    path = "/patients",
    params(PatientQuery),
    responses(
        (status = 200, description = "Matching patients in id order", body = ListPatientsRes),
        (status = 422, description = "Unknown status or sector", body = ErrorRes)
    )
)]
/// Search patients
///
/// Every given parameter must match. List parameters match any of their values.
///
/// # Errors
/// Returns `422 Unprocessable Entity` if a status or sector cannot be parsed.
#[axum::debug_handler]
pub(crate) async fn list_patients(
    State(state): State<AppState>,
    Query(query): Query<PatientQuery>,
) -> ApiResult<Json<ListPatientsRes>> {
    let filter = query.to_filter(today())?;
    let patients = state
        .queries
        .patients(&filter)
        .iter()
        .map(PatientRes::from)
        .collect();
    Ok(Json(ListPatientsRes { patients }))
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = RegisterPatientReq,
    responses(
        (status = 201, description = "Patient registered", body = PatientRes),
        (status = 409, description = "National id already registered", body = ErrorRes),
        (status = 422, description = "Invalid patient details", body = ErrorRes)
    )
)]
/// Register a new patient
///
/// The pregnancy is dated from today and the given gestational age. New patients are
/// `registered` and hold no bed.
///
/// # Errors
/// - `409 Conflict` if the national id is already registered,
/// - `422 Unprocessable Entity` if a required field is blank or the gestational age is out
///   of range.
#[axum::debug_handler]
pub(crate) async fn register_patient(
    State(state): State<AppState>,
    Json(req): Json<RegisterPatientReq>,
) -> ApiResult<(StatusCode, Json<PatientRes>)> {
    let actor = req.actor.to_actor()?;
    let details = req.to_details(today())?;
    let patient = state.patients.register_patient(details, &actor)?;
    Ok((StatusCode::CREATED, Json(PatientRes::from(&patient))))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = u32, Path, description = "Patient id")),
    responses(
        (status = 200, description = "The patient", body = PatientRes),
        (status = 404, description = "No such patient", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<Json<PatientRes>> {
    patient_res(&state, PatientId(id))
}

#[utoipa::path(
    patch,
    path = "/patients/{id}",
    params(("id" = u32, Path, description = "Patient id")),
    request_body = UpdatePatientReq,
    responses(
        (status = 200, description = "Patient updated", body = PatientRes),
        (status = 404, description = "No such patient", body = ErrorRes),
        (status = 422, description = "Invalid details", body = ErrorRes)
    )
)]
/// Update a patient's details
///
/// Admission state is only changed through the admission endpoints.
#[axum::debug_handler]
pub(crate) async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<UpdatePatientReq>,
) -> ApiResult<Json<PatientRes>> {
    let actor = req.actor.to_actor()?;
    let patient = state
        .patients
        .update_patient_details(PatientId(id), req.to_update()?, &actor)?;
    Ok(Json(PatientRes::from(&patient)))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/episodes",
    params(("id" = u32, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Admission episodes, oldest first", body = ListEpisodesRes),
        (status = 404, description = "No such patient", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_episodes(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<Json<ListEpisodesRes>> {
    let episodes = state
        .ledger
        .episodes_for(PatientId(id))?
        .into_iter()
        .map(EpisodeRes::from)
        .collect();
    Ok(Json(ListEpisodesRes { episodes }))
}
