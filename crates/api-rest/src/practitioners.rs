use crate::error::{ApiError, ApiResult};
use crate::AppState;
use api_shared::{
    ActorOnlyReq, ErrorRes, ListPractitionersRes, PractitionerQuery, PractitionerReq,
    PractitionerRes, UpdatePractitionerReq,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use ward_core::PractitionerId;

#[utoipa::path(
    get,
    path = "/practitioners",
    params(PractitionerQuery),
    responses(
        (status = 200, description = "Practitioners in id order", body = ListPractitionersRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_practitioners(
    State(state): State<AppState>,
    Query(query): Query<PractitionerQuery>,
) -> Json<ListPractitionersRes> {
    let practitioners = state
        .practitioners
        .list(query.active_only.unwrap_or(false))
        .into_iter()
        .map(PractitionerRes::from)
        .collect();
    Json(ListPractitionersRes { practitioners })
}

#[utoipa::path(
    post,
    path = "/practitioners",
    request_body = PractitionerReq,
    responses(
        (status = 201, description = "Practitioner added", body = PractitionerRes),
        (status = 409, description = "Registration already in use", body = ErrorRes),
        (status = 422, description = "Malformed registration or email", body = ErrorRes)
    )
)]
/// Add a practitioner
///
/// Registrations look like `12345-SP` and must be unique. New practitioners are active.
#[axum::debug_handler]
pub(crate) async fn add_practitioner(
    State(state): State<AppState>,
    Json(req): Json<PractitionerReq>,
) -> ApiResult<(StatusCode, Json<PractitionerRes>)> {
    let actor = req.actor.to_actor()?;
    let practitioner = state.practitioners.add(req.to_profile()?, &actor)?;
    Ok((StatusCode::CREATED, Json(PractitionerRes::from(practitioner))))
}

#[utoipa::path(
    get,
    path = "/practitioners/{id}",
    params(("id" = u32, Path, description = "Practitioner id")),
    responses(
        (status = 200, description = "The practitioner", body = PractitionerRes),
        (status = 404, description = "No such practitioner", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn get_practitioner(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<Json<PractitionerRes>> {
    state
        .practitioners
        .get(PractitionerId(id))
        .map(|p| Json(PractitionerRes::from(p)))
        .ok_or_else(|| ApiError::not_found(format!("practitioner {id} not found")))
}

#[utoipa::path(
    put,
    path = "/practitioners/{id}",
    params(("id" = u32, Path, description = "Practitioner id")),
    request_body = UpdatePractitionerReq,
    responses(
        (status = 200, description = "Practitioner updated", body = PractitionerRes),
        (status = 404, description = "No such practitioner", body = ErrorRes),
        (status = 422, description = "Invalid field", body = ErrorRes)
    )
)]
/// Update a practitioner's profile
///
/// `active` deactivates or reactivates the practitioner after the profile fields are applied.
#[axum::debug_handler]
pub(crate) async fn update_practitioner(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<UpdatePractitionerReq>,
) -> ApiResult<Json<PractitionerRes>> {
    let actor = req.actor.to_actor()?;
    let id = PractitionerId(id);
    let mut practitioner = state.practitioners.update(id, req.to_update()?, &actor)?;
    match req.active {
        Some(true) if !practitioner.active => {
            practitioner = state.practitioners.reactivate(id, &actor)?;
        }
        Some(false) if practitioner.active => {
            practitioner = state.practitioners.deactivate(id, &actor)?;
        }
        _ => {}
    }
    Ok(Json(PractitionerRes::from(practitioner)))
}

#[utoipa::path(
    post,
    path = "/practitioners/{id}/deactivate",
    params(("id" = u32, Path, description = "Practitioner id")),
    request_body = ActorOnlyReq,
    responses(
        (status = 200, description = "Practitioner deactivated", body = PractitionerRes),
        (status = 404, description = "No such practitioner", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn deactivate_practitioner(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<ActorOnlyReq>,
) -> ApiResult<Json<PractitionerRes>> {
    let actor = req.actor.to_actor()?;
    let practitioner = state.practitioners.deactivate(PractitionerId(id), &actor)?;
    Ok(Json(PractitionerRes::from(practitioner)))
}

#[utoipa::path(
    post,
    path = "/practitioners/{id}/reactivate",
    params(("id" = u32, Path, description = "Practitioner id")),
    request_body = ActorOnlyReq,
    responses(
        (status = 200, description = "Practitioner reactivated", body = PractitionerRes),
        (status = 404, description = "No such practitioner", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn reactivate_practitioner(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<ActorOnlyReq>,
) -> ApiResult<Json<PractitionerRes>> {
    let actor = req.actor.to_actor()?;
    let practitioner = state.practitioners.reactivate(PractitionerId(id), &actor)?;
    Ok(Json(PractitionerRes::from(practitioner)))
}
