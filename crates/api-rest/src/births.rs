use crate::error::ApiResult;
use crate::AppState;
use api_shared::{
    BirthQuery, BirthReq, BirthRes, ErrorRes, ListBirthsRes, ListNewbornsRes, NewbornQuery,
    NewbornRes, RegisterBirthRes,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use ward_core::PatientId;

#[utoipa::path(
    get,
    path = "/births",
    params(BirthQuery),
    responses(
        (status = 200, description = "Matching births, newest first", body = ListBirthsRes),
        (status = 422, description = "Unknown delivery type", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_births(
    State(state): State<AppState>,
    Query(query): Query<BirthQuery>,
) -> ApiResult<Json<ListBirthsRes>> {
    let filter = query.to_filter()?;
    let births = state
        .queries
        .births(&filter)
        .into_iter()
        .map(BirthRes::from)
        .collect();
    Ok(Json(ListBirthsRes { births }))
}

#[utoipa::path(
    post,
    path = "/births",
    request_body = BirthReq,
    responses(
        (status = 201, description = "Birth and newborn registered", body = RegisterBirthRes),
        (status = 404, description = "No such patient", body = ErrorRes),
        (status = 409, description = "Mother not admitted or already post partum", body = ErrorRes),
        (status = 422, description = "Inconsistent delivery or newborn details", body = ErrorRes)
    )
)]
/// Register a delivery
///
/// The mother keeps her bed and moves to `post_partum`.
///
/// # Errors
/// - `404 Not Found` if the mother does not exist,
/// - `409 Conflict` if she holds no bed or is already post partum,
/// - `422 Unprocessable Entity` if a cesarean has no indication, an Apgar score is above 10,
///   or another detail is inconsistent.
#[axum::debug_handler]
pub(crate) async fn register_birth(
    State(state): State<AppState>,
    Json(req): Json<BirthReq>,
) -> ApiResult<(StatusCode, Json<RegisterBirthRes>)> {
    let actor = req.actor.to_actor()?;
    let (delivery, newborn) = req.to_records();
    let (birth, newborn) =
        state
            .births
            .register_birth(PatientId(req.patient_id), delivery, newborn, &actor)?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterBirthRes {
            birth: BirthRes::from(birth),
            newborn: NewbornRes::from(newborn),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/newborns",
    params(NewbornQuery),
    responses(
        (status = 200, description = "Matching newborns", body = ListNewbornsRes),
        (status = 422, description = "Unknown sex", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_newborns(
    State(state): State<AppState>,
    Query(query): Query<NewbornQuery>,
) -> ApiResult<Json<ListNewbornsRes>> {
    let filter = query.to_filter()?;
    let newborns = state
        .queries
        .newborns(&filter)
        .into_iter()
        .map(NewbornRes::from)
        .collect();
    Ok(Json(ListNewbornsRes { newborns }))
}
