//! # API REST
//!
//! REST API for the maternity ward record system.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! Uses `api-shared` for request/response types and `ward-core` for everything else.

#![warn(rust_2018_idioms)]

mod admissions;
mod beds;
mod births;
pub mod error;
mod patients;
mod practitioners;
mod records;
mod reports;

use api_shared::{HealthRes, HealthService};
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use ward_core::{
    BirthRegistry, ClinicalRecords, Ledger, PatientRegistry, PractitionerRegistry, QueryService,
    RecordStore, StoreResult, WardConfig,
};

/// Application state for the REST API server
///
/// Every service wraps the same `RecordStore`, so a write made through one is visible to
/// all the others.
#[derive(Clone)]
pub struct AppState {
    store: Arc<RecordStore>,
    ledger: Ledger,
    queries: QueryService,
    patients: PatientRegistry,
    practitioners: PractitionerRegistry,
    clinical: ClinicalRecords,
    births: BirthRegistry,
}

impl AppState {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self {
            ledger: Ledger::new(store.clone()),
            queries: QueryService::new(store.clone()),
            patients: PatientRegistry::new(store.clone()),
            practitioners: PractitionerRegistry::new(store.clone()),
            clinical: ClinicalRecords::new(store.clone()),
            births: BirthRegistry::new(store.clone()),
            store,
        }
    }

    /// Builds state over a synthetic dataset generated from `config`.
    ///
    /// # Errors
    /// Returns an error if the generated dataset fails store validation.
    pub fn seeded(config: &WardConfig, today: NaiveDate) -> StoreResult<Self> {
        let dataset = ward_fixtures::generate_for(config, today)?;
        let store = RecordStore::new(dataset)?;
        tracing::info!(
            seed = config.seed(),
            patients = store.patient_count(),
            beds = store.bed_count(),
            "record store seeded"
        );
        Ok(Self::new(Arc::new(store)))
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }
}

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        beds::occupancy,
        beds::free_beds,
        beds::bed_map,
        patients::list_patients,
        patients::register_patient,
        patients::get_patient,
        patients::update_patient,
        patients::list_episodes,
        admissions::admit,
        admissions::transfer,
        admissions::discharge,
        admissions::set_status,
        records::list_notes,
        records::add_note,
        records::list_patient_lab_orders,
        records::request_lab_order,
        records::list_lab_orders,
        records::record_lab_result,
        practitioners::list_practitioners,
        practitioners::add_practitioner,
        practitioners::get_practitioner,
        practitioners::update_practitioner,
        practitioners::deactivate_practitioner,
        practitioners::reactivate_practitioner,
        births::list_births,
        births::register_birth,
        births::list_newborns,
        reports::report_summary,
        reports::export_tables,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::ErrorRes,
        api_shared::ActorReq,
        api_shared::ActorOnlyReq,
        api_shared::OccupancyRes,
        api_shared::OccupancySummaryRes,
        api_shared::SectorOccupancyRes,
        api_shared::FreeBedsRes,
        api_shared::BedMapEntryRes,
        api_shared::BedOccupantRes,
        api_shared::PatientRes,
        api_shared::ListPatientsRes,
        api_shared::RegisterPatientReq,
        api_shared::UpdatePatientReq,
        api_shared::AdmitReq,
        api_shared::TransferReq,
        api_shared::DischargeReq,
        api_shared::StatusReq,
        api_shared::EpisodeRes,
        api_shared::MovementRes,
        api_shared::DischargeRes,
        api_shared::ListEpisodesRes,
        api_shared::NoteReq,
        api_shared::NoteRes,
        api_shared::VitalsDto,
        api_shared::ListNotesRes,
        api_shared::LabOrderReq,
        api_shared::LabResultReq,
        api_shared::LabOrderRes,
        api_shared::ListLabOrdersRes,
        api_shared::PractitionerReq,
        api_shared::UpdatePractitionerReq,
        api_shared::PractitionerRes,
        api_shared::ListPractitionersRes,
        api_shared::BirthReq,
        api_shared::NewbornReq,
        api_shared::BirthRes,
        api_shared::NewbornRes,
        api_shared::RegisterBirthRes,
        api_shared::ListBirthsRes,
        api_shared::ListNewbornsRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI at `/swagger-ui` and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/beds/occupancy", get(beds::occupancy))
        .route("/beds/free", get(beds::free_beds))
        .route("/beds/map", get(beds::bed_map))
        .route(
            "/patients",
            get(patients::list_patients).post(patients::register_patient),
        )
        .route(
            "/patients/:id",
            get(patients::get_patient).patch(patients::update_patient),
        )
        .route("/patients/:id/episodes", get(patients::list_episodes))
        .route(
            "/patients/:id/notes",
            get(records::list_notes).post(records::add_note),
        )
        .route(
            "/patients/:id/lab-orders",
            get(records::list_patient_lab_orders).post(records::request_lab_order),
        )
        .route("/lab-orders", get(records::list_lab_orders))
        .route("/lab-orders/:id/result", post(records::record_lab_result))
        .route("/admissions", post(admissions::admit))
        .route("/admissions/:patient_id/transfer", post(admissions::transfer))
        .route("/admissions/:patient_id/discharge", post(admissions::discharge))
        .route("/admissions/:patient_id/status", post(admissions::set_status))
        .route(
            "/practitioners",
            get(practitioners::list_practitioners).post(practitioners::add_practitioner),
        )
        .route(
            "/practitioners/:id",
            get(practitioners::get_practitioner).put(practitioners::update_practitioner),
        )
        .route(
            "/practitioners/:id/deactivate",
            post(practitioners::deactivate_practitioner),
        )
        .route(
            "/practitioners/:id/reactivate",
            post(practitioners::reactivate_practitioner),
        )
        .route("/births", get(births::list_births).post(births::register_birth))
        .route("/newborns", get(births::list_newborns))
        .route("/reports/summary", get(reports::report_summary))
        .route("/reports/export", get(reports::export_tables))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `addr` and serves the router until the process is stopped.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails while running.
pub async fn serve(addr: &str, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("-- REST API listening on {}", addr);
    axum::serve(listener, router(state)).await
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// This endpoint is used for monitoring and load balancer health checks.
///
/// # Returns
/// * `Json<HealthRes>` - Health status response containing service status
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}
