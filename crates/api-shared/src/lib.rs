//! # API Shared
//!
//! Request and response types for the ward REST API.
//!
//! Contains:
//! - JSON bodies and query parameters with their OpenAPI schemas
//! - Conversions between wire types and `ward-core` domain types
//! - Shared services like `HealthService`
//!
//! Used by `api-rest`.

pub mod actor;
pub mod admissions;
pub mod beds;
pub mod births;
pub mod health;
pub mod patients;
pub mod practitioners;
pub mod records;
pub mod reports;

pub use actor::{ActorOnlyReq, ActorReq, ErrorRes};
pub use admissions::{
    AdmitReq, DischargeReq, DischargeRes, EpisodeRes, ListEpisodesRes, MovementRes, StatusReq,
    TransferReq,
};
pub use beds::{
    BedMapEntryRes, BedOccupantRes, FreeBedsRes, OccupancyRes, OccupancySummaryRes,
    SectorOccupancyRes, SectorQuery,
};
pub use births::{
    BirthQuery, BirthReq, BirthRes, ListBirthsRes, ListNewbornsRes, NewbornQuery, NewbornReq,
    NewbornRes, RegisterBirthRes,
};
pub use health::{HealthRes, HealthService};
pub use patients::{ListPatientsRes, PatientQuery, PatientRes, RegisterPatientReq, UpdatePatientReq};
pub use practitioners::{
    ListPractitionersRes, PractitionerQuery, PractitionerReq, PractitionerRes,
    UpdatePractitionerReq,
};
pub use records::{
    LabOrderQuery, LabOrderReq, LabOrderRes, LabResultReq, ListLabOrdersRes, ListNotesRes,
    NoteReq, NoteRes, VitalsDto,
};
pub use reports::ExportQuery;
