//! # Ward Core
//!
//! Core business logic for the maternity ward record system.
//!
//! This crate contains the in-memory record store and the services that operate on it:
//! - Bed and admission ledger: admit, transfer, discharge and occupancy
//! - Patient, practitioner and birth registration
//! - Clinical notes, lab orders and read-only filtered queries
//! - Ward reports and table exports
//!
//! **No API concerns**: HTTP servers, CLIs and synthetic data belong in `api-rest`, `cli`
//! and `fixtures`.

pub mod actor;
pub mod births;
pub mod clinical;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod ledger;
pub mod model;
pub mod practitioners;
pub mod query;
pub mod registry;
pub mod report;
pub mod store;
pub mod validation;

pub use actor::{Actor, ActorRegistration};
pub use births::BirthRegistry;
pub use clinical::ClinicalRecords;
pub use config::WardConfig;
pub use error::{EntityKind, LedgerError, LedgerResult, StoreError, StoreResult};
pub use export::{
    ExportOptions, ExportTable, LabOrderRow, NewbornRow, NoteRow, WardExport, MASKED_NATIONAL_ID,
};
pub use ledger::{
    BedMapEntry, BedOccupant, DischargeChecklist, Ledger, OccupancySummary, SectorOccupancy,
};
pub use model::{
    default_layout, numbered_beds, AdmissionEpisode, AdmissionReason, AdmissionStatus, Bed,
    BedId, BedMovement, BedType, Birth, BirthId, BloodType, ClinicalNote, DeliveryType,
    DischargeRecord, DischargeType, LabOrder, LabOrderId, LabStatus, NewBirth, NewClinicalNote,
    NewNewborn, NewPractitioner, Newborn, NewbornId, NoteId, NoteKind, ObstetricHistory, Patient,
    PatientDetails, PatientDetailsUpdate, PatientId, Practitioner, PractitionerId,
    PractitionerUpdate, Sector, SectorScope, Sex, Specialty, UnknownSector, VitalSigns,
};
pub use practitioners::PractitionerRegistry;
pub use query::{AgeRange, BirthFilter, LabOrderFilter, NewbornFilter, PatientFilter, QueryService};
pub use registry::PatientRegistry;
pub use report::{
    DeliveryTypeCount, LaborAlert, RecentAdmission, WardReport, WeightStats,
};
pub use store::{Dataset, RecordStore};
pub use ward_types::{EmailAddress, NonEmptyText, TextError};
