//! Entity types held by the record store.

pub mod bed;
pub mod birth;
pub mod clinical;
pub mod episode;
pub mod patient;
pub mod practitioner;

pub use bed::{
    default_layout, numbered_beds, Bed, BedId, BedType, Sector, SectorScope, UnknownSector,
};
pub use birth::{Birth, BirthId, DeliveryType, NewBirth, NewNewborn, Newborn, NewbornId, Sex};
pub use clinical::{
    ClinicalNote, LabOrder, LabOrderId, LabStatus, NewClinicalNote, NoteId, NoteKind, VitalSigns,
};
pub use episode::{AdmissionEpisode, AdmissionReason, BedMovement, DischargeRecord, DischargeType};
pub use patient::{
    AdmissionStatus, BloodType, ObstetricHistory, Patient, PatientDetails, PatientDetailsUpdate,
    PatientId,
};
pub use practitioner::{
    NewPractitioner, Practitioner, PractitionerId, PractitionerUpdate, Specialty,
};
