use crate::model::{AdmissionStatus, BedId, PatientId};
use std::fmt;

/// Kinds of record that can be looked up by id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Patient,
    Bed,
    Practitioner,
    LabOrder,
    Birth,
    Newborn,
    Note,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Patient => "patient",
            EntityKind::Bed => "bed",
            EntityKind::Practitioner => "practitioner",
            EntityKind::LabOrder => "lab order",
            EntityKind::Birth => "birth",
            EntityKind::Newborn => "newborn",
            EntityKind::Note => "clinical note",
        })
    }
}

/// Rejections from bed and admission operations.
///
/// Every variant leaves the store exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: String },
    #[error("patient {patient} is already admitted to bed {bed}")]
    AlreadyAdmitted { patient: PatientId, bed: BedId },
    #[error("patient {patient} is not currently admitted")]
    NotAdmitted { patient: PatientId },
    #[error("bed {bed} is occupied by patient {occupant}")]
    BedOccupied { bed: BedId, occupant: PatientId },
    #[error("patient is already in bed {bed}")]
    SameBed { bed: BedId },
    #[error("discharge checklist incomplete: {}", unmet.join(", "))]
    IncompleteChecklist { unmet: Vec<String> },
    #[error("cannot change admission status from {from} to {to}")]
    InvalidTransition {
        from: AdmissionStatus,
        to: AdmissionStatus,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl LedgerError {
    pub(crate) fn patient_not_found(id: PatientId) -> Self {
        LedgerError::NotFound {
            entity: EntityKind::Patient,
            id: id.to_string(),
        }
    }

    pub(crate) fn bed_not_found(id: &BedId) -> Self {
        LedgerError::NotFound {
            entity: EntityKind::Bed,
            id: id.to_string(),
        }
    }
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Errors from building the record store, the registries and configuration.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("duplicate {entity} id {id}")]
    DuplicateId { entity: EntityKind, id: String },
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: String },
    #[error("a {entity} with {field} {value} is already registered")]
    AlreadyRegistered {
        entity: EntityKind,
        field: &'static str,
        value: String,
    },
    #[error("patient {patient} references unknown bed {bed}")]
    UnknownBed { patient: PatientId, bed: BedId },
    #[error("bed {bed} is occupied by both patient {first} and patient {second}")]
    DoubleOccupancy {
        bed: BedId,
        first: PatientId,
        second: PatientId,
    },
    #[error("patient {patient} has status {status} but bed assignment {bed:?}")]
    InconsistentAdmission {
        patient: PatientId,
        status: AdmissionStatus,
        bed: Option<BedId>,
    },
    #[error("{entity} {id} references unknown patient {patient}")]
    DanglingReference {
        entity: EntityKind,
        id: String,
        patient: PatientId,
    },
    #[error("invalid text: {0}")]
    Text(#[from] ward_types::TextError),
    #[error("failed to read bed layout file: {0}")]
    LayoutRead(std::io::Error),
    #[error("bed layout error: {0}")]
    Layout(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_checklist_lists_items() {
        let err = LedgerError::IncompleteChecklist {
            unmet: vec!["discharge_summary".into(), "newborn_screening".into()],
        };
        assert_eq!(
            err.to_string(),
            "discharge checklist incomplete: discharge_summary, newborn_screening"
        );
    }

    #[test]
    fn not_found_names_entity() {
        let err = LedgerError::bed_not_found(&BedId::from("XX-99"));
        assert_eq!(err.to_string(), "bed XX-99 not found");
    }
}
