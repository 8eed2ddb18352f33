//! Patient registration and demographic updates.
//!
//! Registration never touches occupancy: new patients start as
//! [`AdmissionStatus::Registered`](crate::AdmissionStatus) with no bed.

use crate::actor::Actor;
use crate::error::{EntityKind, StoreError, StoreResult};
use crate::model::{Patient, PatientDetails, PatientDetailsUpdate, PatientId};
use crate::store::RecordStore;
use crate::validation::validate_gestational_weeks;
use std::sync::Arc;

/// Service for registering patients and editing their non-occupancy details.
#[derive(Clone, Debug)]
pub struct PatientRegistry {
    store: Arc<RecordStore>,
}

impl PatientRegistry {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Registers a new patient with the next free id.
    ///
    /// # Errors
    ///
    /// - [`StoreError::AlreadyRegistered`] if the national id is already on file,
    /// - [`StoreError::InvalidInput`] if the gestational age is implausible.
    pub fn register_patient(&self, details: PatientDetails, actor: &Actor) -> StoreResult<Patient> {
        validate_gestational_weeks(details.obstetric.gestational_weeks)?;

        let mut tables = self.store.write();
        let duplicate = tables
            .patients
            .values()
            .any(|p| p.details.national_id == details.national_id);
        if duplicate {
            tracing::warn!(actor = %actor, "rejected registration with duplicate national id");
            return Err(StoreError::AlreadyRegistered {
                entity: EntityKind::Patient,
                field: "national id",
                value: details.national_id.to_string(),
            });
        }

        let id = PatientId(tables.patients.keys().last().map_or(1, |last| last.0 + 1));
        let patient = Patient::new(id, details);
        tables.patients.insert(id, patient.clone());
        tracing::info!(patient = %id, actor = %actor, "patient registered");
        Ok(patient)
    }

    /// Applies a partial update to a patient's details. Admission state is never changed here.
    pub fn update_patient_details(
        &self,
        patient_id: PatientId,
        update: PatientDetailsUpdate,
        actor: &Actor,
    ) -> StoreResult<Patient> {
        if let Some(weeks) = update.gestational_weeks {
            validate_gestational_weeks(weeks)?;
        }

        let mut tables = self.store.write();
        let patient = tables
            .patients
            .get_mut(&patient_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: EntityKind::Patient,
                id: patient_id.to_string(),
            })?;
        update.apply(&mut patient.details);
        tracing::info!(patient = %patient_id, actor = %actor, "patient details updated");
        Ok(patient.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::nurse;
    use crate::model::patient::fixtures::details;
    use crate::model::AdmissionStatus;
    use crate::store::test_support::small_store;
    use ward_types::NonEmptyText;

    fn registry() -> PatientRegistry {
        PatientRegistry::new(Arc::new(small_store()))
    }

    #[test]
    fn test_register_assigns_next_id_and_registered_status() {
        let registry = registry();
        let patient = registry
            .register_patient(details("Beatriz Rocha", "123.456.789-00"), &nurse())
            .unwrap();
        assert_eq!(patient.id, PatientId(4));
        assert_eq!(patient.status(), AdmissionStatus::Registered);
        assert!(patient.current_bed().is_none());
        assert!(registry.store.get_patient(PatientId(4)).is_some());
    }

    #[test]
    fn test_register_rejects_duplicate_national_id() {
        let registry = registry();
        let existing = registry.store.get_patient(PatientId(1)).unwrap();
        let err = registry
            .register_patient(
                details("Someone Else", existing.details.national_id.as_str()),
                &nurse(),
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyRegistered { .. }));
        assert_eq!(registry.store.patient_count(), 3);
    }

    #[test]
    fn test_register_rejects_implausible_gestation() {
        let mut d = details("Beatriz Rocha", "123.456.789-00");
        d.obstetric.gestational_weeks = 60;
        assert!(matches!(
            registry().register_patient(d, &nurse()),
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_update_keeps_occupancy() {
        let registry = registry();
        let updated = registry
            .update_patient_details(
                PatientId(3),
                PatientDetailsUpdate {
                    name: Some(NonEmptyText::new("Patient Three Souza").unwrap()),
                    phone: Some("(11) 98888-0000".into()),
                    ..Default::default()
                },
                &nurse(),
            )
            .unwrap();
        assert_eq!(updated.details.name.as_str(), "Patient Three Souza");
        assert_eq!(updated.status(), AdmissionStatus::PostPartum);
        assert!(updated.is_admitted());
    }

    #[test]
    fn test_update_unknown_patient() {
        let err = registry()
            .update_patient_details(PatientId(77), PatientDetailsUpdate::default(), &nurse())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
