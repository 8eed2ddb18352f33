//! Clinical notes and laboratory orders.
//!
//! Both are append-mostly: notes are never edited, and a lab order changes exactly once,
//! from pending to completed, when its result is recorded.

use crate::actor::Actor;
use crate::error::{EntityKind, StoreError, StoreResult};
use crate::model::{
    ClinicalNote, LabOrder, LabOrderId, LabStatus, NewClinicalNote, NoteId, PatientId,
};
use crate::store::{RecordStore, Tables};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use ward_types::NonEmptyText;

/// Service for writing clinical notes and lab orders.
#[derive(Clone, Debug)]
pub struct ClinicalRecords {
    store: Arc<RecordStore>,
}

impl ClinicalRecords {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Appends a note to a patient's record, attributed to `actor` and stamped now.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the patient does not exist.
    pub fn add_note(
        &self,
        patient_id: PatientId,
        content: NewClinicalNote,
        actor: &Actor,
    ) -> StoreResult<ClinicalNote> {
        let mut tables = self.store.write();
        ensure_patient(&tables, patient_id)?;

        let id = NoteId(tables.notes.iter().map(|n| n.id.0).max().unwrap_or(0) + 1);
        let note = ClinicalNote {
            id,
            patient_id,
            written_at: Utc::now(),
            author: actor.attribution(),
            content,
        };
        tables.notes.push(note.clone());
        tracing::info!(patient = %patient_id, note = id.0, actor = %actor, "clinical note added");
        Ok(note)
    }

    /// Creates a pending lab order.
    pub fn request_lab_order(
        &self,
        patient_id: PatientId,
        exam: NonEmptyText,
        requested_on: NaiveDate,
        actor: &Actor,
    ) -> StoreResult<LabOrder> {
        let mut tables = self.store.write();
        ensure_patient(&tables, patient_id)?;

        let id = LabOrderId(tables.lab_orders.iter().map(|o| o.id.0).max().unwrap_or(0) + 1);
        let order = LabOrder {
            id,
            patient_id,
            exam,
            requested_on,
            requested_by: actor.attribution(),
            status: LabStatus::Pending,
            resulted_on: None,
            result: None,
        };
        tables.lab_orders.push(order.clone());
        tracing::info!(patient = %patient_id, order = %id, exam = %order.exam, "lab order requested");
        Ok(order)
    }

    /// Completes a pending lab order with its result.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the order does not exist,
    /// - `StoreError::InvalidInput` if the order already has a result or `resulted_on` is
    ///   before the request date.
    pub fn record_lab_result(
        &self,
        order_id: LabOrderId,
        result: NonEmptyText,
        resulted_on: NaiveDate,
        actor: &Actor,
    ) -> StoreResult<LabOrder> {
        let mut tables = self.store.write();
        let order = tables
            .lab_orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: EntityKind::LabOrder,
                id: order_id.to_string(),
            })?;

        if order.status == LabStatus::Completed {
            return Err(StoreError::InvalidInput(format!(
                "lab order {order_id} already has a result"
            )));
        }
        if resulted_on < order.requested_on {
            return Err(StoreError::InvalidInput(format!(
                "result date {resulted_on} is before the request date {}",
                order.requested_on
            )));
        }

        order.status = LabStatus::Completed;
        order.resulted_on = Some(resulted_on);
        order.result = Some(result.into_inner());
        tracing::info!(order = %order_id, actor = %actor, "lab result recorded");
        Ok(order.clone())
    }
}

fn ensure_patient(tables: &Tables, patient_id: PatientId) -> StoreResult<()> {
    if tables.patient(patient_id).is_none() {
        return Err(StoreError::NotFound {
            entity: EntityKind::Patient,
            id: patient_id.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::nurse;
    use crate::model::{NoteKind, VitalSigns};
    use crate::query::{LabOrderFilter, QueryService};
    use crate::store::test_support::small_store;

    fn text(s: &str) -> NonEmptyText {
        NonEmptyText::new(s).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn progress(description: &str) -> NewClinicalNote {
        NewClinicalNote {
            kind: NoteKind::Progress,
            description: text(description),
            vitals: Some(VitalSigns {
                blood_pressure: "120/80".into(),
                heart_rate: 82,
                temperature_c: 36.6,
                respiratory_rate: 16,
            }),
            plan: Some("Keep current prescription".into()),
        }
    }

    #[test]
    fn test_notes_get_sequential_ids_and_author() {
        let store = Arc::new(small_store());
        let records = ClinicalRecords::new(store.clone());

        let first = records.add_note(PatientId(3), progress("Good general state"), &nurse()).unwrap();
        let second = records.add_note(PatientId(1), progress("Mild pain"), &nurse()).unwrap();
        assert_eq!(first.id, NoteId(1));
        assert_eq!(second.id, NoteId(2));
        assert_eq!(first.author, "Enf. Juliana Martins (Nurse)");

        let notes = QueryService::new(store).notes_for(PatientId(3)).unwrap();
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn test_note_for_unknown_patient_is_rejected() {
        let records = ClinicalRecords::new(Arc::new(small_store()));
        let err = records
            .add_note(PatientId(50), progress("nobody"), &nurse())
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                entity: EntityKind::Patient,
                ..
            }
        ));
    }

    #[test]
    fn test_lab_order_lifecycle() {
        let store = Arc::new(small_store());
        let records = ClinicalRecords::new(store.clone());

        let order = records
            .request_lab_order(PatientId(3), text("Complete blood count"), date(9), &nurse())
            .unwrap();
        assert_eq!(order.status, LabStatus::Pending);

        let err = records
            .record_lab_result(order.id, text("Hb 11.8"), date(8), &nurse())
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));

        let done = records
            .record_lab_result(order.id, text("Hb 11.8"), date(10), &nurse())
            .unwrap();
        assert_eq!(done.status, LabStatus::Completed);
        assert_eq!(done.result.as_deref(), Some("Hb 11.8"));

        assert!(records
            .record_lab_result(order.id, text("again"), date(11), &nurse())
            .is_err());
        assert!(records
            .record_lab_result(LabOrderId(99), text("x"), date(11), &nurse())
            .is_err());

        let pending = QueryService::new(store).lab_orders(&LabOrderFilter {
            status: Some(LabStatus::Pending),
            ..Default::default()
        });
        assert!(pending.is_empty());
    }
}
