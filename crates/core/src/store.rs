//! The record store: single source of truth for every ward table.
//!
//! A [`RecordStore`] is built from a [`Dataset`] and shared by handle (`Arc<RecordStore>`)
//! with the ledger, the query layer and the registries. All tables sit behind one
//! `parking_lot::RwLock`, so a writer's check-then-apply sequence is atomic and readers only
//! ever see whole writes.

use crate::error::{EntityKind, StoreError, StoreResult};
use crate::model::{
    AdmissionEpisode, AdmissionReason, Bed, BedId, Birth, ClinicalNote, LabOrder, Newborn,
    Patient, PatientId, Practitioner, PractitionerId,
};
use crate::model::patient::OccupancyUpdate;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Initial contents of a record store.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub beds: Vec<Bed>,
    pub patients: Vec<Patient>,
    pub births: Vec<Birth>,
    pub newborns: Vec<Newborn>,
    pub notes: Vec<ClinicalNote>,
    pub lab_orders: Vec<LabOrder>,
    pub practitioners: Vec<Practitioner>,
}

impl Dataset {
    /// A dataset with beds and nothing else.
    pub fn with_beds(beds: Vec<Bed>) -> Self {
        Self {
            beds,
            ..Default::default()
        }
    }
}

/// The tables themselves. Only reachable through the store's lock.
#[derive(Debug)]
pub(crate) struct Tables {
    pub(crate) beds: BTreeMap<BedId, Bed>,
    pub(crate) patients: BTreeMap<PatientId, Patient>,
    pub(crate) episodes: Vec<AdmissionEpisode>,
    pub(crate) births: Vec<Birth>,
    pub(crate) newborns: Vec<Newborn>,
    pub(crate) notes: Vec<ClinicalNote>,
    pub(crate) lab_orders: Vec<LabOrder>,
    pub(crate) practitioners: BTreeMap<PractitionerId, Practitioner>,
}

impl Tables {
    pub(crate) fn patient(&self, id: PatientId) -> Option<&Patient> {
        self.patients.get(&id)
    }

    pub(crate) fn bed(&self, id: &BedId) -> Option<&Bed> {
        self.beds.get(id)
    }

    /// The patient whose current bed is `bed`, if any.
    pub(crate) fn occupant_of(&self, bed: &BedId) -> Option<&Patient> {
        self.patients
            .values()
            .find(|p| p.current_bed() == Some(bed))
    }

    pub(crate) fn occupied_beds(&self) -> HashSet<&BedId> {
        self.patients
            .values()
            .filter_map(|p| p.current_bed())
            .collect()
    }

    /// The single mutation entry point for occupancy fields. Callers must have checked
    /// the ledger's preconditions under the same write lock.
    pub(crate) fn update_occupancy(&mut self, id: PatientId, update: OccupancyUpdate) {
        if let Some(patient) = self.patients.get_mut(&id) {
            patient.set_occupancy(update);
        }
    }

    pub(crate) fn open_episode_mut(&mut self, id: PatientId) -> Option<&mut AdmissionEpisode> {
        self.episodes
            .iter_mut()
            .rev()
            .find(|e| e.patient_id == id && e.is_open())
    }

    fn from_dataset(dataset: Dataset) -> StoreResult<Self> {
        let mut beds = BTreeMap::new();
        for bed in dataset.beds {
            if beds.contains_key(&bed.id) {
                return Err(StoreError::DuplicateId {
                    entity: EntityKind::Bed,
                    id: bed.id.to_string(),
                });
            }
            beds.insert(bed.id.clone(), bed);
        }

        let mut patients = BTreeMap::new();
        let mut national_ids = HashSet::new();
        let mut occupants: HashMap<BedId, PatientId> = HashMap::new();
        for patient in dataset.patients {
            if patients.contains_key(&patient.id) {
                return Err(StoreError::DuplicateId {
                    entity: EntityKind::Patient,
                    id: patient.id.to_string(),
                });
            }
            if !national_ids.insert(patient.details.national_id.clone()) {
                return Err(StoreError::AlreadyRegistered {
                    entity: EntityKind::Patient,
                    field: "national id",
                    value: patient.details.national_id.to_string(),
                });
            }

            let status = patient.status();
            let bed = patient.current_bed().cloned();
            if status.is_active() != bed.is_some()
                || status.is_active() != patient.admission_date().is_some()
            {
                return Err(StoreError::InconsistentAdmission {
                    patient: patient.id,
                    status,
                    bed,
                });
            }
            if let Some(bed) = bed {
                if !beds.contains_key(&bed) {
                    return Err(StoreError::UnknownBed {
                        patient: patient.id,
                        bed,
                    });
                }
                if let Some(first) = occupants.insert(bed.clone(), patient.id) {
                    return Err(StoreError::DoubleOccupancy {
                        bed,
                        first,
                        second: patient.id,
                    });
                }
            }
            patients.insert(patient.id, patient);
        }

        let check_patient = |entity: EntityKind, id: String, patient: PatientId| {
            if patients.contains_key(&patient) {
                Ok(())
            } else {
                Err(StoreError::DanglingReference {
                    entity,
                    id,
                    patient,
                })
            }
        };
        for birth in &dataset.births {
            check_patient(EntityKind::Birth, birth.id.to_string(), birth.patient_id)?;
        }
        let birth_ids: HashSet<_> = dataset.births.iter().map(|b| b.id).collect();
        for newborn in &dataset.newborns {
            check_patient(EntityKind::Newborn, newborn.id.to_string(), newborn.mother_id)?;
            if !birth_ids.contains(&newborn.birth_id) {
                return Err(StoreError::NotFound {
                    entity: EntityKind::Birth,
                    id: newborn.birth_id.to_string(),
                });
            }
        }
        for note in &dataset.notes {
            check_patient(EntityKind::Note, note.id.0.to_string(), note.patient_id)?;
        }
        for order in &dataset.lab_orders {
            check_patient(EntityKind::LabOrder, order.id.to_string(), order.patient_id)?;
        }

        let mut practitioners = BTreeMap::new();
        for practitioner in dataset.practitioners {
            if practitioners.contains_key(&practitioner.id) {
                return Err(StoreError::DuplicateId {
                    entity: EntityKind::Practitioner,
                    id: practitioner.id.to_string(),
                });
            }
            practitioners.insert(practitioner.id, practitioner);
        }

        // Patients already in a bed get an open episode so transfers and discharges
        // always have one to extend.
        let episodes: Vec<AdmissionEpisode> = patients
            .values()
            .filter_map(|p| {
                let bed = p.current_bed()?.clone();
                let admitted_at = p.admission_date()?;
                Some(AdmissionEpisode::open(
                    p.id,
                    bed,
                    admitted_at,
                    AdmissionReason::Other("admitted before ledger start".into()),
                    "system".into(),
                ))
            })
            .collect();

        Ok(Self {
            beds,
            patients,
            episodes,
            births: dataset.births,
            newborns: dataset.newborns,
            notes: dataset.notes,
            lab_orders: dataset.lab_orders,
            practitioners,
        })
    }
}

/// In-memory record store with an explicit lifecycle: built once at process start, then
/// shared by handle.
#[derive(Debug)]
pub struct RecordStore {
    tables: RwLock<Tables>,
}

impl RecordStore {
    /// Builds a store, validating the dataset.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if:
    /// - bed, patient or practitioner ids repeat, or a national id is registered twice,
    /// - a patient's bed assignment disagrees with her status,
    /// - a patient references an unknown bed or two patients share a bed,
    /// - a birth, newborn, note or lab order references an unknown patient.
    pub fn new(dataset: Dataset) -> StoreResult<Self> {
        let tables = Tables::from_dataset(dataset)?;
        tracing::debug!(
            beds = tables.beds.len(),
            patients = tables.patients.len(),
            "record store initialised"
        );
        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write()
    }

    pub fn get_patient(&self, id: PatientId) -> Option<Patient> {
        self.read().patient(id).cloned()
    }

    /// Patients matching `predicate`, in id order.
    pub fn list_patients(&self, predicate: impl Fn(&Patient) -> bool) -> Vec<Patient> {
        self.read()
            .patients
            .values()
            .filter(|p| predicate(p))
            .cloned()
            .collect()
    }

    pub fn get_bed(&self, id: &BedId) -> Option<Bed> {
        self.read().bed(id).cloned()
    }

    /// Beds matching `predicate`, in id order.
    pub fn list_beds(&self, predicate: impl Fn(&Bed) -> bool) -> Vec<Bed> {
        self.read()
            .beds
            .values()
            .filter(|b| predicate(b))
            .cloned()
            .collect()
    }

    /// The patient currently in `bed`, if any.
    pub fn occupant_of(&self, bed: &BedId) -> Option<Patient> {
        self.read().occupant_of(bed).cloned()
    }

    pub fn patient_count(&self) -> usize {
        self.read().patients.len()
    }

    pub fn bed_count(&self) -> usize {
        self.read().beds.len()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::model::patient::fixtures::details;
    use crate::model::{AdmissionStatus, BedType, Sector};
    use chrono::{TimeZone, Utc};

    /// Two pre-labor beds, one delivery room, one rooming-in room and one maternal ICU bed.
    pub fn small_layout() -> Vec<Bed> {
        vec![
            Bed::new("PP-01", Sector::PreLabor, BedType::Ward),
            Bed::new("PP-02", Sector::PreLabor, BedType::Ward),
            Bed::new("CO-01", Sector::DeliveryRoom, BedType::DeliverySuite),
            Bed::new("AC-01", Sector::RoomingIn, BedType::PrivateRoom),
            Bed::new("UM-01", Sector::MaternalIcu, BedType::IntensiveCare),
        ]
    }

    pub fn registered(id: u32) -> Patient {
        Patient::new(
            PatientId(id),
            details(&format!("Patient {id} Silva"), &format!("000.000.000-{id:02}")),
        )
    }

    pub fn admitted(id: u32, bed: &str, status: AdmissionStatus) -> Patient {
        registered(id).with_admission(
            status,
            Some(BedId::from(bed)),
            Some(Utc.with_ymd_and_hms(2026, 3, 9, 8, 0, 0).unwrap()),
        )
    }

    /// P1 and P2 registered, P3 in AC-01 post partum.
    pub fn small_store() -> RecordStore {
        RecordStore::new(Dataset {
            beds: small_layout(),
            patients: vec![
                registered(1),
                registered(2),
                admitted(3, "AC-01", AdmissionStatus::PostPartum),
            ],
            ..Default::default()
        })
        .expect("valid dataset")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::model::{AdmissionStatus, ClinicalNote, NewClinicalNote, NoteId, NoteKind};
    use chrono::{TimeZone, Utc};
    use ward_types::NonEmptyText;

    #[test]
    fn store_exposes_lookups() {
        let store = small_store();
        assert_eq!(store.bed_count(), 5);
        assert_eq!(store.patient_count(), 3);
        assert!(store.get_patient(PatientId(1)).is_some());
        assert!(store.get_patient(PatientId(99)).is_none());
        assert_eq!(
            store.occupant_of(&BedId::from("AC-01")).map(|p| p.id),
            Some(PatientId(3))
        );
        assert!(store.occupant_of(&BedId::from("PP-01")).is_none());
    }

    #[test]
    fn seeded_admissions_get_open_episodes() {
        let store = small_store();
        let tables = store.read();
        assert_eq!(tables.episodes.len(), 1);
        assert_eq!(tables.episodes[0].patient_id, PatientId(3));
        assert!(tables.episodes[0].is_open());
    }

    #[test]
    fn rejects_double_occupancy() {
        let err = RecordStore::new(Dataset {
            beds: small_layout(),
            patients: vec![
                admitted(1, "PP-01", AdmissionStatus::Admitted),
                admitted(2, "PP-01", AdmissionStatus::InLabor),
            ],
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            StoreError::DoubleOccupancy {
                first: PatientId(1),
                second: PatientId(2),
                ..
            }
        ));
    }

    #[test]
    fn rejects_bed_without_active_status() {
        let patient = registered(1).with_admission(
            AdmissionStatus::Discharged,
            Some(BedId::from("PP-01")),
            None,
        );
        let err = RecordStore::new(Dataset {
            beds: small_layout(),
            patients: vec![patient],
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, StoreError::InconsistentAdmission { .. }));
    }

    #[test]
    fn rejects_unknown_bed_and_duplicate_bed_ids() {
        let err = RecordStore::new(Dataset {
            beds: small_layout(),
            patients: vec![admitted(1, "ZZ-01", AdmissionStatus::Admitted)],
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, StoreError::UnknownBed { .. }));

        let mut beds = small_layout();
        beds.push(beds[0].clone());
        let err = RecordStore::new(Dataset::with_beds(beds)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::DuplicateId {
                entity: EntityKind::Bed,
                ..
            }
        ));
    }

    #[test]
    fn rejects_active_status_without_admission_date() {
        let patient = registered(1).with_admission(
            AdmissionStatus::Admitted,
            Some(BedId::from("PP-01")),
            None,
        );
        let err = RecordStore::new(Dataset {
            beds: small_layout(),
            patients: vec![patient],
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            StoreError::InconsistentAdmission {
                patient: PatientId(1),
                status: AdmissionStatus::Admitted,
                ..
            }
        ));
    }

    #[test]
    fn rejects_note_for_unknown_patient() {
        let note = ClinicalNote {
            id: NoteId(7),
            patient_id: PatientId(42),
            written_at: Utc.with_ymd_and_hms(2026, 3, 9, 10, 0, 0).unwrap(),
            author: "Enf. Juliana Martins (Nurse)".into(),
            content: NewClinicalNote {
                kind: NoteKind::Progress,
                description: NonEmptyText::new("Stable overnight").unwrap(),
                vitals: None,
                plan: None,
            },
        };
        let err = RecordStore::new(Dataset {
            beds: small_layout(),
            patients: vec![registered(1)],
            notes: vec![note],
            ..Default::default()
        })
        .unwrap_err();
        match err {
            StoreError::DanglingReference {
                entity,
                id,
                patient,
            } => {
                assert_eq!(entity, EntityKind::Note);
                assert_eq!(id, "7");
                assert_eq!(patient, PatientId(42));
            }
            other => panic!("expected dangling reference, got {other:?}"),
        }
    }

    #[test]
    fn list_predicates_filter_in_id_order() {
        let store = small_store();
        let registered: Vec<_> = store
            .list_patients(|p| p.status() == AdmissionStatus::Registered)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(registered, vec![PatientId(1), PatientId(2)]);

        let icu = store.list_beds(|b| b.sector.is_intensive_care());
        assert_eq!(icu.len(), 1);
        assert_eq!(icu[0].id.as_str(), "UM-01");
    }
}
