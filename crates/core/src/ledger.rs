//! Bed and admission ledger.
//!
//! The ledger is the only writer of a patient's occupancy fields (`status`, `current_bed`,
//! `admission_date`). Each operation takes the store's write lock once and holds it across
//! its precondition checks and its mutation, so two callers can never both see a bed as
//! free and both take it. A rejected operation leaves every table untouched.

use crate::actor::Actor;
use crate::constants::DISCHARGE_CHECKLIST_ITEMS;
use crate::error::{LedgerError, LedgerResult};
use crate::model::patient::OccupancyUpdate;
use crate::model::{
    AdmissionEpisode, AdmissionReason, AdmissionStatus, Bed, BedId, BedMovement,
    DischargeRecord, DischargeType, PatientId, Sector, SectorScope,
};
use crate::store::{RecordStore, Tables};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Items acknowledged on the discharge form, keyed by item name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DischargeChecklist(BTreeMap<String, bool>);

impl DischargeChecklist {
    /// An empty checklist. Every required item is unmet.
    pub fn new() -> Self {
        Self::default()
    }

    /// A checklist with every required item acknowledged.
    pub fn complete() -> Self {
        Self(
            DISCHARGE_CHECKLIST_ITEMS
                .iter()
                .map(|item| (item.to_string(), true))
                .collect(),
        )
    }

    pub fn with(mut self, item: impl Into<String>, done: bool) -> Self {
        self.0.insert(item.into(), done);
        self
    }

    pub fn items(&self) -> &BTreeMap<String, bool> {
        &self.0
    }

    /// Names of the items blocking discharge, sorted.
    ///
    /// A required item is unmet when it is missing or false; any other supplied item is
    /// unmet when false.
    pub fn unmet(&self) -> Vec<String> {
        let mut unmet: BTreeSet<String> = DISCHARGE_CHECKLIST_ITEMS
            .iter()
            .filter(|item| self.0.get(**item) != Some(&true))
            .map(|item| item.to_string())
            .collect();
        unmet.extend(
            self.0
                .iter()
                .filter(|(_, done)| !**done)
                .map(|(item, _)| item.clone()),
        );
        unmet.into_iter().collect()
    }
}

impl From<BTreeMap<String, bool>> for DischargeChecklist {
    fn from(items: BTreeMap<String, bool>) -> Self {
        Self(items)
    }
}

/// Bed counts for one sector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SectorOccupancy {
    pub sector: Sector,
    pub total: usize,
    pub occupied: usize,
    pub free: usize,
}

/// Bed counts for the whole ward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OccupancySummary {
    pub total: usize,
    pub occupied: usize,
    pub free: usize,
    /// Occupied beds as a percentage of all beds; zero for an empty layout.
    pub occupancy_percent: f64,
}

/// Who is in a bed, as shown on the bed map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BedOccupant {
    pub patient_id: PatientId,
    pub first_name: String,
    pub status: AdmissionStatus,
    pub gestational_weeks: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BedMapEntry {
    pub bed: Bed,
    pub occupant: Option<BedOccupant>,
}

/// Service for admission, transfer, discharge and occupancy queries.
#[derive(Clone, Debug)]
pub struct Ledger {
    store: Arc<RecordStore>,
}

impl Ledger {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// Admits a patient into a free bed.
    ///
    /// The patient enters as [`AdmissionStatus::Admitted`]; `reason` is kept on the new
    /// admission episode. Labor is entered later through [`Ledger::set_status`].
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if the patient or the bed does not exist,
    /// - [`LedgerError::AlreadyAdmitted`] if the patient already holds a bed,
    /// - [`LedgerError::BedOccupied`] if another patient holds the bed.
    pub fn admit(
        &self,
        patient_id: PatientId,
        bed_id: &BedId,
        admitted_at: DateTime<Utc>,
        reason: AdmissionReason,
        actor: &Actor,
    ) -> LedgerResult<()> {
        let mut tables = self.store.write();
        match admit_patient(&mut tables, patient_id, bed_id, admitted_at, reason, actor) {
            Ok(status) => {
                tracing::info!(patient = %patient_id, bed = %bed_id, %status, actor = %actor, "patient admitted");
                Ok(())
            }
            Err(err) => Err(rejected("admit", patient_id, err)),
        }
    }

    /// Moves an admitted patient to another free bed.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`LedgerError::NotFound`] if the patient does not exist,
    /// - [`LedgerError::NotAdmitted`] if she holds no bed,
    /// - [`LedgerError::NotFound`] if the target bed does not exist,
    /// - [`LedgerError::SameBed`] if the target is her current bed,
    /// - [`LedgerError::BedOccupied`] if another patient holds the target.
    pub fn transfer(
        &self,
        patient_id: PatientId,
        new_bed_id: &BedId,
        reason: &str,
        actor: &Actor,
    ) -> LedgerResult<()> {
        let mut tables = self.store.write();
        match transfer_patient(&mut tables, patient_id, new_bed_id, reason, actor) {
            Ok(from) => {
                tracing::info!(patient = %patient_id, from = %from, to = %new_bed_id, actor = %actor, "patient transferred");
                Ok(())
            }
            Err(err) => Err(rejected("transfer", patient_id, err)),
        }
    }

    /// Discharges an admitted patient, freeing her bed and closing the open episode.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if the patient does not exist,
    /// - [`LedgerError::NotAdmitted`] if she holds no bed,
    /// - [`LedgerError::InvalidTransition`] if she is still in labor,
    /// - [`LedgerError::IncompleteChecklist`] if any checklist item is unmet.
    pub fn discharge(
        &self,
        patient_id: PatientId,
        discharge_type: DischargeType,
        checklist: &DischargeChecklist,
        actor: &Actor,
    ) -> LedgerResult<()> {
        let mut tables = self.store.write();
        match discharge_patient(&mut tables, patient_id, discharge_type, checklist, actor) {
            Ok(bed) => {
                tracing::info!(patient = %patient_id, bed = %bed, %discharge_type, actor = %actor, "patient discharged");
                Ok(())
            }
            Err(err) => Err(rejected("discharge", patient_id, err)),
        }
    }

    /// Changes the phase of an admitted patient without touching her bed.
    ///
    /// Allowed: admitted to in labor and back, and either of those to post partum.
    pub fn set_status(
        &self,
        patient_id: PatientId,
        to: AdmissionStatus,
        actor: &Actor,
    ) -> LedgerResult<()> {
        let mut tables = self.store.write();
        match change_status(&mut tables, patient_id, to) {
            Ok(from) => {
                tracing::info!(patient = %patient_id, %from, %to, actor = %actor, "admission status changed");
                Ok(())
            }
            Err(err) => Err(rejected("set_status", patient_id, err)),
        }
    }

    /// Occupancy of each sector in `scope`, in sector order.
    pub fn occupancy_by_sector(&self, scope: SectorScope) -> Vec<SectorOccupancy> {
        let tables = self.store.read();
        sector_occupancy(&tables, scope)
    }

    /// Ids of the unoccupied beds in `sector`, in bed-id order.
    pub fn list_free_beds(&self, sector: Sector) -> Vec<BedId> {
        let tables = self.store.read();
        let occupied = tables.occupied_beds();
        tables
            .beds
            .values()
            .filter(|b| b.sector == sector && !occupied.contains(&b.id))
            .map(|b| b.id.clone())
            .collect()
    }

    pub fn occupancy_summary(&self) -> OccupancySummary {
        let tables = self.store.read();
        summary(&tables)
    }

    /// Every bed in `scope` with its occupant, ordered by sector then bed id.
    pub fn bed_map(&self, scope: SectorScope) -> Vec<BedMapEntry> {
        let tables = self.store.read();
        let mut entries: Vec<BedMapEntry> = tables
            .beds
            .values()
            .filter(|b| scope.contains(b.sector))
            .map(|bed| BedMapEntry {
                bed: bed.clone(),
                occupant: tables.occupant_of(&bed.id).map(|p| BedOccupant {
                    patient_id: p.id,
                    first_name: p.details.name.first_word().to_string(),
                    status: p.status(),
                    gestational_weeks: p.details.obstetric.gestational_weeks,
                }),
            })
            .collect();
        entries.sort_by(|a, b| (a.bed.sector, &a.bed.id).cmp(&(b.bed.sector, &b.bed.id)));
        entries
    }

    /// Admission episodes of a patient, oldest first.
    pub fn episodes_for(&self, patient_id: PatientId) -> LedgerResult<Vec<AdmissionEpisode>> {
        let tables = self.store.read();
        if tables.patient(patient_id).is_none() {
            return Err(LedgerError::patient_not_found(patient_id));
        }
        Ok(tables
            .episodes
            .iter()
            .filter(|e| e.patient_id == patient_id)
            .cloned()
            .collect())
    }
}

fn rejected(operation: &'static str, patient_id: PatientId, err: LedgerError) -> LedgerError {
    tracing::warn!(operation, patient = %patient_id, error = %err, "ledger operation rejected");
    err
}

fn admit_patient(
    tables: &mut Tables,
    patient_id: PatientId,
    bed_id: &BedId,
    admitted_at: DateTime<Utc>,
    reason: AdmissionReason,
    actor: &Actor,
) -> LedgerResult<AdmissionStatus> {
    let patient = tables
        .patient(patient_id)
        .ok_or_else(|| LedgerError::patient_not_found(patient_id))?;
    if let Some(bed) = patient.current_bed() {
        return Err(LedgerError::AlreadyAdmitted {
            patient: patient_id,
            bed: bed.clone(),
        });
    }
    if tables.bed(bed_id).is_none() {
        return Err(LedgerError::bed_not_found(bed_id));
    }
    if let Some(occupant) = tables.occupant_of(bed_id) {
        return Err(LedgerError::BedOccupied {
            bed: bed_id.clone(),
            occupant: occupant.id,
        });
    }

    let status = AdmissionStatus::Admitted;
    tables.update_occupancy(
        patient_id,
        OccupancyUpdate {
            status,
            current_bed: Some(bed_id.clone()),
            admission_date: Some(admitted_at),
        },
    );
    tables.episodes.push(AdmissionEpisode::open(
        patient_id,
        bed_id.clone(),
        admitted_at,
        reason,
        actor.attribution(),
    ));
    Ok(status)
}

fn transfer_patient(
    tables: &mut Tables,
    patient_id: PatientId,
    new_bed_id: &BedId,
    reason: &str,
    actor: &Actor,
) -> LedgerResult<BedId> {
    let patient = tables
        .patient(patient_id)
        .ok_or_else(|| LedgerError::patient_not_found(patient_id))?;
    let current = patient
        .current_bed()
        .cloned()
        .ok_or(LedgerError::NotAdmitted {
            patient: patient_id,
        })?;
    let status = patient.status();
    let admission_date = patient.admission_date();

    if tables.bed(new_bed_id).is_none() {
        return Err(LedgerError::bed_not_found(new_bed_id));
    }
    if current == *new_bed_id {
        return Err(LedgerError::SameBed { bed: current });
    }
    if let Some(occupant) = tables.occupant_of(new_bed_id) {
        return Err(LedgerError::BedOccupied {
            bed: new_bed_id.clone(),
            occupant: occupant.id,
        });
    }

    tables.update_occupancy(
        patient_id,
        OccupancyUpdate {
            status,
            current_bed: Some(new_bed_id.clone()),
            admission_date,
        },
    );
    if let Some(episode) = tables.open_episode_mut(patient_id) {
        episode.movements.push(BedMovement {
            bed: new_bed_id.clone(),
            at: Utc::now(),
            reason: reason.trim().to_string(),
            actor: actor.attribution(),
        });
    }
    Ok(current)
}

fn discharge_patient(
    tables: &mut Tables,
    patient_id: PatientId,
    discharge_type: DischargeType,
    checklist: &DischargeChecklist,
    actor: &Actor,
) -> LedgerResult<BedId> {
    let patient = tables
        .patient(patient_id)
        .ok_or_else(|| LedgerError::patient_not_found(patient_id))?;
    let bed = patient
        .current_bed()
        .cloned()
        .ok_or(LedgerError::NotAdmitted {
            patient: patient_id,
        })?;
    if patient.status() == AdmissionStatus::InLabor {
        return Err(LedgerError::InvalidTransition {
            from: AdmissionStatus::InLabor,
            to: AdmissionStatus::Discharged,
        });
    }

    let unmet = checklist.unmet();
    if !unmet.is_empty() {
        return Err(LedgerError::IncompleteChecklist { unmet });
    }

    tables.update_occupancy(
        patient_id,
        OccupancyUpdate {
            status: AdmissionStatus::Discharged,
            current_bed: None,
            admission_date: None,
        },
    );
    if let Some(episode) = tables.open_episode_mut(patient_id) {
        episode.discharge = Some(DischargeRecord {
            at: Utc::now(),
            discharge_type,
            actor: actor.attribution(),
        });
    }
    Ok(bed)
}

/// Applies a phase change under an already held write lock. Returns the previous status.
pub(crate) fn change_status(
    tables: &mut Tables,
    patient_id: PatientId,
    to: AdmissionStatus,
) -> LedgerResult<AdmissionStatus> {
    use AdmissionStatus::*;

    let patient = tables
        .patient(patient_id)
        .ok_or_else(|| LedgerError::patient_not_found(patient_id))?;
    let bed = patient
        .current_bed()
        .cloned()
        .ok_or(LedgerError::NotAdmitted {
            patient: patient_id,
        })?;
    let from = patient.status();
    let admission_date = patient.admission_date();

    let allowed = matches!(
        (from, to),
        (Admitted, InLabor) | (InLabor, Admitted) | (Admitted, PostPartum) | (InLabor, PostPartum)
    );
    if !allowed {
        return Err(LedgerError::InvalidTransition { from, to });
    }

    tables.update_occupancy(
        patient_id,
        OccupancyUpdate {
            status: to,
            current_bed: Some(bed),
            admission_date,
        },
    );
    Ok(from)
}

pub(crate) fn sector_occupancy(tables: &Tables, scope: SectorScope) -> Vec<SectorOccupancy> {
    let occupied = tables.occupied_beds();
    scope
        .sectors()
        .into_iter()
        .map(|sector| {
            let (total, taken) = tables
                .beds
                .values()
                .filter(|b| b.sector == sector)
                .fold((0, 0), |(total, taken), b| {
                    (total + 1, taken + usize::from(occupied.contains(&b.id)))
                });
            SectorOccupancy {
                sector,
                total,
                occupied: taken,
                free: total - taken,
            }
        })
        .collect()
}

pub(crate) fn summary(tables: &Tables) -> OccupancySummary {
    let total = tables.beds.len();
    let occupied = tables.occupied_beds().len();
    let occupancy_percent = if total == 0 {
        0.0
    } else {
        occupied as f64 * 100.0 / total as f64
    };
    OccupancySummary {
        total,
        occupied,
        free: total - occupied,
        occupancy_percent,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn nurse() -> Actor {
        Actor::new("Enf. Juliana Martins", "Nurse").unwrap()
    }

    pub fn t0() -> DateTime<Utc> {
        "2026-03-10T06:30:00Z".parse().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::store::test_support::*;
    use crate::store::Dataset;
    use crate::EntityKind;

    fn ledger() -> Ledger {
        Ledger::new(Arc::new(small_store()))
    }

    fn occupied_in(ledger: &Ledger, sector: Sector) -> usize {
        ledger.occupancy_by_sector(SectorScope::Only(sector))[0].occupied
    }

    fn assert_invariants(ledger: &Ledger) {
        let patients = ledger.store().list_patients(|_| true);
        let mut seen = std::collections::HashSet::new();
        for p in &patients {
            assert_eq!(p.status().is_active(), p.current_bed().is_some(), "{:?}", p);
            if let Some(bed) = p.current_bed() {
                assert!(seen.insert(bed.clone()), "bed {bed} held twice");
            }
        }
    }

    #[test]
    fn test_admit_transfer_discharge_scenario() {
        let ledger = ledger();
        let pp01 = BedId::from("PP-01");
        let co01 = BedId::from("CO-01");
        let actor = nurse();

        ledger
            .admit(PatientId(1), &pp01, t0(), AdmissionReason::Labor, &actor)
            .unwrap();
        assert_eq!(occupied_in(&ledger, Sector::PreLabor), 1);
        assert_eq!(
            ledger.store().get_patient(PatientId(1)).unwrap().status(),
            AdmissionStatus::Admitted
        );

        let err = ledger
            .admit(PatientId(2), &pp01, t0(), AdmissionReason::Labor, &actor)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::BedOccupied {
                bed: pp01.clone(),
                occupant: PatientId(1)
            }
        );
        assert_eq!(occupied_in(&ledger, Sector::PreLabor), 1);
        assert!(!ledger.store().get_patient(PatientId(2)).unwrap().is_admitted());

        ledger
            .transfer(PatientId(1), &co01, "Active labor", &actor)
            .unwrap();
        assert_eq!(occupied_in(&ledger, Sector::PreLabor), 0);
        assert_eq!(occupied_in(&ledger, Sector::DeliveryRoom), 1);

        ledger
            .discharge(
                PatientId(1),
                DischargeType::Medical,
                &DischargeChecklist::complete(),
                &actor,
            )
            .unwrap();
        assert_eq!(occupied_in(&ledger, Sector::DeliveryRoom), 0);
        let p1 = ledger.store().get_patient(PatientId(1)).unwrap();
        assert_eq!(p1.status(), AdmissionStatus::Discharged);
        assert!(p1.current_bed().is_none());
        assert!(p1.admission_date().is_none());

        let episodes = ledger.episodes_for(PatientId(1)).unwrap();
        assert_eq!(episodes.len(), 1);
        let beds: Vec<_> = episodes[0].movements.iter().map(|m| m.bed.as_str()).collect();
        assert_eq!(beds, ["PP-01", "CO-01"]);
        assert_eq!(episodes[0].movements[1].reason, "Active labor");
        assert_eq!(
            episodes[0].discharge.as_ref().map(|d| d.discharge_type),
            Some(DischargeType::Medical)
        );
        assert_invariants(&ledger);
    }

    #[test]
    fn test_admit_twice_is_rejected_without_change() {
        let ledger = ledger();
        let actor = nurse();
        ledger
            .admit(PatientId(1), &BedId::from("PP-01"), t0(), AdmissionReason::Preeclampsia, &actor)
            .unwrap();
        let before = ledger.store().get_patient(PatientId(1)).unwrap();

        let err = ledger
            .admit(PatientId(1), &BedId::from("PP-02"), t0(), AdmissionReason::Labor, &actor)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::AlreadyAdmitted {
                patient: PatientId(1),
                bed: BedId::from("PP-01")
            }
        );
        assert_eq!(ledger.store().get_patient(PatientId(1)).unwrap(), before);
        assert!(ledger.store().occupant_of(&BedId::from("PP-02")).is_none());
        assert_eq!(ledger.episodes_for(PatientId(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_admit_reports_unknown_patient_and_bed() {
        let ledger = ledger();
        let actor = nurse();
        let err = ledger
            .admit(PatientId(42), &BedId::from("PP-01"), t0(), AdmissionReason::Labor, &actor)
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::NotFound {
                entity: EntityKind::Patient,
                ..
            }
        ));

        let err = ledger
            .admit(PatientId(1), &BedId::from("ZZ-09"), t0(), AdmissionReason::Labor, &actor)
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::NotFound {
                entity: EntityKind::Bed,
                ..
            }
        ));
    }

    #[test]
    fn test_transfer_to_same_bed_changes_nothing() {
        let ledger = ledger();
        let before = ledger.store().get_patient(PatientId(3)).unwrap();
        let err = ledger
            .transfer(PatientId(3), &BedId::from("ac-01"), "no-op", &nurse())
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::SameBed {
                bed: BedId::from("AC-01")
            }
        );
        assert_eq!(ledger.store().get_patient(PatientId(3)).unwrap(), before);
        assert_eq!(ledger.episodes_for(PatientId(3)).unwrap()[0].movements.len(), 1);
    }

    #[test]
    fn test_transfer_checks_in_order() {
        let ledger = ledger();
        let actor = nurse();

        // Not admitted wins over an unknown bed.
        let err = ledger
            .transfer(PatientId(1), &BedId::from("ZZ-01"), "x", &actor)
            .unwrap_err();
        assert_eq!(err, LedgerError::NotAdmitted { patient: PatientId(1) });

        ledger
            .admit(PatientId(1), &BedId::from("PP-01"), t0(), AdmissionReason::Labor, &actor)
            .unwrap();
        let err = ledger
            .transfer(PatientId(1), &BedId::from("AC-01"), "x", &actor)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::BedOccupied {
                bed: BedId::from("AC-01"),
                occupant: PatientId(3)
            }
        );
        assert_eq!(
            ledger.store().occupant_of(&BedId::from("PP-01")).map(|p| p.id),
            Some(PatientId(1))
        );

        let err = ledger
            .transfer(PatientId(1), &BedId::from("ZZ-01"), "x", &actor)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::NotFound {
                entity: EntityKind::Bed,
                id: "ZZ-01".into()
            }
        );
        assert_eq!(
            ledger.store().get_patient(PatientId(1)).unwrap().current_bed(),
            Some(&BedId::from("PP-01"))
        );
    }

    #[test]
    fn test_transfer_to_unknown_bed_is_checked_before_same_bed() {
        let ledger = ledger();
        let err = ledger
            .transfer(PatientId(3), &BedId::from("ZZ-01"), "x", &nurse())
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::NotFound {
                entity: EntityKind::Bed,
                ..
            }
        ));

        let err = ledger
            .transfer(PatientId(42), &BedId::from("AC-01"), "x", &nurse())
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::NotFound {
                entity: EntityKind::Patient,
                ..
            }
        ));
    }

    #[test]
    fn test_discharge_of_unknown_patient_is_not_found() {
        let ledger = ledger();
        let err = ledger
            .discharge(
                PatientId(42),
                DischargeType::Medical,
                &DischargeChecklist::new(),
                &nurse(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::NotFound {
                entity: EntityKind::Patient,
                id: "42".into()
            }
        );
    }

    #[test]
    fn test_discharge_while_in_labor_is_rejected() {
        let ledger = ledger();
        let actor = nurse();
        let pp01 = BedId::from("PP-01");
        ledger
            .admit(PatientId(1), &pp01, t0(), AdmissionReason::Labor, &actor)
            .unwrap();
        ledger
            .set_status(PatientId(1), AdmissionStatus::InLabor, &actor)
            .unwrap();

        let err = ledger
            .discharge(
                PatientId(1),
                DischargeType::Medical,
                &DischargeChecklist::complete(),
                &actor,
            )
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InvalidTransition {
                from: AdmissionStatus::InLabor,
                to: AdmissionStatus::Discharged
            }
        );
        let p1 = ledger.store().get_patient(PatientId(1)).unwrap();
        assert_eq!(p1.status(), AdmissionStatus::InLabor);
        assert_eq!(p1.current_bed(), Some(&pp01));
        assert!(ledger.episodes_for(PatientId(1)).unwrap()[0].is_open());

        // Labor is checked before the checklist.
        let err = ledger
            .discharge(
                PatientId(1),
                DischargeType::Medical,
                &DischargeChecklist::new(),
                &actor,
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidTransition { .. }));

        ledger
            .set_status(PatientId(1), AdmissionStatus::PostPartum, &actor)
            .unwrap();
        ledger
            .discharge(
                PatientId(1),
                DischargeType::Medical,
                &DischargeChecklist::complete(),
                &actor,
            )
            .unwrap();
        assert!(ledger.store().occupant_of(&pp01).is_none());
    }

    #[test]
    fn test_discharge_with_false_item_keeps_patient_in_bed() {
        let ledger = ledger();
        let checklist = DischargeChecklist::complete().with("newborn_screening", false);
        let err = ledger
            .discharge(PatientId(3), DischargeType::Medical, &checklist, &nurse())
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::IncompleteChecklist {
                unmet: vec!["newborn_screening".into()]
            }
        );
        let p3 = ledger.store().get_patient(PatientId(3)).unwrap();
        assert_eq!(p3.current_bed(), Some(&BedId::from("AC-01")));
        assert_eq!(p3.status(), AdmissionStatus::PostPartum);
        assert!(ledger.episodes_for(PatientId(3)).unwrap()[0].is_open());
    }

    #[test]
    fn test_discharge_of_unadmitted_patient_is_rejected() {
        let ledger = ledger();
        let err = ledger
            .discharge(
                PatientId(2),
                DischargeType::AtRequest,
                &DischargeChecklist::complete(),
                &nurse(),
            )
            .unwrap_err();
        assert_eq!(err, LedgerError::NotAdmitted { patient: PatientId(2) });
    }

    #[test]
    fn test_checklist_unmet_items_are_sorted() {
        let checklist = DischargeChecklist::new()
            .with("discharge_summary", true)
            .with("extra_signature", false);
        assert_eq!(
            checklist.unmet(),
            vec![
                "breastfeeding_guidance",
                "extra_signature",
                "follow_up_scheduled",
                "live_birth_declaration",
                "newborn_screening",
                "newborn_vaccination_card",
            ]
        );
        assert!(DischargeChecklist::complete().unmet().is_empty());
        assert!(DischargeChecklist::complete()
            .with("extra_signature", true)
            .unmet()
            .is_empty());
    }

    #[test]
    fn test_readmission_opens_second_episode() {
        let ledger = ledger();
        let actor = nurse();
        ledger
            .discharge(
                PatientId(3),
                DischargeType::Medical,
                &DischargeChecklist::complete(),
                &actor,
            )
            .unwrap();
        ledger
            .admit(PatientId(3), &BedId::from("UM-01"), t0(), AdmissionReason::Bleeding, &actor)
            .unwrap();

        let episodes = ledger.episodes_for(PatientId(3)).unwrap();
        assert_eq!(episodes.len(), 2);
        assert!(!episodes[0].is_open());
        assert!(episodes[1].is_open());
        assert_eq!(episodes[1].admitted_by, "Enf. Juliana Martins (Nurse)");
        assert_eq!(
            ledger.store().get_patient(PatientId(3)).unwrap().status(),
            AdmissionStatus::Admitted
        );
    }

    #[test]
    fn test_status_transitions() {
        let ledger = ledger();
        let actor = nurse();
        assert_eq!(
            ledger
                .set_status(PatientId(1), AdmissionStatus::InLabor, &actor)
                .unwrap_err(),
            LedgerError::NotAdmitted { patient: PatientId(1) }
        );

        ledger
            .admit(PatientId(1), &BedId::from("PP-01"), t0(), AdmissionReason::LaborInduction, &actor)
            .unwrap();
        ledger
            .set_status(PatientId(1), AdmissionStatus::InLabor, &actor)
            .unwrap();
        ledger
            .set_status(PatientId(1), AdmissionStatus::Admitted, &actor)
            .unwrap();
        ledger
            .set_status(PatientId(1), AdmissionStatus::PostPartum, &actor)
            .unwrap();

        let err = ledger
            .set_status(PatientId(1), AdmissionStatus::InLabor, &actor)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InvalidTransition {
                from: AdmissionStatus::PostPartum,
                to: AdmissionStatus::InLabor
            }
        );
        let err = ledger
            .set_status(PatientId(1), AdmissionStatus::Discharged, &actor)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidTransition { .. }));
        assert_eq!(
            ledger.store().get_patient(PatientId(1)).unwrap().current_bed(),
            Some(&BedId::from("PP-01"))
        );
    }

    #[test]
    fn test_occupancy_and_free_beds() {
        let ledger = ledger();
        let all = ledger.occupancy_by_sector(SectorScope::All);
        assert_eq!(all.len(), Sector::ALL.len());
        let rooming = all.iter().find(|o| o.sector == Sector::RoomingIn).unwrap();
        assert_eq!((rooming.total, rooming.occupied, rooming.free), (1, 1, 0));
        let neonatal = all.iter().find(|o| o.sector == Sector::NeonatalIcu).unwrap();
        assert_eq!(neonatal.total, 0);

        assert_eq!(
            ledger.list_free_beds(Sector::PreLabor),
            vec![BedId::from("PP-01"), BedId::from("PP-02")]
        );
        assert!(ledger.list_free_beds(Sector::RoomingIn).is_empty());

        let summary = ledger.occupancy_summary();
        assert_eq!((summary.total, summary.occupied, summary.free), (5, 1, 4));
        assert!((summary.occupancy_percent - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bed_map_shows_occupant_first_name() {
        let ledger = ledger();
        let map = ledger.bed_map(SectorScope::All);
        assert_eq!(map.len(), 5);
        assert_eq!(map[0].bed.id.as_str(), "PP-01");

        let rooming = ledger.bed_map(SectorScope::Only(Sector::RoomingIn));
        let occupant = rooming[0].occupant.as_ref().unwrap();
        assert_eq!(occupant.patient_id, PatientId(3));
        assert_eq!(occupant.first_name, "Patient");
        assert_eq!(occupant.status, AdmissionStatus::PostPartum);
    }

    #[test]
    fn test_concurrent_admissions_to_one_bed_admit_exactly_one() {
        let patients = (1..=8).map(registered).collect();
        let store = RecordStore::new(Dataset {
            beds: small_layout(),
            patients,
            ..Default::default()
        })
        .unwrap();
        let ledger = Ledger::new(Arc::new(store));
        let bed = BedId::from("CO-01");

        let successes = std::thread::scope(|scope| {
            let handles: Vec<_> = (1..=8)
                .map(|id| {
                    let ledger = ledger.clone();
                    let bed = bed.clone();
                    scope.spawn(move || {
                        ledger
                            .admit(PatientId(id), &bed, t0(), AdmissionReason::Labor, &nurse())
                            .is_ok()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or(false))
                .filter(|admitted| *admitted)
                .count()
        });

        assert_eq!(successes, 1);
        assert_eq!(occupied_in(&ledger, Sector::DeliveryRoom), 1);
        assert_invariants(&ledger);
    }
}
