//! Read-only projections over the record store.

use crate::error::{LedgerError, LedgerResult};
use crate::model::{
    AdmissionStatus, Birth, ClinicalNote, DeliveryType, LabOrder, LabStatus, Newborn, Patient,
    PatientId, Sector, Sex,
};
use crate::store::RecordStore;
use chrono::NaiveDate;
use std::ops::RangeInclusive;
use std::sync::Arc;

/// Age bounds in whole years, evaluated on a given date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgeRange {
    pub years: RangeInclusive<u32>,
    pub on: NaiveDate,
}

/// Patient search criteria. Empty lists and `None` match everything.
#[derive(Clone, Debug, Default)]
pub struct PatientFilter {
    pub statuses: Vec<AdmissionStatus>,
    /// Compared case-insensitively.
    pub insurers: Vec<String>,
    /// Sector of the patient's current bed.
    pub sector: Option<Sector>,
    /// Attending practitioner name, compared case-insensitively.
    pub attending: Option<String>,
    /// Case-insensitive substring of the patient's name.
    pub name_contains: Option<String>,
    pub gestational_weeks: Option<RangeInclusive<u8>>,
    pub age: Option<AgeRange>,
    /// Only patients with a recorded comorbidity.
    pub high_risk_only: bool,
    pub admitted_only: bool,
}

impl PatientFilter {
    /// Whether `patient` passes every criterion. `bed_sector` is the sector of her current bed.
    pub fn matches(&self, patient: &Patient, bed_sector: Option<Sector>) -> bool {
        let details = &patient.details;

        if !self.statuses.is_empty() && !self.statuses.contains(&patient.status()) {
            return false;
        }
        if !self.insurers.is_empty()
            && !self
                .insurers
                .iter()
                .any(|i| i.trim().eq_ignore_ascii_case(details.insurer.trim()))
        {
            return false;
        }
        if let Some(sector) = self.sector {
            if bed_sector != Some(sector) {
                return false;
            }
        }
        if let Some(attending) = &self.attending {
            let matches_attending = details
                .attending
                .as_deref()
                .is_some_and(|a| a.trim().eq_ignore_ascii_case(attending.trim()));
            if !matches_attending {
                return false;
            }
        }
        if let Some(needle) = &self.name_contains {
            let needle = needle.trim().to_lowercase();
            if !details.name.as_str().to_lowercase().contains(&needle) {
                return false;
            }
        }
        if let Some(weeks) = &self.gestational_weeks {
            if !weeks.contains(&details.obstetric.gestational_weeks) {
                return false;
            }
        }
        if let Some(age) = &self.age {
            if !age.years.contains(&details.age_on(age.on)) {
                return false;
            }
        }
        if self.high_risk_only && !details.is_high_risk() {
            return false;
        }
        if self.admitted_only && !patient.is_admitted() {
            return false;
        }
        true
    }
}

#[derive(Clone, Debug, Default)]
pub struct BirthFilter {
    pub delivery_types: Vec<DeliveryType>,
    /// Case-insensitive substring of the obstetrician's name.
    pub obstetrician: Option<String>,
    pub delivered_from: Option<NaiveDate>,
    pub delivered_to: Option<NaiveDate>,
}

impl BirthFilter {
    pub fn matches(&self, birth: &Birth) -> bool {
        let delivery = &birth.delivery;
        (self.delivery_types.is_empty() || self.delivery_types.contains(&delivery.delivery_type))
            && self.obstetrician.as_ref().is_none_or(|o| {
                delivery
                    .obstetrician
                    .to_lowercase()
                    .contains(&o.trim().to_lowercase())
            })
            && self.delivered_from.is_none_or(|d| delivery.delivered_on >= d)
            && self.delivered_to.is_none_or(|d| delivery.delivered_on <= d)
    }
}

#[derive(Clone, Debug, Default)]
pub struct NewbornFilter {
    pub sexes: Vec<Sex>,
    pub rooming_in: Option<bool>,
    pub mother: Option<PatientId>,
}

impl NewbornFilter {
    pub fn matches(&self, newborn: &Newborn) -> bool {
        (self.sexes.is_empty() || self.sexes.contains(&newborn.details.sex))
            && self.rooming_in.is_none_or(|r| newborn.details.rooming_in == r)
            && self.mother.is_none_or(|m| newborn.mother_id == m)
    }
}

#[derive(Clone, Debug, Default)]
pub struct LabOrderFilter {
    pub patient: Option<PatientId>,
    pub status: Option<LabStatus>,
}

impl LabOrderFilter {
    pub fn matches(&self, order: &LabOrder) -> bool {
        self.patient.is_none_or(|p| order.patient_id == p)
            && self.status.is_none_or(|s| order.status == s)
    }
}

/// Service for filtered reads of patients and their records.
#[derive(Clone, Debug)]
pub struct QueryService {
    store: Arc<RecordStore>,
}

impl QueryService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Patients matching `filter`, in id order.
    pub fn patients(&self, filter: &PatientFilter) -> Vec<Patient> {
        let tables = self.store.read();
        let found: Vec<Patient> = tables
            .patients
            .values()
            .filter(|p| {
                let sector = p
                    .current_bed()
                    .and_then(|b| tables.bed(b))
                    .map(|b| b.sector);
                filter.matches(p, sector)
            })
            .cloned()
            .collect();
        tracing::debug!(matched = found.len(), "patient query");
        found
    }

    /// Births matching `filter`, most recent delivery first.
    pub fn births(&self, filter: &BirthFilter) -> Vec<Birth> {
        let tables = self.store.read();
        let mut found: Vec<Birth> = tables
            .births
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            (b.delivery.delivered_on, b.delivery.delivered_at, b.id)
                .cmp(&(a.delivery.delivered_on, a.delivery.delivered_at, a.id))
        });
        tracing::debug!(matched = found.len(), "birth query");
        found
    }

    /// Newborns matching `filter`, in id order.
    pub fn newborns(&self, filter: &NewbornFilter) -> Vec<Newborn> {
        let tables = self.store.read();
        let mut found: Vec<Newborn> = tables
            .newborns
            .iter()
            .filter(|n| filter.matches(n))
            .cloned()
            .collect();
        found.sort_by_key(|n| n.id);
        found
    }

    /// Lab orders matching `filter`, in id order.
    pub fn lab_orders(&self, filter: &LabOrderFilter) -> Vec<LabOrder> {
        let tables = self.store.read();
        let mut found: Vec<LabOrder> = tables
            .lab_orders
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        found.sort_by_key(|o| o.id);
        found
    }

    /// Clinical notes of a patient, newest first.
    pub fn notes_for(&self, patient_id: PatientId) -> LedgerResult<Vec<ClinicalNote>> {
        let tables = self.store.read();
        if tables.patient(patient_id).is_none() {
            return Err(LedgerError::patient_not_found(patient_id));
        }
        let mut notes: Vec<ClinicalNote> = tables
            .notes
            .iter()
            .filter(|n| n.patient_id == patient_id)
            .cloned()
            .collect();
        notes.sort_by(|a, b| (b.written_at, b.id).cmp(&(a.written_at, a.id)));
        Ok(notes)
    }
}
