//! Whole-table exports, optionally with patient identity masked.

use crate::error::{StoreError, StoreResult};
use crate::model::{Birth, ClinicalNote, LabOrder, Newborn, Patient, PatientId};
use crate::store::{RecordStore, Tables};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ward_types::NonEmptyText;

/// National id written in place of the real one in anonymised exports.
pub const MASKED_NATIONAL_ID: &str = "***.***.***-**";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportTable {
    Patients,
    Births,
    Newborns,
    Notes,
    LabOrders,
}

impl ExportTable {
    pub const ALL: [ExportTable; 5] = [
        ExportTable::Patients,
        ExportTable::Births,
        ExportTable::Newborns,
        ExportTable::Notes,
        ExportTable::LabOrders,
    ];

    pub fn as_key(self) -> &'static str {
        match self {
            ExportTable::Patients => "patients",
            ExportTable::Births => "births",
            ExportTable::Newborns => "newborns",
            ExportTable::Notes => "notes",
            ExportTable::LabOrders => "lab_orders",
        }
    }
}

impl fmt::Display for ExportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

impl FromStr for ExportTable {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        ExportTable::ALL
            .into_iter()
            .find(|t| t.as_key() == key)
            .ok_or_else(|| StoreError::InvalidInput(format!("unknown export table '{}'", s.trim())))
    }
}

/// Which tables to export and whether to mask names and national ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub tables: Vec<ExportTable>,
    pub anonymize: bool,
}

impl Default for ExportOptions {
    /// Patients, births and newborns, unmasked.
    fn default() -> Self {
        Self {
            tables: vec![
                ExportTable::Patients,
                ExportTable::Births,
                ExportTable::Newborns,
            ],
            anonymize: false,
        }
    }
}

impl ExportOptions {
    pub fn includes(&self, table: ExportTable) -> bool {
        self.tables.contains(&table)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewbornRow {
    pub mother_name: String,
    #[serde(flatten)]
    pub newborn: Newborn,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NoteRow {
    pub patient_name: String,
    #[serde(flatten)]
    pub note: ClinicalNote,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabOrderRow {
    pub patient_name: String,
    #[serde(flatten)]
    pub order: LabOrder,
}

/// Tables not selected for export are `None` and left out of the JSON.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WardExport {
    pub generated_on: NaiveDate,
    pub anonymized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patients: Option<Vec<Patient>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub births: Option<Vec<Birth>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newborns: Option<Vec<NewbornRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<NoteRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lab_orders: Option<Vec<LabOrderRow>>,
}

impl WardExport {
    /// Copies the selected tables under a single read lock.
    ///
    /// With `anonymize`, every patient name becomes her first name followed by `***` and
    /// national ids are replaced by [`MASKED_NATIONAL_ID`].
    pub fn compute(
        store: &RecordStore,
        today: NaiveDate,
        options: &ExportOptions,
    ) -> StoreResult<Self> {
        let tables = store.read();
        let name_of = |id: PatientId| -> String {
            let name = tables
                .patients
                .get(&id)
                .map(|p| p.details.name.as_str())
                .unwrap_or_default();
            if options.anonymize {
                mask_name(name)
            } else {
                name.to_string()
            }
        };

        let patients = if options.includes(ExportTable::Patients) {
            Some(patients(&tables, options.anonymize)?)
        } else {
            None
        };
        let births = options.includes(ExportTable::Births).then(|| {
            tables
                .births
                .iter()
                .cloned()
                .map(|mut birth| {
                    if options.anonymize {
                        birth.mother_name = mask_name(&birth.mother_name);
                    }
                    birth
                })
                .collect()
        });
        let newborns = options.includes(ExportTable::Newborns).then(|| {
            tables
                .newborns
                .iter()
                .map(|n| NewbornRow {
                    mother_name: name_of(n.mother_id),
                    newborn: n.clone(),
                })
                .collect()
        });
        let notes = options.includes(ExportTable::Notes).then(|| {
            tables
                .notes
                .iter()
                .map(|n| NoteRow {
                    patient_name: name_of(n.patient_id),
                    note: n.clone(),
                })
                .collect()
        });
        let lab_orders = options.includes(ExportTable::LabOrders).then(|| {
            tables
                .lab_orders
                .iter()
                .map(|o| LabOrderRow {
                    patient_name: name_of(o.patient_id),
                    order: o.clone(),
                })
                .collect()
        });

        tracing::debug!(tables = options.tables.len(), anonymize = options.anonymize, "ward export built");
        Ok(Self {
            generated_on: today,
            anonymized: options.anonymize,
            patients,
            births,
            newborns,
            notes,
            lab_orders,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn patients(tables: &Tables, anonymize: bool) -> StoreResult<Vec<Patient>> {
    tables
        .patients
        .values()
        .cloned()
        .map(|mut patient| {
            if anonymize {
                patient.details.name = NonEmptyText::new(mask_name(patient.details.name.as_str()))?;
                patient.details.national_id = NonEmptyText::new(MASKED_NATIONAL_ID)?;
            }
            Ok(patient)
        })
        .collect()
}

fn mask_name(name: &str) -> String {
    match name.split_whitespace().next() {
        Some(first) => format!("{first} ***"),
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::births::test_support::{healthy_newborn, normal_delivery};
    use crate::births::BirthRegistry;
    use crate::clinical::ClinicalRecords;
    use crate::ledger::test_support::nurse;
    use crate::model::{AdmissionStatus, NewClinicalNote, NoteKind};
    use crate::store::test_support::*;
    use crate::store::Dataset;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn store_with_records() -> Arc<RecordStore> {
        let store = Arc::new(
            RecordStore::new(Dataset {
                beds: small_layout(),
                patients: vec![admitted(1, "CO-01", AdmissionStatus::InLabor), registered(2)],
                ..Default::default()
            })
            .unwrap(),
        );
        BirthRegistry::new(store.clone())
            .register_birth(PatientId(1), normal_delivery(), healthy_newborn(), &nurse())
            .unwrap();
        ClinicalRecords::new(store.clone())
            .add_note(
                PatientId(2),
                NewClinicalNote {
                    kind: NoteKind::Progress,
                    description: NonEmptyText::new("Mild back pain").unwrap(),
                    vitals: None,
                    plan: None,
                },
                &nurse(),
            )
            .unwrap();
        store
    }

    #[test]
    fn default_export_has_patients_births_and_newborns() {
        let store = store_with_records();
        let export = WardExport::compute(&store, today(), &ExportOptions::default()).unwrap();
        assert!(!export.anonymized);
        assert_eq!(export.patients.as_ref().unwrap().len(), 2);
        assert_eq!(export.births.as_ref().unwrap().len(), 1);
        let newborns = export.newborns.as_ref().unwrap();
        assert_eq!(newborns[0].mother_name, "Patient 1 Silva");
        assert!(export.notes.is_none());

        let json: serde_json::Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();
        assert!(json.get("notes").is_none());
        assert_eq!(json["patients"][1]["national_id"], "000.000.000-02");
    }

    #[test]
    fn anonymized_export_masks_names_and_national_ids() {
        let store = store_with_records();
        let options = ExportOptions {
            tables: ExportTable::ALL.to_vec(),
            anonymize: true,
        };
        let export = WardExport::compute(&store, today(), &options).unwrap();

        for patient in export.patients.as_ref().unwrap() {
            assert_eq!(patient.details.name.as_str(), "Patient ***");
            assert_eq!(patient.details.national_id.as_str(), MASKED_NATIONAL_ID);
        }
        assert_eq!(export.births.as_ref().unwrap()[0].mother_name, "Patient ***");
        assert_eq!(export.newborns.as_ref().unwrap()[0].mother_name, "Patient ***");
        let notes = export.notes.as_ref().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].patient_name, "Patient ***");
        assert!(export.lab_orders.as_ref().unwrap().is_empty());

        // The store itself is untouched.
        let stored = store.get_patient(PatientId(1)).unwrap();
        assert_eq!(stored.details.name.as_str(), "Patient 1 Silva");
    }

    #[test]
    fn export_tables_parse_by_key() {
        assert_eq!("lab-orders".parse::<ExportTable>().unwrap(), ExportTable::LabOrders);
        assert_eq!(" Notes ".parse::<ExportTable>().unwrap(), ExportTable::Notes);
        assert!(matches!(
            "invoices".parse::<ExportTable>(),
            Err(StoreError::InvalidInput(_))
        ));
    }
}
