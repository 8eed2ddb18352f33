//! Clinical notes and laboratory orders.

use crate::model::patient::PatientId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ward_types::NonEmptyText;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabOrderId(pub u32);

impl fmt::Display for LabOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    Admission,
    Progress,
    Incident,
    Discharge,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    /// Blood pressure as `systolic/diastolic`, e.g. `120/80`.
    pub blood_pressure: String,
    pub heart_rate: u16,
    pub temperature_c: f32,
    pub respiratory_rate: u16,
}

/// Note content supplied by the writer; id, time and author are assigned on write.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewClinicalNote {
    pub kind: NoteKind,
    pub description: NonEmptyText,
    pub vitals: Option<VitalSigns>,
    pub plan: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClinicalNote {
    pub id: NoteId,
    pub patient_id: PatientId,
    pub written_at: DateTime<Utc>,
    pub author: String,
    #[serde(flatten)]
    pub content: NewClinicalNote,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabStatus {
    Pending,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabOrder {
    pub id: LabOrderId,
    pub patient_id: PatientId,
    pub exam: NonEmptyText,
    pub requested_on: NaiveDate,
    pub requested_by: String,
    pub status: LabStatus,
    pub resulted_on: Option<NaiveDate>,
    pub result: Option<String>,
}
