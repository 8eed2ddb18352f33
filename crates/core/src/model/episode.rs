//! Admission episodes: the span from admit to discharge for one patient.

use crate::model::bed::BedId;
use crate::model::patient::PatientId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Why a patient is being admitted. Recorded on the episode; every admission starts as
/// [`crate::model::AdmissionStatus::Admitted`] whatever the reason.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionReason {
    Labor,
    ElectiveCesarean,
    LaborInduction,
    Preeclampsia,
    DecompensatedDiabetes,
    Bleeding,
    Other(String),
}

impl fmt::Display for AdmissionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdmissionReason::Labor => f.write_str("labor"),
            AdmissionReason::ElectiveCesarean => f.write_str("elective cesarean"),
            AdmissionReason::LaborInduction => f.write_str("labor induction"),
            AdmissionReason::Preeclampsia => f.write_str("preeclampsia"),
            AdmissionReason::DecompensatedDiabetes => f.write_str("decompensated diabetes"),
            AdmissionReason::Bleeding => f.write_str("bleeding"),
            AdmissionReason::Other(text) => f.write_str(text),
        }
    }
}

impl std::str::FromStr for AdmissionReason {
    type Err = std::convert::Infallible;

    /// Known reasons by key or phrase; anything else becomes [`AdmissionReason::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Ok(match key.as_str() {
            "labor" | "labour" => AdmissionReason::Labor,
            "elective_cesarean" => AdmissionReason::ElectiveCesarean,
            "labor_induction" | "induction" => AdmissionReason::LaborInduction,
            "preeclampsia" | "pre_eclampsia" => AdmissionReason::Preeclampsia,
            "decompensated_diabetes" => AdmissionReason::DecompensatedDiabetes,
            "bleeding" => AdmissionReason::Bleeding,
            _ => AdmissionReason::Other(s.trim().to_string()),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DischargeType {
    Medical,
    AtRequest,
    Transfer,
    Death,
}

impl fmt::Display for DischargeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DischargeType::Medical => "medical",
            DischargeType::AtRequest => "at_request",
            DischargeType::Transfer => "transfer",
            DischargeType::Death => "death",
        })
    }
}

impl std::str::FromStr for DischargeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "medical" => Ok(DischargeType::Medical),
            "at_request" | "at-request" => Ok(DischargeType::AtRequest),
            "transfer" => Ok(DischargeType::Transfer),
            "death" => Ok(DischargeType::Death),
            other => Err(format!("unknown discharge type '{other}'")),
        }
    }
}

/// One bed the patient occupied during an episode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BedMovement {
    pub bed: BedId,
    pub at: DateTime<Utc>,
    pub reason: String,
    pub actor: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DischargeRecord {
    pub at: DateTime<Utc>,
    pub discharge_type: DischargeType,
    pub actor: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdmissionEpisode {
    pub id: Uuid,
    pub patient_id: PatientId,
    pub reason: AdmissionReason,
    pub admitted_at: DateTime<Utc>,
    pub admitted_by: String,
    /// Beds in the order they were occupied; the first entry is the admitting bed.
    pub movements: Vec<BedMovement>,
    pub discharge: Option<DischargeRecord>,
}

impl AdmissionEpisode {
    pub(crate) fn open(
        patient_id: PatientId,
        bed: BedId,
        admitted_at: DateTime<Utc>,
        reason: AdmissionReason,
        actor: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            movements: vec![BedMovement {
                bed,
                at: admitted_at,
                reason: reason.to_string(),
                actor: actor.clone(),
            }],
            reason,
            admitted_at,
            admitted_by: actor,
            discharge: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.discharge.is_none()
    }

    /// The bed the patient occupied last in this episode.
    pub fn last_bed(&self) -> Option<&BedId> {
        self.movements.last().map(|m| &m.bed)
    }
}
