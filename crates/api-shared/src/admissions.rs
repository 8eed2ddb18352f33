//! Admit, transfer, status change and discharge requests, plus episode history.

use crate::actor::ActorReq;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use ward_core::{
    AdmissionEpisode, AdmissionReason, AdmissionStatus, BedId, DischargeChecklist, DischargeType,
};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AdmitReq {
    pub patient_id: u32,
    #[schema(example = "PP-01")]
    pub bed_id: String,
    /// Defaults to the time the request is handled.
    #[serde(default)]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub admitted_at: Option<DateTime<Utc>>,
    /// `labor`, `elective_cesarean`, `labor_induction`, `preeclampsia`,
    /// `decompensated_diabetes`, `bleeding`, or free text.
    #[schema(example = "labor")]
    pub reason: String,
    pub actor: ActorReq,
}

impl AdmitReq {
    pub fn bed(&self) -> BedId {
        BedId::new(&self.bed_id)
    }

    pub fn admission_reason(&self) -> AdmissionReason {
        match self.reason.parse() {
            Ok(reason) => reason,
            Err(never) => match never {},
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TransferReq {
    #[schema(example = "CO-01")]
    pub bed_id: String,
    #[schema(example = "active labor")]
    pub reason: String,
    pub actor: ActorReq,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusReq {
    #[schema(value_type = String, example = "in_labor")]
    pub status: AdmissionStatus,
    pub actor: ActorReq,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DischargeReq {
    #[schema(value_type = String, example = "medical")]
    pub discharge_type: DischargeType,
    /// Acknowledged items, e.g. `{"discharge_summary": true}`.
    #[serde(default)]
    pub checklist: BTreeMap<String, bool>,
    pub actor: ActorReq,
}

impl DischargeReq {
    pub fn checklist(&self) -> DischargeChecklist {
        DischargeChecklist::from(self.checklist.clone())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct MovementRes {
    pub bed_id: String,
    #[schema(value_type = String, format = DateTime)]
    pub at: DateTime<Utc>,
    pub reason: String,
    pub actor: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DischargeRes {
    #[schema(value_type = String, format = DateTime)]
    pub at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub discharge_type: DischargeType,
    pub actor: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct EpisodeRes {
    pub id: String,
    pub patient_id: u32,
    pub reason: String,
    #[schema(value_type = String, format = DateTime)]
    pub admitted_at: DateTime<Utc>,
    pub admitted_by: String,
    pub movements: Vec<MovementRes>,
    pub discharge: Option<DischargeRes>,
}

impl From<AdmissionEpisode> for EpisodeRes {
    fn from(e: AdmissionEpisode) -> Self {
        Self {
            id: e.id.to_string(),
            patient_id: e.patient_id.0,
            reason: e.reason.to_string(),
            admitted_at: e.admitted_at,
            admitted_by: e.admitted_by,
            movements: e
                .movements
                .into_iter()
                .map(|m| MovementRes {
                    bed_id: m.bed.to_string(),
                    at: m.at,
                    reason: m.reason,
                    actor: m.actor,
                })
                .collect(),
            discharge: e.discharge.map(|d| DischargeRes {
                at: d.at,
                discharge_type: d.discharge_type,
                actor: d.actor,
            }),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ListEpisodesRes {
    pub episodes: Vec<EpisodeRes>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discharge_request_parses_checklist() {
        let req: DischargeReq = serde_json::from_value(serde_json::json!({
            "discharge_type": "medical",
            "checklist": { "discharge_summary": true, "newborn_screening": false },
            "actor": { "name": "Dr. Roberto Santos", "role": "Obstetrician" }
        }))
        .unwrap();
        assert_eq!(req.discharge_type, DischargeType::Medical);
        assert!(req.checklist().unmet().contains(&"newborn_screening".to_string()));
    }

    #[test]
    fn admit_request_normalises_bed_and_reason() {
        let req: AdmitReq = serde_json::from_value(serde_json::json!({
            "patient_id": 4,
            "bed_id": "pp-03",
            "reason": "Labor",
            "actor": { "name": "Enf. Juliana Martins", "role": "Nurse" }
        }))
        .unwrap();
        assert_eq!(req.bed(), BedId::from("PP-03"));
        assert_eq!(req.admission_reason(), AdmissionReason::Labor);
        assert!(req.admitted_at.is_none());
    }
}
