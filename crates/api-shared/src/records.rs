//! Clinical notes and lab orders.

use crate::actor::ActorReq;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use ward_core::{
    ClinicalNote, LabOrder, LabOrderFilter, LabStatus, NewClinicalNote, NonEmptyText, NoteKind,
    PatientId, StoreError, StoreResult, VitalSigns,
};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct VitalsDto {
    #[schema(example = "120/80")]
    pub blood_pressure: String,
    pub heart_rate: u16,
    pub temperature_c: f32,
    pub respiratory_rate: u16,
}

impl From<VitalsDto> for VitalSigns {
    fn from(v: VitalsDto) -> Self {
        Self {
            blood_pressure: v.blood_pressure,
            heart_rate: v.heart_rate,
            temperature_c: v.temperature_c,
            respiratory_rate: v.respiratory_rate,
        }
    }
}

impl From<VitalSigns> for VitalsDto {
    fn from(v: VitalSigns) -> Self {
        Self {
            blood_pressure: v.blood_pressure,
            heart_rate: v.heart_rate,
            temperature_c: v.temperature_c,
            respiratory_rate: v.respiratory_rate,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct NoteReq {
    #[schema(value_type = String, example = "progress")]
    pub kind: NoteKind,
    pub description: String,
    #[serde(default)]
    pub vitals: Option<VitalsDto>,
    #[serde(default)]
    pub plan: Option<String>,
    pub actor: ActorReq,
}

impl NoteReq {
    pub fn to_note(&self) -> StoreResult<NewClinicalNote> {
        Ok(NewClinicalNote {
            kind: self.kind,
            description: NonEmptyText::new(&self.description)?,
            vitals: self.vitals.clone().map(VitalSigns::from),
            plan: self.plan.clone().filter(|p| !p.trim().is_empty()),
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct NoteRes {
    pub id: u32,
    pub patient_id: u32,
    #[schema(value_type = String, format = DateTime)]
    pub written_at: DateTime<Utc>,
    pub author: String,
    #[schema(value_type = String)]
    pub kind: NoteKind,
    pub description: String,
    pub vitals: Option<VitalsDto>,
    pub plan: Option<String>,
}

impl From<ClinicalNote> for NoteRes {
    fn from(n: ClinicalNote) -> Self {
        Self {
            id: n.id.0,
            patient_id: n.patient_id.0,
            written_at: n.written_at,
            author: n.author,
            kind: n.content.kind,
            description: n.content.description.into_inner(),
            vitals: n.content.vitals.map(VitalsDto::from),
            plan: n.content.plan,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ListNotesRes {
    pub notes: Vec<NoteRes>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LabOrderReq {
    #[schema(example = "Complete blood count")]
    pub exam: String,
    /// Defaults to the day the request is handled.
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub requested_on: Option<NaiveDate>,
    pub actor: ActorReq,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LabResultReq {
    pub result: String,
    /// Defaults to the day the request is handled.
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub resulted_on: Option<NaiveDate>,
    pub actor: ActorReq,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LabOrderRes {
    pub id: u32,
    pub patient_id: u32,
    pub exam: String,
    #[schema(value_type = String, format = Date)]
    pub requested_on: NaiveDate,
    pub requested_by: String,
    #[schema(value_type = String, example = "pending")]
    pub status: LabStatus,
    #[schema(value_type = Option<String>, format = Date)]
    pub resulted_on: Option<NaiveDate>,
    pub result: Option<String>,
}

impl From<LabOrder> for LabOrderRes {
    fn from(o: LabOrder) -> Self {
        Self {
            id: o.id.0,
            patient_id: o.patient_id.0,
            exam: o.exam.into_inner(),
            requested_on: o.requested_on,
            requested_by: o.requested_by,
            status: o.status,
            resulted_on: o.resulted_on,
            result: o.result,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ListLabOrdersRes {
    pub lab_orders: Vec<LabOrderRes>,
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LabOrderQuery {
    pub patient_id: Option<u32>,
    /// `pending` or `completed`.
    pub status: Option<String>,
}

impl LabOrderQuery {
    pub fn to_filter(&self) -> StoreResult<LabOrderFilter> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) if s.eq_ignore_ascii_case("pending") => Some(LabStatus::Pending),
            Some(s) if s.eq_ignore_ascii_case("completed") => Some(LabStatus::Completed),
            Some(other) => {
                return Err(StoreError::InvalidInput(format!(
                    "unknown lab order status '{other}'"
                )));
            }
        };
        Ok(LabOrderFilter {
            patient: self.patient_id.map(PatientId),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lab_query_parses_status() {
        let query = LabOrderQuery {
            patient_id: Some(7),
            status: Some("Completed".into()),
        };
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.patient, Some(PatientId(7)));
        assert_eq!(filter.status, Some(LabStatus::Completed));

        let bad = LabOrderQuery {
            status: Some("cancelled".into()),
            ..Default::default()
        };
        assert!(bad.to_filter().is_err());
    }

    #[test]
    fn note_request_rejects_blank_description() {
        let req: NoteReq = serde_json::from_value(serde_json::json!({
            "kind": "progress",
            "description": "   ",
            "actor": { "name": "Enf. Juliana Martins", "role": "Nurse" }
        }))
        .unwrap();
        assert!(matches!(req.to_note(), Err(StoreError::Text(_))));
    }
}
