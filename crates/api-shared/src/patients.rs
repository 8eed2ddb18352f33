//! Patient registration, lookup and search.

use crate::actor::ActorReq;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use utoipa::{IntoParams, ToSchema};
use ward_core::{
    AdmissionStatus, AgeRange, BloodType, NonEmptyText, ObstetricHistory, Patient,
    PatientDetails, PatientDetailsUpdate, PatientFilter, Sector, StoreError, StoreResult,
};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientRes {
    pub id: u32,
    pub name: String,
    pub national_id: String,
    #[schema(value_type = String, format = Date)]
    pub birth_date: NaiveDate,
    #[schema(value_type = String, example = "O+")]
    pub blood_type: BloodType,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub insurer: String,
    pub gravidity: u8,
    pub parity: u8,
    pub abortions: u8,
    pub gestational_weeks: u8,
    #[schema(value_type = String, format = Date)]
    pub last_menstrual_period: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub due_date: NaiveDate,
    pub comorbidity: Option<String>,
    pub allergy: Option<String>,
    pub pre_pregnancy_weight_kg: Option<f32>,
    pub height_m: Option<f32>,
    pub attending: Option<String>,
    pub high_risk: bool,
    #[schema(value_type = String, example = "admitted")]
    pub status: AdmissionStatus,
    pub current_bed: Option<String>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub admission_date: Option<DateTime<Utc>>,
}

impl From<&Patient> for PatientRes {
    fn from(p: &Patient) -> Self {
        let d = &p.details;
        Self {
            id: p.id.0,
            name: d.name.to_string(),
            national_id: d.national_id.to_string(),
            birth_date: d.birth_date,
            blood_type: d.blood_type,
            phone: d.phone.clone(),
            address: d.address.clone(),
            insurer: d.insurer.clone(),
            gravidity: d.obstetric.gravidity,
            parity: d.obstetric.parity,
            abortions: d.obstetric.abortions,
            gestational_weeks: d.obstetric.gestational_weeks,
            last_menstrual_period: d.obstetric.last_menstrual_period,
            due_date: d.obstetric.due_date,
            comorbidity: d.comorbidity.clone(),
            allergy: d.allergy.clone(),
            pre_pregnancy_weight_kg: d.pre_pregnancy_weight_kg,
            height_m: d.height_m,
            attending: d.attending.clone(),
            high_risk: d.is_high_risk(),
            status: p.status(),
            current_bed: p.current_bed().map(|b| b.to_string()),
            admission_date: p.admission_date(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ListPatientsRes {
    pub patients: Vec<PatientRes>,
}

/// Registration form.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterPatientReq {
    pub name: String,
    pub national_id: String,
    #[schema(value_type = String, format = Date)]
    pub birth_date: NaiveDate,
    #[schema(value_type = String, example = "O+")]
    pub blood_type: BloodType,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub insurer: String,
    pub gestational_weeks: u8,
    #[serde(default = "default_gravidity")]
    pub gravidity: u8,
    #[serde(default)]
    pub parity: u8,
    #[serde(default)]
    pub abortions: u8,
    #[serde(default)]
    pub comorbidity: Option<String>,
    #[serde(default)]
    pub allergy: Option<String>,
    #[serde(default)]
    pub pre_pregnancy_weight_kg: Option<f32>,
    #[serde(default)]
    pub height_m: Option<f32>,
    #[serde(default)]
    pub attending: Option<String>,
    pub actor: ActorReq,
}

fn default_gravidity() -> u8 {
    1
}

/// Treats blank optional text as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl RegisterPatientReq {
    /// Builds patient details, dating the pregnancy from `today`.
    pub fn to_details(&self, today: NaiveDate) -> StoreResult<PatientDetails> {
        let mut obstetric = ObstetricHistory::dated(today, self.gestational_weeks);
        obstetric.gravidity = self.gravidity;
        obstetric.parity = self.parity;
        obstetric.abortions = self.abortions;

        Ok(PatientDetails {
            name: NonEmptyText::new(&self.name)?,
            national_id: NonEmptyText::new(&self.national_id)?,
            birth_date: self.birth_date,
            blood_type: self.blood_type,
            phone: non_blank(self.phone.clone()),
            address: non_blank(self.address.clone()),
            insurer: self.insurer.trim().to_string(),
            obstetric,
            comorbidity: non_blank(self.comorbidity.clone()),
            allergy: non_blank(self.allergy.clone()),
            pre_pregnancy_weight_kg: self.pre_pregnancy_weight_kg,
            height_m: self.height_m,
            attending: non_blank(self.attending.clone()),
        })
    }
}

/// Partial update of patient details. Absent fields are left unchanged; an empty
/// `comorbidity` or `allergy` clears it.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatePatientReq {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub insurer: Option<String>,
    #[serde(default)]
    pub gestational_weeks: Option<u8>,
    #[serde(default)]
    pub comorbidity: Option<String>,
    #[serde(default)]
    pub allergy: Option<String>,
    #[serde(default)]
    pub attending: Option<String>,
    pub actor: ActorReq,
}

impl UpdatePatientReq {
    pub fn to_update(&self) -> StoreResult<PatientDetailsUpdate> {
        Ok(PatientDetailsUpdate {
            name: self.name.as_deref().map(NonEmptyText::new).transpose()?,
            phone: self.phone.clone(),
            address: self.address.clone(),
            insurer: self.insurer.clone(),
            gestational_weeks: self.gestational_weeks,
            comorbidity: self.comorbidity.clone().map(|c| non_blank(Some(c))),
            allergy: self.allergy.clone().map(|a| non_blank(Some(a))),
            attending: self.attending.clone(),
        })
    }
}

/// Patient search parameters. List-valued parameters are comma-separated.
#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PatientQuery {
    /// Admission statuses, e.g. `admitted,in_labor`.
    pub status: Option<String>,
    /// Insurers, e.g. `SUS,Unimed`.
    pub insurer: Option<String>,
    /// Sector of the current bed.
    pub sector: Option<String>,
    pub attending: Option<String>,
    /// Substring of the patient's name.
    pub name: Option<String>,
    pub min_weeks: Option<u8>,
    pub max_weeks: Option<u8>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    pub high_risk: Option<bool>,
    pub admitted_only: Option<bool>,
}

fn split_list(value: &Option<String>) -> Vec<String> {
    value
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn bounded<T: Copy + PartialOrd>(
    min: Option<T>,
    max: Option<T>,
    lowest: T,
    highest: T,
) -> Option<RangeInclusive<T>> {
    if min.is_none() && max.is_none() {
        return None;
    }
    Some(min.unwrap_or(lowest)..=max.unwrap_or(highest))
}

impl PatientQuery {
    /// Converts the query into a filter, evaluating ages on `today`.
    pub fn to_filter(&self, today: NaiveDate) -> StoreResult<PatientFilter> {
        let statuses = split_list(&self.status)
            .iter()
            .map(|s| s.parse::<AdmissionStatus>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::InvalidInput)?;
        let sector = self
            .sector
            .as_deref()
            .map(str::parse::<Sector>)
            .transpose()
            .map_err(|e| StoreError::InvalidInput(e.to_string()))?;

        Ok(PatientFilter {
            statuses,
            insurers: split_list(&self.insurer),
            sector,
            attending: non_blank(self.attending.clone()),
            name_contains: non_blank(self.name.clone()),
            gestational_weeks: bounded(self.min_weeks, self.max_weeks, u8::MIN, u8::MAX),
            age: bounded(self.min_age, self.max_age, u32::MIN, u32::MAX)
                .map(|years| AgeRange { years, on: today }),
            high_risk_only: self.high_risk.unwrap_or(false),
            admitted_only: self.admitted_only.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_builds_filter() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let query = PatientQuery {
            status: Some("admitted, in_labor".into()),
            insurer: Some("SUS,Unimed".into()),
            sector: Some("PP".into()),
            min_weeks: Some(37),
            high_risk: Some(true),
            ..Default::default()
        };
        let filter = query.to_filter(today).unwrap();
        assert_eq!(
            filter.statuses,
            vec![AdmissionStatus::Admitted, AdmissionStatus::InLabor]
        );
        assert_eq!(filter.insurers, vec!["SUS", "Unimed"]);
        assert_eq!(filter.sector, Some(Sector::PreLabor));
        assert_eq!(filter.gestational_weeks, Some(37..=u8::MAX));
        assert!(filter.age.is_none());
        assert!(filter.high_risk_only);
    }

    #[test]
    fn query_rejects_unknown_status() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let query = PatientQuery {
            status: Some("intensive_care".into()),
            ..Default::default()
        };
        assert!(matches!(
            query.to_filter(today),
            Err(StoreError::InvalidInput(_))
        ));
    }
}
