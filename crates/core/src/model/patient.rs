//! Patient records and admission status.

use crate::model::bed::BedId;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ward_types::NonEmptyText;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(pub u32);

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Phase of the patient's current admission episode.
///
/// `Registered` is a patient who has never been admitted. `Discharged` closes an episode;
/// a later admission starts a new one on the same patient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionStatus {
    Registered,
    Admitted,
    InLabor,
    PostPartum,
    Discharged,
}

impl AdmissionStatus {
    pub const ALL: [AdmissionStatus; 5] = [
        AdmissionStatus::Registered,
        AdmissionStatus::Admitted,
        AdmissionStatus::InLabor,
        AdmissionStatus::PostPartum,
        AdmissionStatus::Discharged,
    ];

    /// True for the phases in which the patient holds a bed.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            AdmissionStatus::Admitted | AdmissionStatus::InLabor | AdmissionStatus::PostPartum
        )
    }

    pub fn as_key(self) -> &'static str {
        match self {
            AdmissionStatus::Registered => "registered",
            AdmissionStatus::Admitted => "admitted",
            AdmissionStatus::InLabor => "in_labor",
            AdmissionStatus::PostPartum => "post_partum",
            AdmissionStatus::Discharged => "discharged",
        }
    }
}

impl fmt::Display for AdmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

impl std::str::FromStr for AdmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        AdmissionStatus::ALL
            .into_iter()
            .find(|status| needle.eq_ignore_ascii_case(status.as_key()))
            .ok_or_else(|| format!("unknown admission status '{needle}'"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];
}

/// Pregnancy history and dating.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstetricHistory {
    pub gravidity: u8,
    pub parity: u8,
    pub abortions: u8,
    pub last_menstrual_period: NaiveDate,
    pub due_date: NaiveDate,
    pub gestational_weeks: u8,
}

impl ObstetricHistory {
    /// Dates a pregnancy from its current gestational age.
    ///
    /// The due date is forty weeks after the last menstrual period.
    pub fn dated(today: NaiveDate, gestational_weeks: u8) -> Self {
        let last_menstrual_period = today - chrono::Duration::weeks(i64::from(gestational_weeks));
        Self {
            gravidity: 1,
            parity: 0,
            abortions: 0,
            last_menstrual_period,
            due_date: last_menstrual_period + chrono::Duration::weeks(40),
            gestational_weeks,
        }
    }
}

/// Everything about a patient except her admission state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatientDetails {
    pub name: NonEmptyText,
    /// National identity number (CPF).
    pub national_id: NonEmptyText,
    pub birth_date: NaiveDate,
    pub blood_type: BloodType,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub insurer: String,
    pub obstetric: ObstetricHistory,
    /// `None` means no known comorbidity.
    pub comorbidity: Option<String>,
    /// `None` means no known allergy.
    pub allergy: Option<String>,
    pub pre_pregnancy_weight_kg: Option<f32>,
    pub height_m: Option<f32>,
    /// Name of the attending practitioner.
    pub attending: Option<String>,
}

impl PatientDetails {
    /// Age in whole years on `on`.
    pub fn age_on(&self, on: NaiveDate) -> u32 {
        let mut years = on.year() - self.birth_date.year();
        if (on.month(), on.day()) < (self.birth_date.month(), self.birth_date.day()) {
            years -= 1;
        }
        years.max(0) as u32
    }

    pub fn is_high_risk(&self) -> bool {
        self.comorbidity.is_some()
    }
}

/// A registered patient.
///
/// The admission fields (`status`, `current_bed`, `admission_date`) are only changed by the
/// ledger once the patient is in a [`crate::RecordStore`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    #[serde(flatten)]
    pub details: PatientDetails,
    status: AdmissionStatus,
    current_bed: Option<BedId>,
    admission_date: Option<DateTime<Utc>>,
}

impl Patient {
    /// A newly registered, never admitted patient.
    pub fn new(id: PatientId, details: PatientDetails) -> Self {
        Self {
            id,
            details,
            status: AdmissionStatus::Registered,
            current_bed: None,
            admission_date: None,
        }
    }

    /// Sets the admission state of a patient that is about to seed a dataset.
    ///
    /// Consistency with the bed layout and other patients is checked when the
    /// [`crate::RecordStore`] is built.
    pub fn with_admission(
        mut self,
        status: AdmissionStatus,
        current_bed: Option<BedId>,
        admission_date: Option<DateTime<Utc>>,
    ) -> Self {
        self.status = status;
        self.current_bed = current_bed;
        self.admission_date = admission_date;
        self
    }

    pub fn status(&self) -> AdmissionStatus {
        self.status
    }

    pub fn current_bed(&self) -> Option<&BedId> {
        self.current_bed.as_ref()
    }

    pub fn admission_date(&self) -> Option<DateTime<Utc>> {
        self.admission_date
    }

    pub fn is_admitted(&self) -> bool {
        self.current_bed.is_some()
    }

    pub(crate) fn set_occupancy(&mut self, update: OccupancyUpdate) {
        self.status = update.status;
        self.current_bed = update.current_bed;
        self.admission_date = update.admission_date;
    }
}

/// The complete set of occupancy fields written by the ledger in one step.
#[derive(Clone, Debug)]
pub(crate) struct OccupancyUpdate {
    pub status: AdmissionStatus,
    pub current_bed: Option<BedId>,
    pub admission_date: Option<DateTime<Utc>>,
}

/// Partial update of non-occupancy patient fields. `None` leaves a field unchanged.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PatientDetailsUpdate {
    pub name: Option<NonEmptyText>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub insurer: Option<String>,
    pub gestational_weeks: Option<u8>,
    pub comorbidity: Option<Option<String>>,
    pub allergy: Option<Option<String>>,
    pub attending: Option<String>,
}

impl PatientDetailsUpdate {
    pub(crate) fn apply(self, details: &mut PatientDetails) {
        if let Some(name) = self.name {
            details.name = name;
        }
        if let Some(phone) = self.phone {
            details.phone = Some(phone);
        }
        if let Some(address) = self.address {
            details.address = Some(address);
        }
        if let Some(insurer) = self.insurer {
            details.insurer = insurer;
        }
        if let Some(weeks) = self.gestational_weeks {
            details.obstetric.gestational_weeks = weeks;
        }
        if let Some(comorbidity) = self.comorbidity {
            details.comorbidity = comorbidity;
        }
        if let Some(allergy) = self.allergy {
            details.allergy = allergy;
        }
        if let Some(attending) = self.attending {
            details.attending = Some(attending);
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn details(name: &str, national_id: &str) -> PatientDetails {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        PatientDetails {
            name: NonEmptyText::new(name).unwrap(),
            national_id: NonEmptyText::new(national_id).unwrap(),
            birth_date: NaiveDate::from_ymd_opt(1994, 6, 15).unwrap(),
            blood_type: BloodType::OPositive,
            phone: None,
            address: None,
            insurer: "SUS".into(),
            obstetric: ObstetricHistory::dated(today, 38),
            comorbidity: None,
            allergy: None,
            pre_pregnancy_weight_kg: Some(62.5),
            height_m: Some(1.64),
            attending: Some("Dr. Carlos Alberto Silva".into()),
        }
    }
}
