//! Delivery and newborn records. Both are written once, when a birth is registered.

use crate::model::patient::PatientId;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BirthId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewbornId(pub u32);

impl fmt::Display for BirthId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for NewbornId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    Normal,
    Cesarean,
    Forceps,
    VacuumExtraction,
}

impl DeliveryType {
    pub const ALL: [DeliveryType; 4] = [
        DeliveryType::Normal,
        DeliveryType::Cesarean,
        DeliveryType::Forceps,
        DeliveryType::VacuumExtraction,
    ];
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeliveryType::Normal => "normal",
            DeliveryType::Cesarean => "cesarean",
            DeliveryType::Forceps => "forceps",
            DeliveryType::VacuumExtraction => "vacuum_extraction",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

/// Delivery details as supplied when a birth is registered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewBirth {
    pub delivered_on: NaiveDate,
    pub delivered_at: NaiveTime,
    pub delivery_type: DeliveryType,
    pub cesarean_indication: Option<String>,
    pub anesthesia: String,
    pub labor_duration_hours: u8,
    pub obstetrician: String,
    pub pediatrician: String,
    pub anesthetist: Option<String>,
    /// `None` means the delivery had no complications.
    pub complications: Option<String>,
    pub estimated_blood_loss_ml: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Birth {
    pub id: BirthId,
    pub patient_id: PatientId,
    pub mother_name: String,
    #[serde(flatten)]
    pub delivery: NewBirth,
}

/// Newborn details as supplied when a birth is registered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewNewborn {
    pub sex: Sex,
    pub weight_g: u32,
    pub length_cm: f32,
    pub head_circumference_cm: f32,
    pub apgar_1min: u8,
    pub apgar_5min: u8,
    pub apgar_10min: u8,
    pub resuscitation: Option<String>,
    /// Whether the baby stays with the mother in rooming-in rather than the neonatal ICU.
    pub rooming_in: bool,
    pub notes: Option<String>,
}

impl NewNewborn {
    pub(crate) fn validate(&self) -> Result<(), String> {
        for (label, score) in [
            ("apgar_1min", self.apgar_1min),
            ("apgar_5min", self.apgar_5min),
            ("apgar_10min", self.apgar_10min),
        ] {
            if score > 10 {
                return Err(format!("{label} must be between 0 and 10, got {score}"));
            }
        }
        if self.weight_g == 0 {
            return Err("weight_g must be positive".into());
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Newborn {
    pub id: NewbornId,
    pub birth_id: BirthId,
    pub mother_id: PatientId,
    pub name: String,
    pub born_on: NaiveDate,
    pub born_at: NaiveTime,
    pub delivery_type: DeliveryType,
    #[serde(flatten)]
    pub details: NewNewborn,
}
