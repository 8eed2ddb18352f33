//! Delivery registration and birth/newborn listings.

use crate::actor::ActorReq;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use ward_core::{
    Birth, BirthFilter, DeliveryType, NewBirth, NewNewborn, Newborn, NewbornFilter, PatientId,
    Sex, StoreError, StoreResult,
};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct NewbornReq {
    #[schema(value_type = String, example = "female")]
    pub sex: Sex,
    pub weight_g: u32,
    pub length_cm: f32,
    pub head_circumference_cm: f32,
    pub apgar_1min: u8,
    pub apgar_5min: u8,
    pub apgar_10min: u8,
    #[serde(default)]
    pub resuscitation: Option<String>,
    #[serde(default = "default_rooming_in")]
    pub rooming_in: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_rooming_in() -> bool {
    true
}

impl From<NewbornReq> for NewNewborn {
    fn from(n: NewbornReq) -> Self {
        Self {
            sex: n.sex,
            weight_g: n.weight_g,
            length_cm: n.length_cm,
            head_circumference_cm: n.head_circumference_cm,
            apgar_1min: n.apgar_1min,
            apgar_5min: n.apgar_5min,
            apgar_10min: n.apgar_10min,
            resuscitation: n.resuscitation,
            rooming_in: n.rooming_in,
            notes: n.notes,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct BirthReq {
    /// The mother, who must be admitted and not yet post partum.
    pub patient_id: u32,
    #[schema(value_type = String, format = Date)]
    pub delivered_on: NaiveDate,
    #[schema(value_type = String, example = "14:35:00")]
    pub delivered_at: NaiveTime,
    #[schema(value_type = String, example = "normal")]
    pub delivery_type: DeliveryType,
    #[serde(default)]
    pub cesarean_indication: Option<String>,
    #[schema(example = "Epidural")]
    pub anesthesia: String,
    pub labor_duration_hours: u8,
    pub obstetrician: String,
    pub pediatrician: String,
    #[serde(default)]
    pub anesthetist: Option<String>,
    #[serde(default)]
    pub complications: Option<String>,
    pub estimated_blood_loss_ml: u32,
    pub newborn: NewbornReq,
    pub actor: ActorReq,
}

impl BirthReq {
    /// Splits the request into delivery and newborn details.
    pub fn to_records(&self) -> (NewBirth, NewNewborn) {
        let delivery = NewBirth {
            delivered_on: self.delivered_on,
            delivered_at: self.delivered_at,
            delivery_type: self.delivery_type,
            cesarean_indication: self.cesarean_indication.clone(),
            anesthesia: self.anesthesia.clone(),
            labor_duration_hours: self.labor_duration_hours,
            obstetrician: self.obstetrician.clone(),
            pediatrician: self.pediatrician.clone(),
            anesthetist: self.anesthetist.clone(),
            complications: self.complications.clone(),
            estimated_blood_loss_ml: self.estimated_blood_loss_ml,
        };
        (delivery, self.newborn.clone().into())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct BirthRes {
    pub id: u32,
    pub patient_id: u32,
    pub mother_name: String,
    #[schema(value_type = String, format = Date)]
    pub delivered_on: NaiveDate,
    #[schema(value_type = String)]
    pub delivered_at: NaiveTime,
    #[schema(value_type = String)]
    pub delivery_type: DeliveryType,
    pub cesarean_indication: Option<String>,
    pub anesthesia: String,
    pub labor_duration_hours: u8,
    pub obstetrician: String,
    pub pediatrician: String,
    pub anesthetist: Option<String>,
    pub complications: Option<String>,
    pub estimated_blood_loss_ml: u32,
}

impl From<Birth> for BirthRes {
    fn from(b: Birth) -> Self {
        let d = b.delivery;
        Self {
            id: b.id.0,
            patient_id: b.patient_id.0,
            mother_name: b.mother_name,
            delivered_on: d.delivered_on,
            delivered_at: d.delivered_at,
            delivery_type: d.delivery_type,
            cesarean_indication: d.cesarean_indication,
            anesthesia: d.anesthesia,
            labor_duration_hours: d.labor_duration_hours,
            obstetrician: d.obstetrician,
            pediatrician: d.pediatrician,
            anesthetist: d.anesthetist,
            complications: d.complications,
            estimated_blood_loss_ml: d.estimated_blood_loss_ml,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct NewbornRes {
    pub id: u32,
    pub birth_id: u32,
    pub mother_id: u32,
    pub name: String,
    #[schema(value_type = String, format = Date)]
    pub born_on: NaiveDate,
    #[schema(value_type = String)]
    pub born_at: NaiveTime,
    #[schema(value_type = String)]
    pub delivery_type: DeliveryType,
    #[schema(value_type = String)]
    pub sex: Sex,
    pub weight_g: u32,
    pub length_cm: f32,
    pub head_circumference_cm: f32,
    pub apgar_1min: u8,
    pub apgar_5min: u8,
    pub apgar_10min: u8,
    pub resuscitation: Option<String>,
    pub rooming_in: bool,
    pub notes: Option<String>,
}

impl From<Newborn> for NewbornRes {
    fn from(n: Newborn) -> Self {
        let d = n.details;
        Self {
            id: n.id.0,
            birth_id: n.birth_id.0,
            mother_id: n.mother_id.0,
            name: n.name,
            born_on: n.born_on,
            born_at: n.born_at,
            delivery_type: n.delivery_type,
            sex: d.sex,
            weight_g: d.weight_g,
            length_cm: d.length_cm,
            head_circumference_cm: d.head_circumference_cm,
            apgar_1min: d.apgar_1min,
            apgar_5min: d.apgar_5min,
            apgar_10min: d.apgar_10min,
            resuscitation: d.resuscitation,
            rooming_in: d.rooming_in,
            notes: d.notes,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterBirthRes {
    pub birth: BirthRes,
    pub newborn: NewbornRes,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ListBirthsRes {
    pub births: Vec<BirthRes>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ListNewbornsRes {
    pub newborns: Vec<NewbornRes>,
}

/// Birth search parameters.
#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BirthQuery {
    /// Comma-separated delivery types, e.g. `cesarean,forceps`.
    pub delivery_type: Option<String>,
    /// Substring of the obstetrician's name.
    pub obstetrician: Option<String>,
    #[param(value_type = Option<String>, format = Date)]
    pub from: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub to: Option<NaiveDate>,
}

fn parse_delivery_type(s: &str) -> StoreResult<DeliveryType> {
    DeliveryType::ALL
        .into_iter()
        .find(|t| s.eq_ignore_ascii_case(&t.to_string()))
        .ok_or_else(|| StoreError::InvalidInput(format!("unknown delivery type '{s}'")))
}

impl BirthQuery {
    pub fn to_filter(&self) -> StoreResult<BirthFilter> {
        let delivery_types = self
            .delivery_type
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_delivery_type)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(BirthFilter {
            delivery_types,
            obstetrician: self.obstetrician.clone().filter(|o| !o.trim().is_empty()),
            delivered_from: self.from,
            delivered_to: self.to,
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NewbornQuery {
    /// `male` or `female`.
    pub sex: Option<String>,
    pub rooming_in: Option<bool>,
    pub mother_id: Option<u32>,
}

impl NewbornQuery {
    pub fn to_filter(&self) -> StoreResult<NewbornFilter> {
        let sexes = match self.sex.as_deref().map(str::trim) {
            None | Some("") => Vec::new(),
            Some(s) if s.eq_ignore_ascii_case("male") => vec![Sex::Male],
            Some(s) if s.eq_ignore_ascii_case("female") => vec![Sex::Female],
            Some(other) => {
                return Err(StoreError::InvalidInput(format!("unknown sex '{other}'")));
            }
        };
        Ok(NewbornFilter {
            sexes,
            rooming_in: self.rooming_in,
            mother: self.mother_id.map(PatientId),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn birth_query_parses_delivery_types() {
        let query = BirthQuery {
            delivery_type: Some("cesarean, vacuum_extraction".into()),
            ..Default::default()
        };
        let filter = query.to_filter().unwrap();
        assert_eq!(
            filter.delivery_types,
            vec![DeliveryType::Cesarean, DeliveryType::VacuumExtraction]
        );

        let bad = BirthQuery {
            delivery_type: Some("water".into()),
            ..Default::default()
        };
        assert!(bad.to_filter().is_err());
    }

    #[test]
    fn newborn_defaults_to_rooming_in() {
        let req: NewbornReq = serde_json::from_value(serde_json::json!({
            "sex": "male",
            "weight_g": 3250,
            "length_cm": 49.5,
            "head_circumference_cm": 34.0,
            "apgar_1min": 8,
            "apgar_5min": 9,
            "apgar_10min": 10
        }))
        .unwrap();
        assert!(req.rooming_in);
        let newborn = NewNewborn::from(req);
        assert_eq!(newborn.sex, Sex::Male);
    }
}
