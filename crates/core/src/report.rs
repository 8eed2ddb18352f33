//! Ward-level aggregates for dashboards and export.

use crate::constants::{POST_TERM_WEEKS, RECENT_ADMISSIONS_SHOWN, RECENT_BIRTHS_DAYS};
use crate::ledger::{sector_occupancy, summary, OccupancySummary, SectorOccupancy};
use crate::model::{AdmissionStatus, BedId, DeliveryType, PatientId, SectorScope, Sex};
use crate::store::RecordStore;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WeightStats {
    pub min_g: u32,
    pub mean_g: f64,
    pub max_g: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DeliveryTypeCount {
    pub delivery_type: DeliveryType,
    pub count: usize,
}

/// A patient currently in labor and where she is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LaborAlert {
    pub patient_id: PatientId,
    pub name: String,
    pub bed: BedId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecentAdmission {
    pub patient_id: PatientId,
    pub name: String,
    pub admitted_at: DateTime<Utc>,
    pub bed: BedId,
    pub status: AdmissionStatus,
}

/// A snapshot of ward activity as of `today`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WardReport {
    pub generated_on: NaiveDate,
    pub patients: usize,
    pub admitted: usize,
    pub discharged: usize,
    pub high_risk: usize,
    /// Pregnancies past [`POST_TERM_WEEKS`] weeks.
    pub post_term: usize,
    pub in_labor: Vec<LaborAlert>,
    /// Latest admissions first.
    pub recent_admissions: Vec<RecentAdmission>,
    pub births_last_30_days: usize,
    pub total_births: usize,
    /// Cesarean deliveries as a percentage of all births; zero when there are none.
    pub cesarean_percent: f64,
    pub delivery_types: Vec<DeliveryTypeCount>,
    pub occupancy: OccupancySummary,
    pub sectors: Vec<SectorOccupancy>,
    pub newborns_rooming_in: usize,
    pub newborn_weight: Option<WeightStats>,
    pub newborns_male: usize,
    pub newborns_female: usize,
}

impl WardReport {
    /// Computes the report under a single read lock.
    pub fn compute(store: &RecordStore, today: NaiveDate) -> Self {
        let tables = store.read();
        let patients = tables.patients.values();

        let admitted = patients.clone().filter(|p| p.is_admitted()).count();
        let discharged = patients
            .clone()
            .filter(|p| p.status() == AdmissionStatus::Discharged)
            .count();
        let high_risk = patients.clone().filter(|p| p.details.is_high_risk()).count();
        let post_term = patients
            .clone()
            .filter(|p| p.details.obstetric.gestational_weeks > POST_TERM_WEEKS)
            .count();
        let in_labor = patients
            .clone()
            .filter(|p| p.status() == AdmissionStatus::InLabor)
            .filter_map(|p| {
                Some(LaborAlert {
                    patient_id: p.id,
                    name: p.details.name.to_string(),
                    bed: p.current_bed()?.clone(),
                })
            })
            .collect();
        let mut recent_admissions: Vec<RecentAdmission> = patients
            .clone()
            .filter_map(|p| {
                Some(RecentAdmission {
                    patient_id: p.id,
                    name: p.details.name.to_string(),
                    admitted_at: p.admission_date()?,
                    bed: p.current_bed()?.clone(),
                    status: p.status(),
                })
            })
            .collect();
        recent_admissions.sort_by(|a, b| {
            b.admitted_at
                .cmp(&a.admitted_at)
                .then(a.patient_id.cmp(&b.patient_id))
        });
        recent_admissions.truncate(RECENT_ADMISSIONS_SHOWN);

        let window_start = today - Duration::days(RECENT_BIRTHS_DAYS);
        let births_last_30_days = tables
            .births
            .iter()
            .filter(|b| b.delivery.delivered_on > window_start && b.delivery.delivered_on <= today)
            .count();

        let delivery_types: Vec<DeliveryTypeCount> = DeliveryType::ALL
            .into_iter()
            .map(|delivery_type| DeliveryTypeCount {
                delivery_type,
                count: tables
                    .births
                    .iter()
                    .filter(|b| b.delivery.delivery_type == delivery_type)
                    .count(),
            })
            .collect();
        let total_births = tables.births.len();
        let cesareans = delivery_types
            .iter()
            .find(|c| c.delivery_type == DeliveryType::Cesarean)
            .map_or(0, |c| c.count);
        let cesarean_percent = percent(cesareans, total_births);

        let weights: Vec<u32> = tables.newborns.iter().map(|n| n.details.weight_g).collect();
        let newborn_weight = match (weights.iter().min(), weights.iter().max()) {
            (Some(&min_g), Some(&max_g)) => Some(WeightStats {
                min_g,
                mean_g: weights.iter().map(|&w| f64::from(w)).sum::<f64>() / weights.len() as f64,
                max_g,
            }),
            _ => None,
        };
        let sex_count = |sex: Sex| tables.newborns.iter().filter(|n| n.details.sex == sex).count();

        let report = Self {
            generated_on: today,
            patients: tables.patients.len(),
            admitted,
            discharged,
            high_risk,
            post_term,
            in_labor,
            recent_admissions,
            births_last_30_days,
            total_births,
            cesarean_percent,
            delivery_types,
            occupancy: summary(&tables),
            sectors: sector_occupancy(&tables, SectorScope::All),
            newborns_rooming_in: tables.newborns.iter().filter(|n| n.details.rooming_in).count(),
            newborn_weight,
            newborns_male: sex_count(Sex::Male),
            newborns_female: sex_count(Sex::Female),
        };
        tracing::debug!(patients = report.patients, births = report.total_births, "ward report computed");
        report
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}
