//! Bed occupancy responses.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use ward_core::{
    AdmissionStatus, BedMapEntry, BedType, OccupancySummary, Sector, SectorOccupancy,
};

/// `?sector=` filter. Accepts a sector key, code or label, or `all`.
#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SectorQuery {
    #[param(example = "pre_labor")]
    pub sector: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SectorOccupancyRes {
    #[schema(value_type = String, example = "pre_labor")]
    pub sector: Sector,
    pub label: String,
    pub total: usize,
    pub occupied: usize,
    pub free: usize,
}

impl From<SectorOccupancy> for SectorOccupancyRes {
    fn from(o: SectorOccupancy) -> Self {
        Self {
            sector: o.sector,
            label: o.sector.label().to_string(),
            total: o.total,
            occupied: o.occupied,
            free: o.free,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct OccupancySummaryRes {
    pub total: usize,
    pub occupied: usize,
    pub free: usize,
    pub occupancy_percent: f64,
}

impl From<OccupancySummary> for OccupancySummaryRes {
    fn from(s: OccupancySummary) -> Self {
        Self {
            total: s.total,
            occupied: s.occupied,
            free: s.free,
            occupancy_percent: s.occupancy_percent,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct OccupancyRes {
    pub summary: OccupancySummaryRes,
    pub sectors: Vec<SectorOccupancyRes>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct FreeBedsRes {
    #[schema(value_type = String)]
    pub sector: Sector,
    pub beds: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct BedOccupantRes {
    pub patient_id: u32,
    pub first_name: String,
    #[schema(value_type = String, example = "in_labor")]
    pub status: AdmissionStatus,
    pub gestational_weeks: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct BedMapEntryRes {
    pub bed_id: String,
    #[schema(value_type = String)]
    pub sector: Sector,
    #[schema(value_type = String, example = "ward")]
    pub bed_type: BedType,
    pub occupant: Option<BedOccupantRes>,
}

impl From<BedMapEntry> for BedMapEntryRes {
    fn from(entry: BedMapEntry) -> Self {
        Self {
            bed_id: entry.bed.id.to_string(),
            sector: entry.bed.sector,
            bed_type: entry.bed.bed_type,
            occupant: entry.occupant.map(|o| BedOccupantRes {
                patient_id: o.patient_id.0,
                first_name: o.first_name,
                status: o.status,
                gestational_weeks: o.gestational_weeks,
            }),
        }
    }
}
