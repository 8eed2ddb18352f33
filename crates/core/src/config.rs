//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into services. The
//! helpers here take already-read values (`Option<String>`, paths) instead of reading
//! process-wide environment variables themselves, which keeps them deterministic in tests.

use crate::constants::{DEFAULT_PATIENT_COUNT, DEFAULT_SEED, MAX_PATIENT_COUNT};
use crate::error::{StoreError, StoreResult};
use crate::model::{default_layout, numbered_beds, Bed, BedType, Sector};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Ward configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct WardConfig {
    seed: u64,
    patient_count: usize,
    beds: Vec<Bed>,
}

impl WardConfig {
    /// Create a new `WardConfig`.
    pub fn new(seed: u64, patient_count: usize, beds: Vec<Bed>) -> StoreResult<Self> {
        if patient_count == 0 || patient_count > MAX_PATIENT_COUNT {
            return Err(StoreError::InvalidInput(format!(
                "patient count must be between 1 and {MAX_PATIENT_COUNT}, got {patient_count}"
            )));
        }
        if beds.is_empty() {
            return Err(StoreError::InvalidInput("bed layout cannot be empty".into()));
        }

        Ok(Self {
            seed,
            patient_count,
            beds,
        })
    }

    /// Resolves a configuration from raw `WARD_SEED`, `WARD_PATIENT_COUNT` and
    /// `WARD_BED_LAYOUT` values. Unset values fall back to the defaults.
    pub fn from_env_values(
        seed: Option<String>,
        patient_count: Option<String>,
        layout_path: Option<String>,
    ) -> StoreResult<Self> {
        let layout_path = layout_path
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        Self::new(
            seed_from_env_value(seed)?,
            patient_count_from_env_value(patient_count)?,
            resolve_bed_layout(layout_path)?,
        )
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn patient_count(&self) -> usize {
        self.patient_count
    }

    pub fn beds(&self) -> &[Bed] {
        &self.beds
    }
}

impl Default for WardConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            patient_count: DEFAULT_PATIENT_COUNT,
            beds: default_layout(),
        }
    }
}

/// Parse the dataset seed from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_SEED`].
pub fn seed_from_env_value(value: Option<String>) -> StoreResult<u64> {
    parse_optional(value, "seed").map(|v| v.unwrap_or(DEFAULT_SEED))
}

/// Parse the synthetic patient count from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_PATIENT_COUNT`].
pub fn patient_count_from_env_value(value: Option<String>) -> StoreResult<usize> {
    parse_optional(value, "patient count").map(|v| v.unwrap_or(DEFAULT_PATIENT_COUNT))
}

fn parse_optional<T: std::str::FromStr>(value: Option<String>, what: &str) -> StoreResult<Option<T>>
where
    T::Err: std::fmt::Display,
{
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| StoreError::InvalidInput(format!("invalid {what} '{v}': {e}")))
        })
        .transpose()
}

/// Resolve the bed layout.
///
/// With no override this is the default fifty-bed layout. An override must point at a YAML
/// layout file (see [`parse_bed_layout`]).
pub fn resolve_bed_layout(override_path: Option<PathBuf>) -> StoreResult<Vec<Bed>> {
    match override_path {
        None => Ok(default_layout()),
        Some(path) => load_bed_layout(&path),
    }
}

pub fn load_bed_layout(path: &Path) -> StoreResult<Vec<Bed>> {
    let text = std::fs::read_to_string(path).map_err(StoreError::LayoutRead)?;
    parse_bed_layout(&text)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutWire {
    wards: Vec<WardWire>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WardWire {
    sector: Sector,
    bed_type: BedType,
    #[serde(default)]
    prefix: Option<String>,
    count: usize,
}

/// Parse a YAML bed layout.
///
/// ```yaml
/// wards:
///   - sector: pre_labor
///     bed_type: ward
///     count: 10
///   - sector: delivery_room
///     bed_type: delivery_suite
///     prefix: CO
///     count: 5
/// ```
///
/// `prefix` defaults to the sector code. Unknown keys, zero counts and duplicate bed ids
/// are rejected; schema mismatches report the failing path.
pub fn parse_bed_layout(yaml_text: &str) -> StoreResult<Vec<Bed>> {
    let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
    let wire: LayoutWire = serde_path_to_error::deserialize(deserializer).map_err(|err| {
        let path = err.path().to_string();
        let source = err.into_inner();
        let path = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        StoreError::Layout(format!("schema mismatch at {path}: {source}"))
    })?;

    let mut beds = Vec::new();
    for ward in wire.wards {
        if ward.count == 0 {
            return Err(StoreError::Layout(format!(
                "ward {} must have at least one bed",
                ward.sector
            )));
        }
        let prefix = ward
            .prefix
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| ward.sector.code().to_string());
        beds.extend(numbered_beds(&prefix, ward.count, ward.sector, ward.bed_type));
    }

    if beds.is_empty() {
        return Err(StoreError::Layout("layout defines no beds".into()));
    }

    let mut seen = HashSet::new();
    for bed in &beds {
        if !seen.insert(bed.id.clone()) {
            return Err(StoreError::Layout(format!("duplicate bed id {}", bed.id)));
        }
    }

    Ok(beds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn seed_defaults_when_unset_or_blank() {
        assert_eq!(seed_from_env_value(None).unwrap(), DEFAULT_SEED);
        assert_eq!(seed_from_env_value(Some("  ".into())).unwrap(), DEFAULT_SEED);
        assert_eq!(seed_from_env_value(Some("7".into())).unwrap(), 7);
        assert!(seed_from_env_value(Some("seven".into())).is_err());
    }

    #[test]
    fn config_rejects_out_of_range_patient_count() {
        assert!(WardConfig::new(1, 0, default_layout()).is_err());
        assert!(WardConfig::new(1, MAX_PATIENT_COUNT + 1, default_layout()).is_err());
        assert!(WardConfig::new(1, 10, Vec::new()).is_err());
        assert_eq!(
            WardConfig::new(1, 10, default_layout()).unwrap().patient_count(),
            10
        );
    }

    #[test]
    fn config_from_unset_env_values_uses_defaults() {
        let cfg = WardConfig::from_env_values(None, Some("".into()), Some(" ".into())).unwrap();
        assert_eq!(cfg.seed(), DEFAULT_SEED);
        assert_eq!(cfg.patient_count(), DEFAULT_PATIENT_COUNT);
        assert_eq!(cfg.beds().len(), 50);

        assert!(WardConfig::from_env_values(None, Some("501".into()), None).is_err());
        assert!(
            WardConfig::from_env_values(None, None, Some("/no/such/layout.yaml".into())).is_err()
        );
    }

    #[test]
    fn layout_uses_sector_code_as_default_prefix() {
        let beds = parse_bed_layout(
            "wards:\n  - sector: maternal_icu\n    bed_type: intensive_care\n    count: 2\n",
        )
        .unwrap();
        let ids: Vec<_> = beds.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["UM-01", "UM-02"]);
    }

    #[test]
    fn layout_reports_path_of_schema_mismatch() {
        let err = parse_bed_layout(
            "wards:\n  - sector: cafeteria\n    bed_type: ward\n    count: 2\n",
        )
        .unwrap_err();
        match err {
            StoreError::Layout(msg) => assert!(msg.contains("wards[0].sector"), "{msg}"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn layout_rejects_duplicate_ids_and_unknown_keys() {
        let dup = "wards:\n  - sector: pre_labor\n    bed_type: ward\n    count: 1\n  - sector: delivery_room\n    bed_type: delivery_suite\n    prefix: PP\n    count: 1\n";
        assert!(matches!(parse_bed_layout(dup), Err(StoreError::Layout(_))));

        let unknown = "wards: []\nfloors: 2\n";
        assert!(matches!(parse_bed_layout(unknown), Err(StoreError::Layout(_))));
    }

    #[test]
    fn resolve_reads_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "wards:\n  - sector: rooming_in\n    bed_type: private_room\n    count: 3"
        )
        .unwrap();

        let beds = resolve_bed_layout(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(beds.len(), 3);
        assert!(beds.iter().all(|b| b.sector == Sector::RoomingIn));

        assert_eq!(resolve_bed_layout(None).unwrap().len(), 50);
    }
}
