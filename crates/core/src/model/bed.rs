//! Beds, sectors and the default ward layout.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a physical bed, e.g. `PP-01`.
///
/// Identifiers are trimmed and uppercased on construction so `pp-01` and `PP-01` name the
/// same bed. Syntax is not otherwise checked: unknown ids are reported by the store.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct BedId(String);

impl BedId {
    pub fn new(input: impl AsRef<str>) -> Self {
        Self(input.as_ref().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BedId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for BedId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<BedId> for String {
    fn from(value: BedId) -> Self {
        value.0
    }
}

impl fmt::Display for BedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A physical grouping of beds with a common clinical purpose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    PreLabor,
    DeliveryRoom,
    RoomingIn,
    NeonatalIcu,
    MaternalIcu,
}

impl Sector {
    /// Every sector, in ward order.
    pub const ALL: [Sector; 5] = [
        Sector::PreLabor,
        Sector::DeliveryRoom,
        Sector::RoomingIn,
        Sector::NeonatalIcu,
        Sector::MaternalIcu,
    ];

    /// Human-readable ward name.
    pub fn label(self) -> &'static str {
        match self {
            Sector::PreLabor => "Pre-labor",
            Sector::DeliveryRoom => "Delivery room",
            Sector::RoomingIn => "Rooming-in",
            Sector::NeonatalIcu => "Neonatal ICU",
            Sector::MaternalIcu => "Maternal ICU",
        }
    }

    /// Bed id prefix used by the default layout.
    pub fn code(self) -> &'static str {
        match self {
            Sector::PreLabor => "PP",
            Sector::DeliveryRoom => "CO",
            Sector::RoomingIn => "AC",
            Sector::NeonatalIcu => "UN",
            Sector::MaternalIcu => "UM",
        }
    }

    pub fn is_intensive_care(self) -> bool {
        matches!(self, Sector::NeonatalIcu | Sector::MaternalIcu)
    }

    fn as_key(self) -> &'static str {
        match self {
            Sector::PreLabor => "pre_labor",
            Sector::DeliveryRoom => "delivery_room",
            Sector::RoomingIn => "rooming_in",
            Sector::NeonatalIcu => "neonatal_icu",
            Sector::MaternalIcu => "maternal_icu",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

/// Error returned when a sector or sector scope cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sector '{0}'")]
pub struct UnknownSector(pub String);

impl FromStr for Sector {
    type Err = UnknownSector;

    /// Accepts the snake_case key (`pre_labor`), the bed prefix (`PP`) or the label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Sector::ALL
            .into_iter()
            .find(|sector| {
                needle.eq_ignore_ascii_case(sector.as_key())
                    || needle.eq_ignore_ascii_case(sector.code())
                    || needle.eq_ignore_ascii_case(sector.label())
            })
            .ok_or_else(|| UnknownSector(needle.to_string()))
    }
}

/// Either one sector or the whole ward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectorScope {
    All,
    Only(Sector),
}

impl SectorScope {
    pub fn sectors(self) -> Vec<Sector> {
        match self {
            SectorScope::All => Sector::ALL.to_vec(),
            SectorScope::Only(sector) => vec![sector],
        }
    }

    pub fn contains(self, sector: Sector) -> bool {
        match self {
            SectorScope::All => true,
            SectorScope::Only(only) => only == sector,
        }
    }
}

impl From<Sector> for SectorScope {
    fn from(value: Sector) -> Self {
        SectorScope::Only(value)
    }
}

impl FromStr for SectorScope {
    type Err = UnknownSector;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(SectorScope::All);
        }
        s.parse().map(SectorScope::Only)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BedType {
    Ward,
    DeliverySuite,
    PrivateRoom,
    IntensiveCare,
}

/// Static bed infrastructure. Beds are never created or removed after the store is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bed {
    pub id: BedId,
    pub sector: Sector,
    pub bed_type: BedType,
}

impl Bed {
    pub fn new(id: impl Into<BedId>, sector: Sector, bed_type: BedType) -> Self {
        Self {
            id: id.into(),
            sector,
            bed_type,
        }
    }
}

/// Builds `count` beds named `{prefix}-01`, `{prefix}-02`, ...
pub fn numbered_beds(prefix: &str, count: usize, sector: Sector, bed_type: BedType) -> Vec<Bed> {
    (1..=count)
        .map(|i| Bed::new(BedId::new(format!("{prefix}-{i:02}")), sector, bed_type))
        .collect()
}

/// The maternity ward's standard fifty beds.
pub fn default_layout() -> Vec<Bed> {
    let mut beds = Vec::with_capacity(50);
    beds.extend(numbered_beds("PP", 10, Sector::PreLabor, BedType::Ward));
    beds.extend(numbered_beds("CO", 5, Sector::DeliveryRoom, BedType::DeliverySuite));
    beds.extend(numbered_beds("AC", 20, Sector::RoomingIn, BedType::PrivateRoom));
    beds.extend(numbered_beds("UN", 10, Sector::NeonatalIcu, BedType::IntensiveCare));
    beds.extend(numbered_beds("UM", 5, Sector::MaternalIcu, BedType::IntensiveCare));
    beds
}
