use serde::{Deserialize, Serialize};
use std::fmt;
use ward_types::{EmailAddress, NonEmptyText};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PractitionerId(pub u32);

impl fmt::Display for PractitionerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    Obstetrics,
    Neonatology,
    Anesthesiology,
    Pediatrics,
    Gynecology,
}

/// Fields supplied when adding a practitioner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewPractitioner {
    pub name: NonEmptyText,
    /// Medical council registration (CRM), e.g. `12345-SP`.
    pub registration: NonEmptyText,
    pub specialty: Specialty,
    pub phone: Option<String>,
    pub email: Option<EmailAddress>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Practitioner {
    pub id: PractitionerId,
    #[serde(flatten)]
    pub profile: NewPractitioner,
    pub active: bool,
}

/// Partial update of a practitioner profile. `None` leaves a field unchanged.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PractitionerUpdate {
    pub name: Option<NonEmptyText>,
    pub specialty: Option<Specialty>,
    pub phone: Option<String>,
    pub email: Option<EmailAddress>,
}
