//! Request attribution and error bodies shared by every endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use ward_core::{Actor, ActorRegistration, StoreResult};

/// The person a write is made on behalf of.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ActorReq {
    #[schema(example = "Enf. Juliana Martins")]
    pub name: String,
    #[schema(example = "Nurse")]
    pub role: String,
    /// Professional registration, e.g. `CRM 12345-SP`.
    #[serde(default)]
    pub registration: Option<String>,
}

impl ActorReq {
    pub fn to_actor(&self) -> StoreResult<Actor> {
        let actor = Actor::new(&self.name, &self.role)?;
        match self.registration.as_deref().map(str::trim) {
            Some(reg) if !reg.is_empty() => {
                Ok(actor.with_registration(ActorRegistration::parse(reg)?))
            }
            _ => Ok(actor),
        }
    }
}

/// Body for writes that carry nothing but their author.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ActorOnlyReq {
    pub actor: ActorReq,
}

/// Error body returned with every non-2xx response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub message: String,
    /// Checklist items blocking a discharge, when that is the reason for the error.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmet: Vec<String>,
}

impl ErrorRes {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            unmet: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_with_registration_parses() {
        let req = ActorReq {
            name: "Dr. Roberto Santos".into(),
            role: "Obstetrician".into(),
            registration: Some("CRM 34567-SP".into()),
        };
        let actor = req.to_actor().unwrap();
        assert_eq!(actor.attribution(), "Dr. Roberto Santos (Obstetrician, CRM 34567-SP)");
    }

    #[test]
    fn blank_registration_is_ignored_and_blank_name_rejected() {
        let req = ActorReq {
            name: "Enf. Juliana Martins".into(),
            role: "Nurse".into(),
            registration: Some("  ".into()),
        };
        assert!(req.to_actor().unwrap().registration.is_none());

        let blank = ActorReq {
            name: " ".into(),
            ..req
        };
        assert!(blank.to_actor().is_err());
    }
}
