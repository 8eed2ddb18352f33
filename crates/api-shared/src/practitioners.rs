use crate::actor::ActorReq;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use ward_core::{
    EmailAddress, NewPractitioner, NonEmptyText, Practitioner, PractitionerUpdate, Specialty,
    StoreResult,
};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PractitionerReq {
    #[schema(example = "Dra. Fernanda Lima")]
    pub name: String,
    #[schema(example = "45678-SP")]
    pub registration: String,
    #[schema(value_type = String, example = "obstetrics")]
    pub specialty: Specialty,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub actor: ActorReq,
}

fn parse_email(email: Option<&str>) -> StoreResult<Option<EmailAddress>> {
    match email.map(str::trim) {
        Some(e) if !e.is_empty() => Ok(Some(EmailAddress::parse(e)?)),
        _ => Ok(None),
    }
}

impl PractitionerReq {
    pub fn to_profile(&self) -> StoreResult<NewPractitioner> {
        Ok(NewPractitioner {
            name: NonEmptyText::new(&self.name)?,
            registration: NonEmptyText::new(&self.registration)?,
            specialty: self.specialty,
            phone: self.phone.clone().filter(|p| !p.trim().is_empty()),
            email: parse_email(self.email.as_deref())?,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatePractitionerReq {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub specialty: Option<Specialty>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Deactivates (`false`) or reactivates (`true`) the practitioner.
    #[serde(default)]
    pub active: Option<bool>,
    pub actor: ActorReq,
}

impl UpdatePractitionerReq {
    pub fn to_update(&self) -> StoreResult<PractitionerUpdate> {
        Ok(PractitionerUpdate {
            name: self.name.as_deref().map(NonEmptyText::new).transpose()?,
            specialty: self.specialty,
            phone: self.phone.clone(),
            email: parse_email(self.email.as_deref())?,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PractitionerRes {
    pub id: u32,
    pub name: String,
    pub registration: String,
    #[schema(value_type = String)]
    pub specialty: Specialty,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub active: bool,
}

impl From<Practitioner> for PractitionerRes {
    fn from(p: Practitioner) -> Self {
        Self {
            id: p.id.0,
            name: p.profile.name.into_inner(),
            registration: p.profile.registration.into_inner(),
            specialty: p.profile.specialty,
            phone: p.profile.phone,
            email: p.profile.email.map(|e| e.as_str().to_string()),
            active: p.active,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ListPractitionersRes {
    pub practitioners: Vec<PractitionerRes>,
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PractitionerQuery {
    /// Only list active practitioners. Defaults to `false`.
    pub active_only: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_rejects_bad_email() {
        let req: PractitionerReq = serde_json::from_value(serde_json::json!({
            "name": "Dra. Fernanda Lima",
            "registration": "45678-SP",
            "specialty": "neonatology",
            "email": "not-an-email",
            "actor": { "name": "Admin", "role": "Coordinator" }
        }))
        .unwrap();
        assert!(req.to_profile().is_err());

        let ok = PractitionerReq {
            email: Some("fernanda@example.org".into()),
            ..req
        };
        let profile = ok.to_profile().unwrap();
        assert_eq!(profile.specialty, Specialty::Neonatology);
        assert!(profile.email.is_some());
    }
}
