//! Practitioner roster.

use crate::actor::Actor;
use crate::error::{EntityKind, StoreError, StoreResult};
use crate::model::{NewPractitioner, Practitioner, PractitionerId, PractitionerUpdate};
use crate::store::RecordStore;
use crate::validation::validate_council_registration;
use std::sync::Arc;

/// Service for managing the practitioner roster. Practitioners are deactivated, never removed.
#[derive(Clone, Debug)]
pub struct PractitionerRegistry {
    store: Arc<RecordStore>,
}

impl PractitionerRegistry {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Adds an active practitioner with id `max + 1`.
    ///
    /// # Errors
    ///
    /// - `StoreError::InvalidInput` if the registration is malformed,
    /// - `StoreError::AlreadyRegistered` if another practitioner holds the registration.
    pub fn add(&self, profile: NewPractitioner, actor: &Actor) -> StoreResult<Practitioner> {
        validate_council_registration(profile.registration.as_str())?;

        let mut tables = self.store.write();
        if tables
            .practitioners
            .values()
            .any(|p| p.profile.registration == profile.registration)
        {
            return Err(StoreError::AlreadyRegistered {
                entity: EntityKind::Practitioner,
                field: "registration",
                value: profile.registration.to_string(),
            });
        }

        let id = PractitionerId(tables.practitioners.keys().last().map_or(1, |last| last.0 + 1));
        let practitioner = Practitioner {
            id,
            profile,
            active: true,
        };
        tables.practitioners.insert(id, practitioner.clone());
        tracing::info!(practitioner = %id, actor = %actor, "practitioner added");
        Ok(practitioner)
    }

    pub fn update(
        &self,
        id: PractitionerId,
        update: PractitionerUpdate,
        actor: &Actor,
    ) -> StoreResult<Practitioner> {
        self.modify(id, actor, "practitioner updated", |p| {
            if let Some(name) = update.name {
                p.profile.name = name;
            }
            if let Some(specialty) = update.specialty {
                p.profile.specialty = specialty;
            }
            if let Some(phone) = update.phone {
                p.profile.phone = Some(phone);
            }
            if let Some(email) = update.email {
                p.profile.email = Some(email);
            }
        })
    }

    pub fn deactivate(&self, id: PractitionerId, actor: &Actor) -> StoreResult<Practitioner> {
        self.modify(id, actor, "practitioner deactivated", |p| p.active = false)
    }

    pub fn reactivate(&self, id: PractitionerId, actor: &Actor) -> StoreResult<Practitioner> {
        self.modify(id, actor, "practitioner reactivated", |p| p.active = true)
    }

    pub fn get(&self, id: PractitionerId) -> Option<Practitioner> {
        self.store.read().practitioners.get(&id).cloned()
    }

    /// Practitioners in id order, optionally only the active ones.
    pub fn list(&self, active_only: bool) -> Vec<Practitioner> {
        self.store
            .read()
            .practitioners
            .values()
            .filter(|p| !active_only || p.active)
            .cloned()
            .collect()
    }

    fn modify(
        &self,
        id: PractitionerId,
        actor: &Actor,
        event: &'static str,
        change: impl FnOnce(&mut Practitioner),
    ) -> StoreResult<Practitioner> {
        let mut tables = self.store.write();
        let practitioner = tables
            .practitioners
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound {
                entity: EntityKind::Practitioner,
                id: id.to_string(),
            })?;
        change(practitioner);
        tracing::info!(practitioner = %id, actor = %actor, "{event}");
        Ok(practitioner.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::nurse;
    use crate::model::Specialty;
    use crate::store::test_support::small_store;
    use ward_types::{EmailAddress, NonEmptyText};

    fn profile(name: &str, registration: &str) -> NewPractitioner {
        NewPractitioner {
            name: NonEmptyText::new(name).unwrap(),
            registration: NonEmptyText::new(registration).unwrap(),
            specialty: Specialty::Obstetrics,
            phone: Some("(11) 99999-0001".into()),
            email: Some(EmailAddress::parse("carlos.silva@maternidade.com").unwrap()),
        }
    }

    fn registry() -> PractitionerRegistry {
        PractitionerRegistry::new(Arc::new(small_store()))
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let registry = registry();
        let a = registry
            .add(profile("Dr. Carlos Alberto Silva", "12345-SP"), &nurse())
            .unwrap();
        let b = registry
            .add(profile("Dra. Maria Fernanda Costa", "23456-SP"), &nurse())
            .unwrap();
        assert_eq!((a.id, b.id), (PractitionerId(1), PractitionerId(2)));
        assert!(a.active);
    }

    #[test]
    fn test_add_rejects_duplicate_or_malformed_registration() {
        let registry = registry();
        registry
            .add(profile("Dr. Carlos Alberto Silva", "12345-SP"), &nurse())
            .unwrap();
        assert!(matches!(
            registry.add(profile("Dr. Impostor", "12345-SP"), &nurse()),
            Err(StoreError::AlreadyRegistered { .. })
        ));
        assert!(matches!(
            registry.add(profile("Dr. Typo", "CRM12345"), &nurse()),
            Err(StoreError::InvalidInput(_))
        ));
        assert_eq!(registry.list(false).len(), 1);
    }

    #[test]
    fn test_deactivate_and_reactivate() {
        let registry = registry();
        let p = registry
            .add(profile("Dr. Fernando Lima", "56789-SP"), &nurse())
            .unwrap();

        registry.deactivate(p.id, &nurse()).unwrap();
        assert!(registry.list(true).is_empty());
        assert_eq!(registry.list(false).len(), 1);

        let back = registry.reactivate(p.id, &nurse()).unwrap();
        assert!(back.active);
        assert_eq!(registry.list(true).len(), 1);

        assert!(matches!(
            registry.deactivate(PractitionerId(9), &nurse()),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_update_changes_given_fields_only() {
        let registry = registry();
        let p = registry
            .add(profile("Dra. Ana Paula Oliveira", "45678-SP"), &nurse())
            .unwrap();
        let updated = registry
            .update(
                p.id,
                PractitionerUpdate {
                    specialty: Some(Specialty::Neonatology),
                    ..Default::default()
                },
                &nurse(),
            )
            .unwrap();
        assert_eq!(updated.profile.specialty, Specialty::Neonatology);
        assert_eq!(updated.profile.name.as_str(), "Dra. Ana Paula Oliveira");
        assert_eq!(registry.get(p.id), Some(updated));
    }
}
