//! Birth registration.
//!
//! Registering a birth writes the delivery and newborn records and moves the mother to
//! post partum in a single critical section, so no reader sees one without the other.

use crate::actor::Actor;
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::change_status;
use crate::model::{
    AdmissionStatus, Birth, BirthId, DeliveryType, NewBirth, NewNewborn, Newborn, NewbornId,
    PatientId,
};
use crate::store::RecordStore;
use std::sync::Arc;

/// Service for registering deliveries.
#[derive(Clone, Debug)]
pub struct BirthRegistry {
    store: Arc<RecordStore>,
}

impl BirthRegistry {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Registers a delivery and its newborn for an admitted mother.
    ///
    /// The mother must be admitted as [`AdmissionStatus::Admitted`] or
    /// [`AdmissionStatus::InLabor`]; she keeps her bed and moves to
    /// [`AdmissionStatus::PostPartum`].
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidInput`] if the delivery or newborn details are inconsistent,
    /// - [`LedgerError::NotFound`] if the patient does not exist,
    /// - [`LedgerError::NotAdmitted`] if she holds no bed,
    /// - [`LedgerError::InvalidTransition`] if she is already post partum.
    pub fn register_birth(
        &self,
        patient_id: PatientId,
        delivery: NewBirth,
        newborn: NewNewborn,
        actor: &Actor,
    ) -> LedgerResult<(Birth, Newborn)> {
        validate_delivery(&delivery, &newborn).map_err(|msg| {
            tracing::warn!(patient = %patient_id, error = %msg, "birth registration rejected");
            LedgerError::InvalidInput(msg)
        })?;

        let mut tables = self.store.write();
        if let Err(err) = change_status(&mut tables, patient_id, AdmissionStatus::PostPartum) {
            tracing::warn!(patient = %patient_id, error = %err, "birth registration rejected");
            return Err(err);
        }

        let mother_name = tables
            .patient(patient_id)
            .map(|p| p.details.name.to_string())
            .unwrap_or_default();
        let first_name = mother_name.split_whitespace().next().unwrap_or_default().to_string();

        let birth_id = BirthId(tables.births.iter().map(|b| b.id.0).max().unwrap_or(0) + 1);
        let newborn_id = NewbornId(tables.newborns.iter().map(|n| n.id.0).max().unwrap_or(0) + 1);

        let birth = Birth {
            id: birth_id,
            patient_id,
            mother_name,
            delivery,
        };
        let newborn = Newborn {
            id: newborn_id,
            birth_id,
            mother_id: patient_id,
            name: format!("Newborn of {first_name}"),
            born_on: birth.delivery.delivered_on,
            born_at: birth.delivery.delivered_at,
            delivery_type: birth.delivery.delivery_type,
            details: newborn,
        };
        tables.births.push(birth.clone());
        tables.newborns.push(newborn.clone());

        tracing::info!(
            patient = %patient_id,
            birth = %birth_id,
            newborn = %newborn_id,
            delivery = %birth.delivery.delivery_type,
            actor = %actor,
            "birth registered"
        );
        Ok((birth, newborn))
    }
}

fn validate_delivery(delivery: &NewBirth, newborn: &NewNewborn) -> Result<(), String> {
    let has_indication = delivery
        .cesarean_indication
        .as_deref()
        .is_some_and(|i| !i.trim().is_empty());
    if delivery.delivery_type == DeliveryType::Cesarean && !has_indication {
        return Err("a cesarean delivery requires an indication".into());
    }
    if delivery.obstetrician.trim().is_empty() {
        return Err("obstetrician is required".into());
    }
    newborn.validate()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::model::Sex;
    use chrono::{NaiveDate, NaiveTime};

    pub fn normal_delivery() -> NewBirth {
        NewBirth {
            delivered_on: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            delivered_at: NaiveTime::from_hms_opt(4, 25, 0).unwrap(),
            delivery_type: DeliveryType::Normal,
            cesarean_indication: None,
            anesthesia: "Epidural".into(),
            labor_duration_hours: 9,
            obstetrician: "Dra. Maria Fernanda Costa".into(),
            pediatrician: "Dra. Ana Paula Oliveira".into(),
            anesthetist: Some("Dr. Fernando Lima".into()),
            complications: None,
            estimated_blood_loss_ml: 350,
        }
    }

    pub fn healthy_newborn() -> NewNewborn {
        NewNewborn {
            sex: Sex::Female,
            weight_g: 3250,
            length_cm: 49.5,
            head_circumference_cm: 34.0,
            apgar_1min: 8,
            apgar_5min: 9,
            apgar_10min: 10,
            resuscitation: None,
            rooming_in: true,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::ledger::test_support::nurse;
    use crate::model::BedId;
    use crate::store::test_support::{admitted, registered, small_layout, small_store};
    use crate::store::Dataset;

    fn registry_with_mother_in_labor() -> BirthRegistry {
        let store = RecordStore::new(Dataset {
            beds: small_layout(),
            patients: vec![
                admitted(1, "CO-01", AdmissionStatus::InLabor),
                registered(2),
            ],
            ..Default::default()
        })
        .unwrap();
        BirthRegistry::new(Arc::new(store))
    }

    #[test]
    fn test_birth_moves_mother_to_post_partum_in_same_bed() {
        let registry = registry_with_mother_in_labor();
        let (birth, newborn) = registry
            .register_birth(PatientId(1), normal_delivery(), healthy_newborn(), &nurse())
            .unwrap();

        assert_eq!(birth.id, BirthId(1));
        assert_eq!(birth.mother_name, "Patient 1 Silva");
        assert_eq!(newborn.birth_id, birth.id);
        assert_eq!(newborn.name, "Newborn of Patient");
        assert_eq!(newborn.delivery_type, DeliveryType::Normal);

        let mother = registry.store.get_patient(PatientId(1)).unwrap();
        assert_eq!(mother.status(), AdmissionStatus::PostPartum);
        assert_eq!(mother.current_bed(), Some(&BedId::from("CO-01")));
    }

    #[test]
    fn test_birth_requires_admitted_or_in_labor_mother() {
        let registry = registry_with_mother_in_labor();
        let err = registry
            .register_birth(PatientId(2), normal_delivery(), healthy_newborn(), &nurse())
            .unwrap_err();
        assert_eq!(err, LedgerError::NotAdmitted { patient: PatientId(2) });

        registry
            .register_birth(PatientId(1), normal_delivery(), healthy_newborn(), &nurse())
            .unwrap();
        let err = registry
            .register_birth(PatientId(1), normal_delivery(), healthy_newborn(), &nurse())
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidTransition { .. }));
        assert_eq!(registry.store.read().births.len(), 1);
    }

    #[test]
    fn test_invalid_newborn_leaves_mother_unchanged() {
        let registry = registry_with_mother_in_labor();
        let mut newborn = healthy_newborn();
        newborn.apgar_5min = 11;
        let err = registry
            .register_birth(PatientId(1), normal_delivery(), newborn, &nurse())
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));
        assert_eq!(
            registry.store.get_patient(PatientId(1)).unwrap().status(),
            AdmissionStatus::InLabor
        );
        assert!(registry.store.read().newborns.is_empty());
    }

    #[test]
    fn test_cesarean_requires_indication() {
        let registry = BirthRegistry::new(Arc::new(small_store()));
        let mut delivery = normal_delivery();
        delivery.delivery_type = DeliveryType::Cesarean;
        let err = registry
            .register_birth(PatientId(3), delivery, healthy_newborn(), &nurse())
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));
    }
}
