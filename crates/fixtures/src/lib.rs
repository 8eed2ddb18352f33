//! # Ward Fixtures
//!
//! Seeded synthetic dataset for demos and manual testing.
//!
//! The same seed, patient count and date always produce the same dataset, and every
//! generated dataset passes [`RecordStore`](ward_core::RecordStore) validation.

mod catalog;

use catalog::*;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use ward_core::{
    default_layout, AdmissionStatus, Bed, BedId, Birth, BirthId, BloodType, ClinicalNote,
    Dataset, DeliveryType, EmailAddress, LabOrder, LabOrderId, LabStatus, NewBirth,
    NewClinicalNote, NewNewborn, NewPractitioner, Newborn, NewbornId, NonEmptyText, NoteId,
    NoteKind, ObstetricHistory, Patient, PatientDetails, PatientId, Practitioner, PractitionerId,
    Sector, Sex, Specialty, StoreResult, VitalSigns, WardConfig,
};

/// Generates a dataset over the default fifty-bed layout.
pub fn generate(seed: u64, patient_count: usize, today: NaiveDate) -> StoreResult<Dataset> {
    generate_with_layout(seed, patient_count, today, default_layout())
}

/// Generates a dataset from resolved configuration.
pub fn generate_for(config: &WardConfig, today: NaiveDate) -> StoreResult<Dataset> {
    generate_with_layout(
        config.seed(),
        config.patient_count(),
        today,
        config.beds().to_vec(),
    )
}

/// Generates a dataset over `beds`.
///
/// About 70% of patients are placed in distinct free beds (never the neonatal ICU) and about
/// 60% have delivered. Patients who find no free bed are left registered, or discharged if
/// they have delivered.
pub fn generate_with_layout(
    seed: u64,
    patient_count: usize,
    today: NaiveDate,
    beds: Vec<Bed>,
) -> StoreResult<Dataset> {
    let mut generator = Generator::new(seed, today, &beds)?;
    for n in 1..=patient_count {
        generator.add_patient(PatientId(n as u32))?;
    }

    let mut dataset = generator.dataset;
    dataset.beds = beds;
    tracing::debug!(
        seed,
        patients = dataset.patients.len(),
        births = dataset.births.len(),
        notes = dataset.notes.len(),
        lab_orders = dataset.lab_orders.len(),
        "synthetic dataset generated"
    );
    Ok(dataset)
}

struct Generator {
    rng: StdRng,
    today: NaiveDate,
    free_beds: Vec<Bed>,
    national_ids: HashSet<String>,
    dataset: Dataset,
}

impl Generator {
    fn new(seed: u64, today: NaiveDate, beds: &[Bed]) -> StoreResult<Self> {
        let practitioners = PRACTITIONERS
            .iter()
            .enumerate()
            .map(|(i, (name, registration, specialty, phone, email))| -> StoreResult<Practitioner> {
                Ok(Practitioner {
                    id: PractitionerId(i as u32 + 1),
                    profile: NewPractitioner {
                        name: NonEmptyText::new(name)?,
                        registration: NonEmptyText::new(registration)?,
                        specialty: *specialty,
                        phone: Some(phone.to_string()),
                        email: Some(EmailAddress::parse(email)?),
                    },
                    active: true,
                })
            })
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            today,
            free_beds: beds
                .iter()
                .filter(|b| b.sector != Sector::NeonatalIcu)
                .cloned()
                .collect(),
            national_ids: HashSet::new(),
            dataset: Dataset {
                practitioners,
                ..Default::default()
            },
        })
    }

    fn midnight(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.today.and_time(NaiveTime::MIN))
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.rng.gen_range(0..items.len())]
    }

    fn practitioner_named(&mut self, specialty: Specialty) -> String {
        let names: Vec<String> = self
            .dataset
            .practitioners
            .iter()
            .filter(|p| p.profile.specialty == specialty)
            .map(|p| p.profile.name.to_string())
            .collect();
        if names.is_empty() {
            return String::from("On-call team");
        }
        self.pick(&names).clone()
    }

    fn national_id(&mut self) -> String {
        loop {
            let id = format!(
                "{:03}.{:03}.{:03}-{:02}",
                self.rng.gen_range(0..1000),
                self.rng.gen_range(0..1000),
                self.rng.gen_range(0..1000),
                self.rng.gen_range(0..100)
            );
            if self.national_ids.insert(id.clone()) {
                return id;
            }
        }
    }

    /// Takes a free bed suited to `status`, falling back to any free bed.
    fn take_bed(&mut self, status: AdmissionStatus) -> Option<BedId> {
        let preferred: &[Sector] = match status {
            AdmissionStatus::InLabor => &[Sector::PreLabor, Sector::DeliveryRoom],
            AdmissionStatus::PostPartum => &[Sector::RoomingIn, Sector::MaternalIcu],
            _ => &[Sector::PreLabor, Sector::MaternalIcu],
        };
        let mut candidates: Vec<usize> = (0..self.free_beds.len())
            .filter(|&i| preferred.contains(&self.free_beds[i].sector))
            .collect();
        if candidates.is_empty() {
            candidates = (0..self.free_beds.len()).collect();
        }
        if candidates.is_empty() {
            return None;
        }
        let index = *self.pick(&candidates);
        Some(self.free_beds.swap_remove(index).id)
    }

    fn add_patient(&mut self, id: PatientId) -> StoreResult<()> {
        let details = self.details()?;
        let has_birth = self.rng.gen_bool(0.6);
        let wants_bed = self.rng.gen_bool(0.7);

        let active_status = if has_birth {
            AdmissionStatus::PostPartum
        } else if self.rng.gen_bool(0.5) {
            AdmissionStatus::InLabor
        } else {
            AdmissionStatus::Admitted
        };
        let bed = if wants_bed {
            self.take_bed(active_status)
        } else {
            None
        };

        let admitted_at = self.midnight() - Duration::hours(self.rng.gen_range(1..=120));
        let patient = match bed {
            Some(bed) => Patient::new(id, details).with_admission(
                active_status,
                Some(bed),
                Some(admitted_at),
            ),
            None if has_birth => {
                Patient::new(id, details).with_admission(AdmissionStatus::Discharged, None, None)
            }
            None => Patient::new(id, details),
        };

        self.add_notes(id)?;
        self.add_lab_orders(id)?;
        if has_birth {
            let delivered = if patient.is_admitted() {
                let hours = (self.midnight() - admitted_at).num_hours().max(1);
                admitted_at + Duration::hours(self.rng.gen_range(0..hours))
            } else {
                self.midnight() - Duration::hours(self.rng.gen_range(48..=720))
            };
            self.add_birth(&patient, delivered);
        }
        self.dataset.patients.push(patient);
        Ok(())
    }

    fn details(&mut self) -> StoreResult<PatientDetails> {
        let name = format!(
            "{} {} {}",
            self.pick(FIRST_NAMES),
            self.pick(SURNAMES),
            self.pick(SURNAMES)
        );
        let gestational_weeks = self.rng.gen_range(28..=42);
        let gravidity = self.rng.gen_range(1..=5u8);
        let parity = self.rng.gen_range(0..gravidity);
        let abortions = self.rng.gen_range(0..=(gravidity - 1 - parity).min(2));

        let mut obstetric = ObstetricHistory::dated(self.today, gestational_weeks);
        obstetric.gravidity = gravidity;
        obstetric.parity = parity;
        obstetric.abortions = abortions;

        Ok(PatientDetails {
            name: NonEmptyText::new(name)?,
            national_id: NonEmptyText::new(self.national_id())?,
            birth_date: self.today - Duration::days(self.rng.gen_range(18 * 365..45 * 365)),
            blood_type: *self.pick(&BloodType::ALL),
            phone: Some(format!(
                "(11) 9{:04}-{:04}",
                self.rng.gen_range(0..10_000),
                self.rng.gen_range(0..10_000)
            )),
            address: Some(format!(
                "{}, {}",
                self.pick(STREETS),
                self.rng.gen_range(1..=2000)
            )),
            insurer: self.pick(INSURERS).to_string(),
            obstetric,
            comorbidity: self
                .rng
                .gen_bool(0.4)
                .then(|| self.pick(COMORBIDITIES).to_string()),
            allergy: self
                .rng
                .gen_bool(0.2)
                .then(|| self.pick(ALLERGIES).to_string()),
            pre_pregnancy_weight_kg: Some(self.rng.gen_range(500..=900) as f32 / 10.0),
            height_m: Some(self.rng.gen_range(150..=180) as f32 / 100.0),
            attending: Some(self.practitioner_named(Specialty::Obstetrics)),
        })
    }

    fn add_notes(&mut self, patient_id: PatientId) -> StoreResult<()> {
        let base = self.midnight() - Duration::days(5);
        for _ in 0..self.rng.gen_range(2..=5) {
            let id = NoteId(self.dataset.notes.len() as u32 + 1);
            let kind = *self.pick(&[
                NoteKind::Admission,
                NoteKind::Progress,
                NoteKind::Incident,
                NoteKind::Discharge,
            ]);
            let vitals = VitalSigns {
                blood_pressure: format!(
                    "{}/{}",
                    self.rng.gen_range(100..=140),
                    self.rng.gen_range(60..=90)
                ),
                heart_rate: self.rng.gen_range(70..=100),
                temperature_c: self.rng.gen_range(360..=375) as f32 / 10.0,
                respiratory_rate: self.rng.gen_range(16..=22),
            };
            let specialty = *self.pick(&[Specialty::Obstetrics, Specialty::Neonatology]);
            let note = ClinicalNote {
                id,
                patient_id,
                written_at: base + Duration::hours(self.rng.gen_range(0..=72)),
                author: self.practitioner_named(specialty),
                content: NewClinicalNote {
                    kind,
                    description: NonEmptyText::new(self.pick(NOTE_DESCRIPTIONS))?,
                    vitals: Some(vitals),
                    plan: Some(self.pick(NOTE_PLANS).to_string()),
                },
            };
            self.dataset.notes.push(note);
        }
        Ok(())
    }

    fn add_lab_orders(&mut self, patient_id: PatientId) -> StoreResult<()> {
        for _ in 0..self.rng.gen_range(3..=8) {
            let id = LabOrderId(self.dataset.lab_orders.len() as u32 + 1);
            let exam = *self.pick(EXAMS);
            let requested_on = self.today - Duration::days(self.rng.gen_range(0..=30));
            let completed = self.rng.gen_bool(0.75);
            let resulted_on = completed.then(|| {
                (requested_on + Duration::days(self.rng.gen_range(0..=3))).min(self.today)
            });
            let result = completed.then(|| self.lab_result(exam));

            let order = LabOrder {
                id,
                patient_id,
                exam: NonEmptyText::new(exam)?,
                requested_on,
                requested_by: self.practitioner_named(Specialty::Obstetrics),
                status: if completed {
                    LabStatus::Completed
                } else {
                    LabStatus::Pending
                },
                resulted_on,
                result,
            };
            self.dataset.lab_orders.push(order);
        }
        Ok(())
    }

    fn lab_result(&mut self, exam: &str) -> String {
        match exam {
            "Complete blood count" => format!(
                "Hb: {:.1} | Ht: {}% | WBC: {}",
                self.rng.gen_range(10.0..14.0),
                self.rng.gen_range(30..=42),
                self.rng.gen_range(5000..=15000)
            ),
            "Blood glucose" => format!("{} mg/dL", self.rng.gen_range(70..=140)),
            "Urinalysis" => self
                .pick(&["Normal", "Leukocyturia", "Proteinuria +", "Glycosuria"])
                .to_string(),
            "Obstetric ultrasound" => format!(
                "Single fetus, cephalic, AFI {:.1} cm, estimated weight {} g",
                self.rng.gen_range(8.0..20.0),
                self.rng.gen_range(2000..=4000)
            ),
            "Cardiotocography" => self
                .pick(&[
                    "Category I - Normal",
                    "Category II - Indeterminate",
                    "Category I - Reactive",
                ])
                .to_string(),
            _ => String::from("Within normal parameters"),
        }
    }

    fn add_birth(&mut self, mother: &Patient, delivered: DateTime<Utc>) {
        let birth_id = BirthId(self.dataset.births.len() as u32 + 1);
        let delivery_type = *self.pick(&DeliveryType::ALL);
        let cesarean_indication = (delivery_type == DeliveryType::Cesarean)
            .then(|| self.pick(CESAREAN_INDICATIONS).to_string());

        let delivery = NewBirth {
            delivered_on: delivered.date_naive(),
            delivered_at: delivered.time(),
            delivery_type,
            cesarean_indication,
            anesthesia: self.pick(ANESTHESIA).to_string(),
            labor_duration_hours: self.rng.gen_range(2..=18),
            obstetrician: self.practitioner_named(Specialty::Obstetrics),
            pediatrician: self.practitioner_named(Specialty::Neonatology),
            anesthetist: Some(self.practitioner_named(Specialty::Anesthesiology)),
            complications: self
                .rng
                .gen_bool(0.3)
                .then(|| self.pick(DELIVERY_COMPLICATIONS).to_string()),
            estimated_blood_loss_ml: self.rng.gen_range(200..=800),
        };

        let details = NewNewborn {
            sex: if self.rng.gen_bool(0.5) {
                Sex::Male
            } else {
                Sex::Female
            },
            weight_g: self.rng.gen_range(2500..=4200),
            length_cm: self.rng.gen_range(450..=550) as f32 / 10.0,
            head_circumference_cm: self.rng.gen_range(320..=380) as f32 / 10.0,
            apgar_1min: self.rng.gen_range(6..=10),
            apgar_5min: self.rng.gen_range(7..=10),
            apgar_10min: self.rng.gen_range(8..=10),
            resuscitation: self
                .rng
                .gen_bool(0.25)
                .then(|| self.pick(RESUSCITATION).to_string()),
            rooming_in: self.rng.gen_bool(0.75),
            notes: self
                .rng
                .gen_bool(0.5)
                .then(|| self.pick(NEWBORN_NOTES).to_string()),
        };

        let newborn = Newborn {
            id: NewbornId(self.dataset.newborns.len() as u32 + 1),
            birth_id,
            mother_id: mother.id,
            name: format!("Newborn of {}", mother.details.name.first_word()),
            born_on: delivery.delivered_on,
            born_at: delivery.delivered_at,
            delivery_type,
            details,
        };
        self.dataset.births.push(Birth {
            id: birth_id,
            patient_id: mother.id,
            mother_name: mother.details.name.to_string(),
            delivery,
        });
        self.dataset.newborns.push(newborn);
    }
}
