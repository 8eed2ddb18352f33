//! Word lists the generator draws from.

use ward_core::Specialty;

pub(crate) const FIRST_NAMES: &[&str] = &[
    "Ana", "Beatriz", "Camila", "Daniela", "Eduarda", "Fernanda", "Gabriela", "Helena",
    "Isabela", "Juliana", "Larissa", "Mariana", "Natália", "Patrícia", "Rafaela", "Sofia",
    "Tatiane", "Vanessa", "Yasmin", "Luana",
];

pub(crate) const SURNAMES: &[&str] = &[
    "Silva", "Santos", "Oliveira", "Souza", "Rodrigues", "Ferreira", "Alves", "Pereira",
    "Lima", "Gomes", "Costa", "Ribeiro", "Martins", "Carvalho", "Almeida", "Rocha",
];

pub(crate) const STREETS: &[&str] = &[
    "Rua das Flores",
    "Avenida Paulista",
    "Rua Augusta",
    "Rua da Consolação",
    "Avenida Brasil",
    "Rua Oscar Freire",
];

pub(crate) const INSURERS: &[&str] = &[
    "SUS",
    "Unimed",
    "Bradesco Saúde",
    "Sul América",
    "Amil",
    "Private",
];

pub(crate) const COMORBIDITIES: &[&str] = &[
    "Gestational diabetes",
    "Chronic hypertension",
    "Preeclampsia",
    "Placenta previa",
    "Anemia",
    "Hypothyroidism",
    "Obesity",
];

pub(crate) const ALLERGIES: &[&str] = &["Dipyrone", "Penicillin", "Latex", "Iodine"];

/// `(name, registration, specialty, phone, email)` of the seeded roster.
pub(crate) const PRACTITIONERS: &[(&str, &str, Specialty, &str, &str)] = &[
    (
        "Dr. Carlos Alberto Silva",
        "12345-SP",
        Specialty::Obstetrics,
        "(11) 99999-0001",
        "carlos.silva@maternidade.com",
    ),
    (
        "Dra. Maria Fernanda Costa",
        "23456-SP",
        Specialty::Obstetrics,
        "(11) 99999-0002",
        "maria.costa@maternidade.com",
    ),
    (
        "Dr. Roberto Santos",
        "34567-SP",
        Specialty::Obstetrics,
        "(11) 99999-0003",
        "roberto.santos@maternidade.com",
    ),
    (
        "Dra. Ana Paula Oliveira",
        "45678-SP",
        Specialty::Neonatology,
        "(11) 99999-0004",
        "ana.oliveira@maternidade.com",
    ),
    (
        "Dr. Fernando Lima",
        "56789-SP",
        Specialty::Anesthesiology,
        "(11) 99999-0005",
        "fernando.lima@maternidade.com",
    ),
];

pub(crate) const NOTE_DESCRIPTIONS: &[&str] = &[
    "Patient in good general condition, no complaints.",
    "Regular uterine contractions, 3 in 10 minutes.",
    "Cervical dilation of 6 cm, membranes intact.",
    "Postpartum patient in good condition, breastfeeding effectively.",
    "Complains of abdominal pain, analgesia prescribed.",
    "Fetal heart rate present and regular, fetal movements present.",
    "Raised blood pressure, magnesium sulfate started.",
    "Patient in active labor.",
];

pub(crate) const NOTE_PLANS: &[&str] = &[
    "Keep under observation",
    "Request lab tests",
    "Start oxytocin",
    "Prepare for cesarean",
    "Hospital discharge",
    "Labor analgesia",
];

pub(crate) const EXAMS: &[&str] = &[
    "Complete blood count",
    "Blood glucose",
    "Urinalysis",
    "Urine culture",
    "Obstetric ultrasound",
    "Cardiotocography",
    "Doppler",
    "Glucose tolerance test",
    "HIV serology",
    "Hepatitis B serology",
    "Blood typing",
    "Indirect Coombs",
    "TSH",
    "Free T4",
];

pub(crate) const CESAREAN_INDICATIONS: &[&str] = &[
    "Cephalopelvic disproportion",
    "Fetal distress",
    "Failed induction",
    "Previous cesarean",
    "Breech presentation",
];

pub(crate) const ANESTHESIA: &[&str] = &["Spinal", "Epidural", "Combined", "Local", "None"];

pub(crate) const DELIVERY_COMPLICATIONS: &[&str] = &[
    "Uterine atony",
    "Perineal laceration",
    "Postpartum hemorrhage",
];

pub(crate) const RESUSCITATION: &[&str] = &["Inhaled O2", "Positive pressure ventilation", "Intubation"];

pub(crate) const NEWBORN_NOTES: &[&str] = &[
    "No complications",
    "Mild jaundice",
    "Transient hypoglycemia",
];
