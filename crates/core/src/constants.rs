//! Constants used throughout the ward core crate.

/// Seed used for the synthetic dataset when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Number of synthetic patients generated when none is configured.
pub const DEFAULT_PATIENT_COUNT: usize = 50;

/// Upper bound on the configured synthetic patient count.
pub const MAX_PATIENT_COUNT: usize = 500;

/// Items that must all be acknowledged before a patient can be discharged.
pub const DISCHARGE_CHECKLIST_ITEMS: [&str; 6] = [
    "discharge_summary",
    "live_birth_declaration",
    "newborn_vaccination_card",
    "breastfeeding_guidance",
    "newborn_screening",
    "follow_up_scheduled",
];

/// Window used for "recent births" counts in reports.
pub const RECENT_BIRTHS_DAYS: i64 = 30;

/// Pregnancies beyond this many weeks are flagged as post-term.
pub const POST_TERM_WEEKS: u8 = 41;

/// Number of latest admissions listed in the ward report.
pub const RECENT_ADMISSIONS_SHOWN: usize = 5;

/// Upper bound on a recorded gestational age, in completed weeks.
pub const MAX_GESTATIONAL_WEEKS: u8 = 45;
