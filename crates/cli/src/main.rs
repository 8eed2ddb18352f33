use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ward_core::{
    default_layout, Actor, AdmissionReason, AdmissionStatus, BedId, BloodType, Dataset,
    DischargeChecklist, DischargeType, ExportOptions, ExportTable, Ledger, NonEmptyText,
    ObstetricHistory, PatientDetails, PatientFilter, PatientRegistry, QueryService, RecordStore,
    Sector, SectorScope, WardConfig, WardExport, WardReport,
};

#[derive(Parser)]
#[command(name = "ward")]
#[command(about = "Maternity ward record system CLI")]
struct Cli {
    /// Dataset seed (default: WARD_SEED or 42)
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Number of synthetic patients (default: WARD_PATIENT_COUNT or 50)
    #[arg(long, global = true)]
    patients: Option<usize>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show bed occupancy per sector
    Occupancy {
        /// Sector key, code or label; all sectors when omitted
        #[arg(long)]
        sector: Option<String>,
    },
    /// List free beds in a sector
    FreeBeds {
        sector: String,
    },
    /// Show every bed with its occupant
    BedMap {
        #[arg(long)]
        sector: Option<String>,
    },
    /// Search patients
    Patients {
        /// Admission status; repeat or comma-separate for several
        #[arg(long, value_delimiter = ',')]
        status: Vec<String>,
        #[arg(long)]
        admitted_only: bool,
        #[arg(long)]
        high_risk: bool,
    },
    /// Print the ward report as JSON
    Report,
    /// Export tables as JSON
    Export {
        /// Tables to export; patients, births and newborns when omitted
        #[arg(long, value_delimiter = ',')]
        tables: Vec<String>,
        /// Mask names and national ids
        #[arg(long)]
        anonymize: bool,
    },
    /// Run the admit/transfer/discharge walkthrough against a fresh store
    Scenario,
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() -> CliResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ward=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let today = Utc::now().date_naive();

    match cli.command {
        Some(Commands::Scenario) => {
            for line in run_scenario(today)? {
                println!("{line}");
            }
        }
        Some(command) => {
            let store = Arc::new(seeded_store(cli.seed, cli.patients, today)?);
            run(command, store, today)?;
        }
        None => {
            println!("Use 'ward --help' for commands");
        }
    }

    Ok(())
}

fn seeded_store(
    seed: Option<u64>,
    patients: Option<usize>,
    today: NaiveDate,
) -> CliResult<RecordStore> {
    let env = WardConfig::from_env_values(
        std::env::var("WARD_SEED").ok(),
        std::env::var("WARD_PATIENT_COUNT").ok(),
        std::env::var("WARD_BED_LAYOUT").ok(),
    )?;
    let config = WardConfig::new(
        seed.unwrap_or(env.seed()),
        patients.unwrap_or(env.patient_count()),
        env.beds().to_vec(),
    )?;
    Ok(RecordStore::new(ward_fixtures::generate_for(&config, today)?)?)
}

fn parse_scope(sector: Option<&str>) -> CliResult<SectorScope> {
    Ok(match sector {
        None => SectorScope::All,
        Some(s) => s.parse()?,
    })
}

fn run(command: Commands, store: Arc<RecordStore>, today: NaiveDate) -> CliResult<()> {
    let ledger = Ledger::new(store.clone());
    match command {
        Commands::Occupancy { sector } => {
            let scope = parse_scope(sector.as_deref())?;
            for o in ledger.occupancy_by_sector(scope) {
                println!(
                    "{:<14} {:>3} occupied / {:>3} beds ({} free)",
                    o.sector.label(),
                    o.occupied,
                    o.total,
                    o.free
                );
            }
            let summary = ledger.occupancy_summary();
            println!(
                "Ward: {}/{} occupied ({:.1}%)",
                summary.occupied, summary.total, summary.occupancy_percent
            );
        }
        Commands::FreeBeds { sector } => {
            let sector: Sector = sector.parse()?;
            let beds = ledger.list_free_beds(sector);
            if beds.is_empty() {
                println!("No free beds in {}.", sector.label());
            } else {
                let ids: Vec<_> = beds.iter().map(BedId::as_str).collect();
                println!("{}: {}", sector.label(), ids.join(", "));
            }
        }
        Commands::BedMap { sector } => {
            let scope = parse_scope(sector.as_deref())?;
            for entry in ledger.bed_map(scope) {
                match entry.occupant {
                    Some(o) => println!(
                        "{:<7} {:<14} {} (#{}, {}, {} wk)",
                        entry.bed.id,
                        entry.bed.sector.label(),
                        o.first_name,
                        o.patient_id,
                        o.status,
                        o.gestational_weeks
                    ),
                    None => println!("{:<7} {:<14} free", entry.bed.id, entry.bed.sector.label()),
                }
            }
        }
        Commands::Patients {
            status,
            admitted_only,
            high_risk,
        } => {
            let statuses = status
                .iter()
                .map(|s| s.parse::<AdmissionStatus>())
                .collect::<Result<Vec<_>, _>>()?;
            let filter = PatientFilter {
                statuses,
                admitted_only,
                high_risk_only: high_risk,
                ..Default::default()
            };
            let patients = QueryService::new(store).patients(&filter);
            if patients.is_empty() {
                println!("No patients found.");
            }
            for p in patients {
                println!(
                    "ID: {}, Name: {}, Status: {}, Bed: {}, Weeks: {}",
                    p.id,
                    p.details.name,
                    p.status(),
                    p.current_bed().map_or("-", BedId::as_str),
                    p.details.obstetric.gestational_weeks
                );
            }
        }
        Commands::Report => {
            println!("{}", WardReport::compute(&store, today).to_json()?);
        }
        Commands::Export { tables, anonymize } => {
            let options = export_options(&tables, anonymize)?;
            println!("{}", WardExport::compute(&store, today, &options)?.to_json()?);
        }
        Commands::Scenario => {
            for line in run_scenario(today)? {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn export_options(tables: &[String], anonymize: bool) -> CliResult<ExportOptions> {
    let mut options = ExportOptions {
        anonymize,
        ..Default::default()
    };
    if !tables.is_empty() {
        options.tables = tables
            .iter()
            .map(|t| t.parse::<ExportTable>())
            .collect::<Result<Vec<_>, _>>()?;
    }
    Ok(options)
}

fn scenario_patient(name: &str, national_id: &str, today: NaiveDate) -> CliResult<PatientDetails> {
    Ok(PatientDetails {
        name: NonEmptyText::new(name)?,
        national_id: NonEmptyText::new(national_id)?,
        birth_date: NaiveDate::from_ymd_opt(1995, 8, 14).ok_or("invalid birth date")?,
        blood_type: BloodType::OPositive,
        phone: None,
        address: None,
        insurer: "SUS".into(),
        obstetric: ObstetricHistory::dated(today, 39),
        comorbidity: None,
        allergy: None,
        pre_pregnancy_weight_kg: None,
        height_m: None,
        attending: None,
    })
}

fn outcome<E: std::fmt::Display>(step: &str, result: &Result<(), E>) -> String {
    match result {
        Ok(()) => format!("{step}: ok"),
        Err(e) => format!("{step}: rejected ({e})"),
    }
}

fn pre_labor_occupied(ledger: &Ledger) -> usize {
    ledger
        .occupancy_by_sector(SectorScope::Only(Sector::PreLabor))
        .first()
        .map_or(0, |o| o.occupied)
}

/// Runs the two-patient walkthrough on an empty default ward and returns one line per step.
///
/// # Errors
/// Returns an error if any step behaves differently from what the ward rules require.
fn run_scenario(today: NaiveDate) -> CliResult<Vec<String>> {
    let store = Arc::new(RecordStore::new(Dataset::with_beds(default_layout()))?);
    let ledger = Ledger::new(store.clone());
    let registry = PatientRegistry::new(store.clone());
    let nurse = Actor::new("Enf. Juliana Martins", "Nurse")?;
    let mut lines = Vec::new();

    let p1 = registry.register_patient(
        scenario_patient("Maria Oliveira", "100.000.000-01", today)?,
        &nurse,
    )?;
    let p2 = registry.register_patient(
        scenario_patient("Ana Costa", "100.000.000-02", today)?,
        &nurse,
    )?;
    lines.push(format!("Registered P{} and P{}", p1.id, p2.id));

    let pp01 = BedId::from("PP-01");
    let co01 = BedId::from("CO-01");
    let t0 = today.and_hms_opt(8, 0, 0).ok_or("invalid time")?.and_utc();

    let admitted = ledger.admit(p1.id, &pp01, t0, AdmissionReason::Labor, &nurse);
    lines.push(outcome("Admit P1 to PP-01 for labor", &admitted));
    admitted?;
    lines.push(format!("Pre-labor occupied: {}", pre_labor_occupied(&ledger)));

    let second = ledger.admit(
        p2.id,
        &pp01,
        t0 + chrono::Duration::minutes(30),
        AdmissionReason::Labor,
        &nurse,
    );
    lines.push(outcome("Admit P2 to PP-01 for labor", &second));
    if second.is_ok() {
        return Err("second admission into an occupied bed was accepted".into());
    }
    lines.push(format!("Pre-labor occupied: {}", pre_labor_occupied(&ledger)));

    let transferred = ledger.transfer(p1.id, &co01, "Active labor", &nurse);
    lines.push(outcome("Transfer P1 to CO-01", &transferred));
    transferred?;
    lines.push(format!(
        "PP-01 {}, CO-01 {}",
        occupancy_word(&store, &pp01),
        occupancy_word(&store, &co01)
    ));

    let discharged = ledger.discharge(
        p1.id,
        DischargeType::Medical,
        &DischargeChecklist::complete(),
        &nurse,
    );
    lines.push(outcome("Discharge P1 (medical, checklist complete)", &discharged));
    discharged?;

    let status = store
        .get_patient(p1.id)
        .map(|p| p.status())
        .ok_or("patient 1 vanished")?;
    lines.push(format!("CO-01 {}, P1 {}", occupancy_word(&store, &co01), status));
    if status != AdmissionStatus::Discharged || store.occupant_of(&co01).is_some() {
        return Err("discharge left the patient in a bed".into());
    }

    Ok(lines)
}

fn occupancy_word(store: &RecordStore, bed: &BedId) -> &'static str {
    if store.occupant_of(bed).is_some() {
        "occupied"
    } else {
        "free"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_runs_every_step() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let lines = run_scenario(today).unwrap();
        assert!(lines.iter().any(|l| l.starts_with("Admit P2 to PP-01 for labor: rejected")));
        assert_eq!(lines.last().unwrap(), "CO-01 free, P1 discharged");
    }

    #[test]
    fn scope_parses_sector_or_defaults_to_all() {
        assert_eq!(parse_scope(None).unwrap(), SectorScope::All);
        assert_eq!(
            parse_scope(Some("CO")).unwrap(),
            SectorScope::Only(Sector::DeliveryRoom)
        );
        assert!(parse_scope(Some("cafeteria")).is_err());
    }

    #[test]
    fn export_command_selects_tables() {
        let cli = Cli::parse_from(["ward", "export", "--tables", "notes,lab-orders", "--anonymize"]);
        match cli.command {
            Some(Commands::Export { tables, anonymize }) => {
                let options = export_options(&tables, anonymize).unwrap();
                assert_eq!(options.tables, vec![ExportTable::Notes, ExportTable::LabOrders]);
                assert!(options.anonymize);
            }
            _ => panic!("expected export command"),
        }
        assert_eq!(export_options(&[], false).unwrap(), ExportOptions::default());
        assert!(export_options(&["payroll".to_string()], false).is_err());
    }

    #[test]
    fn cli_parses_patient_filters() {
        let cli = Cli::parse_from([
            "ward",
            "--seed",
            "7",
            "patients",
            "--status",
            "admitted,in_labor",
            "--high-risk",
        ]);
        assert_eq!(cli.seed, Some(7));
        match cli.command {
            Some(Commands::Patients {
                status, high_risk, ..
            }) => {
                assert_eq!(status, vec!["admitted", "in_labor"]);
                assert!(high_risk);
            }
            _ => panic!("expected patients command"),
        }
    }
}
