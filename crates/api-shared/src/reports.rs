//! Query parameters for ward exports.

use serde::Deserialize;
use utoipa::IntoParams;
use ward_core::{ExportOptions, ExportTable, StoreResult};

/// `?tables=patients,births&anonymize=true`. Omitted tables fall back to patients, births
/// and newborns.
#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// Comma-separated: `patients`, `births`, `newborns`, `notes`, `lab_orders`.
    #[param(example = "patients,notes")]
    pub tables: Option<String>,
    /// Masks names to first name plus `***` and hides national ids.
    pub anonymize: Option<bool>,
}

impl ExportQuery {
    pub fn to_options(&self) -> StoreResult<ExportOptions> {
        let mut options = ExportOptions {
            anonymize: self.anonymize.unwrap_or(false),
            ..Default::default()
        };
        if let Some(tables) = self.tables.as_deref().filter(|t| !t.trim().is_empty()) {
            let mut selected = tables
                .split(',')
                .filter(|t| !t.trim().is_empty())
                .map(str::parse::<ExportTable>)
                .collect::<StoreResult<Vec<_>>>()?;
            selected.sort();
            selected.dedup();
            options.tables = selected;
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_query_defaults_and_lists() {
        let options = ExportQuery::default().to_options().unwrap();
        assert_eq!(options, ExportOptions::default());

        let options = ExportQuery {
            tables: Some("notes, patients,notes".into()),
            anonymize: Some(true),
        }
        .to_options()
        .unwrap();
        assert_eq!(options.tables, vec![ExportTable::Patients, ExportTable::Notes]);
        assert!(options.anonymize);

        assert!(ExportQuery {
            tables: Some("patients,payroll".into()),
            anonymize: None,
        }
        .to_options()
        .is_err());
    }
}
