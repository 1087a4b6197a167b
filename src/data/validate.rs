//! Dataset diagnostics for the `validate` CLI command. Errors indicate data
//! the query layer cannot serve correctly; warnings flag feed oddities worth
//! a look before publishing a snapshot.

use std::fmt;

use crate::data::index::DatasetIndex;
use crate::data::record::{MetricKey, NATIONAL_TOKEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }
}

/// Validate both indices: national table shape, ISO date format, per-location
/// chronological order, and cumulative-counter coverage.
pub fn validate_dataset(national: &DatasetIndex, regional: &DatasetIndex) -> ValidationReport {
    let mut report = ValidationReport::default();

    let national_locations: Vec<&str> = national.locations().collect();
    if national_locations != [NATIONAL_TOKEN] {
        report.push(
            ValidationSeverity::Error,
            "national",
            format!(
                "national table must contain exactly the {NATIONAL_TOKEN} location, found {:?}",
                national_locations
            ),
        );
    }

    if regional.is_empty() {
        report.push(ValidationSeverity::Error, "regional", "regional table is empty");
    }

    for (context, index) in [("national", national), ("regional", regional)] {
        validate_index(index, context, &mut report);
    }

    if let Some((min_date, max_date)) = regional.date_bounds() {
        if min_date > max_date {
            report.push(
                ValidationSeverity::Error,
                "regional",
                format!("no overlap window: per-location reporting ranges disagree ({min_date} > {max_date})"),
            );
        }
    }

    report
}

fn validate_index(index: &DatasetIndex, context: &str, report: &mut ValidationReport) {
    let locations: Vec<String> = index.locations().map(str::to_string).collect();
    for location in locations {
        let series = index.series_lookup(&location);
        let mut previous_date: Option<&str> = None;
        let mut reported_cumulative = 0usize;

        for record in &series {
            if chrono::NaiveDate::parse_from_str(&record.date, "%Y-%m-%d").is_err() {
                report.push(
                    ValidationSeverity::Error,
                    format!("{context}/{location}"),
                    format!("date {:?} is not ISO YYYY-MM-DD", record.date),
                );
            }
            if let Some(previous) = previous_date {
                if previous >= record.date.as_str() {
                    report.push(
                        ValidationSeverity::Error,
                        format!("{context}/{location}"),
                        format!("dates not strictly increasing: {previous} then {}", record.date),
                    );
                }
            }
            previous_date = Some(record.date.as_str());
            if record.metric(MetricKey::CumulativeCases).is_some() {
                reported_cumulative += 1;
            }
        }

        if !series.is_empty() && reported_cumulative == 0 {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}/{location}"),
                "no cumulative case counts reported on any date",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::index::DatasetIndex;
    use crate::data::record::CaseRecord;
    use crate::data::table::{RecordTable, TableSource};

    fn record(location: &str, date: &str, cases: Option<u64>) -> CaseRecord {
        CaseRecord {
            location: location.to_string(),
            date: date.to_string(),
            cumulative_cases: cases,
            new_cases: None,
            cumulative_deaths: None,
            new_deaths: None,
            new_recovered: None,
            active_monitoring: None,
        }
    }

    fn index(source: TableSource, records: Vec<CaseRecord>) -> DatasetIndex {
        DatasetIndex::build(RecordTable { source, records }).unwrap()
    }

    #[test]
    fn clean_dataset_passes() {
        let national = index(
            TableSource::National,
            vec![record("BRASIL", "2020-05-13", Some(190000))],
        );
        let regional = index(
            TableSource::Regional,
            vec![
                record("RJ", "2020-05-13", Some(100)),
                record("SP", "2020-05-13", Some(500)),
            ],
        );
        let report = validate_dataset(&national, &regional);
        assert!(!report.has_errors(), "{:?}", report.diagnostics);
    }

    #[test]
    fn stray_location_in_national_table_is_an_error() {
        let national = index(
            TableSource::National,
            vec![
                record("BRASIL", "2020-05-13", Some(1)),
                record("RJ", "2020-05-13", Some(1)),
            ],
        );
        let regional = index(
            TableSource::Regional,
            vec![record("RJ", "2020-05-13", Some(1))],
        );
        assert!(validate_dataset(&national, &regional).has_errors());
    }

    #[test]
    fn malformed_date_is_an_error() {
        let national = index(
            TableSource::National,
            vec![record("BRASIL", "13/05/2020", Some(1))],
        );
        let regional = index(
            TableSource::Regional,
            vec![record("RJ", "2020-05-13", Some(1))],
        );
        assert!(validate_dataset(&national, &regional).has_errors());
    }

    #[test]
    fn silent_location_is_a_warning_not_an_error() {
        let national = index(
            TableSource::National,
            vec![record("BRASIL", "2020-05-13", Some(1))],
        );
        let regional = index(
            TableSource::Regional,
            vec![record("AP", "2020-05-13", None)],
        );
        let report = validate_dataset(&national, &regional);
        assert!(!report.has_errors());
        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.severity == ValidationSeverity::Warning));
    }
}
