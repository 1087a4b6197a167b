//! Read-side queries over the data registry: the six-counter snapshot panel,
//! per-location line series, and the per-date breadth query that colors the
//! map. All queries are pure reads; a failed query never touches shared state.

pub mod format;

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use serde::Serialize;

use crate::data::record::{CaseRecord, MetricKey, METRIC_KEYS, NATIONAL_TOKEN};
use crate::data::registry::DataRegistry;
use crate::query::format::format_count;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Metric key outside the enumerated six. Surfaced, never defaulted.
    UnknownMetric(String),
    /// Malformed date or a location that is neither the national token nor a
    /// known regional code. Distinct from "valid key, no data".
    InvalidQuery(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMetric(key) => write!(f, "unknown metric key: {key}"),
            Self::InvalidQuery(reason) => write!(f, "invalid query: {reason}"),
        }
    }
}

impl Error for QueryError {}

/// The six formatted counters for one (location, date), in the order the
/// panel displays them. Unreported counters carry the placeholder dash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SixCounters {
    pub location: String,
    pub date: String,
    pub new_recovered: String,
    pub active_monitoring: String,
    pub cumulative_cases: String,
    pub new_cases: String,
    pub cumulative_deaths: String,
    pub new_deaths: String,
}

/// One point of a line series. `value: None` is a reporting gap; the chart
/// layer decides how to draw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub date: String,
    pub value: Option<u64>,
}

/// Which index a location string resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ResolvedLocation {
    National,
    Regional(String),
}

/// Normalize (uppercase) and resolve a location string. Anything that is
/// neither the national token nor a code present in the regional index is an
/// invalid query, not an empty result.
fn resolve_location(registry: &DataRegistry, raw: &str) -> Result<ResolvedLocation, QueryError> {
    let normalized = raw.trim().to_uppercase();
    if normalized == NATIONAL_TOKEN {
        return Ok(ResolvedLocation::National);
    }
    if registry.regional().locations().any(|code| code == normalized) {
        return Ok(ResolvedLocation::Regional(normalized));
    }
    Err(QueryError::InvalidQuery(format!(
        "unknown location: {raw:?}"
    )))
}

/// Dates must be ISO `YYYY-MM-DD`. A well-formed date outside the data's
/// range is valid and simply finds no records.
fn validate_date(raw: &str) -> Result<(), QueryError> {
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| QueryError::InvalidQuery(format!("date must be ISO YYYY-MM-DD, got {raw:?}")))
}

/// Resolve a wire metric key against the enumerated set.
pub fn parse_metric(key: &str) -> Result<MetricKey, QueryError> {
    MetricKey::from_wire_key(key).ok_or_else(|| QueryError::UnknownMetric(key.to_string()))
}

/// The six-counter panel for one (location, date). Total and deterministic:
/// a missing record yields six placeholders, never an error.
pub fn snapshot(registry: &DataRegistry, location: &str, date: &str) -> Result<SixCounters, QueryError> {
    validate_date(date)?;
    let (resolved_location, record) = match resolve_location(registry, location)? {
        ResolvedLocation::National => (
            NATIONAL_TOKEN.to_string(),
            registry.national().point_lookup(NATIONAL_TOKEN, date),
        ),
        ResolvedLocation::Regional(code) => {
            let record = registry.regional().point_lookup(&code, date);
            (code, record)
        }
    };

    let counter = |key: MetricKey| format_count(record.and_then(|r| r.metric(key)));
    Ok(SixCounters {
        location: resolved_location,
        date: date.to_string(),
        new_recovered: counter(MetricKey::NewRecovered),
        active_monitoring: counter(MetricKey::ActiveMonitoring),
        cumulative_cases: counter(MetricKey::CumulativeCases),
        new_cases: counter(MetricKey::NewCases),
        cumulative_deaths: counter(MetricKey::CumulativeDeaths),
        new_deaths: counter(MetricKey::NewDeaths),
    })
}

/// One metric across every known date for one location, in date order.
/// Reporting gaps pass through as `None`; nothing is dropped or interpolated.
pub fn line_series(
    registry: &DataRegistry,
    location: &str,
    metric: MetricKey,
) -> Result<Vec<SeriesPoint>, QueryError> {
    let series = match resolve_location(registry, location)? {
        ResolvedLocation::National => registry.national().series_lookup(NATIONAL_TOKEN),
        ResolvedLocation::Regional(code) => registry.regional().series_lookup(&code),
    };
    Ok(series
        .into_iter()
        .map(|record| SeriesPoint {
            date: record.date.clone(),
            value: record.metric(metric),
        })
        .collect())
}

/// The record for every known region at one date, `None` for regions without
/// a report that day. One point lookup per region, independent of how many
/// dates each region has.
pub fn map_snapshot<'a>(
    registry: &'a DataRegistry,
    date: &str,
) -> Result<BTreeMap<String, Option<&'a CaseRecord>>, QueryError> {
    validate_date(date)?;
    let regional = registry.regional();
    Ok(regional
        .locations()
        .map(|code| (code.to_string(), regional.point_lookup(code, date)))
        .collect())
}

/// Date-picker bounds: the window where every region has reportable data.
pub fn date_bounds(registry: &DataRegistry) -> Option<(String, String)> {
    registry.regional().date_bounds()
}

/// (wire key, label) pairs for the metric selector, in display order.
pub fn metric_keys() -> Vec<(&'static str, &'static str)> {
    METRIC_KEYS
        .iter()
        .map(|key| (key.wire_key(), key.label()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::CaseRecord;
    use crate::data::registry::DataRegistry;
    use crate::data::table::{RecordTable, TableSource};

    fn record(location: &str, date: &str, cases: Option<u64>, recovered: Option<u64>) -> CaseRecord {
        CaseRecord {
            location: location.to_string(),
            date: date.to_string(),
            cumulative_cases: cases,
            new_cases: cases.map(|c| c / 10),
            cumulative_deaths: cases.map(|c| c / 20),
            new_deaths: None,
            new_recovered: recovered,
            active_monitoring: None,
        }
    }

    fn registry() -> DataRegistry {
        let national = RecordTable {
            source: TableSource::National,
            records: vec![
                record("BRASIL", "2020-05-12", Some(177600), Some(72000)),
                record("BRASIL", "2020-05-13", Some(190000), Some(72597)),
            ],
        };
        let regional = RecordTable {
            source: TableSource::Regional,
            records: vec![
                record("RJ", "2020-05-12", Some(100), None),
                record("RJ", "2020-05-13", Some(110), None),
                record("SP", "2020-05-13", Some(500), None),
            ],
        };
        DataRegistry::from_tables(national, regional).unwrap()
    }

    #[test]
    fn snapshot_is_case_insensitive() {
        let registry = registry();
        let lower = snapshot(&registry, "brasil", "2020-05-13").unwrap();
        let upper = snapshot(&registry, "BRASIL", "2020-05-13").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.cumulative_cases, "190.000");
        assert_eq!(lower.new_recovered, "72.597");
    }

    #[test]
    fn snapshot_of_missing_date_is_all_placeholders() {
        let registry = registry();
        let counters = snapshot(&registry, "SP", "2020-05-12").unwrap();
        assert_eq!(counters.cumulative_cases, "-");
        assert_eq!(counters.new_deaths, "-");
    }

    #[test]
    fn unknown_location_is_invalid_not_empty() {
        let registry = registry();
        let err = snapshot(&registry, "XX", "2020-05-13").unwrap_err();
        assert!(matches!(err, QueryError::InvalidQuery(_)));
    }

    #[test]
    fn malformed_date_is_invalid() {
        let registry = registry();
        let err = snapshot(&registry, "RJ", "13/05/2020").unwrap_err();
        assert!(matches!(err, QueryError::InvalidQuery(_)));
    }

    #[test]
    fn line_series_preserves_order_and_gaps() {
        let registry = registry();
        let points = line_series(&registry, "rj", MetricKey::NewRecovered).unwrap();
        assert_eq!(points.len(), registry.regional().series_lookup("RJ").len());
        assert_eq!(points[0].date, "2020-05-12");
        assert_eq!(points[1].date, "2020-05-13");
        assert!(points.iter().all(|p| p.value.is_none()));
    }

    #[test]
    fn map_snapshot_covers_every_region() {
        let registry = registry();
        let map = map_snapshot(&registry, "2020-05-12").unwrap();
        assert_eq!(map.len(), 2);
        assert!(map["RJ"].is_some());
        assert!(map["SP"].is_none());
    }

    #[test]
    fn metric_keys_cover_the_enumerated_set_in_order() {
        let keys = metric_keys();
        assert_eq!(keys.len(), 6);
        assert_eq!(keys[0], ("casosAcumulado", "Casos Acumulados"));
        assert_eq!(keys[1], ("casosNovos", "Novos Casos"));
    }

    #[test]
    fn unknown_metric_key_is_rejected() {
        assert!(matches!(
            parse_metric("casosPorMil"),
            Err(QueryError::UnknownMetric(_))
        ));
        assert_eq!(parse_metric("obitosNovos"), Ok(MetricKey::NewDeaths));
    }
}
