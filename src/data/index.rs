//! Point and series indices over one bulletin table. Built once at load
//! time, read-only afterwards.

use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt;

use crate::data::record::CaseRecord;
use crate::data::table::RecordTable;

/// Two rows shared a (location, date) key. The source data is ambiguous, so
/// index construction refuses it rather than picking a winner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKeyError {
    pub location: String,
    pub date: String,
}

impl fmt::Display for DuplicateKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "duplicate record for location {} on {}",
            self.location, self.date
        )
    }
}

impl Error for DuplicateKeyError {}

/// Lookup structures over one table: `(location, date)` point access and
/// date-ordered per-location series. Owns its records.
#[derive(Debug)]
pub struct DatasetIndex {
    records: Vec<CaseRecord>,
    point: HashMap<(String, String), usize>,
    series: BTreeMap<String, Vec<usize>>,
}

impl DatasetIndex {
    /// Index a table in one scan. Fails on any repeated (location, date) pair.
    pub fn build(table: RecordTable) -> Result<Self, DuplicateKeyError> {
        let records = table.records;
        let mut point = HashMap::with_capacity(records.len());
        let mut series: BTreeMap<String, Vec<usize>> = BTreeMap::new();

        for (position, record) in records.iter().enumerate() {
            let key = (record.location.clone(), record.date.clone());
            if point.insert(key, position).is_some() {
                return Err(DuplicateKeyError {
                    location: record.location.clone(),
                    date: record.date.clone(),
                });
            }
            series.entry(record.location.clone()).or_default().push(position);
        }

        // Source tables arrive date-ordered per location, but the series view
        // guarantees it regardless of row order. ISO strings sort chronologically.
        for positions in series.values_mut() {
            positions.sort_by(|&a, &b| records[a].date.cmp(&records[b].date));
        }

        Ok(DatasetIndex {
            records,
            point,
            series,
        })
    }

    /// The record for one (location, date), `None` when that combination was
    /// never reported. Missing data is expected, not an error.
    pub fn point_lookup(&self, location: &str, date: &str) -> Option<&CaseRecord> {
        self.point
            .get(&(location.to_string(), date.to_string()))
            .map(|&position| &self.records[position])
    }

    /// Date-ascending records for one location, empty for unknown locations.
    pub fn series_lookup(&self, location: &str) -> Vec<&CaseRecord> {
        self.series
            .get(location)
            .map(|positions| positions.iter().map(|&p| &self.records[p]).collect())
            .unwrap_or_default()
    }

    /// All locations in the index, sorted.
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Overlap window where every location has reportable data: the latest
    /// per-location first date paired with the earliest per-location last
    /// date. `None` for an empty index.
    pub fn date_bounds(&self) -> Option<(String, String)> {
        let mut min_date: Option<&str> = None;
        let mut max_date: Option<&str> = None;
        for positions in self.series.values() {
            let first = &self.records[*positions.first()?].date;
            let last = &self.records[*positions.last()?].date;
            min_date = Some(match min_date {
                Some(current) if current >= first.as_str() => current,
                _ => first,
            });
            max_date = Some(match max_date {
                Some(current) if current <= last.as_str() => current,
                _ => last,
            });
        }
        Some((min_date?.to_string(), max_date?.to_string()))
    }
}
