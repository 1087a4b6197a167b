//! CSV ingestion for the two bulletin tables (regional per-state rows,
//! national whole-country rows). Columns beyond the ones mapped here are
//! ignored, so the tables can carry the full feed schema.

use std::fs::File;
use std::io;
use std::path::Path;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::data::record::{CaseRecord, NATIONAL_TOKEN};

/// Which of the two sources a table was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSource {
    /// One implicit location, the whole country.
    National,
    /// One row per (state code, date).
    Regional,
}

/// Immutable in-memory copy of one source table, in file order.
#[derive(Debug, Clone)]
pub struct RecordTable {
    pub source: TableSource,
    pub records: Vec<CaseRecord>,
}

/// Raw CSV row. The feed writes counters as integers, but rows that went
/// through a dataframe round trip carry a `.0` suffix on nullable columns,
/// so parsing tolerates both.
#[derive(Debug, Deserialize)]
struct BulletinRow {
    #[serde(default)]
    estado: Option<String>,
    data: String,
    #[serde(default, deserialize_with = "count_field")]
    #[serde(rename = "casosAcumulado")]
    cumulative_cases: Option<u64>,
    #[serde(default, deserialize_with = "count_field")]
    #[serde(rename = "casosNovos")]
    new_cases: Option<u64>,
    #[serde(default, deserialize_with = "count_field")]
    #[serde(rename = "obitosAcumulado")]
    cumulative_deaths: Option<u64>,
    #[serde(default, deserialize_with = "count_field")]
    #[serde(rename = "obitosNovos")]
    new_deaths: Option<u64>,
    #[serde(default, deserialize_with = "count_field")]
    #[serde(rename = "Recuperadosnovos")]
    new_recovered: Option<u64>,
    #[serde(default, deserialize_with = "count_field")]
    #[serde(rename = "emAcompanhamentoNovos")]
    active_monitoring: Option<u64>,
}

/// Parse a nullable counter cell: blank means unreported, `"123"` and
/// `"123.0"` both mean 123. Negative or fractional values are rejected.
fn count_field<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else { return Ok(None) };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(value) = trimmed.parse::<u64>() {
        return Ok(Some(value));
    }
    let as_float: f64 = trimmed
        .parse()
        .map_err(|_| D::Error::custom(format!("not a counter value: {trimmed:?}")))?;
    if as_float < 0.0 || as_float.fract() != 0.0 {
        return Err(D::Error::custom(format!(
            "counter must be a non-negative integer, got {trimmed:?}"
        )));
    }
    Ok(Some(as_float as u64))
}

impl RecordTable {
    /// Read a table from any CSV reader. Regional rows without a state code
    /// are rejected; national rows always map to the national token.
    pub fn from_reader<R: io::Read>(source: TableSource, reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();
        for row in csv_reader.deserialize() {
            let row: BulletinRow = row?;
            let location = match source {
                TableSource::National => NATIONAL_TOKEN.to_string(),
                TableSource::Regional => match row.estado {
                    Some(code) if !code.trim().is_empty() => code.trim().to_uppercase(),
                    _ => {
                        return Err(csv::Error::from(io::Error::new(
                            io::ErrorKind::InvalidData,
                            format!("regional row for {} has no state code", row.data),
                        )))
                    }
                },
            };
            records.push(CaseRecord {
                location,
                date: row.data,
                cumulative_cases: row.cumulative_cases,
                new_cases: row.new_cases,
                cumulative_deaths: row.cumulative_deaths,
                new_deaths: row.new_deaths,
                new_recovered: row.new_recovered,
                active_monitoring: row.active_monitoring,
            });
        }
        Ok(RecordTable { source, records })
    }

    pub fn from_path(source: TableSource, path: &Path) -> Result<Self, csv::Error> {
        let file = File::open(path)?;
        Self::from_reader(source, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGIONAL_CSV: &str = "\
regiao,estado,data,casosAcumulado,casosNovos,obitosAcumulado,obitosNovos,Recuperadosnovos,emAcompanhamentoNovos
Sudeste,RJ,2020-05-12,100,10,8,1,,
Sudeste,RJ,2020-05-13,110.0,10,9,1,,
Sudeste,SP,2020-05-13,500,50,40,4,,
";

    #[test]
    fn regional_rows_keep_state_codes() {
        let table =
            RecordTable::from_reader(TableSource::Regional, REGIONAL_CSV.as_bytes()).unwrap();
        assert_eq!(table.records.len(), 3);
        assert_eq!(table.records[0].location, "RJ");
        assert_eq!(table.records[2].location, "SP");
        assert_eq!(table.records[1].cumulative_cases, Some(110));
        assert_eq!(table.records[0].new_recovered, None);
    }

    #[test]
    fn national_rows_map_to_national_token() {
        let csv = "\
regiao,estado,data,casosAcumulado,casosNovos,obitosAcumulado,obitosNovos,Recuperadosnovos,emAcompanhamentoNovos
Brasil,,2020-05-13,190000,9000,13000,700,72597.0,104205.0
";
        let table = RecordTable::from_reader(TableSource::National, csv.as_bytes()).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].location, "BRASIL");
        assert_eq!(table.records[0].new_recovered, Some(72597));
        assert_eq!(table.records[0].active_monitoring, Some(104205));
    }

    #[test]
    fn regional_row_without_state_code_is_rejected() {
        let csv = "\
regiao,estado,data,casosAcumulado,casosNovos,obitosAcumulado,obitosNovos,Recuperadosnovos,emAcompanhamentoNovos
Sudeste,,2020-05-13,1,1,0,0,,
";
        let result = RecordTable::from_reader(TableSource::Regional, csv.as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn negative_counter_is_rejected() {
        let csv = "\
regiao,estado,data,casosAcumulado,casosNovos,obitosAcumulado,obitosNovos,Recuperadosnovos,emAcompanhamentoNovos
Sudeste,RJ,2020-05-13,100,-3,8,1,,
";
        let result = RecordTable::from_reader(TableSource::Regional, csv.as_bytes());
        assert!(result.is_err());
    }
}
