//! Row model for the daily bulletin tables and the six-counter metric set.
//! Wire keys match the Ministry of Health feed's column names; labels are the
//! Portuguese strings shown by the dashboard.

use serde::{Deserialize, Serialize};

/// Token for the whole-country aggregate. Lookups normalize to uppercase
/// before comparing against this.
pub const NATIONAL_TOKEN: &str = "BRASIL";

/// One row of a bulletin table: the six counters for one location on one date.
/// Absent counters mean "not yet reported", which is distinct from zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub location: String,
    /// ISO `YYYY-MM-DD`; lexicographic order is chronological order.
    pub date: String,
    pub cumulative_cases: Option<u64>,
    pub new_cases: Option<u64>,
    pub cumulative_deaths: Option<u64>,
    pub new_deaths: Option<u64>,
    pub new_recovered: Option<u64>,
    pub active_monitoring: Option<u64>,
}

impl CaseRecord {
    /// Value of one counter; `None` when unreported.
    pub fn metric(&self, key: MetricKey) -> Option<u64> {
        match key {
            MetricKey::CumulativeCases => self.cumulative_cases,
            MetricKey::NewCases => self.new_cases,
            MetricKey::CumulativeDeaths => self.cumulative_deaths,
            MetricKey::NewDeaths => self.new_deaths,
            MetricKey::NewRecovered => self.new_recovered,
            MetricKey::ActiveMonitoring => self.active_monitoring,
        }
    }
}

/// The enumerated counter set. Order here is the order `metric_keys()`
/// presents to the selector control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKey {
    CumulativeCases,
    NewCases,
    CumulativeDeaths,
    NewDeaths,
    NewRecovered,
    ActiveMonitoring,
}

pub const METRIC_KEYS: [MetricKey; 6] = [
    MetricKey::CumulativeCases,
    MetricKey::NewCases,
    MetricKey::CumulativeDeaths,
    MetricKey::NewDeaths,
    MetricKey::NewRecovered,
    MetricKey::ActiveMonitoring,
];

impl MetricKey {
    /// Wire key: the feed's column name, also used in query strings.
    pub fn wire_key(self) -> &'static str {
        match self {
            Self::CumulativeCases => "casosAcumulado",
            Self::NewCases => "casosNovos",
            Self::CumulativeDeaths => "obitosAcumulado",
            Self::NewDeaths => "obitosNovos",
            Self::NewRecovered => "Recuperadosnovos",
            Self::ActiveMonitoring => "emAcompanhamentoNovos",
        }
    }

    /// Label shown in the metric selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::CumulativeCases => "Casos Acumulados",
            Self::NewCases => "Novos Casos",
            Self::CumulativeDeaths => "Óbitos Totais",
            Self::NewDeaths => "Óbitos por dia",
            Self::NewRecovered => "Recuperados novos",
            Self::ActiveMonitoring => "Em acompanhamento",
        }
    }

    /// Resolve a wire key back to a metric, `None` for anything outside the set.
    pub fn from_wire_key(key: &str) -> Option<Self> {
        METRIC_KEYS.iter().copied().find(|m| m.wire_key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_keys_round_trip() {
        for key in METRIC_KEYS {
            assert_eq!(MetricKey::from_wire_key(key.wire_key()), Some(key));
        }
    }

    #[test]
    fn unknown_wire_key_is_none() {
        assert_eq!(MetricKey::from_wire_key("casosPorMil"), None);
    }

    #[test]
    fn metric_access_matches_fields() {
        let record = CaseRecord {
            location: "RJ".to_string(),
            date: "2020-05-13".to_string(),
            cumulative_cases: Some(10),
            new_cases: Some(2),
            cumulative_deaths: Some(1),
            new_deaths: None,
            new_recovered: None,
            active_monitoring: Some(7),
        };
        assert_eq!(record.metric(MetricKey::CumulativeCases), Some(10));
        assert_eq!(record.metric(MetricKey::NewDeaths), None);
        assert_eq!(record.metric(MetricKey::ActiveMonitoring), Some(7));
    }
}
