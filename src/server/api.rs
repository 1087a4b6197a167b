//! JSON payload builders behind the API routes. Each builder reads the
//! registry (and the selection where relevant) and returns a serialized body
//! or an `ApiError` the router maps to a status code.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::query::{self, QueryError};
use crate::selection::{Trigger, UpdateCycle};
use crate::server::ServerState;

#[derive(Debug)]
pub enum ApiError {
    Query(QueryError),
    BadRequest(String),
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query(err) => write!(f, "{err}"),
            Self::BadRequest(msg) => write!(f, "{msg}"),
            Self::Internal(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::Query(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Pull one required parameter out of a path's query string. No percent
/// decoding: location codes, ISO dates and wire metric keys never need it.
fn required_param(path: &str, name: &str) -> Result<String, ApiError> {
    let query = path.split_once('?').map(|(_, q)| q).unwrap_or("");
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("missing query parameter: {name}")))
}

pub fn health_payload(state: &ServerState) -> Result<String, ApiError> {
    let body = json!({
        "status": "ok",
        "national_records": state.registry.national().len(),
        "regional_records": state.registry.regional().len(),
    });
    Ok(serde_json::to_string_pretty(&body)?)
}

/// GET /api/snapshot?location=..&date=..
pub fn snapshot_payload(state: &ServerState, path: &str) -> Result<String, ApiError> {
    let location = required_param(path, "location")?;
    let date = required_param(path, "date")?;
    let counters = query::snapshot(&state.registry, &location, &date)?;
    Ok(serde_json::to_string_pretty(&counters)?)
}

/// GET /api/series?location=..&metric=..
pub fn series_payload(state: &ServerState, path: &str) -> Result<String, ApiError> {
    let location = required_param(path, "location")?;
    let metric = query::parse_metric(&required_param(path, "metric")?)?;
    let points = query::line_series(&state.registry, &location, metric)?;
    let body = json!({
        "location": location.trim().to_uppercase(),
        "metric": metric.wire_key(),
        "points": points,
    });
    Ok(serde_json::to_string_pretty(&body)?)
}

/// GET /api/map?date=.. — one entry per region, null where unreported.
pub fn map_payload(state: &ServerState, path: &str) -> Result<String, ApiError> {
    let date = required_param(path, "date")?;
    let regions = query::map_snapshot(&state.registry, &date)?;
    let body = json!({
        "date": date,
        "regions": regions,
    });
    Ok(serde_json::to_string_pretty(&body)?)
}

pub fn bounds_payload(state: &ServerState) -> Result<String, ApiError> {
    let bounds = query::date_bounds(&state.registry);
    let body = match bounds {
        Some((min_date, max_date)) => json!({ "min_date": min_date, "max_date": max_date }),
        None => json!({ "min_date": null, "max_date": null }),
    };
    Ok(serde_json::to_string_pretty(&body)?)
}

#[derive(Debug, Serialize)]
struct MetricOption {
    key: &'static str,
    label: &'static str,
}

pub fn metrics_payload() -> Result<String, ApiError> {
    let options: Vec<MetricOption> = query::metric_keys()
        .into_iter()
        .map(|(key, label)| MetricOption { key, label })
        .collect();
    Ok(serde_json::to_string_pretty(&options)?)
}

#[derive(Debug, Deserialize)]
struct ClickBody {
    location: String,
}

pub fn selection_get_payload(state: &ServerState) -> Result<String, ApiError> {
    let selection = lock_selection(state)?;
    Ok(selected_body(selection.current_selection()))
}

/// POST /api/selection/click with `{"location": "RJ"}`.
pub fn selection_click_payload(state: &ServerState, body: &str) -> Result<String, ApiError> {
    let click: ClickBody = serde_json::from_str(body)
        .map_err(|err| ApiError::BadRequest(format!("invalid click body: {err}")))?;
    if click.location.trim().is_empty() {
        return Err(ApiError::BadRequest("click body has an empty location".to_string()));
    }
    let mut selection = lock_selection(state)?;
    let selected = selection.apply(UpdateCycle {
        trigger: Some(Trigger::MapClick),
        click_payload: Some(click.location),
    });
    Ok(selected_body(selected))
}

pub fn selection_reset_payload(state: &ServerState) -> Result<String, ApiError> {
    let mut selection = lock_selection(state)?;
    let selected = selection.on_reset_requested();
    Ok(selected_body(selected))
}

fn lock_selection(
    state: &ServerState,
) -> Result<std::sync::MutexGuard<'_, crate::selection::SelectionState>, ApiError> {
    state
        .selection
        .lock()
        .map_err(|err| ApiError::Internal(format!("selection lock poisoned: {err}")))
}

fn selected_body(selected: &str) -> String {
    serde_json::to_string_pretty(&json!({ "selected": selected }))
        .unwrap_or_else(|_| format!("{{\"selected\": \"{selected}\"}}"))
}
