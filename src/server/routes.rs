use crate::query::QueryError;
use crate::server::api::{self, ApiError};
use crate::server::static_files;
use crate::server::ServerState;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }
}

pub fn route_request(method: &str, path: &str, body: &str, state: &ServerState) -> HttpResponse {
    if let Some(response) = static_files::try_serve_static(method, path) {
        return response;
    }

    let route = path.split('?').next().unwrap_or(path);
    match (method, route) {
        ("GET", "/") => HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "text/html; charset=utf-8",
            body: index_html(),
        },
        ("GET", "/api/health") => json_result(api::health_payload(state)),
        ("GET", "/api/snapshot") => json_result(api::snapshot_payload(state, path)),
        ("GET", "/api/series") => json_result(api::series_payload(state, path)),
        ("GET", "/api/map") => json_result(api::map_payload(state, path)),
        ("GET", "/api/bounds") => json_result(api::bounds_payload(state)),
        ("GET", "/api/metrics") => json_result(api::metrics_payload()),
        ("GET", "/api/selection") => json_result(api::selection_get_payload(state)),
        ("POST", "/api/selection/click") => json_result(api::selection_click_payload(state, body)),
        ("POST", "/api/selection/reset") => json_result(api::selection_reset_payload(state)),
        _ => error_response(404, "Not Found", &format!("No route for {method} {route}")),
    }
}

fn json_result(result: Result<String, ApiError>) -> HttpResponse {
    match result {
        Ok(payload) => HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body: payload,
        },
        Err(ApiError::Query(QueryError::UnknownMetric(key))) => {
            error_response(400, "Bad Request", &format!("unknown metric key: {key}"))
        }
        Err(ApiError::Query(QueryError::InvalidQuery(reason))) => {
            error_response(400, "Bad Request", &format!("invalid query: {reason}"))
        }
        Err(ApiError::BadRequest(message)) => error_response(400, "Bad Request", &message),
        Err(ApiError::Internal(message)) => {
            error_response(500, "Internal Server Error", &message)
        }
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}

fn index_html() -> String {
    r#"<!doctype html>
<html lang="pt-BR">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>Boletim API Console</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 900px; margin: 24px auto; padding: 0 12px; }
    h1 { margin-bottom: 8px; }
    .card { border: 1px solid #ddd; border-radius: 8px; padding: 14px; margin: 14px 0; }
    label { display:block; margin: 8px 0 4px; font-weight: 600; }
    input { width: 100%; padding: 8px; box-sizing: border-box; }
    button { margin-top: 12px; padding: 8px 14px; }
    pre { background: #111; color: #aef2ae; padding: 12px; overflow: auto; border-radius: 6px; min-height: 180px; }
  </style>
</head>
<body>
  <h1>Boletim Local API</h1>
  <p>Browser console for the COVID-19 bulletin query endpoints.</p>

  <div class="card">
    <strong>Health</strong>
    <div><button id="health-btn">GET /api/health</button></div>
  </div>

  <div class="card">
    <strong>Snapshot</strong>
    <label for="location">Location (BRASIL or a state code)</label>
    <input id="location" value="RJ" />
    <label for="date">Date (YYYY-MM-DD)</label>
    <input id="date" value="2020-05-13" />
    <div>
      <button id="snapshot-btn">GET /api/snapshot</button>
      <button id="map-btn">GET /api/map</button>
    </div>
  </div>

  <div class="card">
    <strong>Series</strong>
    <label for="metric">Metric wire key</label>
    <input id="metric" value="casosNovos" />
    <div><button id="series-btn">GET /api/series</button></div>
  </div>

  <div class="card">
    <strong>Selection</strong>
    <div>
      <button id="selection-btn">GET /api/selection</button>
      <button id="click-btn">POST /api/selection/click</button>
      <button id="reset-btn">POST /api/selection/reset</button>
    </div>
  </div>

  <pre id="output">Responses appear here.</pre>

  <script>
    const output = document.getElementById('output');
    const show = async (promise) => {
      try {
        const response = await promise;
        output.textContent = await response.text();
      } catch (err) {
        output.textContent = String(err);
      }
    };
    const value = (id) => encodeURIComponent(document.getElementById(id).value.trim());

    document.getElementById('health-btn').onclick = () => show(fetch('/api/health'));
    document.getElementById('snapshot-btn').onclick = () =>
      show(fetch(`/api/snapshot?location=${value('location')}&date=${value('date')}`));
    document.getElementById('map-btn').onclick = () => show(fetch(`/api/map?date=${value('date')}`));
    document.getElementById('series-btn').onclick = () =>
      show(fetch(`/api/series?location=${value('location')}&metric=${value('metric')}`));
    document.getElementById('selection-btn').onclick = () => show(fetch('/api/selection'));
    document.getElementById('click-btn').onclick = () =>
      show(fetch('/api/selection/click', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ location: document.getElementById('location').value.trim() })
      }));
    document.getElementById('reset-btn').onclick = () =>
      show(fetch('/api/selection/reset', { method: 'POST' }));
  </script>
</body>
</html>
"#
    .to_string()
}
