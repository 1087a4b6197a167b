//! Static passthrough for a built dashboard frontend. The map and chart
//! widgets live in `frontend/dist`; when that directory is absent every
//! non-API GET falls back to the inline console.

use std::fs;
use std::path::PathBuf;

use super::routes::HttpResponse;

/// Serve a file from the frontend bundle, or None when the request should
/// fall through to the API router and inline console.
pub fn try_serve_static(method: &str, path: &str) -> Option<HttpResponse> {
    if method != "GET" || path.starts_with("/api") {
        return None;
    }

    let relative = path.split('?').next().unwrap_or(path).trim_start_matches('/');
    // "/" stays on the inline console; traversal never leaves the bundle.
    if relative.is_empty() || relative.contains("..") {
        return None;
    }

    let dist = dist_dir()?;
    let candidate = dist.join(relative);
    let file_path = if candidate.is_file() && candidate.starts_with(&dist) {
        candidate
    } else {
        // SPA fallback: unknown paths get the app shell.
        let index = dist.join("index.html");
        if !index.is_file() {
            return None;
        }
        index
    };

    let content_type = content_type_for(&file_path);
    let body = fs::read_to_string(&file_path).ok()?;
    Some(HttpResponse {
        status_code: 200,
        status_text: "OK",
        content_type,
        body,
    })
}

fn dist_dir() -> Option<PathBuf> {
    std::env::current_dir().ok()?.join("frontend/dist").canonicalize().ok()
}

fn content_type_for(path: &std::path::Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("svg") => "image/svg+xml",
        _ => "text/plain; charset=utf-8",
    }
}
