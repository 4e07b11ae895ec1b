//! Embedded browser UI
//!
//! The two views (Home and Real AI Agents) plus their scripts and styles are
//! compiled into the binary from the `web/` folder.

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "web/"]
struct WebAssets;

/// Serve a specific file from embedded assets
fn serve_file(path: &str) -> Option<Response> {
    let file = WebAssets::get(path)?;

    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string();

    let cache_control = if path.ends_with(".html") {
        "no-cache"
    } else {
        "public, max-age=3600"
    };

    Some(
        (
            [
                (header::CONTENT_TYPE, mime_type),
                (header::CACHE_CONTROL, cache_control.to_string()),
            ],
            file.data.into_owned(),
        )
            .into_response(),
    )
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

/// Home view: mock simulation UI
pub async fn index() -> Response {
    serve_file("index.html").unwrap_or_else(not_found)
}

/// Real AI Agents view
pub async fn real_agents() -> Response {
    serve_file("real-agents.html").unwrap_or_else(not_found)
}

/// Scripts and stylesheets under `/static/`
pub async fn static_file(Path(path): Path<String>) -> Response {
    let path = path.trim_start_matches('/');
    if path.contains("..") {
        return not_found();
    }
    serve_file(&format!("static/{}", path)).unwrap_or_else(not_found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assets_are_embedded() {
        assert!(WebAssets::get("index.html").is_some());
        assert!(WebAssets::get("real-agents.html").is_some());
        assert!(WebAssets::get("static/app.css").is_some());
    }

    #[test]
    fn test_mime_types() {
        let response = serve_file("static/app.css").unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
        assert!(serve_file("static/missing.js").is_none());
    }
}
