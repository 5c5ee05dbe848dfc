//! Route handlers for the gallery, streaming, and metadata API.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;

use crate::error::{Error, Result};
use crate::metadata::{mime_type_for, VideoMetadata};
use crate::server::AppContext;
use crate::streaming;

pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Gallery page listing every registered video.
pub async fn index(State(ctx): State<AppContext>) -> Html<String> {
    let filenames = ctx.library.filenames();
    if filenames.is_empty() {
        tracing::warn!("index requested but no videos are registered");
        return Html(render_empty_page());
    }

    tracing::debug!(count = filenames.len(), "serving gallery page");
    Html(render_gallery(&filenames, &ctx.advertised_ip))
}

/// Stream a video with byte-range support.
pub async fn stream_video(
    State(ctx): State<AppContext>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    let entry = ctx
        .library
        .lookup(&filename)
        .ok_or_else(|| Error::not_found(filename.clone()))?;

    let range = headers.get(header::RANGE).and_then(|h| h.to_str().ok());
    tracing::debug!(filename = %entry.filename, range = ?range, "stream request");

    streaming::stream_file(&entry.path, mime_type_for(&entry.path), range).await
}

/// Return metadata for a video as JSON.
pub async fn video_info(
    State(ctx): State<AppContext>,
    Path(filename): Path<String>,
) -> Result<Json<VideoMetadata>> {
    let entry = ctx
        .library
        .lookup(&filename)
        .ok_or_else(|| Error::not_found(filename.clone()))?;

    // Probing shells out to ffprobe on a cache miss; keep it off the
    // async workers.
    let resolver = ctx.resolver.clone();
    let meta = tokio::task::spawn_blocking(move || resolver.resolve(&entry))
        .await
        .map_err(|e| Error::internal(format!("metadata task failed: {e}")))??;

    Ok(Json(meta))
}

fn render_empty_page() -> String {
    page(
        "<p class=\"empty\">No video directory has been loaded by the server.</p>".to_string(),
    )
}

fn render_gallery(filenames: &[String], server_ip: &str) -> String {
    let mut items = String::new();
    for name in filenames {
        let escaped = escape_html(name);
        items.push_str(&format!(
            "      <li>\n        <p class=\"name\">{escaped}</p>\n        <video controls preload=\"metadata\" src=\"/stream/{escaped}\"></video>\n        <p class=\"links\"><a href=\"/stream/{escaped}\">stream</a> | <a href=\"/api/video_info/{escaped}\">info</a></p>\n      </li>\n"
        ));
    }

    page(format!(
        "<p class=\"hint\">Serving from {server_ip} — open this page on any device on the network.</p>\n    <ul class=\"gallery\">\n{items}    </ul>"
    ))
}

fn page(body: String) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>roomcast</title>
    <style>
      body {{ font-family: sans-serif; background: #111; color: #eee; margin: 2rem; }}
      a {{ color: #7bd; }}
      ul.gallery {{ list-style: none; padding: 0; }}
      ul.gallery li {{ margin-bottom: 2rem; }}
      video {{ max-width: 100%; width: 480px; background: #000; }}
      .name {{ font-weight: bold; }}
      .hint, .empty {{ color: #999; }}
    </style>
  </head>
  <body>
    <h1>roomcast</h1>
    {body}
  </body>
</html>
"#
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
