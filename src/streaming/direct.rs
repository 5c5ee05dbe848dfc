//! Direct file streaming with HTTP range support.
//!
//! Turns a file on disk plus a parsed [`RangeParse`] into the right
//! 200/206/416 response. Bodies are read lazily in 64 KiB chunks and pulled
//! by the transport, so a disconnected client stops the reads. A read error
//! mid-stream aborts the response instead of silently truncating it.

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::Response;
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use crate::error::{Error, Result};
use crate::streaming::range::{parse_range, ByteRange, RangeParse};

/// Read size for streaming bodies.
const CHUNK_SIZE: usize = 64 * 1024;

/// Serve `path` honoring an optional raw `Range` header value.
///
/// The file must exist and be statable; otherwise this fails with
/// `NotFound` before any range logic runs.
pub async fn stream_file(
    path: &Path,
    content_type: &str,
    range_header: Option<&str>,
) -> Result<Response> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|_| Error::not_found(format!("file missing on disk: {}", path.display())))?;
    let size = metadata.len();

    let parsed = parse_range(range_header, size);
    if parsed == RangeParse::Malformed {
        tracing::warn!(header = ?range_header, "malformed Range header, serving full file");
    }

    respond(path, content_type, size, parsed).await
}

/// Build the response for an already-parsed range.
pub async fn respond(
    path: &Path,
    content_type: &str,
    size: u64,
    parsed: RangeParse,
) -> Result<Response> {
    match parsed {
        RangeParse::NoRange | RangeParse::Malformed => {
            full_response(path, content_type, size).await
        }
        RangeParse::Satisfiable(range) => partial_response(path, content_type, size, range).await,
        RangeParse::Unsatisfiable => {
            tracing::warn!(size, "unsatisfiable Range header");
            Response::builder()
                .status(StatusCode::RANGE_NOT_SATISFIABLE)
                .header(header::CONTENT_RANGE, format!("bytes */{size}"))
                .body(Body::empty())
                .map_err(|e| Error::internal(e.to_string()))
        }
    }
}

async fn full_response(path: &Path, content_type: &str, size: u64) -> Result<Response> {
    let file = open_file(path).await?;
    let stream = ReaderStream::with_capacity(file, CHUNK_SIZE);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, size.to_string())
        .header(header::ACCEPT_RANGES, "bytes")
        .body(Body::from_stream(stream))
        .map_err(|e| Error::internal(e.to_string()))
}

async fn partial_response(
    path: &Path,
    content_type: &str,
    size: u64,
    range: ByteRange,
) -> Result<Response> {
    let length = range.len();

    let mut file = open_file(path).await?;
    file.seek(SeekFrom::Start(range.start)).await?;

    let stream = ReaderStream::with_capacity(file.take(length), CHUNK_SIZE);

    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, length.to_string())
        .header(
            header::CONTENT_RANGE,
            format!("bytes {}-{}/{}", range.start, range.end, size),
        )
        .header(header::ACCEPT_RANGES, "bytes")
        .body(Body::from_stream(stream))
        .map_err(|e| Error::internal(e.to_string()))
}

async fn open_file(path: &Path) -> Result<File> {
    // The file can vanish between stat and open; that is still a 404.
    File::open(path)
        .await
        .map_err(|_| Error::not_found(format!("file missing on disk: {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    fn header_str<'a>(response: &'a Response, name: &str) -> &'a str {
        response.headers().get(name).unwrap().to_str().unwrap()
    }

    fn fixture(contents: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    fn patterned(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[tokio::test]
    async fn no_range_serves_whole_file() {
        let data = patterned(1000);
        let (_dir, path) = fixture(&data);

        let response = stream_file(&path, "video/mp4", None).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_str(&response, "content-type"), "video/mp4");
        assert_eq!(header_str(&response, "content-length"), "1000");
        assert_eq!(header_str(&response, "accept-ranges"), "bytes");
        assert_eq!(body_bytes(response).await, data);
    }

    #[tokio::test]
    async fn exact_range_serves_partial_content() {
        let data = patterned(1000);
        let (_dir, path) = fixture(&data);

        let response = stream_file(&path, "video/mp4", Some("bytes=100-199"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(header_str(&response, "content-length"), "100");
        assert_eq!(header_str(&response, "content-range"), "bytes 100-199/1000");
        assert_eq!(body_bytes(response).await, &data[100..200]);
    }

    #[tokio::test]
    async fn open_range_matches_explicit_tail() {
        let data = patterned(1000);
        let (_dir, path) = fixture(&data);

        let open = stream_file(&path, "video/mp4", Some("bytes=900-"))
            .await
            .unwrap();
        let explicit = stream_file(&path, "video/mp4", Some("bytes=900-999"))
            .await
            .unwrap();

        assert_eq!(open.status(), explicit.status());
        assert_eq!(
            header_str(&open, "content-range"),
            header_str(&explicit, "content-range")
        );
        assert_eq!(header_str(&open, "content-range"), "bytes 900-999/1000");
        assert_eq!(header_str(&open, "content-length"), "100");
        assert_eq!(body_bytes(open).await, body_bytes(explicit).await);
    }

    #[tokio::test]
    async fn unsatisfiable_range_is_416_with_empty_body() {
        let (_dir, path) = fixture(&patterned(1000));

        let response = stream_file(&path, "video/mp4", Some("bytes=1000-1010"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(header_str(&response, "content-range"), "bytes */1000");
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn malformed_range_serves_whole_file() {
        let data = patterned(500);
        let (_dir, path) = fixture(&data);

        let response = stream_file(&path, "video/mp4", Some("bytes=abc"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, data);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let err = stream_file(Path::new("/no/such/clip.mp4"), "video/mp4", None)
            .await
            .unwrap_err();
        assert_matches!(err, Error::NotFound(_));
    }

    #[tokio::test]
    async fn single_byte_range() {
        let data = patterned(10);
        let (_dir, path) = fixture(&data);

        let response = stream_file(&path, "video/mp4", Some("bytes=9-9"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(header_str(&response, "content-range"), "bytes 9-9/10");
        assert_eq!(body_bytes(response).await, &data[9..10]);
    }
}
