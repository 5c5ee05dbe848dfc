//! Crate-wide error type and its HTTP mapping.
//!
//! Route handlers return `Result<T, Error>` directly; the `IntoResponse`
//! impl turns failures into JSON error bodies with the right status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Common error type for roomcast.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested video was not found (unknown name, or the file
    /// vanished from disk after registration).
    #[error("video not found: {0}")]
    NotFound(String),

    /// Metadata extraction failed.
    #[error("metadata extraction failed: {0}")]
    Probe(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Probe error.
    pub fn probe<S: Into<String>>(msg: S) -> Self {
        Self::Probe(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status this error maps to.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
            Error::Probe(_) | Error::Io(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.http_status();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "request failed");
        } else {
            tracing::warn!(status = %status, error = %self, "request failed");
        }

        let code = match &self {
            Error::NotFound(_) => "not_found",
            Error::Probe(_) => "probe_error",
            Error::Io(_) => "io_error",
            Error::Internal(_) => "internal_error",
        };

        let body = json!({
            "error": self.to_string(),
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_produces_404() {
        let response = Error::not_found("ghost.mp4").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn probe_failure_produces_500() {
        let response = Error::probe("ffprobe exploded").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn io_not_found_maps_to_404() {
        let err = Error::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn error_display() {
        let err = Error::not_found("clip.mp4");
        assert_eq!(err.to_string(), "video not found: clip.mp4");

        let err = Error::internal("unexpected state");
        assert_eq!(err.to_string(), "internal error: unexpected state");
    }
}
