//! Video metadata resolution and caching.
//!
//! The resolver wraps a [`Prober`] backend and memoizes its results per
//! filename. Entries are never evicted or recomputed for the life of the
//! process; concurrent fills for the same key compute identical values, so
//! last-writer-wins is harmless.

pub mod probe;

pub use probe::{FfprobeProber, ProbeOutput, Prober};

use crate::error::Result;
use crate::library::VideoEntry;
use dashmap::DashMap;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Metadata for a single video, as served by `/api/video_info`.
#[derive(Debug, Clone, Serialize)]
pub struct VideoMetadata {
    pub filename: String,
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub duration: f64,
    pub frame_count: u64,
    pub mime_type: String,
}

/// Resolve a mime type from a file extension.
///
/// Covers the containers the scanner accepts; anything else degrades to
/// `application/octet-stream`.
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("mp4") | Some("m4v") => "video/mp4",
        Some("mkv") => "video/x-matroska",
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",
        Some("flv") => "video/x-flv",
        Some("wmv") => "video/x-ms-wmv",
        _ => "application/octet-stream",
    }
}

/// Cached, idempotent metadata resolver.
pub struct MetadataResolver {
    prober: Arc<dyn Prober>,
    cache: DashMap<String, VideoMetadata>,
}

impl MetadataResolver {
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self {
            prober,
            cache: DashMap::new(),
        }
    }

    /// Return metadata for an entry, probing on first access.
    ///
    /// Failures are not cached; the next call retries the probe.
    pub fn resolve(&self, entry: &VideoEntry) -> Result<VideoMetadata> {
        if let Some(hit) = self.cache.get(&entry.filename) {
            return Ok(hit.clone());
        }

        let raw = self.prober.extract(&entry.path)?;
        let duration = if raw.fps > 0.0 {
            raw.frame_count as f64 / raw.fps
        } else {
            0.0
        };

        let meta = VideoMetadata {
            filename: entry.filename.clone(),
            path: entry.path.display().to_string(),
            width: raw.width,
            height: raw.height,
            fps: raw.fps,
            duration,
            frame_count: raw.frame_count,
            mime_type: mime_type_for(&entry.path).to_string(),
        };

        self.cache.insert(entry.filename.clone(), meta.clone());
        Ok(meta)
    }

    /// Drop every cached entry. Called when the registry is re-initialized.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Eagerly probe every entry, returning per-item results so the caller
    /// can log failures and continue without aborting startup.
    pub fn precache(&self, entries: &[VideoEntry]) -> Vec<(String, Result<()>)> {
        entries
            .iter()
            .map(|e| (e.filename.clone(), self.resolve(e).map(|_| ())))
            .collect()
    }
}
