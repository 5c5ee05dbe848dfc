//! Video registry: the ordered set of files the server knows about.
//!
//! The registry is populated once at startup from a directory scan and read
//! concurrently by request handlers. [`VideoLibrary::initialize`] swaps in a
//! whole new immutable snapshot, so lookups never observe a half-replaced
//! registry and no lock is held across awaits.

pub mod scan;

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// A single video known to the server.
#[derive(Debug, Clone)]
pub struct VideoEntry {
    /// Basename used as the lookup key. Treated as an opaque string,
    /// never interpreted as a filesystem path.
    pub filename: String,
    /// Absolute path on disk, immutable once set.
    pub path: PathBuf,
}

#[derive(Default)]
struct Snapshot {
    entries: Vec<VideoEntry>,
    by_name: HashMap<String, usize>,
}

/// In-memory registry of available videos.
#[derive(Default)]
pub struct VideoLibrary {
    snapshot: RwLock<Arc<Snapshot>>,
}

impl VideoLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the registry contents atomically. Entry order is preserved
    /// for the gallery; the first entry wins when filenames collide.
    pub fn initialize(&self, entries: Vec<VideoEntry>) {
        let mut by_name = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if by_name.contains_key(&entry.filename) {
                tracing::warn!(filename = %entry.filename, "duplicate filename, keeping first");
                continue;
            }
            by_name.insert(entry.filename.clone(), i);
        }

        let snapshot = Arc::new(Snapshot { entries, by_name });
        *self.snapshot.write() = snapshot;
    }

    /// Exact-match lookup by filename.
    pub fn lookup(&self, filename: &str) -> Option<VideoEntry> {
        let snapshot = self.snapshot.read().clone();
        snapshot
            .by_name
            .get(filename)
            .map(|&i| snapshot.entries[i].clone())
    }

    /// Filenames in registration order.
    pub fn filenames(&self) -> Vec<String> {
        let snapshot = self.snapshot.read().clone();
        snapshot.entries.iter().map(|e| e.filename.clone()).collect()
    }

    /// All entries in registration order.
    pub fn entries(&self) -> Vec<VideoEntry> {
        let snapshot = self.snapshot.read().clone();
        snapshot.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
