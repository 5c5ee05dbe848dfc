//! Directory scanning and gallery ordering.
//!
//! Scans one level of a directory for video files and sorts them with a
//! natural (numeric-aware) ordering, so `clip2.mp4` lists before
//! `clip10.mp4`.

use crate::error::{Error, Result};
use crate::library::VideoEntry;
use std::cmp::Ordering;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// File extensions served as video.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "flv", "wmv", "webm"];

/// Check if a path has a video file extension.
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Scan a directory for video files, sorted naturally by filename.
///
/// Only the top level is scanned; subdirectories are not descended into.
/// Files that disappear mid-scan are skipped with a warning.
pub fn scan_directory(dir: &Path) -> Result<Vec<VideoEntry>> {
    if !dir.is_dir() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("not a directory: {}", dir.display()),
        )));
    }

    debug!(dir = %dir.display(), "scanning for video files");

    let mut found = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !is_video_file(path) {
            continue;
        }

        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            warn!(path = %path.display(), "skipping file with non-UTF-8 name");
            continue;
        };

        let abs_path = match path.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unresolvable file");
                continue;
            }
        };

        found.push(VideoEntry {
            filename: filename.to_string(),
            path: abs_path,
        });
    }

    found.sort_by(|a, b| natural_cmp(&a.filename, &b.filename));
    Ok(found)
}

/// Compare two filenames naturally: digit runs compare as numbers, text runs
/// compare case-insensitively.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortToken {
    Number(u128),
    Text(String),
}

fn natural_key(s: &str) -> Vec<SortToken> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut current_is_digit = false;

    for c in s.chars() {
        let is_digit = c.is_ascii_digit();
        if !current.is_empty() && is_digit != current_is_digit {
            tokens.push(make_token(&current, current_is_digit));
            current.clear();
        }
        current.push(c);
        current_is_digit = is_digit;
    }
    if !current.is_empty() {
        tokens.push(make_token(&current, current_is_digit));
    }
    tokens
}

fn make_token(run: &str, is_digit: bool) -> SortToken {
    if is_digit {
        // Runs too long to fit a u128 cannot be sensible numbering anyway.
        match run.parse::<u128>() {
            Ok(n) => SortToken::Number(n),
            Err(_) => SortToken::Text(run.to_string()),
        }
    } else {
        SortToken::Text(run.to_lowercase())
    }
}
