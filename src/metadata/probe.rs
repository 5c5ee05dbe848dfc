//! ffprobe-backed metadata extraction.
//!
//! Shells out to `ffprobe -v quiet -print_format json -show_format -show_streams`
//! and maps the JSON output into a [`ProbeOutput`].

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Raw numbers pulled from a video's primary stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeOutput {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub frame_count: u64,
}

/// Extraction backend for video metadata.
pub trait Prober: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, path: &Path) -> Result<ProbeOutput>;
}

/// A prober backed by the `ffprobe` CLI.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ffprobe_path: PathBuf,
}

impl FfprobeProber {
    /// Create a new prober using the given ffprobe path.
    pub fn new(ffprobe_path: PathBuf) -> Self {
        Self { ffprobe_path }
    }

    /// Create a prober that finds ffprobe on `PATH`.
    pub fn from_path() -> Option<Self> {
        which::which("ffprobe")
            .ok()
            .map(|p| Self { ffprobe_path: p })
    }
}

impl Prober for FfprobeProber {
    fn name(&self) -> &'static str {
        "ffprobe"
    }

    fn extract(&self, path: &Path) -> Result<ProbeOutput> {
        if !path.exists() {
            return Err(Error::not_found(format!(
                "no such file: {}",
                path.display()
            )));
        }

        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v", "quiet",
                "-print_format", "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .map_err(|e| Error::probe(format!("failed to run ffprobe: {e}")))?;

        if !output.status.success() {
            return Err(Error::probe(format!(
                "ffprobe exited with {} for {}",
                output.status,
                path.display()
            )));
        }

        let ff: FfprobeOutput = serde_json::from_slice(&output.stdout)
            .map_err(|e| Error::probe(format!("ffprobe JSON parse error: {e}")))?;

        parse_probe_output(ff)
    }
}

// ---------------------------------------------------------------------------
// JSON structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    nb_frames: Option<String>,
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

fn parse_probe_output(output: FfprobeOutput) -> Result<ProbeOutput> {
    let stream = output
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| Error::probe("no video stream found"))?;

    let fps = stream
        .r_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .unwrap_or(0.0);

    // Containers without a per-stream frame count (MKV) get an estimate
    // from the container duration instead. No count and no usable fps is a
    // degraded-but-valid result, not an error.
    let frame_count = stream
        .nb_frames
        .as_deref()
        .and_then(|s| s.parse::<u64>().ok())
        .or_else(|| {
            let duration = output.format.duration.as_deref()?.parse::<f64>().ok()?;
            if fps > 0.0 {
                Some((duration * fps).round() as u64)
            } else {
                None
            }
        })
        .unwrap_or(0);

    Ok(ProbeOutput {
        width: stream.width.unwrap_or(0),
        height: stream.height.unwrap_or(0),
        fps,
        frame_count,
    })
}

/// Parse ffprobe's fractional frame rate ("24000/1001") or a plain number.
fn parse_frame_rate(rate_str: &str) -> Option<f64> {
    let parts: Vec<&str> = rate_str.split('/').collect();
    if parts.len() == 2 {
        let num: f64 = parts[0].parse().ok()?;
        let den: f64 = parts[1].parse().ok()?;
        if den != 0.0 {
            return Some(num / den);
        }
        return None;
    }
    rate_str.parse().ok()
}
