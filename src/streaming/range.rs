//! HTTP `Range` header parsing.
//!
//! Only single ranges of the form `bytes=<start>-<end?>` are understood.
//! The open form `bytes=K-` means "from K to end of file", not the RFC 7233
//! suffix form, and a header that fails to parse at all degrades to a
//! full-file response instead of a 400.

use regex::Regex;
use std::sync::OnceLock;

/// Inclusive byte interval within a file of known size.
///
/// Invariant: `start <= end < size` of the file it was parsed against.
/// Only the parser constructs these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes the range covers.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Outcome of parsing an optional `Range` header against a file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeParse {
    /// No header was sent; serve the whole file.
    NoRange,
    /// Header present but not `bytes=<digits>-<digits?>`; served leniently
    /// as a full-file response rather than rejected.
    Malformed,
    /// A valid single range.
    Satisfiable(ByteRange),
    /// Range falls outside the file; respond 416.
    Unsatisfiable,
}

static RANGE_RE: OnceLock<Regex> = OnceLock::new();

fn range_re() -> &'static Regex {
    RANGE_RE.get_or_init(|| Regex::new(r"bytes=(\d+)-(\d*)").expect("static regex"))
}

/// Parse a raw `Range` header value against the target file's size.
///
/// Multi-range headers are not parsed specially; `bytes=0-10,20-30` matches
/// its first range and the rest is ignored.
pub fn parse_range(header: Option<&str>, size: u64) -> RangeParse {
    let Some(header) = header else {
        return RangeParse::NoRange;
    };

    let Some(caps) = range_re().captures(header) else {
        return RangeParse::Malformed;
    };

    // Digit runs too long for u64 cannot address a real file.
    let Ok(start) = caps[1].parse::<u64>() else {
        return RangeParse::Unsatisfiable;
    };

    let end = if caps[2].is_empty() {
        // Open-ended: serve through end of file.
        size.saturating_sub(1)
    } else {
        match caps[2].parse::<u64>() {
            Ok(end) => end,
            Err(_) => return RangeParse::Unsatisfiable,
        }
    };

    if start >= size || end >= size || start > end {
        return RangeParse::Unsatisfiable;
    }

    RangeParse::Satisfiable(ByteRange { start, end })
}
