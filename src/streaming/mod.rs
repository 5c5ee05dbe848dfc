//! Byte-range streaming: header parsing and response production.
//!
//! The range parser turns a raw `Range` header into a validated byte
//! interval; the direct module turns a file plus that interval into a
//! 200/206/416 response with a lazily-read chunked body.

pub mod direct;
pub mod range;

pub use direct::stream_file;
pub use range::{parse_range, ByteRange, RangeParse};
