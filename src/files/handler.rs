//! Format handler trait for XMP block scanning
//!
//! This module defines the trait that all format handlers must implement,
//! together with the options that tune a scan.

use crate::core::error::{XmpError, XmpResult};
use crate::files::source::ByteSource;
use crate::types::ParseResult;
use std::io::{Read, Seek};

/// Default nesting limit for ISO boxes
pub const DEFAULT_MAX_BOX_DEPTH: usize = 8;

/// Default ceiling for a JPEG extended XMP allocation (64 MiB)
pub const DEFAULT_MAX_EXTENDED_XMP_LEN: u32 = 64 * 1024 * 1024;

/// Options for scanning a stream.
///
/// Use the builder pattern to configure options.
///
/// # Example
///
/// ```rust
/// use xmpblock::ScanOptions;
///
/// let options = ScanOptions::default()
///     .without_packet_scanning()
///     .max_box_depth(4);
/// assert!(!options.use_packet_scanning);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanOptions {
    /// Fall back to scanning for xpacket wrappers when no container matches
    pub use_packet_scanning: bool,
    /// Collect every wrapped packet during packet scanning instead of the first
    pub all_packets: bool,
    /// Deepest ISO box nesting the box walker will descend into
    pub max_box_depth: usize,
    /// Largest JPEG extended XMP total length that will be allocated
    pub max_extended_xmp_len: u32,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            use_packet_scanning: true,
            all_packets: false,
            max_box_depth: DEFAULT_MAX_BOX_DEPTH,
            max_extended_xmp_len: DEFAULT_MAX_EXTENDED_XMP_LEN,
        }
    }
}

impl ScanOptions {
    /// Do not fall back to packet scanning.
    ///
    /// Streams in an unrecognized container then yield an empty result.
    pub fn without_packet_scanning(mut self) -> Self {
        self.use_packet_scanning = false;
        self
    }

    /// Keep packet scanning past the first wrapped packet.
    pub fn all_packets(mut self) -> Self {
        self.all_packets = true;
        self
    }

    /// Limit ISO box nesting.
    pub fn max_box_depth(mut self, depth: usize) -> Self {
        self.max_box_depth = depth;
        self
    }

    /// Limit the size of a reassembled JPEG extended XMP packet.
    pub fn max_extended_xmp_len(mut self, len: u32) -> Self {
        self.max_extended_xmp_len = len;
        self
    }

    /// Reject option combinations that cannot work
    pub fn validate(&self) -> XmpResult<()> {
        if self.max_box_depth == 0 {
            return Err(XmpError::BadParam(
                "max_box_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Trait for format handlers
///
/// Each handler (PNG, GIF, JPEG, ...) attempts to parse the whole stream from
/// offset zero.
pub trait FormatHandler: Send + Sync {
    /// Parse the stream as this handler's format
    ///
    /// # Arguments
    ///
    /// * `source` - Byte source positioned at offset zero, big-endian
    /// * `options` - Options controlling the scan
    ///
    /// # Returns
    ///
    /// * `Ok(ParseResult)` if the stream is in this format
    /// * `Err(XmpError::FormatMismatch | XmpError::BadValue)` if it is not
    /// * `Err(XmpError::IoError)` if the stream could not be read
    fn scan<R: Read + Seek>(
        &self,
        source: &mut ByteSource<'_, R>,
        options: &ScanOptions,
    ) -> XmpResult<ParseResult>;

    /// Get the name of the format this handler recognizes
    ///
    /// # Returns
    ///
    /// A static string describing the format (e.g., "JPEG", "PNG", "TIFF")
    fn format_name(&self) -> &'static str;
}
