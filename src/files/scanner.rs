//! XMP scanning API
//!
//! This module provides the high-level entry point: hand it a stream, a byte
//! slice or a path and get back the detected format, the pixel dimensions and
//! every embedded XMP packet.

use crate::core::error::XmpResult;
use crate::files::handler::ScanOptions;
use crate::files::registry::HandlerRegistry;
use crate::types::ParseResult;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

/// High-level API for scanning image files for XMP packets
///
/// # Example
///
/// ```rust,no_run
/// use xmpblock::{ScanOptions, XmpScanner};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let scanner = XmpScanner::with_options(ScanOptions::default().without_packet_scanning());
/// let result = scanner.scan_path("image.jpg")?;
///
/// if let Some(format) = result.format {
///     println!("{} {:?}", format, result.dimensions());
/// }
/// for packet in &result.packets {
///     println!("{}", String::from_utf8_lossy(packet));
/// }
/// # Ok(())
/// # }
/// ```
pub struct XmpScanner {
    registry: HandlerRegistry,
    options: ScanOptions,
}

impl XmpScanner {
    /// Create a scanner with every enabled format and default options
    pub fn new() -> Self {
        Self::with_options(ScanOptions::default())
    }

    /// Create a scanner with the given options
    pub fn with_options(options: ScanOptions) -> Self {
        Self {
            registry: HandlerRegistry::new(),
            options,
        }
    }

    /// Get the options this scanner uses
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan a seekable stream
    ///
    /// # Returns
    ///
    /// * `Ok(ParseResult)` - `format` is `None` when no handler recognized
    ///   the stream
    /// * `Err(XmpError::IoError)` if the stream could not be read
    /// * `Err(XmpError::BadParam)` if the options are invalid
    pub fn scan<R: Read + Seek>(&self, reader: &mut R) -> XmpResult<ParseResult> {
        self.registry.detect(reader, &self.options)
    }

    /// Scan an in-memory file
    pub fn scan_bytes(&self, data: &[u8]) -> XmpResult<ParseResult> {
        self.scan(&mut Cursor::new(data))
    }

    /// Open and scan a file
    pub fn scan_path<P: AsRef<Path>>(&self, path: P) -> XmpResult<ParseResult> {
        let file = File::open(path)?;
        self.scan(&mut BufReader::new(file))
    }
}

impl Default for XmpScanner {
    fn default() -> Self {
        Self::new()
    }
}
