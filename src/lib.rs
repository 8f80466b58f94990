//! Locate embedded XMP packets and pixel dimensions in image files.
//!
//! `xmpblock` identifies the container format of a byte stream (PNG, WebP,
//! GIF, JPEG, JPEG 2000, HEIC, AVIF or TIFF) and returns every XMP packet it
//! carries as raw bytes, trimmed of the `<?xpacket ...?>` wrapper, together
//! with the image width and height. Streams in an unknown container are
//! searched for wrapped packets as a last resort.
//!
//! No image decoding and no XML parsing take place.
//!
//! # Example
//!
//! ```rust
//! let gif = b"GIF87a\x40\x01\xF0\x00";
//! let result = xmpblock::scan_bytes(gif)?;
//!
//! assert_eq!(result.format, Some(xmpblock::ImageFormat::OldStyleGif));
//! assert_eq!(result.dimensions(), Some((320, 240)));
//! assert!(result.packets.is_empty());
//! # Ok::<(), xmpblock::XmpError>(())
//! ```
//!
//! # Errors
//!
//! A stream that no handler recognizes is not an error: the result simply
//! has no format. A stream that cannot be read (short read, offset beyond
//! the end) aborts detection with [`XmpError::IoError`].

pub mod core;
pub mod files;
pub mod types;

pub use crate::core::{XmpError, XmpResult};
pub use files::{HandlerRegistry, ScanOptions, XmpScanner};
pub use types::{ImageFormat, ParseResult};

use std::io::{Read, Seek};
use std::path::Path;

/// Scan a seekable stream with default options
pub fn scan<R: Read + Seek>(reader: &mut R) -> XmpResult<ParseResult> {
    XmpScanner::new().scan(reader)
}

/// Scan an in-memory file with default options
pub fn scan_bytes(data: &[u8]) -> XmpResult<ParseResult> {
    XmpScanner::new().scan_bytes(data)
}

/// Open and scan a file with default options
pub fn scan_path<P: AsRef<Path>>(path: P) -> XmpResult<ParseResult> {
    XmpScanner::new().scan_path(path)
}
