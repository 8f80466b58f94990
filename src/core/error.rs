//! Error types for XMP block scanning
//!
//! Two classes of failure exist. A format handler that decides the stream is
//! not its format reports [`XmpError::FormatMismatch`] or
//! [`XmpError::BadValue`]; the dispatcher recovers from both and moves on to
//! the next handler. An [`XmpError::IoError`] means the stream itself could not
//! satisfy a read or seek and aborts detection altogether.

use thiserror::Error;

/// Error types for XMP block scanning
#[derive(Debug, Error)]
pub enum XmpError {
    /// The stream does not carry this handler's signature
    #[error("Format mismatch: {0}")]
    FormatMismatch(String),

    /// The signature matched but the structure that follows is invalid
    /// (bad CRC, corrupt trailer, box overrun, ...)
    #[error("Bad value: {0}")]
    BadValue(String),

    /// Bad parameter provided to a function
    #[error("Bad parameter: {0}")]
    BadParam(String),

    /// IO error (short read, seek beyond the end of the stream, ...)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl XmpError {
    /// Shorthand for a signature mismatch
    pub(crate) fn mismatch(format: &str) -> Self {
        XmpError::FormatMismatch(format!("Not a valid {} file", format))
    }

    /// Whether this error must abort format detection.
    ///
    /// Only [`XmpError::FormatMismatch`] and [`XmpError::BadValue`] are
    /// recoverable: the dispatcher treats them as "not this format".
    pub fn is_fatal(&self) -> bool {
        !matches!(self, XmpError::FormatMismatch(_) | XmpError::BadValue(_))
    }
}

/// Result type alias for XMP block scanning
pub type XmpResult<T> = Result<T, XmpError>;
