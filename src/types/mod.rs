//! Scan result types
//!
//! This module defines the format label and the result returned by a scan.

pub mod format;
pub mod result;

pub use format::ImageFormat;
pub use result::ParseResult;
