//! XMP block core module
//!
//! This module contains the error type shared by every format handler.

pub mod error;

pub use error::{XmpError, XmpResult};
