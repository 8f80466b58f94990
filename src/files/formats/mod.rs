//! File format handlers
//!
//! Each format handler recognizes one container layout and extracts its
//! embedded XMP packets and pixel dimensions. All handlers are pure Rust
//! implementations over `Read + Seek`.

#[cfg(feature = "isobmff")]
pub mod bmff;
#[cfg(feature = "gif")]
pub mod gif;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png")]
pub mod png;
#[cfg(feature = "webp")]
pub mod riff;
#[cfg(feature = "packet-scan")]
pub mod scan;
#[cfg(feature = "tiff")]
pub mod tiff;
