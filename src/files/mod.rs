//! File format support for XMP
//!
//! This module provides format detection and XMP packet extraction for
//! image containers. All implementations are pure Rust over `Read + Seek`.

pub mod formats;
pub mod handler;
pub mod packet;
pub mod registry;
pub mod scanner;
pub mod source;

#[cfg(feature = "isobmff")]
pub use formats::bmff::IsoBmffHandler;
#[cfg(feature = "gif")]
pub use formats::gif::GifHandler;
#[cfg(feature = "jpeg")]
pub use formats::jpeg::JpegHandler;
#[cfg(feature = "png")]
pub use formats::png::PngHandler;
#[cfg(feature = "webp")]
pub use formats::riff::webp::WebpHandler;
#[cfg(feature = "packet-scan")]
pub use formats::scan::PacketScanHandler;
#[cfg(feature = "tiff")]
pub use formats::tiff::TiffHandler;
pub use handler::{FormatHandler, ScanOptions};
pub use registry::{default_registry, Handler, HandlerRegistry};
pub use scanner::XmpScanner;
pub use source::{ByteOrder, ByteSource};
