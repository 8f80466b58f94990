//! Format handler registry for XMP block scanning
//!
//! This module provides the dispatcher: the registered handlers are tried in
//! priority order over the same stream, each from offset zero, and the first
//! one that accepts the stream supplies the result.

use crate::core::error::XmpResult;
use crate::files::handler::{FormatHandler, ScanOptions};
use crate::files::source::ByteSource;
use crate::types::ParseResult;
use std::io::{Read, Seek};

/// Enum of supported format handlers
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Handler {
    #[cfg(feature = "png")]
    Png(crate::files::formats::png::PngHandler),
    #[cfg(feature = "webp")]
    Webp(crate::files::formats::riff::webp::WebpHandler),
    #[cfg(feature = "gif")]
    Gif(crate::files::formats::gif::GifHandler),
    #[cfg(feature = "jpeg")]
    Jpeg(crate::files::formats::jpeg::JpegHandler),
    #[cfg(feature = "isobmff")]
    IsoBmff(crate::files::formats::bmff::IsoBmffHandler),
    #[cfg(feature = "tiff")]
    Tiff(crate::files::formats::tiff::TiffHandler),
    #[cfg(feature = "packet-scan")]
    PacketScan(crate::files::formats::scan::PacketScanHandler),
}

impl FormatHandler for Handler {
    fn scan<R: Read + Seek>(
        &self,
        source: &mut ByteSource<'_, R>,
        options: &ScanOptions,
    ) -> XmpResult<ParseResult> {
        match self {
            #[cfg(feature = "png")]
            Handler::Png(h) => h.scan(source, options),
            #[cfg(feature = "webp")]
            Handler::Webp(h) => h.scan(source, options),
            #[cfg(feature = "gif")]
            Handler::Gif(h) => h.scan(source, options),
            #[cfg(feature = "jpeg")]
            Handler::Jpeg(h) => h.scan(source, options),
            #[cfg(feature = "isobmff")]
            Handler::IsoBmff(h) => h.scan(source, options),
            #[cfg(feature = "tiff")]
            Handler::Tiff(h) => h.scan(source, options),
            #[cfg(feature = "packet-scan")]
            Handler::PacketScan(h) => h.scan(source, options),
        }
    }

    fn format_name(&self) -> &'static str {
        match self {
            #[cfg(feature = "png")]
            Handler::Png(h) => h.format_name(),
            #[cfg(feature = "webp")]
            Handler::Webp(h) => h.format_name(),
            #[cfg(feature = "gif")]
            Handler::Gif(h) => h.format_name(),
            #[cfg(feature = "jpeg")]
            Handler::Jpeg(h) => h.format_name(),
            #[cfg(feature = "isobmff")]
            Handler::IsoBmff(h) => h.format_name(),
            #[cfg(feature = "tiff")]
            Handler::Tiff(h) => h.format_name(),
            #[cfg(feature = "packet-scan")]
            Handler::PacketScan(h) => h.format_name(),
        }
    }
}

impl Handler {
    /// Whether this handler only runs when packet scanning is enabled
    fn is_packet_scan(&self) -> bool {
        #[cfg(feature = "packet-scan")]
        if let Handler::PacketScan(_) = self {
            return true;
        }
        false
    }
}

/// Registry for format handlers
pub struct HandlerRegistry {
    handlers: Vec<Handler>,
}

impl HandlerRegistry {
    /// Create a new handler registry with default handlers registered
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    /// Register a format handler after the ones already registered
    pub fn register(&mut self, handler: Handler) {
        self.handlers.push(handler);
    }

    /// Register default handlers in priority order
    /// (PNG, WEBP, GIF, JPEG, ISO BMFF, TIFF, packet scan)
    fn register_defaults(&mut self) {
        #[cfg(feature = "png")]
        self.register(Handler::Png(crate::files::formats::png::PngHandler));
        #[cfg(feature = "webp")]
        self.register(Handler::Webp(crate::files::formats::riff::webp::WebpHandler));
        #[cfg(feature = "gif")]
        self.register(Handler::Gif(crate::files::formats::gif::GifHandler));
        #[cfg(feature = "jpeg")]
        self.register(Handler::Jpeg(crate::files::formats::jpeg::JpegHandler));
        #[cfg(feature = "isobmff")]
        self.register(Handler::IsoBmff(crate::files::formats::bmff::IsoBmffHandler));
        #[cfg(feature = "tiff")]
        self.register(Handler::Tiff(crate::files::formats::tiff::TiffHandler));
        #[cfg(feature = "packet-scan")]
        self.register(Handler::PacketScan(
            crate::files::formats::scan::PacketScanHandler,
        ));
    }

    /// Detect the format of a stream and extract its XMP packets
    ///
    /// Every handler gets its own [`ByteSource`] starting at offset zero and
    /// builds its own [`ParseResult`]; only the first accepted result is
    /// returned, so a rejected attempt leaves nothing behind.
    ///
    /// # Arguments
    ///
    /// * `reader` - A reader implementing `Read + Seek`
    /// * `options` - Options controlling the scan
    ///
    /// # Returns
    ///
    /// * `Ok(ParseResult)` from the first handler that accepted the stream,
    ///   or [`ParseResult::unrecognized`] if none did
    /// * `Err(XmpError::BadParam)` if `options` are invalid
    /// * `Err(XmpError::IoError)` if the stream could not be read; detection
    ///   stops at the first such error
    pub fn detect<R: Read + Seek>(
        &self,
        reader: &mut R,
        options: &ScanOptions,
    ) -> XmpResult<ParseResult> {
        options.validate()?;

        for handler in &self.handlers {
            if handler.is_packet_scan() && !options.use_packet_scanning {
                continue;
            }

            let mut source = ByteSource::new(reader)?;
            log::debug!("Trying {} handler", handler.format_name());
            match handler.scan(&mut source, options) {
                Ok(result) => {
                    log::debug!(
                        "{} handler accepted the stream ({} packets)",
                        handler.format_name(),
                        result.packets.len()
                    );
                    return Ok(result);
                }
                Err(e) if !e.is_fatal() => {
                    log::debug!("{} handler rejected the stream: {}", handler.format_name(), e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(ParseResult::unrecognized())
    }

    /// Get all registered handlers
    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global default registry instance
///
/// This provides a convenient way to access the default handler registry
/// without needing to create a new instance.
pub fn default_registry() -> HandlerRegistry {
    HandlerRegistry::new()
}
