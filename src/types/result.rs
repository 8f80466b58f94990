//! Scan result type
//!
//! A [`ParseResult`] is built by exactly one format handler and handed to the
//! caller only when that handler accepted the stream.

use crate::types::format::ImageFormat;

/// Outcome of scanning one byte stream
///
/// Dimensions are `None` whenever they could not be determined, for every
/// format alike. `packets` holds the trimmed XMP packets in the order they
/// were found in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParseResult {
    /// Recognized container format, `None` when nothing matched
    pub format: Option<ImageFormat>,
    /// Width in pixels
    pub width: Option<u32>,
    /// Height in pixels
    pub height: Option<u32>,
    /// Trimmed, non-empty XMP packets in discovery order
    pub packets: Vec<Vec<u8>>,
}

impl ParseResult {
    /// Create an empty result labelled with `format`
    pub fn new(format: ImageFormat) -> Self {
        Self {
            format: Some(format),
            ..Self::default()
        }
    }

    /// Result for a stream no handler recognized
    pub fn unrecognized() -> Self {
        Self::default()
    }

    /// Whether any handler recognized the stream
    pub fn is_recognized(&self) -> bool {
        self.format.is_some()
    }

    /// Width and height, when both are known
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        Some((self.width?, self.height?))
    }

    /// Set both dimensions
    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = Some(width);
        self.height = Some(height);
    }

    /// Append a packet if the extractor produced one
    pub(crate) fn push_packet(&mut self, packet: Option<Vec<u8>>) {
        if let Some(packet) = packet {
            self.packets.push(packet);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_is_empty() {
        let result = ParseResult::unrecognized();
        assert!(!result.is_recognized());
        assert_eq!(result.dimensions(), None);
        assert!(result.packets.is_empty());
    }

    #[test]
    fn test_dimensions_need_both_axes() {
        let mut result = ParseResult::new(ImageFormat::Jpeg);
        result.height = Some(10);
        assert_eq!(result.dimensions(), None);
        result.set_dimensions(4, 3);
        assert_eq!(result.dimensions(), Some((4, 3)));
    }

    #[test]
    fn test_push_packet_skips_none() {
        let mut result = ParseResult::new(ImageFormat::Png);
        result.push_packet(None);
        result.push_packet(Some(b"<x/>".to_vec()));
        assert_eq!(result.packets, vec![b"<x/>".to_vec()]);
    }
}
