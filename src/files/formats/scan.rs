//! Packet scanning for unrecognized containers
//!
//! When no container handler accepts a stream, the raw bytes are searched
//! for the standard xpacket wrapper:
//!
//! ```text
//! <?xpacket begin="..." id='W5M0MpCehiHzreSzNTczkc9d'?> ... <?xpacket end='w'?>
//! ```
//!
//! Apostrophes and double quotes are interchangeable in both wrappers, and
//! the end wrapper may carry either `w` or `r`. A packet whose end wrapper is
//! missing extends to the end of the stream.

use crate::core::error::{XmpError, XmpResult};
use crate::files::handler::{FormatHandler, ScanOptions};
use crate::files::packet::read_block;
use crate::files::source::ByteSource;
use crate::types::{ImageFormat, ParseResult};
use std::io::{Read, Seek};

/// Tail of the xpacket header: the fixed packet id, its closing quote and `?>`
const PACKET_ID: &[u8] = b"W5M0MpCehiHzreSzNTczkc9d'?>";

/// Complete xpacket footer
const PACKET_END: &[u8] = b"<?xpacket end='w'?>";

/// Packet scanning handler
#[derive(Debug, Clone, Copy, Default)]
pub struct PacketScanHandler;

impl FormatHandler for PacketScanHandler {
    fn scan<R: Read + Seek>(
        &self,
        source: &mut ByteSource<'_, R>,
        options: &ScanOptions,
    ) -> XmpResult<ParseResult> {
        Self::read_packets(source, options)
    }

    fn format_name(&self) -> &'static str {
        "packet scan"
    }
}

impl PacketScanHandler {
    /// Search the whole stream for wrapped packets
    ///
    /// # Returns
    ///
    /// * `Ok(ParseResult)` labelled [`ImageFormat::Unknown`] with unknown
    ///   dimensions if at least one header was found
    /// * `Err(XmpError::FormatMismatch)` if the stream holds no xpacket header
    pub fn read_packets<R: Read + Seek>(
        source: &mut ByteSource<'_, R>,
        options: &ScanOptions,
    ) -> XmpResult<ParseResult> {
        source.seek(0)?;
        let len = source.len();
        let data = source.read_vec(len)?;

        let mut ranges = Vec::new();
        let mut from = 0;
        while let Some(id) = find(&data, from, PACKET_ID, header_byte_matches) {
            let start = id + PACKET_ID.len();
            let (end, next) = match find(&data, start, PACKET_END, footer_byte_matches) {
                Some(close) => (close, close + PACKET_END.len()),
                None => (data.len(), data.len()),
            };
            ranges.push((start as u64, (end - start) as u64));
            if !options.all_packets {
                break;
            }
            from = next;
        }

        if ranges.is_empty() {
            return Err(XmpError::FormatMismatch(
                "No xpacket wrapper found".to_string(),
            ));
        }

        let mut result = ParseResult::new(ImageFormat::Unknown);
        for (offset, size) in ranges {
            let packet = read_block(source, offset, size)?;
            result.push_packet(packet);
        }
        Ok(result)
    }
}

/// Byte comparison for the header: either quote may stand for `'`
fn header_byte_matches(expected: u8, actual: u8) -> bool {
    actual == expected || (expected == b'\'' && actual == b'"')
}

/// Byte comparison for the footer: as for the header, and `r` may stand for `w`
fn footer_byte_matches(expected: u8, actual: u8) -> bool {
    header_byte_matches(expected, actual) || (expected == b'w' && actual == b'r')
}

/// Position of the first match of `pattern` at or after `from`
fn find(data: &[u8], from: usize, pattern: &[u8], eq: fn(u8, u8) -> bool) -> Option<usize> {
    data.get(from..)?
        .windows(pattern.len())
        .position(|window| window.iter().zip(pattern).all(|(&a, &e)| eq(e, a)))
        .map(|i| from + i)
}
