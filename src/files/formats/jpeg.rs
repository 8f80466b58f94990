//! JPEG file format handler
//!
//! JPEG XMP Storage:
//! - XMP Packet is stored in APP1 segment with identifier `http://ns.adobe.com/xap/1.0/\0`
//! - Extended XMP (if needed) uses GUID-based chunking in additional APP1 segments
//!   with identifier `http://ns.adobe.com/xmp/extension/\0`, followed by the
//!   32-character GUID, the total length and the offset of the part
//!
//! Dimensions come from the start-of-frame segments. Thumbnails and
//! hierarchical files carry several frames, so the largest values win.

use crate::core::error::{XmpError, XmpResult};
use crate::files::handler::{FormatHandler, ScanOptions};
use crate::files::packet::read_block;
use crate::files::source::{ByteOrder, ByteSource};
use crate::types::{ImageFormat, ParseResult};
use std::io::{Read, Seek};

/// JPEG segment markers
const MARKER_PREFIX: u8 = 0xFF;
const MARKER_SOI: u8 = 0xD8; // Start of Image
const MARKER_APP1: u8 = 0xE1;
const MARKER_DNL: u8 = 0xDC; // Define Number of Lines
const MARKER_DHT: u8 = 0xC4; // Huffman tables, shares the SOF range
const MARKER_DAC: u8 = 0xCC; // Arithmetic coding, shares the SOF range

/// XMP namespace identifier in APP1 segment
const XMP_NAMESPACE: &[u8; 29] = b"http://ns.adobe.com/xap/1.0/\0";

/// Extended XMP namespace identifier
const EXTENDED_XMP_NAMESPACE: &[u8; 35] = b"http://ns.adobe.com/xmp/extension/\0";

/// Length of the GUID tying extended parts to the standard packet
const GUID_LEN: usize = 32;

/// Extended XMP header: namespace + GUID + total length + part offset
const EXTENDED_HEADER_LEN: u64 = 35 + 32 + 4 + 4;

/// Reassembly state of the extended packet
enum ExtendedXmp {
    /// No matching part seen yet
    Pending,
    /// The declared total length was refused; later parts are ignored
    Refused,
    /// Buffer sized by the first matching part
    Assembling(Vec<u8>),
}

/// JPEG file handler for XMP packets
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegHandler;

impl FormatHandler for JpegHandler {
    fn scan<R: Read + Seek>(
        &self,
        source: &mut ByteSource<'_, R>,
        options: &ScanOptions,
    ) -> XmpResult<ParseResult> {
        Self::read_jpeg(source, options)
    }

    fn format_name(&self) -> &'static str {
        "JPEG"
    }
}

impl JpegHandler {
    /// Parse a JPEG stream
    ///
    /// Scanning runs to the end of the stream, so entropy-coded data and
    /// anything after EOI are searched for markers too. The reassembled
    /// extended packet, if any, is appended after every standard packet.
    pub fn read_jpeg<R: Read + Seek>(
        source: &mut ByteSource<'_, R>,
        options: &ScanOptions,
    ) -> XmpResult<ParseResult> {
        if !source.read_signature(&[MARKER_PREFIX, MARKER_SOI])? {
            return Err(XmpError::mismatch("JPEG"));
        }
        source.set_byte_order(ByteOrder::BigEndian);

        let mut result = ParseResult::new(ImageFormat::Jpeg);
        let mut extended = ExtendedXmp::Pending;

        while let Some(marker) = Self::next_marker(source)? {
            if Self::is_standalone(marker) {
                continue;
            }

            let length = source.read_u16()?;
            if length < 2 {
                log::warn!(
                    "JPEG segment 0xFF{:02X} has length {}; resyncing",
                    marker,
                    length
                );
                continue;
            }
            let data_offset = source.position();
            let data_len = u64::from(length) - 2;

            match marker {
                MARKER_APP1 => {
                    Self::read_app1(source, data_len, options, &mut result, &mut extended)?
                }
                MARKER_DNL => {
                    let height = source.read_u16()?;
                    keep_max(&mut result.height, height);
                }
                m if Self::is_start_of_frame(m) => {
                    // Sample precision
                    source.skip(1)?;
                    let height = source.read_u16()?;
                    let width = source.read_u16()?;
                    keep_max(&mut result.height, height);
                    keep_max(&mut result.width, width);
                }
                _ => {}
            }

            source.seek(data_offset + data_len)?;
        }

        if let ExtendedXmp::Assembling(buffer) = extended {
            if !buffer.is_empty() {
                result.packets.push(buffer);
            }
        }
        Ok(result)
    }

    /// Advance to the next marker, skipping data bytes and 0xFF fill bytes
    ///
    /// Returns `None` at the end of the stream.
    fn next_marker<R: Read + Seek>(source: &mut ByteSource<'_, R>) -> XmpResult<Option<u8>> {
        let mut prev = 0u8;
        while !source.is_eof() {
            let byte = source.read_u8()?;
            if prev == MARKER_PREFIX && byte != MARKER_PREFIX {
                return Ok(Some(byte));
            }
            prev = byte;
        }
        Ok(None)
    }

    /// Markers that carry no length field
    ///
    /// 0x00 is a stuffed byte inside entropy-coded data, not a marker.
    fn is_standalone(marker: u8) -> bool {
        matches!(marker, 0x00 | 0x01 | 0xD0..=0xD9)
    }

    /// SOF0..SOF15, excluding DHT and DAC which share the range
    fn is_start_of_frame(marker: u8) -> bool {
        (0xC0..=0xCF).contains(&marker) && marker != MARKER_DHT && marker != MARKER_DAC
    }

    /// Handle an APP1 segment whose length field has been read
    fn read_app1<R: Read + Seek>(
        source: &mut ByteSource<'_, R>,
        data_len: u64,
        options: &ScanOptions,
        result: &mut ParseResult,
        extended: &mut ExtendedXmp,
    ) -> XmpResult<()> {
        let data_offset = source.position();
        let probe = source.read_up_to(data_len.min(EXTENDED_XMP_NAMESPACE.len() as u64))?;

        if probe.starts_with(XMP_NAMESPACE) {
            let skip = XMP_NAMESPACE.len() as u64;
            let packet = read_block(source, data_offset + skip, data_len - skip)?;
            result.push_packet(packet);
        } else if probe.starts_with(EXTENDED_XMP_NAMESPACE) {
            Self::read_extended_part(source, data_len, options, result, extended)?;
        }
        Ok(())
    }

    /// Copy one extended XMP part into the assembly buffer
    ///
    /// Parts are accepted only when their GUID occurs in the standard packet.
    /// The buffer is sized once, from the first matching part.
    fn read_extended_part<R: Read + Seek>(
        source: &mut ByteSource<'_, R>,
        data_len: u64,
        options: &ScanOptions,
        result: &ParseResult,
        extended: &mut ExtendedXmp,
    ) -> XmpResult<()> {
        let Some(standard) = result.packets.first() else {
            log::warn!("Extended XMP found with no standard XMP; ignored");
            return Ok(());
        };

        if data_len < EXTENDED_HEADER_LEN {
            log::warn!(
                "Extended XMP segment of {} bytes is too short; ignored",
                data_len
            );
            return Ok(());
        }

        let guid = source.read_array::<GUID_LEN>()?;
        if !contains(standard, &guid) {
            log::warn!(
                "Extended XMP GUID {} does not match the standard XMP; ignored",
                String::from_utf8_lossy(&guid)
            );
            return Ok(());
        }

        let total = source.read_u32()?;
        let offset = source.read_u32()?;
        let part_len = data_len - EXTENDED_HEADER_LEN;

        if let ExtendedXmp::Pending = extended {
            if total > options.max_extended_xmp_len {
                log::warn!(
                    "Extended XMP declares {} bytes, limit is {}; ignored",
                    total,
                    options.max_extended_xmp_len
                );
                *extended = ExtendedXmp::Refused;
            } else {
                *extended = ExtendedXmp::Assembling(vec![0u8; total as usize]);
            }
        }

        let ExtendedXmp::Assembling(buffer) = extended else {
            return Ok(());
        };

        let start = u64::from(offset);
        match start.checked_add(part_len) {
            Some(end) if end <= buffer.len() as u64 => {
                source.read_exact(&mut buffer[start as usize..end as usize])?;
            }
            _ => {
                log::warn!(
                    "Extended XMP part at offset {} ({} bytes) exceeds declared length {}; ignored",
                    offset,
                    part_len,
                    buffer.len()
                );
            }
        }
        Ok(())
    }
}

/// Raise `slot` to `value` if it is larger or unset
fn keep_max(slot: &mut Option<u32>, value: u16) {
    let value = u32::from(value);
    match *slot {
        Some(current) if current >= value => {}
        _ => *slot = Some(value),
    }
}

/// Substring search over bytes
fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}
