//! PNG file format handler
//!
//! PNG XMP Storage:
//! - XMP Packet is stored in iTXt chunk with keyword "XML:com.adobe.xmp"
//! - iTXt chunk format: keyword (null-terminated) + compression flag + compression method + language tag + translated keyword + text
//! - For XMP, the flag, method, language tag and translated keyword are all empty,
//!   so the text starts 22 bytes into the chunk
//!
//! Only the IHDR chunk's CRC is checked; that is enough to confirm the format.
//! The CRCs of later chunks are consumed but not verified.

use crate::core::error::{XmpError, XmpResult};
use crate::files::handler::{FormatHandler, ScanOptions};
use crate::files::packet::read_block;
use crate::files::source::{ByteOrder, ByteSource};
use crate::types::{ImageFormat, ParseResult};
use std::io::{Read, Seek};

/// PNG file signature
const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// XMP keyword in iTXt chunk, followed by the five empty iTXt header fields
const XMP_KEYWORD: &[u8; 22] = b"XML:com.adobe.xmp\0\0\0\0\0";

/// PNG chunk type for the image header
const CHUNK_TYPE_IHDR: &[u8; 4] = b"IHDR";

/// PNG chunk type for iTXt
const CHUNK_TYPE_ITXT: &[u8; 4] = b"iTXt";

/// IHDR data length: width, height, depth, color type, compression, filter, interlace
const IHDR_LENGTH: u32 = 13;

/// Largest chunk length PNG allows (2^31 - 1)
const MAX_CHUNK_LENGTH: u32 = 0x7FFF_FFFF;

/// PNG file handler for XMP packets
#[derive(Debug, Clone, Copy, Default)]
pub struct PngHandler;

impl FormatHandler for PngHandler {
    fn scan<R: Read + Seek>(
        &self,
        source: &mut ByteSource<'_, R>,
        _options: &ScanOptions,
    ) -> XmpResult<ParseResult> {
        Self::read_png(source)
    }

    fn format_name(&self) -> &'static str {
        "PNG"
    }
}

impl PngHandler {
    /// Parse a PNG stream
    ///
    /// Width and height come from IHDR. Every iTXt chunk carrying the XMP
    /// keyword contributes one packet.
    pub fn read_png<R: Read + Seek>(source: &mut ByteSource<'_, R>) -> XmpResult<ParseResult> {
        if !source.read_signature(PNG_SIGNATURE)? {
            return Err(XmpError::mismatch("PNG"));
        }
        source.set_byte_order(ByteOrder::BigEndian);

        let mut result = ParseResult::new(ImageFormat::Png);
        let (width, height) = Self::read_ihdr(source)?;
        result.set_dimensions(width, height);

        while !source.is_eof() {
            let length = source.read_u32()?;
            if source.is_eof() {
                break;
            }
            if length > MAX_CHUNK_LENGTH {
                return Err(XmpError::BadValue(format!(
                    "PNG chunk length {} exceeds 2^31-1",
                    length
                )));
            }

            let chunk_type = source.read_array::<4>()?;
            let data_offset = source.position();
            let length = u64::from(length);

            if chunk_type == *CHUNK_TYPE_ITXT && length > XMP_KEYWORD.len() as u64 {
                let keyword = source.read_array::<22>()?;
                if Self::is_xmp_keyword(&keyword) {
                    let text_offset = data_offset + XMP_KEYWORD.len() as u64;
                    let packet = read_block(source, text_offset, length - XMP_KEYWORD.len() as u64)?;
                    result.push_packet(packet);
                }
            }

            // Chunk data, then the CRC
            source.seek(data_offset + length)?;
            source.skip(4)?;
        }

        Ok(result)
    }

    /// Read the mandatory IHDR chunk and verify its CRC
    fn read_ihdr<R: Read + Seek>(source: &mut ByteSource<'_, R>) -> XmpResult<(u32, u32)> {
        let length = source.read_u32()?;
        if length != IHDR_LENGTH {
            return Err(XmpError::BadValue(format!(
                "PNG IHDR length is {}, expected {}",
                length, IHDR_LENGTH
            )));
        }

        let chunk_type = source.read_array::<4>()?;
        if chunk_type != *CHUNK_TYPE_IHDR {
            return Err(XmpError::BadValue(
                "PNG first chunk is not IHDR".to_string(),
            ));
        }

        let data = source.read_array::<13>()?;
        let stored_crc = source.read_u32()?;

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&chunk_type);
        hasher.update(&data);
        let computed = hasher.finalize();
        if computed != stored_crc {
            return Err(XmpError::BadValue(format!(
                "PNG IHDR CRC mismatch: stored 0x{:08X}, computed 0x{:08X}",
                stored_crc, computed
            )));
        }

        let width = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
        let height = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
        Ok((width, height))
    }

    /// Check if an iTXt chunk starts with the XMP keyword
    fn is_xmp_keyword(data: &[u8]) -> bool {
        data.len() >= XMP_KEYWORD.len() && data[..XMP_KEYWORD.len()] == *XMP_KEYWORD
    }
}
