//! GIF file format handler
//!
//! GIF XMP Storage:
//! - XMP Packet is stored in an Application Extension Block
//! - Application Extension identifier: "XMP DataXMP" (11 bytes, no null terminator)
//! - The packet is written as raw bytes rather than sub-blocks, followed by a
//!   258-byte "magic trailer": 0x01, 0xFF, 0xFE, ..., 0x00, 0x00. Read as
//!   sub-blocks, the trailer makes decoders skip the packet safely.
//!
//! GIF87a files cannot carry extension blocks; only their dimensions are read.

use crate::core::error::{XmpError, XmpResult};
use crate::files::handler::{FormatHandler, ScanOptions};
use crate::files::packet::read_block_delim;
use crate::files::source::{ByteOrder, ByteSource};
use crate::types::{ImageFormat, ParseResult};
use std::io::{Read, Seek};

/// GIF file signature
const GIF_SIGNATURE_87A: &[u8; 6] = b"GIF87a";
const GIF_SIGNATURE_89A: &[u8; 6] = b"GIF89a";

/// Block introducers
const EXTENSION_INTRODUCER: u8 = 0x21;
const IMAGE_SEPARATOR: u8 = 0x2C;
const TRAILER: u8 = 0x3B;

/// Application Extension label
const APPLICATION_EXTENSION_LABEL: u8 = 0xFF;

/// Application identifier + authentication code length
const APP_ID_LEN: u8 = 11;

/// XMP Application Extension identifier
const XMP_APP_IDENTIFIER: &[u8; 11] = b"XMP DataXMP";

/// First byte of the magic trailer; ends the raw packet data
const PACKET_DELIMITER: u8 = 0x01;

/// Magic trailer after the delimiter: 0xFF down to 0x00, then a block terminator
const MAGIC_TRAILER_LEN: usize = 257;

/// GIF file handler for XMP packets
#[derive(Debug, Clone, Copy, Default)]
pub struct GifHandler;

impl FormatHandler for GifHandler {
    fn scan<R: Read + Seek>(
        &self,
        source: &mut ByteSource<'_, R>,
        _options: &ScanOptions,
    ) -> XmpResult<ParseResult> {
        Self::read_gif(source)
    }

    fn format_name(&self) -> &'static str {
        "GIF"
    }
}

impl GifHandler {
    /// Parse a GIF stream
    ///
    /// The whole block sequence is walked up to the trailer; any unknown
    /// block introducer rejects the file.
    pub fn read_gif<R: Read + Seek>(source: &mut ByteSource<'_, R>) -> XmpResult<ParseResult> {
        let signature = source.read_up_to(6)?;
        let format = if signature == GIF_SIGNATURE_89A {
            ImageFormat::Gif
        } else if signature == GIF_SIGNATURE_87A {
            ImageFormat::OldStyleGif
        } else {
            return Err(XmpError::mismatch("GIF"));
        };
        source.set_byte_order(ByteOrder::LittleEndian);

        let mut result = ParseResult::new(format);
        let width = source.read_u16()?;
        let height = source.read_u16()?;
        result.set_dimensions(u32::from(width), u32::from(height));
        if format == ImageFormat::OldStyleGif {
            return Ok(result);
        }

        // Packed fields, then background color index and pixel aspect ratio
        let packed = source.read_u8()?;
        source.skip(2)?;
        Self::skip_color_table(source, packed)?;

        loop {
            match source.read_u8()? {
                TRAILER => return Ok(result),
                IMAGE_SEPARATOR => Self::skip_image(source)?,
                EXTENSION_INTRODUCER => Self::read_extension(source, &mut result)?,
                other => {
                    return Err(XmpError::BadValue(format!(
                        "Invalid GIF block type: 0x{:02X}",
                        other
                    )))
                }
            }
        }
    }

    /// Skip a global or local color table if the packed fields announce one
    fn skip_color_table<R: Read + Seek>(
        source: &mut ByteSource<'_, R>,
        packed: u8,
    ) -> XmpResult<()> {
        if packed & 0x80 != 0 {
            let entries = 2u64 << (packed & 0x07);
            source.skip(entries * 3)?;
        }
        Ok(())
    }

    /// Skip an image descriptor and its image data
    fn skip_image<R: Read + Seek>(source: &mut ByteSource<'_, R>) -> XmpResult<()> {
        // Left, top, width, height
        source.skip(8)?;
        let packed = source.read_u8()?;
        Self::skip_color_table(source, packed)?;
        // LZW minimum code size
        source.skip(1)?;
        Self::skip_sub_blocks(source)
    }

    /// Handle an extension block; the introducer has been read
    fn read_extension<R: Read + Seek>(
        source: &mut ByteSource<'_, R>,
        result: &mut ParseResult,
    ) -> XmpResult<()> {
        let label = source.read_u8()?;
        if label != APPLICATION_EXTENSION_LABEL {
            return Self::skip_sub_blocks(source);
        }

        let block_size = source.read_u8()?;
        if block_size != APP_ID_LEN {
            return Err(XmpError::BadValue(format!(
                "GIF application extension header is {} bytes, expected {}",
                block_size, APP_ID_LEN
            )));
        }

        let app_id = source.read_array::<11>()?;
        if app_id != *XMP_APP_IDENTIFIER {
            return Self::skip_sub_blocks(source);
        }

        let packet_offset = source.position();
        let packet = read_block_delim(source, packet_offset, PACKET_DELIMITER)?;
        result.push_packet(packet);

        // Delimiter, already located
        source.skip(1)?;
        let trailer = source.read_vec(MAGIC_TRAILER_LEN as u64)?;
        if !Self::is_magic_trailer(&trailer) {
            return Err(XmpError::BadValue(
                "Corrupt GIF file: XMP magic trailer mismatch".to_string(),
            ));
        }
        Ok(())
    }

    /// Check the 256 descending bytes and the closing terminator
    fn is_magic_trailer(trailer: &[u8]) -> bool {
        trailer.len() == MAGIC_TRAILER_LEN
            && trailer[..256]
                .iter()
                .enumerate()
                .all(|(i, &b)| b == 0xFF - i as u8)
            && trailer[256] == 0
    }

    /// Skip length-prefixed sub-blocks up to and including the zero terminator
    fn skip_sub_blocks<R: Read + Seek>(source: &mut ByteSource<'_, R>) -> XmpResult<()> {
        loop {
            let size = source.read_u8()?;
            if size == 0 {
                return Ok(());
            }
            source.skip(u64::from(size))?;
        }
    }
}
