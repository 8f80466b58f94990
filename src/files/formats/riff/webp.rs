//! WebP file format handler
//!
//! WebP uses RIFF container format with form type "WEBP".
//! XMP is stored in a chunk with FourCC "XMP " (note the trailing space),
//! which only the extended (VP8X) layout can carry.
//!
//! Reference: RFC 9649 - WebP Image Format

use super::{read_chunk_header, read_riff_header, CHUNK_HEADER_SIZE};
use crate::core::error::{XmpError, XmpResult};
use crate::files::handler::{FormatHandler, ScanOptions};
use crate::files::packet::read_block;
use crate::files::source::ByteSource;
use crate::types::{ImageFormat, ParseResult};
use std::io::{Read, Seek};

// ============================================================================
// Constants
// ============================================================================

/// WebP format identifier
const WEBP_SIGNATURE: &[u8; 4] = b"WEBP";

/// XMP chunk FourCC (note the trailing space)
const XMP_CHUNK_ID: &[u8; 4] = b"XMP ";

/// VP8X chunk FourCC (extended format)
const VP8X_CHUNK_ID: &[u8; 4] = b"VP8X";

/// VP8 chunk FourCC (lossy format)
const VP8_CHUNK_ID: &[u8; 4] = b"VP8 ";

/// VP8L chunk FourCC (lossless format)
const VP8L_CHUNK_ID: &[u8; 4] = b"VP8L";

/// Signature byte opening a VP8L bitstream
const VP8L_SIGNATURE: u8 = 0x2F;

// ============================================================================
// Handler
// ============================================================================

/// WebP file handler for XMP packets
#[derive(Debug, Clone, Copy, Default)]
pub struct WebpHandler;

impl FormatHandler for WebpHandler {
    fn scan<R: Read + Seek>(
        &self,
        source: &mut ByteSource<'_, R>,
        _options: &ScanOptions,
    ) -> XmpResult<ParseResult> {
        Self::read_webp(source)
    }

    fn format_name(&self) -> &'static str {
        "WEBP"
    }
}

impl WebpHandler {
    /// Parse a WebP stream
    ///
    /// The first chunk selects the layout. Simple lossy and lossless files
    /// end after their dimensions; extended files are walked chunk by chunk.
    pub fn read_webp<R: Read + Seek>(source: &mut ByteSource<'_, R>) -> XmpResult<ParseResult> {
        let form_type = read_riff_header(source, "WEBP")?;
        if &form_type != WEBP_SIGNATURE {
            return Err(XmpError::mismatch("WEBP"));
        }

        let mut result = ParseResult::new(ImageFormat::Webp);
        let first = read_chunk_header(source)?;

        match &first.id {
            VP8_CHUNK_ID => {
                // Frame tag (3) and start code (3)
                source.skip(6)?;
                let width = source.read_u16()?;
                let height = source.read_u16()?;
                result.set_dimensions(u32::from(width), u32::from(height));
                Ok(result)
            }
            VP8L_CHUNK_ID => {
                if source.read_u8()? != VP8L_SIGNATURE {
                    return Err(XmpError::BadValue(
                        "VP8L bitstream signature missing".to_string(),
                    ));
                }
                let packed = source.read_u32()?;
                let width = 1 + (packed & 0x3FFF);
                let height = 1 + ((packed >> 14) & 0x3FFF);
                result.set_dimensions(width, height);
                Ok(result)
            }
            VP8X_CHUNK_ID => {
                // Flags (1) and reserved (3)
                source.skip(4)?;
                let width = 1 + source.read_u24()?;
                let height = 1 + source.read_u24()?;
                result.set_dimensions(width, height);

                source.seek(first.next_offset())?;
                Self::read_extended_chunks(source, &mut result)?;
                Ok(result)
            }
            other => Err(XmpError::FormatMismatch(format!(
                "Unknown WebP chunk {:?}",
                String::from_utf8_lossy(other)
            ))),
        }
    }

    /// Walk the chunks that follow VP8X, collecting every "XMP " chunk
    fn read_extended_chunks<R: Read + Seek>(
        source: &mut ByteSource<'_, R>,
        result: &mut ParseResult,
    ) -> XmpResult<()> {
        while source.remaining() >= CHUNK_HEADER_SIZE {
            let chunk = read_chunk_header(source)?;
            if chunk.id == *XMP_CHUNK_ID {
                let packet = read_block(source, chunk.data_offset(), u64::from(chunk.size))?;
                result.push_packet(packet);
            }

            let next = chunk.next_offset();
            // A final odd-sized chunk may lack its pad byte
            if next == source.len() + 1 {
                break;
            }
            source.seek(next)?;
        }
        Ok(())
    }
}
