//! TIFF file format handler
//!
//! TIFF XMP Storage:
//! - XMP Packet is stored in Tag 700 (kTIFF_XMP)
//! - Tag type is typically BYTE (1) or UNDEFINED (7)
//! - Value is stored inline if <= 4 bytes, otherwise as an offset to the data
//!
//! Every IFD in the chain is visited. Width and height come from tags 256 and
//! 257; a later IFD overwrites the values of an earlier one.

use crate::core::error::{XmpError, XmpResult};
use crate::files::handler::{FormatHandler, ScanOptions};
use crate::files::packet::read_block;
use crate::files::source::{ByteOrder, ByteSource};
use crate::types::{ImageFormat, ParseResult};
use std::collections::HashSet;
use std::io::{Read, Seek};

/// TIFF byte order marks
const BYTE_ORDER_LE: &[u8; 2] = b"II";
const BYTE_ORDER_BE: &[u8; 2] = b"MM";

/// TIFF magic number
const TIFF_MAGIC: u16 = 42;

/// TIFF Tag IDs
const TAG_IMAGE_WIDTH: u16 = 256;
const TAG_IMAGE_LENGTH: u16 = 257;
const TAG_XMP: u16 = 700;

/// TIFF Data Types
const TYPE_BYTE: u16 = 1;
const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;
const TYPE_UNDEFINED: u16 = 7;

/// Size in bytes of one value of each type, indexed by type code (1..=12)
const TYPE_LENGTHS: [u64; 13] = [0, 1, 1, 2, 4, 8, 1, 1, 2, 4, 8, 4, 8];

/// IFD Entry structure
struct IfdEntry {
    tag: u16,
    type_: u16,
    count: u32,
    value_or_offset: u32,
}

impl IfdEntry {
    /// Total size of the entry's data in bytes
    fn data_len(&self) -> u64 {
        u64::from(self.count) * TYPE_LENGTHS[usize::from(self.type_)]
    }
}

/// TIFF file handler for XMP packets
#[derive(Debug, Clone, Copy, Default)]
pub struct TiffHandler;

impl FormatHandler for TiffHandler {
    fn scan<R: Read + Seek>(
        &self,
        source: &mut ByteSource<'_, R>,
        _options: &ScanOptions,
    ) -> XmpResult<ParseResult> {
        Self::read_tiff(source)
    }

    fn format_name(&self) -> &'static str {
        "TIFF"
    }
}

impl TiffHandler {
    /// Parse a TIFF stream
    ///
    /// # Returns
    ///
    /// * `Ok(ParseResult)` with one packet per XMP tag found in the IFD chain
    /// * `Err(XmpError::BadValue)` for an invalid entry type, a width or
    ///   height of unexpected type, or an IFD chain that loops
    pub fn read_tiff<R: Read + Seek>(source: &mut ByteSource<'_, R>) -> XmpResult<ParseResult> {
        let order = source.read_up_to(2)?;
        let byte_order = if order == BYTE_ORDER_LE {
            ByteOrder::LittleEndian
        } else if order == BYTE_ORDER_BE {
            ByteOrder::BigEndian
        } else {
            return Err(XmpError::mismatch("TIFF"));
        };
        source.set_byte_order(byte_order);

        if source.read_u16()? != TIFF_MAGIC {
            return Err(XmpError::mismatch("TIFF"));
        }

        let mut result = ParseResult::new(ImageFormat::Tiff);
        let mut visited = HashSet::new();
        let mut ifd_offset = source.read_u32()?;

        while ifd_offset != 0 {
            if !visited.insert(ifd_offset) {
                return Err(XmpError::BadValue(format!(
                    "TIFF IFD chain loops back to offset {}",
                    ifd_offset
                )));
            }
            source.seek(u64::from(ifd_offset))?;

            let entry_count = source.read_u16()?;
            for _ in 0..entry_count {
                let entry = Self::read_ifd_entry(source)?;
                Self::apply_entry(source, &entry, &mut result)?;
            }

            ifd_offset = source.read_u32()?;
        }

        Ok(result)
    }

    /// Read one 12-byte IFD entry, validating its type code
    fn read_ifd_entry<R: Read + Seek>(source: &mut ByteSource<'_, R>) -> XmpResult<IfdEntry> {
        let tag = source.read_u16()?;
        let type_ = source.read_u16()?;
        if !(1..=12).contains(&type_) {
            return Err(XmpError::BadValue(format!(
                "TIFF tag {} has invalid type {}",
                tag, type_
            )));
        }
        let count = source.read_u32()?;
        let value_or_offset = source.read_u32()?;
        Ok(IfdEntry {
            tag,
            type_,
            count,
            value_or_offset,
        })
    }

    /// Record dimensions or extract the XMP packet an entry refers to
    fn apply_entry<R: Read + Seek>(
        source: &mut ByteSource<'_, R>,
        entry: &IfdEntry,
        result: &mut ParseResult,
    ) -> XmpResult<()> {
        match entry.tag {
            TAG_IMAGE_WIDTH => {
                result.width = Some(Self::dimension_value(entry, source.byte_order())?);
            }
            TAG_IMAGE_LENGTH => {
                result.height = Some(Self::dimension_value(entry, source.byte_order())?);
            }
            TAG_XMP
                if matches!(entry.type_, TYPE_BYTE | TYPE_UNDEFINED) && entry.data_len() > 4 =>
            {
                let resume = source.position();
                let packet = read_block(source, u64::from(entry.value_or_offset), entry.data_len())?;
                result.push_packet(packet);
                source.seek(resume)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Decode an inline SHORT or LONG dimension
    ///
    /// A SHORT is left-justified in the 4-byte value slot, so it sits in the
    /// high half when read big-endian and in the low half when read
    /// little-endian.
    fn dimension_value(entry: &IfdEntry, byte_order: ByteOrder) -> XmpResult<u32> {
        match (entry.type_, byte_order) {
            (TYPE_SHORT, ByteOrder::BigEndian) => Ok(entry.value_or_offset >> 16),
            (TYPE_SHORT, ByteOrder::LittleEndian) => Ok(entry.value_or_offset & 0xFFFF),
            (TYPE_LONG, _) => Ok(entry.value_or_offset),
            (other, _) => Err(XmpError::BadValue(format!(
                "TIFF tag {} has unexpected type {}",
                entry.tag, other
            ))),
        }
    }
}
