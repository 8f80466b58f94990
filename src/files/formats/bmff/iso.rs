//! ISO-family still image support (JPEG 2000, HEIC, AVIF)
//!
//! - Detect: a `jP  ` signature box selects JPEG 2000; an `ftyp` box whose
//!   compatible brands include `heic` or `avif` selects that codec
//! - Dimensions: JP2 `jp2h/ihdr`; HEIF `meta/idat` or `meta/iprp/ipco/ispe`
//! - XMP Storage: a top-level `uuid` box carrying the XMP UUID
//!
//! Boxes are walked as a tree. Only the containers listed in
//! [`BoxWalker::action`] are entered, and nesting is capped by
//! [`ScanOptions::max_box_depth`].

use super::{read_box, IsoBox, FTYP_BOX, UUID_BOX, XMP_UUID};
use crate::core::error::{XmpError, XmpResult};
use crate::files::handler::{FormatHandler, ScanOptions};
use crate::files::packet::read_block;
use crate::files::source::{ByteOrder, ByteSource};
use crate::types::{ImageFormat, ParseResult};
use std::io::{Read, Seek};

/// JPEG 2000 signature box type and its fixed content
const JP2_SIGNATURE_BOX: [u8; 4] = *b"jP  ";
const JP2_SIGNATURE: &[u8; 4] = &[0x0D, 0x0A, 0x87, 0x0A];

/// Brands selecting the codec family
const BRAND_HEIC: &[u8; 4] = b"heic";
const BRAND_AVIF: &[u8; 4] = b"avif";

/// Box types used for dimensions
const JP2H: [u8; 4] = *b"jp2h";
const IHDR: [u8; 4] = *b"ihdr";
const META: [u8; 4] = *b"meta";
const IDAT: [u8; 4] = *b"idat";
const IPRP: [u8; 4] = *b"iprp";
const IPCO: [u8; 4] = *b"ipco";
const ISPE: [u8; 4] = *b"ispe";
const UUID: [u8; 4] = *UUID_BOX;

/// What to do with a box, given where it sits in the tree
enum BoxAction {
    /// Walk the children, which start `skip` bytes into the payload
    Descend { skip: u64 },
    /// JP2 image header: height then width, 32 bits each
    ImageHeader,
    /// HEIF item data: width then height, 16 bits each, after 4 bytes
    ItemData,
    /// HEIF image spatial extents: width then height, 32 bits each, after 4 bytes
    SpatialExtents,
    /// Possibly the XMP uuid box
    Uuid,
    Skip,
}

/// ISO-family file handler for XMP packets
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoBmffHandler;

impl FormatHandler for IsoBmffHandler {
    fn scan<R: Read + Seek>(
        &self,
        source: &mut ByteSource<'_, R>,
        options: &ScanOptions,
    ) -> XmpResult<ParseResult> {
        Self::read_iso(source, options)
    }

    fn format_name(&self) -> &'static str {
        "ISO BMFF"
    }
}

impl IsoBmffHandler {
    /// Parse a JPEG 2000, HEIC or AVIF stream
    ///
    /// The first box picks the format; the remaining top-level boxes are
    /// then walked to the end of the stream.
    pub fn read_iso<R: Read + Seek>(
        source: &mut ByteSource<'_, R>,
        options: &ScanOptions,
    ) -> XmpResult<ParseResult> {
        source.set_byte_order(ByteOrder::BigEndian);

        // Short streams are not ISO files; don't treat them as truncated
        let header = source.read_up_to(8)?;
        if header.len() < 8 || (header[4..] != JP2_SIGNATURE_BOX && header[4..] != *FTYP_BOX) {
            return Err(XmpError::mismatch("ISO BMFF"));
        }
        source.seek(0)?;

        let len = source.len();
        let first = read_box(source, len).map_err(|_| XmpError::mismatch("ISO BMFF"))?;
        let format = Self::read_format(source, &first)?;

        let mut walker = BoxWalker {
            format,
            max_depth: options.max_box_depth,
            result: ParseResult::new(format),
        };
        walker.walk(source, first.end, len, &[])?;
        Ok(walker.result)
    }

    /// Identify the format from the first box
    fn read_format<R: Read + Seek>(
        source: &mut ByteSource<'_, R>,
        first: &IsoBox,
    ) -> XmpResult<ImageFormat> {
        source.seek(first.data_offset)?;

        if first.box_type == JP2_SIGNATURE_BOX {
            if first.data_size() == 4 && source.read_array::<4>()? == *JP2_SIGNATURE {
                return Ok(ImageFormat::Jpeg2000);
            }
            return Err(XmpError::mismatch("JPEG2000"));
        }

        // Major brand and minor version, then the compatible brands
        if first.data_size() < 12 {
            return Err(XmpError::mismatch("ISO BMFF"));
        }
        source.skip(8)?;

        let mut format = None;
        for _ in 0..(first.data_size() - 8) / 4 {
            let brand = source.read_array::<4>()?;
            if brand == *BRAND_HEIC {
                format = Some(ImageFormat::Heic);
            } else if brand == *BRAND_AVIF {
                format = Some(ImageFormat::Avif);
            }
        }
        format.ok_or_else(|| XmpError::FormatMismatch("No HEIC or AVIF brand in ftyp".into()))
    }
}

/// Depth-bounded walk over the box tree of one stream
struct BoxWalker {
    format: ImageFormat,
    max_depth: usize,
    result: ParseResult,
}

impl BoxWalker {
    /// Visit every box in `[start, end)`; `ancestors` are the enclosing box types
    fn walk<R: Read + Seek>(
        &mut self,
        source: &mut ByteSource<'_, R>,
        start: u64,
        end: u64,
        ancestors: &[[u8; 4]],
    ) -> XmpResult<()> {
        let mut pos = start;
        while pos < end {
            source.seek(pos)?;
            let current = read_box(source, end)?;
            self.visit(source, &current, ancestors)?;
            pos = current.end;
        }
        Ok(())
    }

    fn visit<R: Read + Seek>(
        &mut self,
        source: &mut ByteSource<'_, R>,
        current: &IsoBox,
        ancestors: &[[u8; 4]],
    ) -> XmpResult<()> {
        match self.action(ancestors, &current.box_type) {
            BoxAction::Descend { skip } => {
                // Children sit one level below this box
                if ancestors.len() + 2 > self.max_depth {
                    return Err(XmpError::BadValue(format!(
                        "Box nesting deeper than {} levels",
                        self.max_depth
                    )));
                }
                require_payload(current, skip)?;
                let mut path = ancestors.to_vec();
                path.push(current.box_type);
                self.walk(source, current.data_offset + skip, current.end, &path)
            }
            BoxAction::ImageHeader => {
                require_payload(current, 8)?;
                let height = source.read_u32()?;
                let width = source.read_u32()?;
                self.result.set_dimensions(width, height);
                Ok(())
            }
            BoxAction::ItemData => {
                require_payload(current, 8)?;
                source.skip(4)?;
                let width = source.read_u16()?;
                let height = source.read_u16()?;
                self.result.set_dimensions(u32::from(width), u32::from(height));
                Ok(())
            }
            BoxAction::SpatialExtents => {
                require_payload(current, 12)?;
                // Version and flags
                source.skip(4)?;
                let width = source.read_u32()?;
                let height = source.read_u32()?;
                self.result.set_dimensions(width, height);
                Ok(())
            }
            BoxAction::Uuid => {
                if current.data_size() >= XMP_UUID.len() as u64
                    && source.read_array::<16>()? == *XMP_UUID
                {
                    let offset = current.data_offset + XMP_UUID.len() as u64;
                    let packet = read_block(source, offset, current.end - offset)?;
                    self.result.push_packet(packet);
                }
                Ok(())
            }
            BoxAction::Skip => Ok(()),
        }
    }

    /// Map a box to its handling from its type and position in the tree
    fn action(&self, ancestors: &[[u8; 4]], box_type: &[u8; 4]) -> BoxAction {
        let jp2 = self.format == ImageFormat::Jpeg2000;
        match (ancestors, *box_type) {
            ([], UUID) => BoxAction::Uuid,
            ([], JP2H) if jp2 => BoxAction::Descend { skip: 0 },
            ([JP2H], IHDR) => BoxAction::ImageHeader,
            // Full box: version and flags precede the children
            ([], META) if !jp2 => BoxAction::Descend { skip: 4 },
            ([META], IDAT) => BoxAction::ItemData,
            ([META], IPRP) => BoxAction::Descend { skip: 0 },
            ([META, IPRP], IPCO) => BoxAction::Descend { skip: 0 },
            ([META, IPRP, IPCO], ISPE) => BoxAction::SpatialExtents,
            _ => BoxAction::Skip,
        }
    }
}

fn require_payload(current: &IsoBox, needed: u64) -> XmpResult<()> {
    if current.data_size() < needed {
        return Err(XmpError::BadValue(format!(
            "Box '{}' payload is {} bytes, need {}",
            String::from_utf8_lossy(&current.box_type),
            current.data_size(),
            needed
        )));
    }
    Ok(())
}
