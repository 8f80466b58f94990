//! ISO Base Media File Format (BMFF) support
//!
//! This module provides the box reader shared by the ISO-family image
//! formats:
//! - JPEG 2000 (JP2), identified by its `jP  ` signature box
//! - HEIF family: HEIC, AVIF, identified by their `ftyp` brands
//!
//! BMFF Structure:
//! - Files are composed of "boxes"
//! - Each box has: 4-byte size, 4-byte type, optional extended size, data
//! - Size 1 means a 64-bit size follows the type; size 0 means the box
//!   extends to the end of its container
//! - All multi-byte integers are big-endian

use crate::core::error::{XmpError, XmpResult};
use crate::files::source::ByteSource;
use std::io::{Read, Seek};

pub mod iso;

pub use iso::IsoBmffHandler;

// ============================================================================
// Constants
// ============================================================================

/// ftyp box type (file type box)
pub const FTYP_BOX: &[u8; 4] = b"ftyp";

/// UUID box type
pub const UUID_BOX: &[u8; 4] = b"uuid";

/// XMP UUID for BMFF-based formats
/// UUID: BE7ACFCB-97A9-42E8-9C71-999491E3AFAC
pub const XMP_UUID: &[u8; 16] = &[
    0xBE, 0x7A, 0xCF, 0xCB, 0x97, 0xA9, 0x42, 0xE8, 0x9C, 0x71, 0x99, 0x94, 0x91, 0xE3, 0xAF, 0xAC,
];

/// Plain box header: size + type
const HEADER_SIZE: u64 = 8;

/// Box header with a 64-bit size
const EXTENDED_HEADER_SIZE: u64 = 16;

// ============================================================================
// Types
// ============================================================================

/// BMFF box information
#[derive(Debug, Clone)]
pub struct IsoBox {
    /// Box type (4-byte FourCC)
    pub box_type: [u8; 4],
    /// Offset where box header starts
    pub header_offset: u64,
    /// Offset where box data starts (after header)
    pub data_offset: u64,
    /// Offset just past the end of the box
    pub end: u64,
}

impl IsoBox {
    /// Get the size of the box data (excluding header)
    pub fn data_size(&self) -> u64 {
        self.end - self.data_offset
    }
}

// ============================================================================
// Reading Functions
// ============================================================================

/// Read a box header at the current position
///
/// `container_end` is the end of the enclosing box (or of the stream). A box
/// whose header or declared extent does not fit the container is a
/// [`XmpError::BadValue`].
pub fn read_box<R: Read + Seek>(
    source: &mut ByteSource<'_, R>,
    container_end: u64,
) -> XmpResult<IsoBox> {
    let header_offset = source.position();
    if container_end.saturating_sub(header_offset) < HEADER_SIZE {
        return Err(XmpError::BadValue(format!(
            "Box header at {} does not fit its container",
            header_offset
        )));
    }

    let size = source.read_u32()?;
    let box_type = source.read_array::<4>()?;

    let (data_offset, end) = match size {
        0 => (header_offset + HEADER_SIZE, container_end),
        1 => {
            let size = source.read_u64()?;
            if size < EXTENDED_HEADER_SIZE {
                return Err(bad_size(&box_type, size));
            }
            let end = header_offset
                .checked_add(size)
                .ok_or_else(|| bad_size(&box_type, size))?;
            (header_offset + EXTENDED_HEADER_SIZE, end)
        }
        n if u64::from(n) < HEADER_SIZE => return Err(bad_size(&box_type, u64::from(n))),
        n => (header_offset + HEADER_SIZE, header_offset + u64::from(n)),
    };

    if end > container_end {
        return Err(XmpError::BadValue(format!(
            "Box '{}' at {} overruns its container ({} > {})",
            String::from_utf8_lossy(&box_type),
            header_offset,
            end,
            container_end
        )));
    }

    Ok(IsoBox {
        box_type,
        header_offset,
        data_offset,
        end,
    })
}

fn bad_size(box_type: &[u8; 4], size: u64) -> XmpError {
    XmpError::BadValue(format!(
        "Box '{}' has invalid size {}",
        String::from_utf8_lossy(box_type),
        size
    ))
}
