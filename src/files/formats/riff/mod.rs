//! RIFF (Resource Interchange File Format) support
//!
//! RIFF Structure:
//! ```text
//! RIFF <file_size> <form_type>
//!   <chunk_id> <chunk_size> <chunk_data> [padding]
//!   <chunk_id> <chunk_size> <chunk_data> [padding]
//!   ...
//! ```
//!
//! - All multi-byte integers are little-endian
//! - Chunk data is padded to even byte boundary
//! - file_size = total file size - 8 (excludes "RIFF" and size field)

use crate::core::error::{XmpError, XmpResult};
use crate::files::source::{ByteOrder, ByteSource};
use std::io::{Read, Seek};

#[cfg(feature = "webp")]
pub mod webp;

// ============================================================================
// Constants
// ============================================================================

/// RIFF file signature
pub const RIFF_SIGNATURE: &[u8; 4] = b"RIFF";

/// Chunk header size (id + size)
pub const CHUNK_HEADER_SIZE: u64 = 8;

// ============================================================================
// Types
// ============================================================================

/// Information about a RIFF chunk
#[derive(Debug, Clone)]
pub struct RiffChunk {
    /// Chunk FourCC ID
    pub id: [u8; 4],
    /// Chunk data size (excluding header and padding)
    pub size: u32,
    /// Position of chunk header in file
    pub offset: u64,
}

impl RiffChunk {
    /// Get the data offset (after the header)
    pub fn data_offset(&self) -> u64 {
        self.offset + CHUNK_HEADER_SIZE
    }

    /// Offset of the next chunk, padding included
    pub fn next_offset(&self) -> u64 {
        self.data_offset() + padded_size(self.size)
    }
}

// ============================================================================
// Reading Functions
// ============================================================================

/// Validate the RIFF header and return the form type
///
/// The declared RIFF size must equal the stream length minus 8. Leaves the
/// source little-endian, positioned on the first chunk.
pub fn read_riff_header<R: Read + Seek>(
    source: &mut ByteSource<'_, R>,
    format: &str,
) -> XmpResult<[u8; 4]> {
    source.seek(0)?;
    if !source.read_signature(RIFF_SIGNATURE)? {
        return Err(XmpError::mismatch(format));
    }
    source.set_byte_order(ByteOrder::LittleEndian);

    let declared = u64::from(source.read_u32()?);
    if declared + 8 != source.len() {
        return Err(XmpError::FormatMismatch(format!(
            "RIFF size {} does not match stream length {}",
            declared,
            source.len()
        )));
    }

    source.read_array::<4>()
}

/// Read a chunk header at the current position
pub fn read_chunk_header<R: Read + Seek>(source: &mut ByteSource<'_, R>) -> XmpResult<RiffChunk> {
    let offset = source.position();
    let id = source.read_array::<4>()?;
    let size = source.read_u32()?;
    Ok(RiffChunk { id, size, offset })
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Calculate padded size (rounded up to even boundary)
pub fn padded_size(size: u32) -> u64 {
    u64::from(size) + u64::from(size & 1)
}
