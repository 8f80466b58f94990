//! Bounds-checked, byte-order aware reading over a seekable stream
//!
//! Every format handler reads through a [`ByteSource`]. The byte order is a
//! property of the source value, so each format attempt configures its own
//! and never observes the setting of a previous attempt.
//!
//! Reads that the stream cannot fully satisfy and seeks past the end of the
//! stream fail with [`std::io::ErrorKind::UnexpectedEof`], which the
//! dispatcher treats as fatal.

use crate::core::error::{XmpError, XmpResult};
use std::io::{self, Read, Seek, SeekFrom};

/// Byte order for multi-byte integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    LittleEndian,
    #[default]
    BigEndian,
}

/// Random-access view over a `Read + Seek` stream of known length
pub struct ByteSource<'a, R> {
    inner: &'a mut R,
    len: u64,
    pos: u64,
    order: ByteOrder,
}

impl<'a, R: Read + Seek> ByteSource<'a, R> {
    /// Wrap `inner`, positioned at offset zero, reading big-endian
    pub fn new(inner: &'a mut R) -> XmpResult<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self {
            inner,
            len,
            pos: 0,
            order: ByteOrder::default(),
        })
    }

    /// Total length of the stream
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the stream is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current offset
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Bytes left between the current offset and the end of the stream
    pub fn remaining(&self) -> u64 {
        self.len - self.pos
    }

    /// Whether the current offset is at (or past) the end
    pub fn is_eof(&self) -> bool {
        self.pos >= self.len
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    pub fn set_byte_order(&mut self, order: ByteOrder) {
        self.order = order;
    }

    /// Move to an absolute offset; offsets beyond the end are an error
    pub fn seek(&mut self, offset: u64) -> XmpResult<()> {
        if offset > self.len {
            return Err(eof(format!(
                "seek to {} beyond end of stream ({} bytes)",
                offset, self.len
            )));
        }
        self.inner.seek(SeekFrom::Start(offset))?;
        self.pos = offset;
        Ok(())
    }

    /// Skip `count` bytes forward
    pub fn skip(&mut self, count: u64) -> XmpResult<()> {
        let target = self
            .pos
            .checked_add(count)
            .ok_or_else(|| eof("skip overflows stream offset".to_string()))?;
        self.seek(target)
    }

    /// Fill `buf` completely
    pub fn read_exact(&mut self, buf: &mut [u8]) -> XmpResult<()> {
        if (buf.len() as u64) > self.remaining() {
            return Err(eof(format!(
                "read of {} bytes at {} runs past end of stream ({} bytes)",
                buf.len(),
                self.pos,
                self.len
            )));
        }
        self.inner.read_exact(buf)?;
        self.pos += buf.len() as u64;
        Ok(())
    }

    /// Read exactly `count` bytes
    pub fn read_vec(&mut self, count: u64) -> XmpResult<Vec<u8>> {
        if count > self.remaining() {
            return Err(eof(format!(
                "read of {} bytes at {} runs past end of stream ({} bytes)",
                count, self.pos, self.len
            )));
        }
        let mut data = vec![0u8; count as usize];
        self.read_exact(&mut data)?;
        Ok(data)
    }

    /// Read up to `count` bytes; fewer are returned only at the end of the stream
    pub fn read_up_to(&mut self, count: u64) -> XmpResult<Vec<u8>> {
        self.read_vec(count.min(self.remaining()))
    }

    /// Read a fixed-size array
    pub fn read_array<const N: usize>(&mut self) -> XmpResult<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> XmpResult<u8> {
        let [b] = self.read_array::<1>()?;
        Ok(b)
    }

    pub fn read_u16(&mut self) -> XmpResult<u16> {
        let bytes = self.read_array::<2>()?;
        Ok(match self.order {
            ByteOrder::LittleEndian => u16::from_le_bytes(bytes),
            ByteOrder::BigEndian => u16::from_be_bytes(bytes),
        })
    }

    pub fn read_u24(&mut self) -> XmpResult<u32> {
        let [a, b, c] = self.read_array::<3>()?;
        Ok(match self.order {
            ByteOrder::LittleEndian => u32::from_le_bytes([a, b, c, 0]),
            ByteOrder::BigEndian => u32::from_be_bytes([0, a, b, c]),
        })
    }

    pub fn read_u32(&mut self) -> XmpResult<u32> {
        let bytes = self.read_array::<4>()?;
        Ok(match self.order {
            ByteOrder::LittleEndian => u32::from_le_bytes(bytes),
            ByteOrder::BigEndian => u32::from_be_bytes(bytes),
        })
    }

    pub fn read_u64(&mut self) -> XmpResult<u64> {
        let bytes = self.read_array::<8>()?;
        Ok(match self.order {
            ByteOrder::LittleEndian => u64::from_le_bytes(bytes),
            ByteOrder::BigEndian => u64::from_be_bytes(bytes),
        })
    }

    /// Compare the next bytes against `signature`.
    ///
    /// A stream shorter than the signature simply does not match; this is the
    /// only read that tolerates the end of the stream.
    pub fn read_signature(&mut self, signature: &[u8]) -> XmpResult<bool> {
        let found = self.read_up_to(signature.len() as u64)?;
        Ok(found == signature)
    }
}

fn eof(msg: String) -> XmpError {
    XmpError::IoError(io::Error::new(io::ErrorKind::UnexpectedEof, msg))
}
