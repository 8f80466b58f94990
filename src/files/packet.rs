//! XMP packet boundary extraction
//!
//! Every handler locates a byte range that should hold one XMP packet and
//! passes it here. The range is trimmed of surrounding whitespace, of an
//! optional `<?xpacket begin=...?>` header and of an optional
//! `<?xpacket end=...?>` footer. Malformed wrappers are tolerated as long as
//! the header still closes with `?>`.

use crate::core::error::{XmpError, XmpResult};
use crate::files::source::ByteSource;
use std::io::{Read, Seek};

/// Opening of the xpacket header
pub const XPACKET_HEADER: &[u8; 16] = b"<?xpacket begin=";

/// Opening of the xpacket footer; the full footer is `<?xpacket end='w'?>`
pub const XPACKET_FOOTER: &[u8; 14] = b"<?xpacket end=";

/// Length of a complete footer, quotes and access flag included
const FOOTER_LEN: u64 = 19;

/// Bytes read per step while scanning for whitespace or `?`
const WINDOW: u64 = 256;

/// Whitespace as understood by packet trimming
///
/// Besides the ASCII blanks this includes the information separators
/// 0x1C..=0x1F.
pub fn is_space(byte: u8) -> bool {
    matches!(byte, b'\t' | b'\n' | 0x0B | 0x0C | b'\r' | 0x1C..=0x1F | b' ')
}

/// Extract the packet held in `[offset, offset + size)`.
///
/// Returns `Ok(None)` when nothing is left after trimming, or when an xpacket
/// header never closes. On return the source is positioned at
/// `offset + size`. A range reaching past the end of the stream is an I/O
/// error.
pub fn read_block<R: Read + Seek>(
    source: &mut ByteSource<'_, R>,
    offset: u64,
    size: u64,
) -> XmpResult<Option<Vec<u8>>> {
    let end = offset.checked_add(size).ok_or_else(|| {
        XmpError::BadValue(format!("packet range {}+{} overflows", offset, size))
    })?;
    // Validates the whole range up front
    source.seek(end)?;
    source.seek(offset)?;

    let packet = match locate_packet(source, offset, end)? {
        Some((start, stop)) => {
            source.seek(start)?;
            Some(source.read_vec(stop - start)?)
        }
        None => None,
    };

    source.seek(end)?;
    Ok(packet)
}

/// Extract the packet that starts at `offset` and runs up to the first
/// `delimiter` byte.
///
/// On return the source is positioned on the delimiter. A missing delimiter
/// is a structural error.
pub fn read_block_delim<R: Read + Seek>(
    source: &mut ByteSource<'_, R>,
    offset: u64,
    delimiter: u8,
) -> XmpResult<Option<Vec<u8>>> {
    let mut pos = offset;
    source.seek(pos)?;
    while !source.is_eof() {
        let window = source.read_up_to(WINDOW)?;
        if let Some(i) = window.iter().position(|&b| b == delimiter) {
            let found = pos + i as u64;
            return read_block(source, offset, found - offset);
        }
        pos += window.len() as u64;
    }
    Err(XmpError::BadValue(format!(
        "packet delimiter 0x{:02X} not found after offset {}",
        delimiter, offset
    )))
}

/// Compute the trimmed `[start, end)` of the packet, if any
fn locate_packet<R: Read + Seek>(
    source: &mut ByteSource<'_, R>,
    start: u64,
    end: u64,
) -> XmpResult<Option<(u64, u64)>> {
    let mut start = skip_leading_space(source, start, end)?;

    if let Some(after) = header_end(source, start, end)? {
        start = match after {
            Some(after) => skip_leading_space(source, after, end)?,
            None => return Ok(None),
        };
    }

    let mut end = skip_trailing_space(source, start, end)?;

    if end - start >= FOOTER_LEN {
        source.seek(end - FOOTER_LEN)?;
        let footer = source.read_array::<19>()?;
        if footer[..14] == *XPACKET_FOOTER && footer[17..] == *b"?>" {
            end = skip_trailing_space(source, start, end - FOOTER_LEN)?;
        }
    }

    Ok((end > start).then_some((start, end)))
}

/// Look for an xpacket header at `start`.
///
/// `Ok(None)`: no header. `Ok(Some(None))`: header that never closes with
/// `?>`. `Ok(Some(Some(pos)))`: header closing just before `pos`.
fn header_end<R: Read + Seek>(
    source: &mut ByteSource<'_, R>,
    start: u64,
    end: u64,
) -> XmpResult<Option<Option<u64>>> {
    if end - start < XPACKET_HEADER.len() as u64 {
        return Ok(None);
    }
    source.seek(start)?;
    if source.read_array::<16>()? != *XPACKET_HEADER {
        return Ok(None);
    }

    let mut pos = source.position();
    while pos < end {
        let window = source.read_vec((end - pos).min(WINDOW))?;
        if let Some(i) = window.iter().position(|&b| b == b'?') {
            let question = pos + i as u64;
            if question + 1 >= end {
                return Ok(Some(None));
            }
            source.seek(question + 1)?;
            let closes = source.read_u8()? == b'>';
            return Ok(Some(closes.then_some(question + 2)));
        }
        pos += window.len() as u64;
    }
    Ok(Some(None))
}

fn skip_leading_space<R: Read + Seek>(
    source: &mut ByteSource<'_, R>,
    mut start: u64,
    end: u64,
) -> XmpResult<u64> {
    while start < end {
        source.seek(start)?;
        let window = source.read_vec((end - start).min(WINDOW))?;
        match window.iter().position(|&b| !is_space(b)) {
            Some(i) => return Ok(start + i as u64),
            None => start += window.len() as u64,
        }
    }
    Ok(start)
}

fn skip_trailing_space<R: Read + Seek>(
    source: &mut ByteSource<'_, R>,
    start: u64,
    mut end: u64,
) -> XmpResult<u64> {
    while end > start {
        let window_start = end.saturating_sub(WINDOW).max(start);
        source.seek(window_start)?;
        let window = source.read_vec(end - window_start)?;
        match window.iter().rposition(|&b| !is_space(b)) {
            Some(i) => return Ok(window_start + i as u64 + 1),
            None => end = window_start,
        }
    }
    Ok(end)
}
